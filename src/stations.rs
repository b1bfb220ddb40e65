//! Station consolidation pipeline.
//!
//! Queries stops per subway route, keeps only parent stations, and
//! merges the per-route results into one record per station ID with
//! the accumulated set of lines serving it.

use std::collections::{BTreeSet, HashMap};
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::OutputError;
use crate::mbta::models::StopsDocument;
use crate::mbta::MbtaClient;

/// One stop observation extracted from a route's API response.
#[derive(Debug, Clone)]
pub struct StopObservation {
    pub stop_id: String,
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Finalized output row, one per unique station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationRow {
    pub station_name: String,
    pub subway_lines: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Default)]
struct StationEntry {
    name: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    routes: BTreeSet<String>,
}

/// Accumulator keyed by station ID. Name and coordinates follow
/// first-non-empty-wins and are never overwritten; the route set only
/// ever grows.
#[derive(Debug, Default)]
pub struct StationAccumulator {
    stations: HashMap<String, StationEntry>,
}

impl StationAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one stop observation for a route into the accumulator.
    pub fn observe(&mut self, stop: &StopObservation, route_name: &str) {
        let entry = self.stations.entry(stop.stop_id.clone()).or_default();
        if entry.name.is_empty() {
            if let Some(name) = stop.name.as_deref() {
                if !name.is_empty() {
                    entry.name = name.to_string();
                }
            }
        }
        if entry.latitude.is_none() {
            entry.latitude = stop.latitude;
        }
        if entry.longitude.is_none() {
            entry.longitude = stop.longitude;
        }
        entry.routes.insert(route_name.to_string());
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Finalize into output rows sorted by station name. Route sets
    /// come out of the BTreeSet already deduplicated and alphabetical.
    pub fn into_rows(self) -> Vec<StationRow> {
        let mut rows: Vec<StationRow> = self
            .stations
            .into_values()
            .map(|entry| StationRow {
                station_name: entry.name,
                subway_lines: entry.routes.into_iter().collect::<Vec<_>>().join(", "),
                latitude: entry.latitude,
                longitude: entry.longitude,
            })
            .collect();
        rows.sort_by(|a, b| a.station_name.cmp(&b.station_name));
        rows
    }
}

/// Fold one route's stops document into the accumulator. Stops that
/// reference a parent station are platforms or entrances and are
/// excluded entirely.
pub fn consolidate_route(
    accumulator: &mut StationAccumulator,
    route_id: &str,
    document: &StopsDocument,
) {
    let route_name = document.route_long_name(route_id);
    for stop in &document.data {
        if stop.parent_station_id().is_some() {
            continue;
        }
        let Some(stop_id) = stop.id.clone() else {
            continue;
        };
        accumulator.observe(
            &StopObservation {
                stop_id,
                name: stop.name().map(str::to_string),
                latitude: stop.latitude(),
                longitude: stop.longitude(),
            },
            route_name,
        );
    }
}

/// Fetch parent stations for each route in the given order and
/// consolidate them. A failed route fetch is logged and contributes
/// zero stations; processing continues with the remaining routes.
pub async fn fetch_all_stations(client: &MbtaClient, routes: &[String]) -> Vec<StationRow> {
    let mut accumulator = StationAccumulator::new();

    info!("Fetching subway stations from the MBTA API");
    for route_id in routes {
        info!(route = %route_id, "Fetching stops");
        match client.stops_for_route(route_id).await {
            Ok(document) => consolidate_route(&mut accumulator, route_id, &document),
            Err(e) => {
                error!(route = %route_id, error = %e, "Failed to fetch stops for route");
            }
        }
    }

    info!(stations = accumulator.len(), "Consolidated unique stations");
    accumulator.into_rows()
}

/// Write station rows as CSV with a header row.
pub fn write_stations_csv<W: Write>(rows: &[StationRow], writer: W) -> Result<(), OutputError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save station rows to `path`. An empty list writes nothing; absence
/// of the file signals "no data" downstream.
pub fn save_stations_csv(rows: &[StationRow], path: &Path) -> Result<(), OutputError> {
    if rows.is_empty() {
        warn!("No stations to save");
        return Ok(());
    }
    let file = std::fs::File::create(path)?;
    write_stations_csv(rows, file)?;
    info!(stations = rows.len(), path = %path.display(), "Saved station CSV");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(stop_id: &str, name: Option<&str>, lat: Option<f64>, lon: Option<f64>) -> StopObservation {
        StopObservation {
            stop_id: stop_id.to_string(),
            name: name.map(str::to_string),
            latitude: lat,
            longitude: lon,
        }
    }

    #[test]
    fn first_non_empty_value_wins() {
        let mut acc = StationAccumulator::new();
        // Route A reports the station with no coordinates and an empty name.
        acc.observe(&observation("place-x", Some(""), None, None), "Red Line");
        // Route B fills them in.
        acc.observe(
            &observation("place-x", Some("Park Street"), Some(42.36), Some(-71.06)),
            "Green Line B",
        );
        // A later route must not overwrite anything.
        acc.observe(
            &observation("place-x", Some("Wrong Name"), Some(0.0), Some(0.0)),
            "Green Line C",
        );

        let rows = acc.into_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].station_name, "Park Street");
        assert_eq!(rows[0].latitude, Some(42.36));
        assert_eq!(rows[0].longitude, Some(-71.06));
    }

    #[test]
    fn route_set_is_deduplicated_and_alphabetical() {
        let mut acc = StationAccumulator::new();
        acc.observe(&observation("place-x", Some("Shared"), None, None), "Red");
        acc.observe(&observation("place-x", Some("Shared"), None, None), "Green-B");
        acc.observe(&observation("place-x", Some("Shared"), None, None), "Red");

        let rows = acc.into_rows();
        assert_eq!(rows[0].subway_lines, "Green-B, Red");
    }

    #[test]
    fn rows_sorted_by_station_name() {
        let mut acc = StationAccumulator::new();
        acc.observe(&observation("b", Some("Wonderland"), None, None), "Blue Line");
        acc.observe(&observation("a", Some("Airport"), None, None), "Blue Line");
        acc.observe(&observation("c", Some("Maverick"), None, None), "Blue Line");

        let rows = acc.into_rows();
        let names: Vec<&str> = rows.iter().map(|r| r.station_name.as_str()).collect();
        assert_eq!(names, vec!["Airport", "Maverick", "Wonderland"]);
    }

    #[test]
    fn platforms_are_excluded_and_csv_matches() {
        // Stub response for route "Red": one parent station and one
        // platform referencing it.
        let json = r#"{
            "data": [
                {
                    "id": "place-alfcl",
                    "type": "stop",
                    "attributes": {"name": "Alewife", "latitude": 42.39, "longitude": -71.14},
                    "relationships": {"parent_station": {"data": null}}
                },
                {
                    "id": "70061",
                    "type": "stop",
                    "attributes": {"name": "Alewife", "latitude": 42.39, "longitude": -71.14},
                    "relationships": {"parent_station": {"data": {"id": "place-alfcl", "type": "stop"}}}
                }
            ],
            "included": [
                {"id": "Red", "type": "route", "attributes": {"long_name": "Red Line"}}
            ]
        }"#;
        let document: StopsDocument = serde_json::from_str(json).unwrap();

        let mut acc = StationAccumulator::new();
        consolidate_route(&mut acc, "Red", &document);
        let rows = acc.into_rows();
        assert_eq!(rows.len(), 1);

        let mut out = Vec::new();
        write_stations_csv(&rows, &mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();
        assert_eq!(
            csv,
            "station_name,subway_lines,latitude,longitude\nAlewife,Red Line,42.39,-71.14\n"
        );
    }

    #[test]
    fn missing_coordinates_serialize_as_empty_fields() {
        let rows = vec![StationRow {
            station_name: "Nowhere".to_string(),
            subway_lines: "Red Line".to_string(),
            latitude: None,
            longitude: None,
        }];
        let mut out = Vec::new();
        write_stations_csv(&rows, &mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();
        assert_eq!(
            csv,
            "station_name,subway_lines,latitude,longitude\nNowhere,Red Line,,\n"
        );
    }

    #[test]
    fn station_seen_by_two_routes_merges_attributes() {
        // Route A reports a null latitude, route B a concrete one.
        let red: StopsDocument = serde_json::from_str(
            r#"{
                "data": [{
                    "id": "place-pktrm",
                    "attributes": {"name": "Park Street", "latitude": null, "longitude": null},
                    "relationships": {"parent_station": {"data": null}}
                }],
                "included": [{"id": "Red", "type": "route", "attributes": {"long_name": "Red Line"}}]
            }"#,
        )
        .unwrap();
        let green: StopsDocument = serde_json::from_str(
            r#"{
                "data": [{
                    "id": "place-pktrm",
                    "attributes": {"name": "Park Street", "latitude": 42.356, "longitude": -71.062},
                    "relationships": {"parent_station": {"data": null}}
                }],
                "included": [{"id": "Green-B", "type": "route", "attributes": {"long_name": "Green Line B branch"}}]
            }"#,
        )
        .unwrap();

        let mut acc = StationAccumulator::new();
        consolidate_route(&mut acc, "Red", &red);
        consolidate_route(&mut acc, "Green-B", &green);

        let rows = acc.into_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].latitude, Some(42.356));
        assert_eq!(rows[0].subway_lines, "Green Line B branch, Red Line");
    }
}
