//! Shape resolution and polyline decoding pipeline.
//!
//! Resolves each route's canonical shapes through a two-level lookup
//! (route pattern -> representative trip -> shape), fetches each
//! shape's encoded polyline, and decodes it into an ordered coordinate
//! sequence for map rendering.

use std::collections::{BTreeMap, HashSet};
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::OutputError;
use crate::mbta::models::RoutePatternsDocument;
use crate::mbta::MbtaClient;

/// One decoded shape: its ID and coordinates in decode order. The
/// order is what makes the points form a connected line.
#[derive(Debug, Clone, Serialize)]
pub struct ShapeEntry {
    pub shape_id: String,
    /// `[latitude, longitude]` pairs.
    pub coordinates: Vec<[f64; 2]>,
    pub num_points: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoutePolylines {
    pub route_name: String,
    pub shapes: Vec<ShapeEntry>,
}

/// All decoded polylines of one run, keyed by route code.
pub type PolylineSet = BTreeMap<String, RoutePolylines>;

/// Collect the canonical shape IDs from a route-patterns document:
/// follow each pattern's representative-trip reference, cross-reference
/// the included trip records, and take the trip's linked shape.
/// Deduplicated per route; iteration order is unspecified.
pub fn canonical_shape_ids(document: &RoutePatternsDocument) -> HashSet<String> {
    let mut shape_ids = HashSet::new();
    for pattern in &document.data {
        let Some(trip_id) = pattern.representative_trip_id() else {
            continue;
        };
        let Some(trip) = document.included_trip(trip_id) else {
            continue;
        };
        if let Some(shape_id) = trip.shape_id() {
            shape_ids.insert(shape_id.to_string());
        }
    }
    shape_ids
}

/// Decode an encoded polyline (precision 5) into `[lat, lon]` pairs.
pub fn decode_polyline_coords(encoded: &str) -> Result<Vec<[f64; 2]>, String> {
    let line = polyline::decode_polyline(encoded, 5).map_err(|e| e.to_string())?;
    Ok(line.coords().map(|c| [c.y, c.x]).collect())
}

/// Resolve and decode the canonical shapes for each route in order.
/// Failures (route patterns, shape fetch, missing polyline, decode)
/// are logged and contribute nothing; the run continues.
pub async fn fetch_all_polylines(client: &MbtaClient, routes: &[String]) -> PolylineSet {
    let mut all = PolylineSet::new();

    info!("Fetching canonical subway polylines from the MBTA API");
    for route_id in routes {
        let shape_ids = match client.canonical_route_patterns(route_id).await {
            Ok(document) => canonical_shape_ids(&document),
            Err(e) => {
                error!(route = %route_id, error = %e, "Failed to fetch route patterns");
                HashSet::new()
            }
        };
        info!(route = %route_id, shapes = shape_ids.len(), "Found canonical shapes");

        let mut shapes = Vec::new();
        for shape_id in &shape_ids {
            let document = match client.shape(shape_id).await {
                Ok(document) => document,
                Err(e) => {
                    error!(shape = %shape_id, error = %e, "Failed to fetch shape");
                    continue;
                }
            };
            let Some(encoded) = document.polyline() else {
                warn!(shape = %shape_id, "Shape has no polyline attribute");
                continue;
            };
            match decode_polyline_coords(encoded) {
                Ok(coordinates) if !coordinates.is_empty() => {
                    info!(shape = %shape_id, points = coordinates.len(), "Decoded shape");
                    shapes.push(ShapeEntry {
                        shape_id: shape_id.clone(),
                        num_points: coordinates.len(),
                        coordinates,
                    });
                }
                Ok(_) => warn!(shape = %shape_id, "Polyline decoded to no coordinates"),
                Err(e) => warn!(shape = %shape_id, error = %e, "Failed to decode polyline"),
            }
        }

        info!(route = %route_id, decoded = shapes.len(), "Decoded canonical shapes for route");
        all.insert(
            route_id.clone(),
            RoutePolylines {
                // The route-patterns response carries no route metadata,
                // so the display name falls back to the route code.
                route_name: route_id.clone(),
                shapes,
            },
        );
    }

    all
}

/// Write the nested polyline structure as JSON keyed by route code.
pub fn write_polylines_json<W: Write>(data: &PolylineSet, writer: W) -> Result<(), OutputError> {
    serde_json::to_writer_pretty(writer, data)?;
    Ok(())
}

pub fn save_polylines_json(data: &PolylineSet, path: &Path) -> Result<(), OutputError> {
    let file = std::fs::File::create(path)?;
    write_polylines_json(data, file)?;

    let total_shapes: usize = data.values().map(|r| r.shapes.len()).sum();
    let total_points: usize = data
        .values()
        .flat_map(|r| &r.shapes)
        .map(|s| s.num_points)
        .sum();
    info!(
        routes = data.len(),
        shapes = total_shapes,
        points = total_points,
        path = %path.display(),
        "Saved polyline JSON"
    );
    Ok(())
}

#[derive(Debug, Serialize)]
struct PointRow<'a> {
    route_id: &'a str,
    shape_id: &'a str,
    point_sequence: usize,
    latitude: f64,
    longitude: f64,
}

/// Flatten to one CSV row per coordinate, grouped by route then shape.
/// `point_sequence` is emitted in decode order starting at 0; consumers
/// redraw the line by sorting on it, so it is never re-sorted here.
pub fn write_polylines_csv<W: Write>(data: &PolylineSet, writer: W) -> Result<(), OutputError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for (route_id, route) in data {
        for shape in &route.shapes {
            for (point_sequence, [latitude, longitude]) in
                shape.coordinates.iter().copied().enumerate()
            {
                wtr.serialize(PointRow {
                    route_id,
                    shape_id: &shape.shape_id,
                    point_sequence,
                    latitude,
                    longitude,
                })?;
            }
        }
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_polylines_csv(data: &PolylineSet, path: &Path) -> Result<(), OutputError> {
    let file = std::fs::File::create(path)?;
    write_polylines_csv(data, file)?;
    info!(path = %path.display(), "Saved polyline CSV");
    Ok(())
}
