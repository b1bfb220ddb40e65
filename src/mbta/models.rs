//! Typed records for the subset of MBTA JSON:API fields the pipelines
//! consume. Every field is optional per the upstream contract; the
//! accessors fail closed, treating absence as "no data".

use serde::{Deserialize, Serialize};

// --- JSON:API plumbing ---

/// A `{data: {id, type}}` reference inside a relationships block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    pub data: Option<ResourceRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceRef {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl Relationship {
    pub fn id(&self) -> Option<&str> {
        self.data.as_ref()?.id.as_deref()
    }
}

/// Resource from a JSON:API `included` array. Included arrays are
/// heterogeneous (routes alongside trips); only the fields actually
/// consumed are modeled, everything else is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncludedResource {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub attributes: Option<IncludedAttributes>,
    pub relationships: Option<IncludedRelationships>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncludedAttributes {
    pub long_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncludedRelationships {
    pub shape: Option<Relationship>,
}

impl IncludedResource {
    /// Shape linked from an included trip resource.
    pub fn shape_id(&self) -> Option<&str> {
        self.relationships.as_ref()?.shape.as_ref()?.id()
    }
}

// --- /stops ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopsDocument {
    #[serde(default)]
    pub data: Vec<Stop>,
    #[serde(default)]
    pub included: Vec<IncludedResource>,
}

impl StopsDocument {
    /// Long display name of a route from the included resources,
    /// e.g. "Red" -> "Red Line". Falls back to the code itself.
    pub fn route_long_name<'a>(&'a self, route_id: &'a str) -> &'a str {
        self.included
            .iter()
            .find(|r| r.kind.as_deref() == Some("route") && r.id.as_deref() == Some(route_id))
            .and_then(|r| r.attributes.as_ref()?.long_name.as_deref())
            .unwrap_or(route_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stop {
    pub id: Option<String>,
    pub attributes: Option<StopAttributes>,
    pub relationships: Option<StopRelationships>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopAttributes {
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopRelationships {
    pub parent_station: Option<Relationship>,
}

impl Stop {
    pub fn name(&self) -> Option<&str> {
        self.attributes.as_ref()?.name.as_deref()
    }

    pub fn latitude(&self) -> Option<f64> {
        self.attributes.as_ref()?.latitude
    }

    pub fn longitude(&self) -> Option<f64> {
        self.attributes.as_ref()?.longitude
    }

    /// ID of the parent station when this stop is a platform or
    /// entrance. Parent stations themselves carry no reference.
    pub fn parent_station_id(&self) -> Option<&str> {
        self.relationships.as_ref()?.parent_station.as_ref()?.id()
    }
}

// --- /route_patterns ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutePatternsDocument {
    #[serde(default)]
    pub data: Vec<RoutePattern>,
    #[serde(default)]
    pub included: Vec<IncludedResource>,
}

impl RoutePatternsDocument {
    /// Look up an included trip resource by ID.
    pub fn included_trip(&self, trip_id: &str) -> Option<&IncludedResource> {
        self.included
            .iter()
            .find(|r| r.kind.as_deref() == Some("trip") && r.id.as_deref() == Some(trip_id))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutePattern {
    pub id: Option<String>,
    pub relationships: Option<RoutePatternRelationships>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutePatternRelationships {
    pub representative_trip: Option<Relationship>,
}

impl RoutePattern {
    pub fn representative_trip_id(&self) -> Option<&str> {
        self.relationships
            .as_ref()?
            .representative_trip
            .as_ref()?
            .id()
    }
}

// --- /shapes/{id} ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeDocument {
    pub data: Option<Shape>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shape {
    pub id: Option<String>,
    pub attributes: Option<ShapeAttributes>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeAttributes {
    pub polyline: Option<String>,
}

impl ShapeDocument {
    pub fn polyline(&self) -> Option<&str> {
        self.data.as_ref()?.attributes.as_ref()?.polyline.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_document_parses_parent_and_platform() {
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
        assert_eq!(document.data.len(), 2);
        assert_eq!(document.data[0].parent_station_id(), None);
        assert_eq!(document.data[1].parent_station_id(), Some("place-alfcl"));
        assert_eq!(document.data[0].name(), Some("Alewife"));
        assert_eq!(document.data[0].latitude(), Some(42.39));
        assert_eq!(document.route_long_name("Red"), "Red Line");
    }

    #[test]
    fn route_long_name_falls_back_to_the_code() {
        let document: StopsDocument = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert_eq!(document.route_long_name("Mattapan"), "Mattapan");

        // Included route without a long_name also falls back.
        let json = r#"{"data": [], "included": [{"id": "Red", "type": "route", "attributes": {}}]}"#;
        let document: StopsDocument = serde_json::from_str(json).unwrap();
        assert_eq!(document.route_long_name("Red"), "Red");
    }

    #[test]
    fn accessors_fail_closed_on_missing_blocks() {
        let stop: Stop = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        assert_eq!(stop.name(), None);
        assert_eq!(stop.latitude(), None);
        assert_eq!(stop.parent_station_id(), None);
    }

    #[test]
    fn route_pattern_resolves_trip_and_shape() {
        let json = r#"{
            "data": [
                {
                    "id": "Red-1-0",
                    "type": "route_pattern",
                    "relationships": {
                        "representative_trip": {"data": {"id": "trip-1", "type": "trip"}}
                    }
                }
            ],
            "included": [
                {
                    "id": "trip-1",
                    "type": "trip",
                    "relationships": {"shape": {"data": {"id": "931_0010", "type": "shape"}}}
                }
            ]
        }"#;
        let document: RoutePatternsDocument = serde_json::from_str(json).unwrap();
        let trip_id = document.data[0].representative_trip_id().unwrap();
        assert_eq!(trip_id, "trip-1");
        let trip = document.included_trip(trip_id).unwrap();
        assert_eq!(trip.shape_id(), Some("931_0010"));
        assert!(document.included_trip("trip-2").is_none());
    }

    #[test]
    fn shape_document_polyline_access() {
        let json = r#"{"data": {"id": "931_0010", "attributes": {"polyline": "_p~iF~ps|U"}}}"#;
        let document: ShapeDocument = serde_json::from_str(json).unwrap();
        assert_eq!(document.polyline(), Some("_p~iF~ps|U"));

        let document: ShapeDocument =
            serde_json::from_str(r#"{"data": {"id": "931_0010"}}"#).unwrap();
        assert_eq!(document.polyline(), None);

        let document: ShapeDocument = serde_json::from_str(r#"{"data": null}"#).unwrap();
        assert_eq!(document.polyline(), None);
    }
}
