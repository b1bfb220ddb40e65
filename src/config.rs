use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The seven MBTA subway route IDs: the three heavy-rail lines plus
/// the four Green Line branches.
fn default_subway_routes() -> Vec<String> {
    [
        "Red",
        "Orange",
        "Blue",
        "Green-B",
        "Green-C",
        "Green-D",
        "Green-E",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub stations: StationsConfig,
    #[serde(default)]
    pub polylines: PolylinesConfig,
    #[serde(default)]
    pub gtfs: GtfsConfig,
}

/// MBTA v3 API connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "ApiConfig::default_base_url")]
    pub base_url: String,
    /// Optional API key sent as the x-api-key header. Requests without
    /// a key are permitted but subject to tighter upstream rate limits.
    #[serde(default)]
    pub key: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            key: None,
        }
    }
}

impl ApiConfig {
    fn default_base_url() -> String {
        "https://api-v3.mbta.com".to_string()
    }
}

/// Station consolidation pipeline settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StationsConfig {
    /// Route IDs queried in order. Merge results are order-sensitive:
    /// the first route to report a station's name or coordinates wins.
    #[serde(default = "default_subway_routes")]
    pub routes: Vec<String>,
    #[serde(default = "StationsConfig::default_output")]
    pub output: PathBuf,
}

impl Default for StationsConfig {
    fn default() -> Self {
        Self {
            routes: default_subway_routes(),
            output: Self::default_output(),
        }
    }
}

impl StationsConfig {
    fn default_output() -> PathBuf {
        PathBuf::from("mbta_subway_stations.csv")
    }
}

/// Shape/polyline pipeline settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PolylinesConfig {
    #[serde(default = "default_subway_routes")]
    pub routes: Vec<String>,
    #[serde(default = "PolylinesConfig::default_json_output")]
    pub json_output: PathBuf,
    #[serde(default = "PolylinesConfig::default_csv_output")]
    pub csv_output: PathBuf,
}

impl Default for PolylinesConfig {
    fn default() -> Self {
        Self {
            routes: default_subway_routes(),
            json_output: Self::default_json_output(),
            csv_output: Self::default_csv_output(),
        }
    }
}

impl PolylinesConfig {
    fn default_json_output() -> PathBuf {
        PathBuf::from("mbta_subway_polylines.json")
    }
    fn default_csv_output() -> PathBuf {
        PathBuf::from("mbta_subway_polylines.csv")
    }
}

/// Paths and settings for the local GTFS batch transforms.
#[derive(Debug, Clone, Deserialize)]
pub struct GtfsConfig {
    /// Static GTFS shapes.txt input for group_shapes.
    #[serde(default = "GtfsConfig::default_shapes_file")]
    pub shapes_file: PathBuf,
    /// Grouped-shapes JSON: output of group_shapes, input of split_routes.
    #[serde(default = "GtfsConfig::default_grouped_output")]
    pub grouped_output: PathBuf,
    /// Directory split_routes writes one JSON file per key into.
    #[serde(default = "GtfsConfig::default_routes_dir")]
    pub routes_dir: PathBuf,
    /// Station list already ingested downstream, for missing_stations.
    #[serde(default = "GtfsConfig::default_current_stations")]
    pub current_stations: PathBuf,
    /// Full agency station list keyed by station_complex_id. Used as
    /// the missing_stations reference and the filter_columns input.
    #[serde(default = "GtfsConfig::default_station_list")]
    pub station_list: PathBuf,
    #[serde(default = "GtfsConfig::default_filtered_output")]
    pub filtered_output: PathBuf,
    /// Zero-based column positions removed by filter_columns.
    #[serde(default = "GtfsConfig::default_drop_columns")]
    pub drop_columns: Vec<usize>,
}

impl Default for GtfsConfig {
    fn default() -> Self {
        Self {
            shapes_file: Self::default_shapes_file(),
            grouped_output: Self::default_grouped_output(),
            routes_dir: Self::default_routes_dir(),
            current_stations: Self::default_current_stations(),
            station_list: Self::default_station_list(),
            filtered_output: Self::default_filtered_output(),
            drop_columns: Self::default_drop_columns(),
        }
    }
}

impl GtfsConfig {
    fn default_shapes_file() -> PathBuf {
        PathBuf::from("data/gtfs_subway/shapes.txt")
    }
    fn default_grouped_output() -> PathBuf {
        PathBuf::from("data/polyline.json")
    }
    fn default_routes_dir() -> PathBuf {
        PathBuf::from("data/subway_routes")
    }
    fn default_current_stations() -> PathBuf {
        PathBuf::from("data/current_stations.csv")
    }
    fn default_station_list() -> PathBuf {
        PathBuf::from("data/stationlist.csv")
    }
    fn default_filtered_output() -> PathBuf {
        PathBuf::from("data/temp_stationlist.csv")
    }
    fn default_drop_columns() -> Vec<usize> {
        vec![0, 1, 2, 4, 5, 6, 7, 8, 9, 11, 14, 15]
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load from `path`, falling back to built-in defaults when the
    /// file does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            tracing::info!(
                path = %path.as_ref().display(),
                "No config file found, using built-in defaults"
            );
            Ok(Self::default())
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_all_seven_routes() {
        let config = Config::default();
        assert_eq!(config.stations.routes.len(), 7);
        assert_eq!(config.stations.routes[0], "Red");
        assert_eq!(config.stations.routes[6], "Green-E");
        assert_eq!(config.stations.routes, config.polylines.routes);
    }

    #[test]
    fn partial_yaml_keeps_defaults_for_the_rest() {
        let yaml = r#"
api:
  key: "secret"
stations:
  routes: ["Red"]
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.api.key.as_deref(), Some("secret"));
        assert_eq!(config.api.base_url, "https://api-v3.mbta.com");
        assert_eq!(config.stations.routes, vec!["Red".to_string()]);
        assert_eq!(
            config.stations.output,
            PathBuf::from("mbta_subway_stations.csv")
        );
        // The polyline pipeline keeps its own route list.
        assert_eq!(config.polylines.routes.len(), 7);
    }

    #[test]
    fn empty_yaml_parses_to_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert!(config.api.key.is_none());
        assert_eq!(config.gtfs.drop_columns.len(), 12);
    }

    #[test]
    fn load_or_default_on_missing_file() {
        let config = Config::load_or_default("definitely/not/a/real/config.yaml").unwrap();
        assert_eq!(config.stations.routes.len(), 7);
    }
}
