//! Print the stations present in the reference station list but absent
//! from the current one, keyed by station complex ID.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mbta_pipelines::config::Config;
use mbta_pipelines::gtfs::stations;

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = match Config::load_or_default("config.yaml") {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    let missing = match stations::report_missing_stations(
        &config.gtfs.current_stations,
        &config.gtfs.station_list,
    ) {
        Ok(missing) => missing,
        Err(e) => {
            tracing::error!(error = %e, "Failed to compute station set difference");
            std::process::exit(1);
        }
    };

    for row in &missing {
        println!("{}, {}", row.station_complex_id, row.station_name);
    }
}
