//! Drop the configured column positions from the station list CSV and
//! save the remainder.

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

    if let Err(e) = stations::filter_columns_file(
        &config.gtfs.station_list,
        &config.gtfs.filtered_output,
        &config.gtfs.drop_columns,
    ) {
        tracing::error!(error = %e, "Failed to filter CSV columns");
        std::process::exit(1);
    }
}
