//! Split the grouped-shapes JSON into one file per top-level key.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mbta_pipelines::config::Config;
use mbta_pipelines::gtfs::shapes;

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

    if let Err(e) = shapes::split_json_by_key(&config.gtfs.grouped_output, &config.gtfs.routes_dir)
    {
        tracing::error!(error = %e, "Failed to split JSON by key");
        std::process::exit(1);
    }
}
