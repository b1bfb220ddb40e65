//! Group a static GTFS shapes.txt by shape ID, sort each group by
//! point sequence, and save the result as nested JSON.

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

    if let Err(e) = shapes::group_shapes_file(&config.gtfs.shapes_file, &config.gtfs.grouped_output)
    {
        tracing::error!(error = %e, "Failed to group shapes");
        std::process::exit(1);
    }
}
