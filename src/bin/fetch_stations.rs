//! Fetch MBTA subway stops per route, consolidate parent stations, and
//! save them as a CSV sorted by station name.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mbta_pipelines::config::Config;
use mbta_pipelines::mbta::MbtaClient;
use mbta_pipelines::stations;

#[tokio::main]
async fn main() {
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

    let client = match MbtaClient::new(&config.api) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build MBTA client");
            std::process::exit(1);
        }
    };

    let rows = stations::fetch_all_stations(&client, &config.stations.routes).await;

    if let Err(e) = stations::save_stations_csv(&rows, &config.stations.output) {
        tracing::error!(error = %e, "Failed to write station CSV");
        std::process::exit(1);
    }

    for row in rows.iter().take(5) {
        tracing::info!(station = %row.station_name, lines = %row.subway_lines, "Sample station");
    }
}
