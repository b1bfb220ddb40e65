//! Fetch the canonical shapes for each MBTA subway route, decode their
//! polylines, and save the result as nested JSON and a flattened CSV.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mbta_pipelines::config::Config;
use mbta_pipelines::mbta::MbtaClient;
use mbta_pipelines::shapes;

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

    let polylines = shapes::fetch_all_polylines(&client, &config.polylines.routes).await;

    if let Err(e) = shapes::save_polylines_json(&polylines, &config.polylines.json_output) {
        tracing::error!(error = %e, "Failed to write polyline JSON");
        std::process::exit(1);
    }
    if let Err(e) = shapes::save_polylines_csv(&polylines, &config.polylines.csv_output) {
        tracing::error!(error = %e, "Failed to write polyline CSV");
        std::process::exit(1);
    }
}
