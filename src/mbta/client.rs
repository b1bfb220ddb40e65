use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use super::models::{RoutePatternsDocument, ShapeDocument, StopsDocument};
use crate::config::ApiConfig;

#[derive(Debug, Error)]
pub enum MbtaError {
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("API error: {0}")]
    ApiError(String),
}

/// Read-only client for the MBTA v3 API.
///
/// All requests are awaited sequentially by the callers; the client
/// itself holds no state beyond the connection pool and credentials.
pub struct MbtaClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl MbtaClient {
    pub fn new(config: &ApiConfig) -> Result<Self, MbtaError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| MbtaError::NetworkError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.key.clone(),
        })
    }

    /// Fetch all stops served by a route, with the route resource
    /// included so its long name can be resolved from the same response.
    pub async fn stops_for_route(&self, route_id: &str) -> Result<StopsDocument, MbtaError> {
        let url = format!(
            "{}/stops?filter[route]={}&include=route",
            self.base_url,
            urlencoding::encode(route_id)
        );
        self.get_json(&url).await
    }

    /// Fetch the canonical route patterns for a route, with each
    /// pattern's representative trip included.
    pub async fn canonical_route_patterns(
        &self,
        route_id: &str,
    ) -> Result<RoutePatternsDocument, MbtaError> {
        let url = format!(
            "{}/route_patterns?filter[route]={}&filter[canonical]=true&include=representative_trip",
            self.base_url,
            urlencoding::encode(route_id)
        );
        self.get_json(&url).await
    }

    /// Fetch a single shape by ID. The shape's geometry arrives as an
    /// encoded polyline attribute.
    pub async fn shape(&self, shape_id: &str) -> Result<ShapeDocument, MbtaError> {
        let url = format!(
            "{}/shapes/{}",
            self.base_url,
            urlencoding::encode(shape_id)
        );
        self.get_json(&url).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, MbtaError> {
        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| MbtaError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MbtaError::ApiError(format!(
                "HTTP error: {}",
                status.as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| MbtaError::NetworkError(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(
                "Failed to parse MBTA response from {}: {} - body: {}",
                url,
                e,
                &body[..body.len().min(500)]
            );
            MbtaError::ParseError(e.to_string())
        })
    }
}
