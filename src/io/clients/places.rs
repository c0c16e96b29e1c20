use super::{build_http_client, endpoint, ensure_success};
use crate::domain::types::Place;
use crate::infra::metrics::Upstream;
use crate::io::graphql::{GraphQlRequest, GraphQlResponse, PLACES_BY_ZONE};
use crate::services::orchestrator::{PlacesUpstream, UpstreamError};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// GraphQL client for the places directory
pub struct PlacesClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl PlacesClient {
    pub fn new(base_url: &str, timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self { http: build_http_client(timeout)?, base_url: base_url.to_string(), timeout })
    }

    fn fail(&self, err: reqwest::Error) -> UpstreamError {
        UpstreamError::from_reqwest(Upstream::Places, err, self.timeout)
    }
}

/// Pull `data.places` out of an envelope; any GraphQL error fails the call
fn places_from_envelope(envelope: GraphQlResponse) -> Result<Vec<Place>, UpstreamError> {
    if let Some(message) = envelope.error_message() {
        return Err(UpstreamError::Application { service: Upstream::Places, message });
    }

    let places = envelope
        .data
        .and_then(|mut data| data.get_mut("places").map(serde_json::Value::take))
        .ok_or_else(|| UpstreamError::Decode {
            service: Upstream::Places,
            message: "response has no data.places".to_string(),
        })?;

    serde_json::from_value(places)
        .map_err(|e| UpstreamError::Decode { service: Upstream::Places, message: e.to_string() })
}

#[async_trait]
impl PlacesUpstream for PlacesClient {
    async fn places_in_zone(&self, zone: &str) -> Result<Vec<Place>, UpstreamError> {
        let url = endpoint(&self.base_url, "/graphql");
        debug!(url = %url, zone, "places_request");

        let request = GraphQlRequest::new(PLACES_BY_ZONE, json!({ "zone": zone }));
        let response = self.http.post(&url).json(&request).send().await.map_err(|e| self.fail(e))?;
        let response = ensure_success(Upstream::Places, response).await?;
        let envelope: GraphQlResponse = response.json().await.map_err(|e| self.fail(e))?;

        places_from_envelope(envelope)
    }
}
