use super::{build_http_client, endpoint, ensure_success};
use crate::domain::types::AirQualityReading;
use crate::infra::metrics::Upstream;
use crate::services::orchestrator::{AirQualityProvider, UpstreamError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Client for a remote air quality service (`GET /aqi?zone=`)
pub struct AirQualityClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl AirQualityClient {
    pub fn new(base_url: &str, timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self { http: build_http_client(timeout)?, base_url: base_url.to_string(), timeout })
    }

    fn fail(&self, err: reqwest::Error) -> UpstreamError {
        UpstreamError::from_reqwest(Upstream::Air, err, self.timeout)
    }
}

#[async_trait]
impl AirQualityProvider for AirQualityClient {
    async fn reading(&self, zone: &str) -> Result<AirQualityReading, UpstreamError> {
        let url = endpoint(&self.base_url, "/aqi");
        debug!(url = %url, zone, "air_quality_request");

        let response = self.http.get(&url).query(&[("zone", zone)]).send().await.map_err(|e| self.fail(e))?;
        let response = ensure_success(Upstream::Air, response).await?;
        response.json().await.map_err(|e| self.fail(e))
    }
}
