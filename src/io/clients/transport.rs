use super::{build_http_client, endpoint, ensure_success};
use crate::infra::metrics::Upstream;
use crate::services::orchestrator::{TransportUpstream, UpstreamError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// REST client for the transport directory
pub struct TransportClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl TransportClient {
    pub fn new(base_url: &str, timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self { http: build_http_client(timeout)?, base_url: base_url.to_string(), timeout })
    }

    fn fail(&self, err: reqwest::Error) -> UpstreamError {
        UpstreamError::from_reqwest(Upstream::Transport, err, self.timeout)
    }
}

#[async_trait]
impl TransportUpstream for TransportClient {
    async fn availability(&self) -> Result<serde_json::Value, UpstreamError> {
        let url = endpoint(&self.base_url, "/transport/availability");
        debug!(url = %url, "transport_request");

        let response = self.http.get(&url).send().await.map_err(|e| self.fail(e))?;
        let response = ensure_success(Upstream::Transport, response).await?;
        response.json().await.map_err(|e| self.fail(e))
    }
}
