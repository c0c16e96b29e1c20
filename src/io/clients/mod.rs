//! Clients for the leaf services
//!
//! The HTTP clients own one pooled `reqwest::Client` built with the upstream
//! timeout; the alert relay client owns a tonic channel. Each implements the
//! matching orchestrator upstream trait.

mod air;
mod alerts;
mod places;
mod transport;

pub use air::AirQualityClient;
pub use alerts::AlertRelayClient;
pub use places::PlacesClient;
pub use transport::TransportClient;

use crate::infra::metrics::Upstream;
use crate::services::orchestrator::UpstreamError;
use serde_json::Value;
use std::time::Duration;

pub(crate) fn build_http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().timeout(timeout).http1_only().build()
}

/// `http://host:port/` + `/path` without doubling the slash
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Best human-readable message in an error body: `error`, `msg`,
/// or the first GraphQL error, falling back to the raw text
fn error_message(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };
    json.get("error")
        .or_else(|| json.get("msg"))
        .or_else(|| json.pointer("/errors/0/message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}

/// Turn a non-2xx response into `UpstreamError::Status`
pub(crate) async fn ensure_success(
    service: Upstream,
    response: reqwest::Response,
) -> Result<reqwest::Response, UpstreamError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(UpstreamError::Status { service, status: status.as_u16(), message: error_message(&body) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_cleanly() {
        assert_eq!(endpoint("http://localhost:3001", "/lines"), "http://localhost:3001/lines");
        assert_eq!(endpoint("http://localhost:3001/", "/lines"), "http://localhost:3001/lines");
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(error_message(r#"{"error":"Line not found"}"#), "Line not found");
        assert_eq!(error_message(r#"{"code":"internal","msg":"boom"}"#), "boom");
        assert_eq!(error_message(r#"{"data":null,"errors":[{"message":"bad zone"}]}"#), "bad zone");
        assert_eq!(error_message("Service Unavailable\n"), "Service Unavailable");
    }
}
