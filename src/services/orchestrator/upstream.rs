//! Upstream seams of the orchestrator
//!
//! One trait per leaf. Production implementations live in `io::*_client`;
//! tests substitute in-memory fakes.

use crate::domain::alert::{AlertList, AlertRequest, AlertResponse};
use crate::domain::types::{AirQualityReading, Place};
use crate::infra::metrics::Upstream;
use crate::services::air_quality::compute_aqi;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single upstream call
///
/// The display text names the service and is what gets logged; callers of
/// the orchestrator see [`UpstreamError::caller_message`].
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{service} service unreachable: {source}")]
    Transport {
        service: Upstream,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} service returned HTTP {status}: {message}")]
    Status { service: Upstream, status: u16, message: String },

    #[error("{service} service error: {message}")]
    Application { service: Upstream, message: String },

    #[error("{service} service sent an unreadable response: {message}")]
    Decode { service: Upstream, message: String },

    #[error("{service} service timed out after {timeout_ms} ms")]
    Timeout { service: Upstream, timeout_ms: u64 },
}

impl UpstreamError {
    pub fn service(&self) -> Upstream {
        match self {
            Self::Transport { service, .. }
            | Self::Status { service, .. }
            | Self::Application { service, .. }
            | Self::Decode { service, .. }
            | Self::Timeout { service, .. } => *service,
        }
    }

    /// Message for the 500 body: the leaf's own words when it sent any
    pub fn caller_message(&self) -> String {
        match self {
            Self::Status { message, .. } | Self::Application { message, .. } => message.clone(),
            _ => self.to_string(),
        }
    }

    pub fn timeout(service: Upstream, timeout: Duration) -> Self {
        Self::Timeout { service, timeout_ms: timeout.as_millis() as u64 }
    }

    /// Classify a reqwest failure
    pub fn from_reqwest(service: Upstream, err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::timeout(service, timeout)
        } else if err.is_decode() {
            Self::Decode { service, message: err.to_string() }
        } else {
            Self::Transport { service, source: err }
        }
    }
}

#[async_trait]
pub trait AirQualityProvider: Send + Sync {
    async fn reading(&self, zone: &str) -> Result<AirQualityReading, UpstreamError>;
}

#[async_trait]
pub trait TransportUpstream: Send + Sync {
    /// Network-wide availability, forwarded verbatim into trip plans
    async fn availability(&self) -> Result<serde_json::Value, UpstreamError>;
}

#[async_trait]
pub trait PlacesUpstream: Send + Sync {
    async fn places_in_zone(&self, zone: &str) -> Result<Vec<Place>, UpstreamError>;
}

#[async_trait]
pub trait AlertUpstream: Send + Sync {
    async fn send_alert(&self, request: &AlertRequest) -> Result<AlertResponse, UpstreamError>;

    async fn list_alerts(&self) -> Result<AlertList, UpstreamError>;
}

/// Air quality computed in-process
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalAirQuality;

#[async_trait]
impl AirQualityProvider for LocalAirQuality {
    async fn reading(&self, zone: &str) -> Result<AirQualityReading, UpstreamError> {
        Ok(compute_aqi(zone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_air_quality_never_fails() {
        let reading = LocalAirQuality.reading("Centre").await.unwrap();
        assert_eq!(reading.aqi, 130);
        assert_eq!(LocalAirQuality.reading("").await.unwrap().aqi, 60);
    }

    #[test]
    fn test_error_messages_name_the_service() {
        let err = UpstreamError::timeout(Upstream::Places, Duration::from_millis(250));
        assert_eq!(err.to_string(), "places service timed out after 250 ms");
        assert_eq!(err.service(), Upstream::Places);

        let err = UpstreamError::Application { service: Upstream::Places, message: "Invalid sort field".into() };
        assert_eq!(err.to_string(), "places service error: Invalid sort field");
    }

    #[test]
    fn test_caller_message_keeps_leaf_text() {
        let err = UpstreamError::Status { service: Upstream::Alerts, status: 400, message: "zone is required".into() };
        assert_eq!(err.caller_message(), "zone is required");
        assert_eq!(err.to_string(), "alerts service returned HTTP 400: zone is required");

        let err = UpstreamError::Application { service: Upstream::Alerts, message: "log unavailable".into() };
        assert_eq!(err.caller_message(), "log unavailable");

        let err = UpstreamError::timeout(Upstream::Transport, Duration::from_millis(100));
        assert_eq!(err.caller_message(), "transport service timed out after 100 ms");
    }
}
