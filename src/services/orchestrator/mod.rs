//! Orchestrator - composes the leaf services into one trip plan
//!
//! Flow of `plan_trip`:
//! 1. Resolve the zone (caller value, else the configured default)
//! 2. Read the AQI for that zone
//! 3. Recommend the fallback zone when the AQI exceeds the threshold
//! 4. Fetch transport availability and the recommended zone's places concurrently
//! 5. Merge everything into a `TripPlan`
//!
//! Every upstream call is bounded by the configured timeout. The first
//! failure aborts the whole operation; nothing partial is ever returned.
//! The orchestrator keeps no state between requests.

mod handlers;
mod upstream;


pub use handlers::OrchestratorRouter;
pub use upstream::{
    AirQualityProvider, AlertUpstream, LocalAirQuality, PlacesUpstream, TransportUpstream, UpstreamError,
};

use crate::domain::alert::{AlertRequest, AlertResponse};
use crate::domain::types::{AirQualityReading, TripPlan};
use crate::infra::config::{AirMode, Config};
use crate::infra::metrics::Upstream;
use crate::io::clients::{AirQualityClient, AlertRelayClient, PlacesClient, TransportClient};
use anyhow::Context;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Zone decision rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripPolicy {
    pub default_zone: String,
    /// Recommend `fallback_zone` when the AQI is strictly above this
    pub aqi_threshold: u32,
    pub fallback_zone: String,
}

impl Default for TripPolicy {
    fn default() -> Self {
        Self { default_zone: "Centre".to_string(), aqi_threshold: 100, fallback_zone: "Lac".to_string() }
    }
}

impl TripPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            default_zone: config.default_zone().to_string(),
            aqi_threshold: config.aqi_threshold(),
            fallback_zone: config.fallback_zone().to_string(),
        }
    }

    /// Caller zone, or the default when absent or empty
    pub fn resolve_zone<'a>(&'a self, zone: Option<&'a str>) -> &'a str {
        zone.filter(|zone| !zone.is_empty()).unwrap_or(&self.default_zone)
    }

    pub fn recommend(&self, zone: &str, aqi: u32) -> String {
        if aqi > self.aqi_threshold {
            self.fallback_zone.clone()
        } else {
            zone.to_string()
        }
    }
}

pub struct Orchestrator {
    air: Arc<dyn AirQualityProvider>,
    transport: Arc<dyn TransportUpstream>,
    places: Arc<dyn PlacesUpstream>,
    alerts: Arc<dyn AlertUpstream>,
    policy: TripPolicy,
    timeout: Duration,
}

impl Orchestrator {
    pub fn new(
        air: Arc<dyn AirQualityProvider>,
        transport: Arc<dyn TransportUpstream>,
        places: Arc<dyn PlacesUpstream>,
        alerts: Arc<dyn AlertUpstream>,
        policy: TripPolicy,
        timeout: Duration,
    ) -> Self {
        Self { air, transport, places, alerts, policy, timeout }
    }

    /// Wire the upstream clients described by the config
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let timeout = config.upstream_timeout();

        let air: Arc<dyn AirQualityProvider> = match config.air_mode() {
            AirMode::Local => Arc::new(LocalAirQuality),
            AirMode::Http => Arc::new(
                AirQualityClient::new(config.air_url(), timeout).context("Failed to build air quality client")?,
            ),
        };
        let transport = TransportClient::new(config.transport_url(), timeout)
            .context("Failed to build transport client")?;
        let places = PlacesClient::new(config.places_url(), timeout).context("Failed to build places client")?;
        let alerts =
            AlertRelayClient::new(config.alerts_url(), timeout).context("Failed to build alert relay client")?;

        Ok(Self::new(
            air,
            Arc::new(transport),
            Arc::new(places),
            Arc::new(alerts),
            TripPolicy::from_config(config),
            timeout,
        ))
    }

    pub fn policy(&self) -> &TripPolicy {
        &self.policy
    }

    /// Run one upstream call under the timeout
    async fn bounded<T, F>(&self, service: Upstream, call: F) -> Result<T, UpstreamError>
    where
        F: Future<Output = Result<T, UpstreamError>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(UpstreamError::timeout(service, self.timeout)),
        }
    }

    pub async fn air_quality(&self, zone: Option<&str>) -> Result<AirQualityReading, UpstreamError> {
        let zone = self.policy.resolve_zone(zone);
        self.bounded(Upstream::Air, self.air.reading(zone)).await
    }

    pub async fn plan_trip(&self, zone: Option<&str>) -> Result<TripPlan, UpstreamError> {
        let zone = self.policy.resolve_zone(zone);

        let reading = self.bounded(Upstream::Air, self.air.reading(zone)).await?;
        let recommended_zone = self.policy.recommend(zone, reading.aqi);
        debug!(zone, aqi = reading.aqi, recommended_zone = %recommended_zone, "zone_decided");

        let (transport, places) = tokio::try_join!(
            self.bounded(Upstream::Transport, self.transport.availability()),
            self.bounded(Upstream::Places, self.places.places_in_zone(&recommended_zone)),
        )?;

        info!(
            zone,
            aqi = reading.aqi,
            recommended_zone = %recommended_zone,
            places = places.len(),
            "trip_planned"
        );

        Ok(TripPlan { initial_zone: zone.to_string(), aqi: reading.aqi, recommended_zone, transport, places })
    }

    /// Forward verbatim; the relay owns validation
    pub async fn send_alert(&self, request: &AlertRequest) -> Result<AlertResponse, UpstreamError> {
        let ack = self.bounded(Upstream::Alerts, self.alerts.send_alert(request)).await?;
        info!(zone = %request.zone, priority = request.priority, status = %ack.status, "alert_forwarded");
        Ok(ack)
    }
}
