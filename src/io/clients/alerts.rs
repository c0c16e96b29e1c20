use crate::domain::alert::{AlertList, AlertRequest, AlertResponse, Empty};
use crate::infra::metrics::Upstream;
use crate::io::grpc::{relay_channel, EmergencyServiceClient};
use crate::services::orchestrator::{AlertUpstream, UpstreamError};
use async_trait::async_trait;
use std::time::Duration;
use tonic::transport::Channel;
use tonic::{Code, Status};
use tracing::debug;

/// gRPC client for the alert relay
#[derive(Clone)]
pub struct AlertRelayClient {
    grpc: EmergencyServiceClient<Channel>,
    timeout: Duration,
}

impl AlertRelayClient {
    /// Does not dial; the channel connects on first use
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, tonic::transport::Error> {
        let channel = relay_channel(base_url, timeout)?;
        Ok(Self { grpc: EmergencyServiceClient::new(channel), timeout })
    }

    /// The relay's status message is kept verbatim
    fn fail(&self, status: Status) -> UpstreamError {
        match status.code() {
            Code::DeadlineExceeded => UpstreamError::timeout(Upstream::Alerts, self.timeout),
            _ => UpstreamError::Application { service: Upstream::Alerts, message: status.message().to_string() },
        }
    }
}

#[async_trait]
impl AlertUpstream for AlertRelayClient {
    async fn send_alert(&self, request: &AlertRequest) -> Result<AlertResponse, UpstreamError> {
        debug!(zone = %request.zone, "alert_relay_send");
        let mut grpc = self.grpc.clone();
        grpc.send_alert(request.clone()).await.map(tonic::Response::into_inner).map_err(|s| self.fail(s))
    }

    async fn list_alerts(&self) -> Result<AlertList, UpstreamError> {
        let mut grpc = self.grpc.clone();
        grpc.get_alerts(Empty {}).await.map(tonic::Response::into_inner).map_err(|s| self.fail(s))
    }
}
