//! gRPC plumbing for `emergency.EmergencyService`
//!
//! Client and server stubs are generated by `build.rs`; the request and
//! response messages are the prost structs in [`crate::domain::alert`].

use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::{Channel, Endpoint, Server};
use tracing::info;

mod generated {
    tonic::include_proto!("emergency.EmergencyService");
}

pub use generated::emergency_service_client::EmergencyServiceClient;
pub use generated::emergency_service_server::{EmergencyService, EmergencyServiceServer};

/// Lazily-connected channel; the first call dials the relay
pub fn relay_channel(url: &str, timeout: Duration) -> Result<Channel, tonic::transport::Error> {
    Ok(Endpoint::from_shared(url.to_string())?
        .connect_timeout(timeout)
        .timeout(timeout)
        .connect_lazy())
}

/// Serve the emergency service plus gRPC health until the shutdown flag flips
pub async fn serve_emergency<S: EmergencyService>(
    listener: TcpListener,
    service: S,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let local_addr = listener.local_addr()?;

    let (mut health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter.set_serving::<EmergencyServiceServer<S>>().await;

    info!(service = "alert-relay", addr = %local_addr, "grpc_server_started");

    Server::builder()
        .add_service(health_service)
        .add_service(EmergencyServiceServer::new(service))
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), async move {
            let _ = shutdown.wait_for(|stop| *stop).await;
        })
        .await?;

    info!(service = "alert-relay", "grpc_server_shutdown");
    Ok(())
}
