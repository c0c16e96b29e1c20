//! Alert relay - append-only log of emergency alerts behind a gRPC endpoint
//!
//! Ids are sequential ("1", "2", ...) and assigned under the log's lock, so
//! concurrent senders never share an id.

use crate::domain::alert::{Alert, AlertList, AlertRequest, AlertResponse, Empty, ALERT_RECEIVED};
use crate::domain::error::DirectoryError;
use crate::domain::types::timestamp_now;
use crate::io::grpc::EmergencyService;
use parking_lot::Mutex;
use std::sync::Arc;
use tonic::{Request, Response, Status};
use tracing::info;

#[derive(Debug, Default)]
pub struct AlertLog {
    alerts: Mutex<Vec<Alert>>,
}

impl AlertLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append; the stored alert keeps only the message
    pub fn record(&self, request: &AlertRequest) -> Result<Alert, DirectoryError> {
        if request.zone.trim().is_empty() {
            return Err(DirectoryError::invalid("zone is required"));
        }
        if request.message.trim().is_empty() {
            return Err(DirectoryError::invalid("message is required"));
        }

        let mut alerts = self.alerts.lock();
        let alert = Alert {
            id: (alerts.len() + 1).to_string(),
            message: request.message.clone(),
            timestamp: timestamp_now(),
        };
        alerts.push(alert.clone());
        drop(alerts);

        info!(
            alert_id = %alert.id,
            zone = %request.zone,
            priority = request.priority,
            message = %request.message,
            "alert_received"
        );
        Ok(alert)
    }

    /// Snapshot in insertion order
    pub fn list(&self) -> Vec<Alert> {
        self.alerts.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.alerts.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.lock().is_empty()
    }
}

/// `emergency.EmergencyService` backed by an [`AlertLog`]
#[derive(Debug, Clone)]
pub struct AlertRelay {
    log: Arc<AlertLog>,
}

impl AlertRelay {
    pub fn new(log: Arc<AlertLog>) -> Self {
        Self { log }
    }
}

#[tonic::async_trait]
impl EmergencyService for AlertRelay {
    async fn send_alert(&self, request: Request<AlertRequest>) -> Result<Response<AlertResponse>, Status> {
        self.log
            .record(request.get_ref())
            .map_err(|e| Status::invalid_argument(e.to_string()))?;
        Ok(Response::new(AlertResponse { status: ALERT_RECEIVED.to_string() }))
    }

    async fn get_alerts(&self, _request: Request<Empty>) -> Result<Response<AlertList>, Status> {
        Ok(Response::new(AlertList { alerts: self.log.list() }))
    }
}
