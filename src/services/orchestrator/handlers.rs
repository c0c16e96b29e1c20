//! HTTP surface of the orchestrator
//!
//! | Route            | Success                 | Failure                   |
//! |------------------|-------------------------|---------------------------|
//! | GET /planTrip    | trip plan               | 500 `{error}`             |
//! | GET /aqi         | air quality reading     | 500 `{error}`             |
//! | POST /sendAlert  | relay ack, verbatim     | 400 bad JSON, 500 `{error}` |
//! | GET /health      | status + build version  |                           |
//! | GET /metrics     | Prometheus text         |                           |

use super::{Orchestrator, UpstreamError};
use crate::domain::alert::AlertRequest;
use crate::domain::types::timestamp_now;
use crate::infra::metrics::{Metrics, Route};
use crate::io::http::{
    endpoint_not_found, error_response, json_response, raw_response, ApiRequest, ApiResponse, Router,
};
use crate::io::prometheus::{format_prometheus_metrics, CONTENT_TYPE_PROMETHEUS};
use async_trait::async_trait;
use hyper::{Method, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::error;

pub struct OrchestratorRouter {
    orchestrator: Arc<Orchestrator>,
    metrics: Arc<Metrics>,
}

impl OrchestratorRouter {
    pub fn new(orchestrator: Arc<Orchestrator>, metrics: Arc<Metrics>) -> Self {
        Self { orchestrator, metrics }
    }

    /// Count the request and turn the outcome into a response
    fn respond<T: Serialize>(&self, route: Route, result: Result<T, UpstreamError>) -> ApiResponse {
        self.metrics.record_request(route);
        match result {
            Ok(value) => json_response(StatusCode::OK, &value),
            Err(e) => {
                self.metrics.record_request_error(route);
                self.metrics.record_upstream_failure(e.service());
                error!(route = route.as_str(), upstream = %e.service(), error = %e, "upstream_call_failed");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.caller_message())
            }
        }
    }

    async fn plan_trip(&self, req: &ApiRequest) -> ApiResponse {
        let start = Instant::now();
        let result = self.orchestrator.plan_trip(req.query("zone")).await;
        self.metrics.record_plan_latency(start.elapsed().as_millis() as u64);
        self.respond(Route::PlanTrip, result)
    }

    async fn send_alert(&self, req: &ApiRequest) -> ApiResponse {
        let request: AlertRequest = match req.json() {
            Ok(request) => request,
            Err(e) => {
                self.metrics.record_request(Route::SendAlert);
                self.metrics.record_request_error(Route::SendAlert);
                return error_response(StatusCode::BAD_REQUEST, &format!("Invalid JSON body: {e}"));
            }
        };
        let result = self.orchestrator.send_alert(&request).await;
        self.respond(Route::SendAlert, result)
    }
}

#[async_trait]
impl Router for OrchestratorRouter {
    fn name(&self) -> &'static str {
        "orchestrator"
    }

    async fn route(&self, req: ApiRequest) -> ApiResponse {
        match (&req.method, req.path.as_str()) {
            (&Method::GET, "/planTrip") => self.plan_trip(&req).await,
            (&Method::GET, "/aqi") => {
                let result = self.orchestrator.air_quality(req.query("zone")).await;
                self.respond(Route::Aqi, result)
            }
            (&Method::POST, "/sendAlert") => self.send_alert(&req).await,
            (&Method::GET, "/health") => json_response(
                StatusCode::OK,
                &serde_json::json!({
                    "status": "healthy",
                    "service": "Orchestrator",
                    "version": env!("GIT_HASH"),
                    "timestamp": timestamp_now(),
                }),
            ),
            (&Method::GET, "/metrics") => raw_response(
                StatusCode::OK,
                CONTENT_TYPE_PROMETHEUS,
                format_prometheus_metrics(&self.metrics.summary()),
            ),
            _ => endpoint_not_found(&req),
        }
    }
}
