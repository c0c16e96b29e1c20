//! REST routes of the transport directory

use super::{ReportInput, TransportDirectory};
use crate::domain::types::timestamp_now;
use crate::domain::DirectoryError;
use crate::io::http::{
    directory_error_response, endpoint_not_found, error_response, json_response, ApiRequest,
    ApiResponse, Router,
};
use async_trait::async_trait;
use hyper::{Method, StatusCode};
use serde::Deserialize;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// Body of `PUT /lines/:id`
#[derive(Debug, Default, Deserialize)]
struct StatusUpdate {
    status: Option<String>,
}

pub struct TransportRouter {
    directory: Arc<TransportDirectory>,
}

impl TransportRouter {
    pub fn new(directory: Arc<TransportDirectory>) -> Self {
        Self { directory }
    }

    fn respond<T: Serialize>(result: Result<T, DirectoryError>) -> ApiResponse {
        match result {
            Ok(value) => json_response(StatusCode::OK, &value),
            Err(e) => directory_error_response(&e),
        }
    }

    fn report_issue(&self, id: &str, req: &ApiRequest) -> ApiResponse {
        let input: ReportInput = if req.body.is_empty() {
            ReportInput::default()
        } else {
            match req.json() {
                Ok(input) => input,
                Err(e) => return error_response(StatusCode::BAD_REQUEST, &format!("Invalid JSON body: {e}")),
            }
        };

        match self.directory.report_issue(id, input) {
            Ok(report) => json_response(
                StatusCode::CREATED,
                &json!({ "message": "Report submitted successfully", "report": report }),
            ),
            Err(e) => directory_error_response(&e),
        }
    }

    fn update_status(&self, id: &str, req: &ApiRequest) -> ApiResponse {
        let update: StatusUpdate = if req.body.is_empty() {
            StatusUpdate::default()
        } else {
            match req.json() {
                Ok(update) => update,
                Err(e) => return error_response(StatusCode::BAD_REQUEST, &format!("Invalid JSON body: {e}")),
            }
        };

        match self.directory.update_status(id, update.status.as_deref()) {
            Ok(line) => json_response(StatusCode::OK, &json!({ "message": "Line status updated", "line": line })),
            Err(e) => directory_error_response(&e),
        }
    }

    fn resolve_incident(&self, id: &str) -> ApiResponse {
        match self.directory.resolve_incident(id) {
            Ok(incident) => {
                json_response(StatusCode::OK, &json!({ "message": "Incident resolved", "incident": incident }))
            }
            Err(e) => directory_error_response(&e),
        }
    }
}

/// Wall-clock time of day as "HH:MM"
fn local_time_hhmm() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}

#[async_trait]
impl Router for TransportRouter {
    fn name(&self) -> &'static str {
        "transport-rest"
    }

    async fn route(&self, req: ApiRequest) -> ApiResponse {
        let directory = &self.directory;
        let segments = req.segments();

        match (&req.method, segments.as_slice()) {
            (&Method::GET, ["health"]) => json_response(
                StatusCode::OK,
                &json!({
                    "status": "healthy",
                    "service": "Transport REST Service",
                    "timestamp": timestamp_now(),
                }),
            ),
            (&Method::GET, ["lines"]) => {
                json_response(StatusCode::OK, &directory.list_lines(req.query("type"), req.query("status")))
            }
            (&Method::GET, ["lines", id]) => Self::respond(directory.line(id)),
            (&Method::GET, ["lines", id, "timetable"]) => Self::respond(directory.timetable(id)),
            (&Method::GET, ["lines", id, "next-departure"]) => {
                Self::respond(directory.next_departure(id, &local_time_hhmm()))
            }
            (&Method::GET, ["traffic", "status"]) => {
                json_response(StatusCode::OK, &directory.traffic_status(req.query("severity")))
            }
            (&Method::GET, ["traffic", "line", id]) => Self::respond(directory.line_traffic(id)),
            (&Method::GET, ["connections"]) => json_response(StatusCode::OK, &directory.connections()),
            (&Method::GET, ["connections", stop]) => Self::respond(directory.connection(stop)),
            (&Method::GET, ["transport", "availability"]) => Self::respond(
                directory.availability(req.query("line_id"), req.query("transport_type")),
            ),
            (&Method::POST, ["lines", id, "report"]) => self.report_issue(id, &req),
            (&Method::PUT, ["lines", id]) => self.update_status(id, &req),
            (&Method::DELETE, ["traffic", "incidents", id]) => self.resolve_incident(id),
            _ => endpoint_not_found(&req),
        }
    }
}
