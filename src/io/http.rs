//! Minimal HTTP/1 server plumbing shared by every service
//!
//! Each service implements [`Router`] over an already-buffered [`ApiRequest`];
//! [`serve`] owns the accept loop, body collection and access logging, and
//! wraps every connection in a permissive CORS layer.
//! Routers never see hyper's streaming body, which keeps them unit-testable.

use crate::domain::error::DirectoryError;
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::HeaderValue;
use hyper::server::conn::http1;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use hyper_util::service::TowerToHyperService;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower::Layer;
use tower_http::cors::CorsLayer;
use tracing::{debug, error, info};

pub type ApiResponse = Response<Full<Bytes>>;

/// A fully-read request: method, path, decoded query and raw body
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    query: HashMap<String, String>,
    pub body: Bytes,
}

impl ApiRequest {
    /// Build from a path that may carry a query string, e.g. `/aqi?zone=Nord`
    pub fn new(method: Method, path_and_query: &str) -> Self {
        let (path, query) = match path_and_query.split_once('?') {
            Some((path, query)) => (path, parse_query(query)),
            None => (path_and_query, HashMap::new()),
        };
        Self { method, path: path.to_string(), query, body: Bytes::new() }
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_json<T: Serialize>(self, value: &T) -> Self {
        let body = serde_json::to_vec(value).unwrap_or_default();
        self.with_body(body)
    }

    /// Query parameter value; empty values count as absent
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str).filter(|value| !value.is_empty())
    }

    /// Non-empty path segments, e.g. `/lines/1/timetable` -> ["lines", "1", "timetable"]
    pub fn segments(&self) -> Vec<&str> {
        self.path.split('/').filter(|segment| !segment.is_empty()).collect()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

fn parse_query(query: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(query.as_bytes()).into_owned().collect()
}

/// Build a response with an arbitrary body and content type
pub fn raw_response(status: StatusCode, content_type: &str, body: impl Into<Bytes>) -> ApiResponse {
    let mut response = Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(content_type) {
        headers.insert(hyper::header::CONTENT_TYPE, value);
    }
    response
}

pub fn json_response<T: Serialize>(status: StatusCode, value: &T) -> ApiResponse {
    match serde_json::to_vec(value) {
        Ok(body) => raw_response(status, "application/json", body),
        Err(e) => {
            error!(error = %e, "response_serialize_failed");
            raw_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "application/json",
                r#"{"error":"Internal server error"}"#,
            )
        }
    }
}

/// `{"error": message}` with the given status
pub fn error_response(status: StatusCode, message: &str) -> ApiResponse {
    json_response(status, &serde_json::json!({ "error": message }))
}

/// Leaf-local errors: 404 for unknown records, 400 for everything else
pub fn directory_error_response(err: &DirectoryError) -> ApiResponse {
    let status = if err.is_not_found() { StatusCode::NOT_FOUND } else { StatusCode::BAD_REQUEST };
    json_response(status, &err.to_body())
}

/// `{"error": "Endpoint not found", "path": ...}`
pub fn endpoint_not_found(req: &ApiRequest) -> ApiResponse {
    json_response(
        StatusCode::NOT_FOUND,
        &serde_json::json!({ "error": "Endpoint not found", "path": req.path }),
    )
}

#[async_trait]
pub trait Router: Send + Sync + 'static {
    /// Service name used in log lines
    fn name(&self) -> &'static str;

    async fn route(&self, req: ApiRequest) -> ApiResponse;
}

/// Read the body and hand the request to the router
async fn handle_request<R: Router>(
    req: Request<hyper::body::Incoming>,
    router: Arc<R>,
) -> Result<ApiResponse, Infallible> {
    let start = Instant::now();
    let method = req.method().clone();
    let path_and_query =
        req.uri().path_and_query().map(|pq| pq.as_str().to_string()).unwrap_or_else(|| "/".to_string());

    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            error!(service = router.name(), error = %e, "http_body_read_failed");
            return Ok(error_response(StatusCode::BAD_REQUEST, "Unable to read request body"));
        }
    };

    let api_request = ApiRequest::new(method.clone(), &path_and_query).with_body(body);
    let path = api_request.path.clone();
    let response = router.route(api_request).await;

    debug!(
        service = router.name(),
        method = %method,
        path = %path,
        status = %response.status().as_u16(),
        latency_us = %start.elapsed().as_micros(),
        "http_request"
    );

    Ok(response)
}

/// Bind a listener on all interfaces
pub async fn bind(port: u16) -> std::io::Result<TcpListener> {
    TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], port))).await
}

/// Accept connections until the shutdown flag flips to true
pub async fn serve<R: Router>(
    listener: TcpListener,
    router: Arc<R>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let local_addr = listener.local_addr()?;
    info!(service = router.name(), addr = %local_addr, "http_server_started");

    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, _addr)) => {
                        let io = TokioIo::new(stream);
                        let router = router.clone();

                        tokio::spawn(async move {
                            let name = router.name();
                            let service = tower::service_fn(move |req| {
                                let router = router.clone();
                                async move { handle_request(req, router).await }
                            });
                            let service = TowerToHyperService::new(CorsLayer::permissive().layer(service));

                            if let Err(e) = http1::Builder::new()
                                .serve_connection(io, service)
                                .await
                            {
                                error!(service = name, error = %e, "http_connection_error");
                            }
                        });
                    }
                    Err(e) => {
                        error!(service = router.name(), error = %e, "http_accept_error");
                    }
                }
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    info!(service = router.name(), "http_server_shutdown");
                    return Ok(());
                }
            }
        }
    }
}

/// Read a response body back into bytes (used by tests)
pub async fn body_bytes(response: ApiResponse) -> Bytes {
    match response.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(never) => match never {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_splits_path_and_query() {
        let req = ApiRequest::new(Method::GET, "/lines/1/timetable?type=bus&status=");
        assert_eq!(req.path, "/lines/1/timetable");
        assert_eq!(req.segments(), vec!["lines", "1", "timetable"]);
        assert_eq!(req.query("type"), Some("bus"));
        assert_eq!(req.query("status"), None);
        assert_eq!(req.query("missing"), None);
    }

    #[test]
    fn test_query_is_percent_decoded() {
        let req = ApiRequest::new(Method::GET, "/aqi?zone=Centre%20Ville&q=a+b");
        assert_eq!(req.query("zone"), Some("Centre Ville"));
        assert_eq!(req.query("q"), Some("a b"));
    }

    #[test]
    fn test_root_path_has_no_segments() {
        let req = ApiRequest::new(Method::POST, "/");
        assert!(req.segments().is_empty());
    }

    #[tokio::test]
    async fn test_error_response_shape() {
        let response = error_response(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()["content-type"], "application/json");
        let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body, serde_json::json!({"error": "boom"}));
    }

    #[tokio::test]
    async fn test_directory_error_status_mapping() {
        let missing = directory_error_response(&DirectoryError::not_found("Stop", "stop_id", "x"));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        let invalid = directory_error_response(&DirectoryError::invalid("Name cannot be empty"));
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    }
}
