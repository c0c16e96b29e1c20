//! Tests for the transport directory and its routes

use super::*;
use crate::io::http::{body_bytes, ApiRequest, Router};
use hyper::{Method, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;

/// Estimator with a fixed answer so availability is deterministic
struct FixedDelay(u32);

impl DelayEstimator for FixedDelay {
    fn next_in_minutes(&self, _line: &Line) -> u32 {
        self.0
    }
}

fn fixed_directory() -> TransportDirectory {
    TransportDirectory::new(Box::new(FixedDelay(7)))
}

async fn call(router: &TransportRouter, req: ApiRequest) -> (StatusCode, Value) {
    let response = router.route(req).await;
    let status = response.status();
    let body = serde_json::from_slice(&body_bytes(response).await).unwrap();
    (status, body)
}

fn router() -> TransportRouter {
    TransportRouter::new(Arc::new(fixed_directory()))
}

#[test]
fn test_list_lines_filters() {
    let directory = fixed_directory();
    assert_eq!(directory.list_lines(None, None).count, 4);

    let buses = directory.list_lines(Some("bus"), None);
    assert_eq!(buses.count, 2);
    assert!(buses.lines.iter().all(|line| line.kind == TransportType::Bus));

    let on_time_buses = directory.list_lines(Some("bus"), Some("on_time"));
    assert_eq!(on_time_buses.count, 1);
    assert_eq!(on_time_buses.lines[0].id, "1");

    assert_eq!(directory.list_lines(Some("ferry"), None).count, 0);
}

#[test]
fn test_line_lookup_not_found() {
    let err = fixed_directory().line("99").unwrap_err();
    assert_eq!(err, DirectoryError::not_found("Line", "line_id", "99"));
}

#[test]
fn test_next_departure_adds_delay_for_delayed_lines() {
    let directory = fixed_directory();

    let on_time = directory.next_departure("1", "07:10").unwrap();
    assert_eq!(on_time.next_departure.as_deref(), Some("07:30"));
    assert_eq!(on_time.estimated_delay, 0);
    assert_eq!(on_time.current_time, "07:10");

    let delayed = directory.next_departure("2", "23:00").unwrap();
    assert_eq!(delayed.next_departure.as_deref(), Some("06:15"));
    assert_eq!(delayed.estimated_delay, 10);
}

#[test]
fn test_traffic_status_by_severity() {
    let directory = fixed_directory();

    let all = directory.traffic_status(None);
    assert_eq!(all.status, "disrupted");
    assert_eq!(all.incidents_count, 2);

    let high = directory.traffic_status(Some("high"));
    assert_eq!(high.incidents_count, 1);
    assert_eq!(high.incidents[0].id, "inc_002");

    let low = directory.traffic_status(Some("low"));
    assert_eq!(low.status, "normal");
    assert!(low.incidents.is_empty());
}

#[test]
fn test_line_traffic_lists_only_that_line() {
    let traffic = fixed_directory().line_traffic("2").unwrap();
    assert_eq!(traffic.incidents.len(), 1);
    assert_eq!(traffic.incidents[0].line, "2");
    assert!(fixed_directory().line_traffic("3").unwrap().incidents.is_empty());
}

#[test]
fn test_connections() {
    let directory = fixed_directory();
    let list = directory.connections();
    assert_eq!(list.count, 2);
    assert_eq!(list.connections[0].stop_name, "Gare Centrale");

    let stop = directory.connection("place_republique").unwrap();
    assert_eq!(stop.lines_available, vec!["2", "4"]);
    assert!(directory.connection("nowhere").unwrap_err().is_not_found());
}

#[test]
fn test_line_availability_uses_estimator() {
    let directory = fixed_directory();

    let Availability::Line(line) = directory.availability(Some("1"), None).unwrap() else {
        panic!("expected single-line availability");
    };
    assert!(line.available);
    assert_eq!(line.next_in_minutes, Some(7));

    let Availability::Line(cancelled) = directory.availability(Some("4"), None).unwrap() else {
        panic!("expected single-line availability");
    };
    assert!(!cancelled.available);
    assert_eq!(cancelled.next_in_minutes, None);
}

#[test]
fn test_random_delay_stays_within_bounds() {
    let directory = TransportDirectory::default();
    for _ in 0..200 {
        let Availability::Line(line) = directory.availability(Some("3"), None).unwrap() else {
            panic!("expected single-line availability");
        };
        let minutes = line.next_in_minutes.unwrap();
        assert!((1..=MAX_WAIT_MINUTES).contains(&minutes), "got {minutes}");
    }
}

#[test]
fn test_network_availability_counts() {
    let directory = fixed_directory();

    let Availability::Network(all) = directory.availability(None, None).unwrap() else {
        panic!("expected network availability");
    };
    assert!(all.available);
    assert_eq!(all.total_lines, 4);
    assert_eq!(all.operational_lines, 3);

    let Availability::Network(buses) = directory.availability(None, Some("bus")).unwrap() else {
        panic!("expected network availability");
    };
    assert_eq!(buses.total_lines, 2);
    assert_eq!(buses.operational_lines, 1);
}

#[test]
fn test_unknown_line_availability() {
    let err = fixed_directory().availability(Some("42"), None).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_report_issue() {
    let directory = fixed_directory();
    let report = directory
        .report_issue(
            "1",
            ReportInput {
                issue_type: Some("cleanliness".to_string()),
                description: Some("Seats are dirty".to_string()),
                reporter: None,
            },
        )
        .unwrap();

    assert!(report.report_id.starts_with("rep_"));
    assert_eq!(report.reporter, "anonymous");
    assert_eq!(report.status, "submitted");
    // Reporting never changes the line
    assert_eq!(directory.line("1").unwrap().status, LineStatus::OnTime);
}

#[test]
fn test_report_ids_are_unique() {
    let directory = fixed_directory();
    let input = || ReportInput {
        issue_type: Some("delay".to_string()),
        description: Some("late".to_string()),
        reporter: Some("ana".to_string()),
    };
    let first = directory.report_issue("2", input()).unwrap();
    let second = directory.report_issue("2", input()).unwrap();
    assert_ne!(first.report_id, second.report_id);
    assert_eq!(first.reporter, "ana");
}

#[test]
fn test_report_issue_requires_fields() {
    let err = fixed_directory()
        .report_issue("1", ReportInput { issue_type: Some("x".to_string()), ..Default::default() })
        .unwrap_err();
    assert!(matches!(err, DirectoryError::MissingFields { .. }));
}

#[test]
fn test_update_status() {
    let directory = fixed_directory();
    let line = directory.update_status("4", Some("on_time")).unwrap();
    assert_eq!(line.status, LineStatus::OnTime);
    assert_eq!(directory.line("4").unwrap().status, LineStatus::OnTime);

    assert!(matches!(
        directory.update_status("4", Some("late")),
        Err(DirectoryError::InvalidStatus { .. })
    ));
    assert!(matches!(directory.update_status("4", None), Err(DirectoryError::InvalidStatus { .. })));
    assert!(directory.update_status("9", Some("delayed")).unwrap_err().is_not_found());
}

#[test]
fn test_resolve_incident_removes_it() {
    let directory = fixed_directory();
    let incident = directory.resolve_incident("inc_001").unwrap();
    assert_eq!(incident.line, "2");
    assert_eq!(directory.traffic_status(None).incidents_count, 1);
    assert!(directory.resolve_incident("inc_001").unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_route_lines_with_query() {
    let (status, body) = call(&router(), ApiRequest::new(Method::GET, "/lines?type=metro")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["lines"][0]["id"], "2");
}

#[tokio::test]
async fn test_route_line_not_found_body() {
    let (status, body) = call(&router(), ApiRequest::new(Method::GET, "/lines/77")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Line not found", "line_id": "77"}));
}

#[tokio::test]
async fn test_route_timetable_and_next_departure() {
    let router = router();
    let (status, body) = call(&router, ApiRequest::new(Method::GET, "/lines/3/timetable")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "train");
    assert_eq!(body["frequency"], 60);

    let (status, body) = call(&router, ApiRequest::new(Method::GET, "/lines/3/next-departure")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_time"].as_str().unwrap().len(), 5);
    assert!(body["next_departure"].is_string());
}

#[tokio::test]
async fn test_route_availability_shape() {
    let (status, body) = call(&router(), ApiRequest::new(Method::GET, "/transport/availability")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], true);
    assert_eq!(body["total_lines"], 4);
    assert_eq!(body["lines"][3], json!({"id": "4", "name": "Ligne 4 - Hôpital ↔ Stade", "type": "bus", "status": "cancelled"}));

    let (_, body) =
        call(&router(), ApiRequest::new(Method::GET, "/transport/availability?line_id=4")).await;
    assert_eq!(body["next_in_minutes"], Value::Null);
    assert_eq!(body["available"], false);
}

#[tokio::test]
async fn test_route_report_created() {
    let req = ApiRequest::new(Method::POST, "/lines/1/report")
        .with_json(&json!({"issue_type": "delay", "description": "Bus late"}));
    let (status, body) = call(&router(), req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Report submitted successfully");
    assert_eq!(body["report"]["line_id"], "1");
}

#[tokio::test]
async fn test_route_report_missing_fields() {
    let req = ApiRequest::new(Method::POST, "/lines/1/report").with_json(&json!({"issue_type": "delay"}));
    let (status, body) = call(&router(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["required"], json!(["issue_type", "description"]));
}

#[tokio::test]
async fn test_route_update_status() {
    let router = router();
    let req = ApiRequest::new(Method::PUT, "/lines/2").with_json(&json!({"status": "cancelled"}));
    let (status, body) = call(&router, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["line"]["status"], "cancelled");

    let req = ApiRequest::new(Method::PUT, "/lines/2").with_json(&json!({"status": "late"}));
    let (status, body) = call(&router, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["valid_statuses"], json!(["on_time", "delayed", "cancelled"]));
}

#[tokio::test]
async fn test_route_update_status_rejects_malformed_body() {
    let router = router();
    let req = ApiRequest::new(Method::PUT, "/lines/2").with_body("{\"status\": ");
    let (status, body) = call(&router, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON body"));

    let (_, line) = call(&router, ApiRequest::new(Method::GET, "/lines/2")).await;
    assert_eq!(line["status"], "delayed");
}

#[tokio::test]
async fn test_route_delete_incident() {
    let router = router();
    let (status, body) = call(&router, ApiRequest::new(Method::DELETE, "/traffic/incidents/inc_002")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["incident"]["id"], "inc_002");

    let (status, body) = call(&router, ApiRequest::new(Method::DELETE, "/traffic/incidents/inc_002")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["incident_id"], "inc_002");
}

#[tokio::test]
async fn test_route_unknown_endpoint() {
    let (status, body) = call(&router(), ApiRequest::new(Method::GET, "/buses")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Endpoint not found", "path": "/buses"}));
}
