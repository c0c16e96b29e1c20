//! Transport directory - lines, traffic incidents and stop connections
//!
//! The catalogue is seeded at startup and lives for the process lifetime.
//! Line status updates and incident resolution take a write lock, so
//! concurrent mutations of the same record are serialized.

mod handlers;

#[cfg(test)]
mod tests;

pub use handlers::TransportRouter;

use crate::domain::error::DirectoryError;
use crate::domain::transit::{
    next_departure, Connection, Incident, IssueReport, Line, LineStatus, StopConnection,
    TransportType,
};
use crate::domain::types::timestamp_now;
use parking_lot::RwLock;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;
use uuid::Uuid;

/// Upper bound of the waiting-time estimate, in minutes
pub const MAX_WAIT_MINUTES: u32 = 15;

/// Delay added to the next departure of a delayed line, in minutes
const DELAYED_LINE_DELAY_MINS: u32 = 10;

/// Estimates minutes until the next vehicle of an operational line
pub trait DelayEstimator: Send + Sync {
    fn next_in_minutes(&self, line: &Line) -> u32;
}

/// Uniform random wait in 1..=15 minutes
#[derive(Debug, Default)]
pub struct RandomDelay;

impl DelayEstimator for RandomDelay {
    fn next_in_minutes(&self, _line: &Line) -> u32 {
        rand::thread_rng().gen_range(1..=MAX_WAIT_MINUTES)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LineList {
    pub count: usize,
    pub lines: Vec<Line>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Timetable {
    pub line_id: String,
    pub line_name: String,
    #[serde(rename = "type")]
    pub kind: TransportType,
    pub timetable: Vec<String>,
    pub frequency: u32,
    pub status: LineStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct NextDeparture {
    pub line_id: String,
    pub line_name: String,
    pub current_time: String,
    pub next_departure: Option<String>,
    pub status: LineStatus,
    pub estimated_delay: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrafficStatus {
    /// "disrupted" when any incident matches, otherwise "normal"
    pub status: &'static str,
    pub timestamp: String,
    pub incidents_count: usize,
    pub incidents: Vec<Incident>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineTraffic {
    pub line_id: String,
    pub line_name: String,
    pub status: LineStatus,
    pub incidents: Vec<Incident>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectionList {
    pub count: usize,
    pub connections: Vec<StopConnection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TransportType,
    pub status: LineStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineAvailability {
    pub line_id: String,
    pub available: bool,
    pub status: LineStatus,
    /// `None` for cancelled lines
    pub next_in_minutes: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NetworkAvailability {
    pub available: bool,
    pub total_lines: usize,
    pub operational_lines: usize,
    pub lines: Vec<LineSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Availability {
    Line(LineAvailability),
    Network(NetworkAvailability),
}

/// Body of `POST /lines/:id/report`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportInput {
    pub issue_type: Option<String>,
    pub description: Option<String>,
    pub reporter: Option<String>,
}

pub struct TransportDirectory {
    lines: RwLock<BTreeMap<String, Line>>,
    incidents: RwLock<Vec<Incident>>,
    connections: BTreeMap<String, StopConnection>,
    estimator: Box<dyn DelayEstimator>,
}

impl Default for TransportDirectory {
    fn default() -> Self {
        Self::new(Box::new(RandomDelay))
    }
}

impl TransportDirectory {
    /// Directory seeded with the sample network
    pub fn new(estimator: Box<dyn DelayEstimator>) -> Self {
        let lines = seed_lines().into_iter().map(|line| (line.id.clone(), line)).collect();
        Self {
            lines: RwLock::new(lines),
            incidents: RwLock::new(seed_incidents()),
            connections: seed_connections(),
            estimator,
        }
    }

    fn line_not_found(id: &str) -> DirectoryError {
        DirectoryError::not_found("Line", "line_id", id)
    }

    /// Lines filtered by transport type and status (exact string match)
    pub fn list_lines(&self, kind: Option<&str>, status: Option<&str>) -> LineList {
        let lines: Vec<Line> = self
            .lines
            .read()
            .values()
            .filter(|line| kind.map_or(true, |k| line.kind.as_str() == k))
            .filter(|line| status.map_or(true, |s| line.status.as_str() == s))
            .cloned()
            .collect();
        LineList { count: lines.len(), lines }
    }

    pub fn line(&self, id: &str) -> Result<Line, DirectoryError> {
        self.lines.read().get(id).cloned().ok_or_else(|| Self::line_not_found(id))
    }

    pub fn timetable(&self, id: &str) -> Result<Timetable, DirectoryError> {
        let line = self.line(id)?;
        Ok(Timetable {
            line_id: line.id,
            line_name: line.name,
            kind: line.kind,
            timetable: line.timetable,
            frequency: line.frequency,
            status: line.status,
        })
    }

    /// Next departure relative to `current_time` ("HH:MM")
    pub fn next_departure(&self, id: &str, current_time: &str) -> Result<NextDeparture, DirectoryError> {
        let line = self.line(id)?;
        let next = next_departure(&line.timetable, current_time).map(str::to_string);
        let estimated_delay =
            if line.status == LineStatus::Delayed { DELAYED_LINE_DELAY_MINS } else { 0 };

        Ok(NextDeparture {
            line_id: line.id,
            line_name: line.name,
            current_time: current_time.to_string(),
            next_departure: next,
            status: line.status,
            estimated_delay,
        })
    }

    pub fn traffic_status(&self, severity: Option<&str>) -> TrafficStatus {
        let incidents: Vec<Incident> = self
            .incidents
            .read()
            .iter()
            .filter(|incident| severity.map_or(true, |s| incident.severity == s))
            .cloned()
            .collect();

        TrafficStatus {
            status: if incidents.is_empty() { "normal" } else { "disrupted" },
            timestamp: timestamp_now(),
            incidents_count: incidents.len(),
            incidents,
        }
    }

    pub fn line_traffic(&self, id: &str) -> Result<LineTraffic, DirectoryError> {
        let line = self.line(id)?;
        let incidents =
            self.incidents.read().iter().filter(|incident| incident.line == id).cloned().collect();

        Ok(LineTraffic { line_id: line.id, line_name: line.name, status: line.status, incidents })
    }

    pub fn connections(&self) -> ConnectionList {
        ConnectionList {
            count: self.connections.len(),
            connections: self.connections.values().cloned().collect(),
        }
    }

    pub fn connection(&self, stop: &str) -> Result<StopConnection, DirectoryError> {
        self.connections
            .get(stop)
            .cloned()
            .ok_or_else(|| DirectoryError::not_found("Stop", "stop_id", stop))
    }

    /// Availability of one line, or of the whole network optionally scoped by type
    pub fn availability(
        &self,
        line_id: Option<&str>,
        transport_type: Option<&str>,
    ) -> Result<Availability, DirectoryError> {
        if let Some(id) = line_id {
            let line = self.line(id)?;
            let available = line.status.is_operational();
            let next_in_minutes = available.then(|| self.estimator.next_in_minutes(&line));
            return Ok(Availability::Line(LineAvailability {
                line_id: line.id,
                available,
                status: line.status,
                next_in_minutes,
            }));
        }

        let lines = self.list_lines(transport_type, None).lines;
        let operational_lines = lines.iter().filter(|line| line.status.is_operational()).count();

        Ok(Availability::Network(NetworkAvailability {
            available: true,
            total_lines: lines.len(),
            operational_lines,
            lines: lines
                .into_iter()
                .map(|line| LineSummary {
                    id: line.id,
                    name: line.name,
                    kind: line.kind,
                    status: line.status,
                })
                .collect(),
        }))
    }

    /// Record an issue against a line. The line itself is left untouched.
    pub fn report_issue(&self, id: &str, input: ReportInput) -> Result<IssueReport, DirectoryError> {
        self.line(id)?;

        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());
        let (Some(issue_type), Some(description)) =
            (non_empty(input.issue_type), non_empty(input.description))
        else {
            return Err(DirectoryError::MissingFields { required: vec!["issue_type", "description"] });
        };

        let report = IssueReport {
            report_id: format!("rep_{}", Uuid::now_v7().simple()),
            line_id: id.to_string(),
            issue_type,
            description,
            reporter: non_empty(input.reporter).unwrap_or_else(|| "anonymous".to_string()),
            status: "submitted".to_string(),
            timestamp: timestamp_now(),
        };

        info!(report_id = %report.report_id, line_id = %id, issue_type = %report.issue_type, "line_issue_reported");
        Ok(report)
    }

    /// Set a line's status; only on_time, delayed and cancelled are accepted
    pub fn update_status(&self, id: &str, status: Option<&str>) -> Result<Line, DirectoryError> {
        let mut lines = self.lines.write();
        let line = lines.get_mut(id).ok_or_else(|| Self::line_not_found(id))?;

        let status: LineStatus = status
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| DirectoryError::InvalidStatus { valid: LineStatus::names() })?;

        line.status = status;
        info!(line_id = %id, status = %status, "line_status_updated");
        Ok(line.clone())
    }

    /// Remove an incident, returning it
    pub fn resolve_incident(&self, id: &str) -> Result<Incident, DirectoryError> {
        let mut incidents = self.incidents.write();
        let index = incidents
            .iter()
            .position(|incident| incident.id == id)
            .ok_or_else(|| DirectoryError::not_found("Incident", "incident_id", id))?;

        let removed = incidents.remove(index);
        info!(incident_id = %id, line_id = %removed.line, "incident_resolved");
        Ok(removed)
    }
}

fn times(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn seed_lines() -> Vec<Line> {
    vec![
        Line {
            id: "1".to_string(),
            name: "Ligne 1 - Centre-Ville ↔ Aéroport".to_string(),
            kind: TransportType::Bus,
            timetable: times(&[
                "06:00", "06:30", "07:00", "07:30", "08:00", "08:30", "09:00", "09:30", "10:00",
            ]),
            status: LineStatus::OnTime,
            frequency: 30,
        },
        Line {
            id: "2".to_string(),
            name: "Ligne 2 - Gare ↔ Université".to_string(),
            kind: TransportType::Metro,
            timetable: times(&["06:15", "06:45", "07:15", "07:45", "08:15", "08:45", "09:15"]),
            status: LineStatus::Delayed,
            frequency: 30,
        },
        Line {
            id: "3".to_string(),
            name: "Ligne 3 - Port ↔ Zone Industrielle".to_string(),
            kind: TransportType::Train,
            timetable: times(&["07:00", "08:00", "09:00", "10:00", "11:00", "12:00"]),
            status: LineStatus::OnTime,
            frequency: 60,
        },
        Line {
            id: "4".to_string(),
            name: "Ligne 4 - Hôpital ↔ Stade".to_string(),
            kind: TransportType::Bus,
            timetable: times(&["06:30", "07:00", "07:30", "08:00", "08:30", "09:00"]),
            status: LineStatus::Cancelled,
            frequency: 30,
        },
    ]
}

fn seed_incidents() -> Vec<Incident> {
    vec![
        Incident {
            id: "inc_001".to_string(),
            line: "2".to_string(),
            kind: "accident".to_string(),
            severity: "moderate".to_string(),
            reason: "Accident de circulation".to_string(),
            delay_mins: 12,
            affected_stops: times(&["Gare Centrale", "Place de la République"]),
            estimated_resolution: "10:30".to_string(),
        },
        Incident {
            id: "inc_002".to_string(),
            line: "4".to_string(),
            kind: "maintenance".to_string(),
            severity: "high".to_string(),
            reason: "Maintenance d'urgence".to_string(),
            delay_mins: 0,
            affected_stops: times(&["all"]),
            estimated_resolution: "14:00".to_string(),
        },
    ]
}

fn connection(from: &str, to: &str, walking_time: u32) -> Connection {
    Connection { from: from.to_string(), to: to.to_string(), walking_time }
}

fn seed_connections() -> BTreeMap<String, StopConnection> {
    BTreeMap::from([
        (
            "gare_centrale".to_string(),
            StopConnection {
                stop_name: "Gare Centrale".to_string(),
                lines_available: times(&["1", "2", "3"]),
                connections: vec![connection("1", "2", 3), connection("1", "3", 5), connection("2", "3", 4)],
            },
        ),
        (
            "place_republique".to_string(),
            StopConnection {
                stop_name: "Place de la République".to_string(),
                lines_available: times(&["2", "4"]),
                connections: vec![connection("2", "4", 2)],
            },
        ),
    ])
}
