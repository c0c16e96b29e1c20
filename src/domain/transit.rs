//! Transit network records: lines, incidents, stop connections and issue reports

use crate::domain::error::UnknownVariant;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportType {
    Bus,
    Metro,
    Train,
}

impl TransportType {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportType::Bus => "bus",
            TransportType::Metro => "metro",
            TransportType::Train => "train",
        }
    }
}

impl fmt::Display for TransportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operational status of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStatus {
    OnTime,
    Delayed,
    Cancelled,
}

impl LineStatus {
    pub const ALL: [LineStatus; 3] = [LineStatus::OnTime, LineStatus::Delayed, LineStatus::Cancelled];

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            LineStatus::OnTime => "on_time",
            LineStatus::Delayed => "delayed",
            LineStatus::Cancelled => "cancelled",
        }
    }

    /// Cancelled lines carry no traffic
    #[inline]
    pub fn is_operational(&self) -> bool {
        !matches!(self, LineStatus::Cancelled)
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(LineStatus::as_str).collect()
    }
}

impl fmt::Display for LineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LineStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LineStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("line status", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TransportType,
    /// Departures of the day as zero-padded "HH:MM", ascending
    pub timetable: Vec<String>,
    pub status: LineStatus,
    /// Minutes between departures
    pub frequency: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,
    pub line: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: String,
    pub reason: String,
    pub delay_mins: u32,
    pub affected_stops: Vec<String>,
    pub estimated_resolution: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub from: String,
    pub to: String,
    pub walking_time: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopConnection {
    pub stop_name: String,
    pub lines_available: Vec<String>,
    pub connections: Vec<Connection>,
}

/// Issue submitted against a line. Does not alter the line itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueReport {
    pub report_id: String,
    pub line_id: String,
    pub issue_type: String,
    pub description: String,
    pub reporter: String,
    pub status: String,
    pub timestamp: String,
}

/// First departure strictly after `current_time`, wrapping to the first of the day
///
/// Both sides are zero-padded "HH:MM" so lexical order is chronological.
pub fn next_departure<'a>(timetable: &'a [String], current_time: &str) -> Option<&'a str> {
    timetable
        .iter()
        .find(|time| time.as_str() > current_time)
        .or_else(|| timetable.first())
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timetable() -> Vec<String> {
        ["06:00", "06:30", "07:00"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_next_departure_picks_strictly_later_entry() {
        let times = timetable();
        assert_eq!(next_departure(&times, "05:59"), Some("06:00"));
        assert_eq!(next_departure(&times, "06:00"), Some("06:30"));
        assert_eq!(next_departure(&times, "06:45"), Some("07:00"));
    }

    #[test]
    fn test_next_departure_wraps_to_first_of_day() {
        let times = timetable();
        assert_eq!(next_departure(&times, "07:00"), Some("06:00"));
        assert_eq!(next_departure(&times, "23:59"), Some("06:00"));
    }

    #[test]
    fn test_next_departure_empty_timetable() {
        assert_eq!(next_departure(&[], "12:00"), None);
    }

    #[test]
    fn test_line_status_parsing() {
        assert_eq!("delayed".parse::<LineStatus>().unwrap(), LineStatus::Delayed);
        assert!("late".parse::<LineStatus>().is_err());
        assert!(!LineStatus::Cancelled.is_operational());
        assert_eq!(LineStatus::names(), vec!["on_time", "delayed", "cancelled"]);
    }

    #[test]
    fn test_line_serializes_type_and_status() {
        let line = Line {
            id: "1".to_string(),
            name: "Ligne 1".to_string(),
            kind: TransportType::Bus,
            timetable: timetable(),
            status: LineStatus::OnTime,
            frequency: 30,
        };
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["type"], "bus");
        assert_eq!(json["status"], "on_time");
    }
}
