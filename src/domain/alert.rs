//! Emergency alert messages
//!
//! These are protobuf messages (package `emergency`) exchanged with the alert
//! relay, and also the JSON bodies the orchestrator accepts and returns.
//! Field tags follow the relay's service definition:
//!
//! ```text
//! service EmergencyService {
//!   rpc SendAlert (AlertRequest) returns (AlertResponse);
//!   rpc GetAlerts (Empty) returns (AlertList);
//! }
//! ```

use serde::{Deserialize, Serialize};

pub const ALERT_RECEIVED: &str = "received";

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertRequest {
    #[prost(string, tag = "1")]
    pub zone: String,
    #[prost(string, tag = "2")]
    pub message: String,
    #[prost(int32, tag = "3")]
    pub priority: i32,
}

/// Acknowledgement returned by the relay
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct AlertResponse {
    #[prost(string, tag = "1")]
    pub status: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct Empty {}

/// Stored alert as recorded by the relay
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct Alert {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub message: String,
    #[prost(string, tag = "3")]
    pub timestamp: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct AlertList {
    #[prost(message, repeated, tag = "1")]
    pub alerts: Vec<Alert>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_alert_request_json_defaults_missing_fields() {
        let request: AlertRequest = serde_json::from_str(r#"{"message":"Test fire"}"#).unwrap();
        assert_eq!(request.message, "Test fire");
        assert_eq!(request.zone, "");
        assert_eq!(request.priority, 0);
    }

    #[test]
    fn test_alert_request_wire_encoding() {
        let request = AlertRequest {
            zone: "Centre".to_string(),
            message: "Test fire".to_string(),
            priority: 1,
        };
        let bytes = request.encode_to_vec();
        // field 1, wire type 2 (length delimited)
        assert_eq!(bytes[0], 0x0A);
        assert_eq!(AlertRequest::decode(bytes.as_slice()).unwrap(), request);
    }
}
