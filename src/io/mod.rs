//! IO modules - wire protocols and network plumbing
//!
//! - `http` - HTTP/1 server loop and JSON response helpers shared by every service
//! - `graphql` - GraphQL-over-HTTP envelope spoken by the places directory
//! - `grpc` - generated `EmergencyService` stubs plus server and channel setup
//! - `clients` - reqwest and tonic clients the orchestrator uses to reach the leaves
//! - `prometheus` - Prometheus text format for the orchestrator metrics

pub mod clients;
pub mod graphql;
pub mod grpc;
pub mod http;
pub mod prometheus;

// Re-export commonly used types
pub use clients::{AirQualityClient, AlertRelayClient, PlacesClient, TransportClient};
pub use grpc::serve_emergency;
pub use http::{bind, serve, ApiRequest, ApiResponse, Router};
