//! Services - the leaf directories and the orchestrator that composes them
//!
//! - `orchestrator` - trip planning and alert forwarding across the leaves
//! - `air_quality` - zone-based AQI rule and its HTTP front
//! - `transport` - lines, incidents and connections over REST
//! - `places` - points of interest over a GraphQL-style endpoint
//! - `alert_relay` - append-only alert log behind the gRPC EmergencyService

pub mod air_quality;
pub mod alert_relay;
pub mod orchestrator;
pub mod places;
pub mod transport;

// Re-export commonly used types
pub use air_quality::AirQualityRouter;
pub use alert_relay::{AlertLog, AlertRelay};
pub use orchestrator::{Orchestrator, OrchestratorRouter, TripPolicy, UpstreamError};
pub use places::{PlaceDirectory, PlacesRouter};
pub use transport::{TransportDirectory, TransportRouter};
