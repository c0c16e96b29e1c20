//! Domain models - the transit entities every service speaks about
//!
//! - `types` - zones, places, air quality readings, trip plans
//! - `transit` - lines, incidents, stop connections, issue reports
//! - `alert` - emergency alert messages (protobuf + JSON)
//! - `error` - leaf-local validation and lookup errors

pub mod alert;
pub mod error;
pub mod transit;
pub mod types;

// Re-export commonly used types at module level
pub use alert::{Alert, AlertList, AlertRequest, AlertResponse};
pub use error::DirectoryError;
pub use transit::{Incident, IssueReport, Line, LineStatus, StopConnection, TransportType};
pub use types::{AirQualityReading, Place, PlaceInput, PlacePatch, PlaceType, Pollutants, TripPlan, Zone};
