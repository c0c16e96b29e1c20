//! Infrastructure - configuration, logging and metrics
//!
//! - `config` - Application configuration (TOML loading, defaults)
//! - `logging` - tracing subscriber setup
//! - `metrics` - Lock-free orchestrator counters
//! - `shutdown` - Ctrl+C to watch-channel bridge

pub mod config;
pub mod logging;
pub mod metrics;
pub mod shutdown;

// Re-export commonly used types
pub use config::{AirMode, Config, LogFormat};
pub use logging::init_logging;
pub use metrics::Metrics;
pub use shutdown::ctrl_c_shutdown;
