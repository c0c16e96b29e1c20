//! Transit mesh library
//!
//! Exposes the leaf services, the orchestrator and their plumbing for the
//! binaries and for integration testing.

pub mod domain;
pub mod infra;
pub mod io;
pub mod services;
