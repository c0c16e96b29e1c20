//! Leaf-local errors raised by the directory stores

use serde_json::{json, Map, Value};
use thiserror::Error;

/// A string that does not name any variant of a closed enum
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self { kind, value: value.to_string() }
    }
}

/// Validation and lookup failures owned by a directory
///
/// The owning service maps `NotFound` to 404 and everything else to 400.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str, id_field: &'static str, id: String },

    #[error("Missing required fields")]
    MissingFields { required: Vec<&'static str> },

    #[error("Invalid status")]
    InvalidStatus { valid: Vec<&'static str> },

    #[error("{0}")]
    Invalid(String),
}

impl DirectoryError {
    pub fn not_found(entity: &'static str, id_field: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound { entity, id_field, id: id.into() }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// JSON error body in the shape REST callers expect
    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        body.insert("error".to_string(), Value::String(self.to_string()));
        match self {
            Self::NotFound { id_field, id, .. } => {
                body.insert((*id_field).to_string(), Value::String(id.clone()));
            }
            Self::MissingFields { required } => {
                body.insert("required".to_string(), json!(required));
            }
            Self::InvalidStatus { valid } => {
                body.insert("valid_statuses".to_string(), json!(valid));
            }
            Self::Invalid(_) => {}
        }
        Value::Object(body)
    }
}
