use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("circuit {0} is outside 1-30")]
    CircuitOutOfRange(i64),

    #[error("supervisor name must be 3-100 characters, got {0}")]
    SupervisorNameLength(usize),

    #[error("supervisor name may only contain letters and spaces")]
    SupervisorNamePattern,

    #[error("unknown service type: {0}")]
    UnknownServiceType(String),

    #[error("unknown equipment kind: {0}")]
    UnknownEquipmentKind(String),

    #[error("unknown location level: {0}")]
    UnknownLocationLevel(String),
}

/// Inline feedback for a single input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn from_validation(field: impl Into<String>, error: &ValidationError) -> Self {
        Self::new(field, error.to_string())
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}
