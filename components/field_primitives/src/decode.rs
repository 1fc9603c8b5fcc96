//! Lenient decoding of backend enum strings
//!
//! The deployed backend sometimes sends values this console does not know.
//! Rather than failing the whole record, the value falls back to a default
//! and the fallback is reported as a [`DecodeWarning`] the caller can log.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeWarning {
    pub field: &'static str,
    pub raw: String,
    pub fallback: String,
}

impl fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown {} '{}', falling back to {}",
            self.field, self.raw, self.fallback
        )
    }
}

/// A decoded value, possibly produced by a fallback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<T> {
    pub value: T,
    pub warning: Option<DecodeWarning>,
}

impl<T> Decoded<T> {
    pub fn exact(value: T) -> Self {
        Self {
            value,
            warning: None,
        }
    }

    pub fn fallback(value: T, warning: DecodeWarning) -> Self {
        Self {
            value,
            warning: Some(warning),
        }
    }

    pub fn is_exact(&self) -> bool {
        self.warning.is_none()
    }

    /// Take the value, emitting the warning (if any) through tracing
    pub fn into_value_logged(self) -> T {
        if let Some(warning) = &self.warning {
            tracing::warn!(field = warning.field, raw = %warning.raw, "{}", warning);
        }
        self.value
    }
}
