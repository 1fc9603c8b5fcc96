use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Kind of work a service order represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceType {
    Maintenance,
    Inspection,
    RaiseObservation,
}

impl ServiceType {
    pub const ALL: [ServiceType; 3] = [
        ServiceType::Maintenance,
        ServiceType::Inspection,
        ServiceType::RaiseObservation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Maintenance => "MAINTENANCE",
            ServiceType::Inspection => "INSPECTION",
            ServiceType::RaiseObservation => "RAISE_OBSERVATION",
        }
    }
}

impl FromStr for ServiceType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownServiceType(s.to_string()))
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
