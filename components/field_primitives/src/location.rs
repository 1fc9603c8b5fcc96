use crate::error::ValidationError;
use crate::ids::EntityId;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// One rung of the client → plant → area → location hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationLevel {
    Client,
    Plant,
    Area,
    Location,
}

impl LocationLevel {
    /// Root first
    pub const ALL: [LocationLevel; 4] = [
        LocationLevel::Client,
        LocationLevel::Plant,
        LocationLevel::Area,
        LocationLevel::Location,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            LocationLevel::Client => "client",
            LocationLevel::Plant => "plant",
            LocationLevel::Area => "area",
            LocationLevel::Location => "location",
        }
    }

    pub fn parent(&self) -> Option<LocationLevel> {
        match self {
            LocationLevel::Client => None,
            LocationLevel::Plant => Some(LocationLevel::Client),
            LocationLevel::Area => Some(LocationLevel::Plant),
            LocationLevel::Location => Some(LocationLevel::Area),
        }
    }

    pub fn child(&self) -> Option<LocationLevel> {
        match self {
            LocationLevel::Client => Some(LocationLevel::Plant),
            LocationLevel::Plant => Some(LocationLevel::Area),
            LocationLevel::Area => Some(LocationLevel::Location),
            LocationLevel::Location => None,
        }
    }
}

impl FromStr for LocationLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.key() == s)
            .ok_or_else(|| ValidationError::UnknownLocationLevel(s.to_string()))
    }
}

impl fmt::Display for LocationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A selectable entry in a dropdown-style list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    pub id: EntityId,
    pub label: String,
}

impl OptionItem {
    pub fn new(id: impl Into<EntityId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}
