use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier assigned by the backend
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Aliases for clarity at API boundaries
// ============================================================================

pub type ClientId = EntityId;
pub type PlantId = EntityId;
pub type AreaId = EntityId;
pub type LocationId = EntityId;
pub type EquipmentId = EntityId;
pub type PanelId = EntityId;
pub type ProjectId = EntityId;
pub type ServiceId = EntityId;
pub type AssignmentId = EntityId;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_plain_string() {
        let id = EntityId::new("C1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"C1\"");

        let back: EntityId = serde_json::from_str("\"C1\"").unwrap();
        assert_eq!(back, id);
    }
}
