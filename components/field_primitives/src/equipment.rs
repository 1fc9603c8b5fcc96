//! Electrical equipment: cabinets and distribution panels
//!
//! The backend treats a cabinet and a panel as interchangeable records that
//! differ in a few fields. Here they are a tagged variant so kind-specific
//! fields can only be read after matching on the kind.

use crate::circuit::CircuitNumber;
use crate::decode::{DecodeWarning, Decoded};
use crate::error::ValidationError;
use crate::ids::{AssignmentId, EntityId, EquipmentId, LocationId, PanelId};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentKind {
    Cabinet,
    Panel,
}

impl EquipmentKind {
    pub const ALL: [EquipmentKind; 2] = [EquipmentKind::Cabinet, EquipmentKind::Panel];

    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentKind::Cabinet => "CABINET",
            EquipmentKind::Panel => "PANEL",
        }
    }

    /// Decode a backend string, falling back to `Cabinet` for unknown values
    ///
    /// The fallback mirrors what the deployed backend integration has always
    /// done; it is reported instead of applied silently.
    pub fn decode(raw: &str) -> Decoded<EquipmentKind> {
        match raw.parse() {
            Ok(kind) => Decoded::exact(kind),
            Err(_) => Decoded::fallback(
                EquipmentKind::Cabinet,
                DecodeWarning {
                    field: "equipment kind",
                    raw: raw.to_string(),
                    fallback: EquipmentKind::Cabinet.to_string(),
                },
            ),
        }
    }
}

impl FromStr for EquipmentKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownEquipmentKind(s.to_string()))
    }
}

impl fmt::Display for EquipmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Row in an equipment listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentSummary {
    pub id: EquipmentId,
    pub name: String,
    #[serde(deserialize_with = "lenient_kind")]
    pub kind: EquipmentKind,
    pub location_id: LocationId,
}

/// Listings come straight from the backend and may carry kinds this console
/// does not know yet
fn lenient_kind<'de, D>(deserializer: D) -> Result<EquipmentKind, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(EquipmentKind::decode(&raw).into_value_logged())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CabinetDetail {
    pub id: EquipmentId,
    pub name: String,
    pub cabinet_type_id: EntityId,
    pub location_id: LocationId,
    #[serde(default)]
    pub tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelDetail {
    pub id: EquipmentId,
    pub name: String,
    pub panel_type_id: EntityId,
    pub location_id: LocationId,
    #[serde(default)]
    pub tag: Option<String>,
}

/// Full equipment record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Equipment {
    Cabinet(CabinetDetail),
    Panel(PanelDetail),
}

impl Equipment {
    pub fn kind(&self) -> EquipmentKind {
        match self {
            Equipment::Cabinet(_) => EquipmentKind::Cabinet,
            Equipment::Panel(_) => EquipmentKind::Panel,
        }
    }

    pub fn id(&self) -> &EquipmentId {
        match self {
            Equipment::Cabinet(cabinet) => &cabinet.id,
            Equipment::Panel(panel) => &panel.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Equipment::Cabinet(cabinet) => &cabinet.name,
            Equipment::Panel(panel) => &panel.name,
        }
    }

    pub fn location_id(&self) -> &LocationId {
        match self {
            Equipment::Cabinet(cabinet) => &cabinet.location_id,
            Equipment::Panel(panel) => &panel.location_id,
        }
    }

    /// Cabinet type or panel type, depending on the kind
    pub fn type_id(&self) -> &EntityId {
        match self {
            Equipment::Cabinet(cabinet) => &cabinet.cabinet_type_id,
            Equipment::Panel(panel) => &panel.panel_type_id,
        }
    }

    pub fn summary(&self) -> EquipmentSummary {
        EquipmentSummary {
            id: self.id().clone(),
            name: self.name().to_string(),
            kind: self.kind(),
            location_id: self.location_id().clone(),
        }
    }
}

/// Distribution panel as seen from a circuit assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelSummary {
    pub id: PanelId,
    pub name: String,
}

/// Circuits of one panel feeding one piece of equipment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitAssignmentRecord {
    /// `None` until the backend has stored the record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AssignmentId>,
    pub equipment_id: EquipmentId,
    pub panel_id: PanelId,
    pub circuits: Vec<CircuitNumber>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cabinet() -> Equipment {
        Equipment::Cabinet(CabinetDetail {
            id: EntityId::new("E1"),
            name: "Main cabinet".to_string(),
            cabinet_type_id: EntityId::new("CT-1"),
            location_id: EntityId::new("L1"),
            tag: None,
        })
    }

    #[test]
    fn decode_known_kind_is_exact() {
        let decoded = EquipmentKind::decode("PANEL");
        assert_eq!(decoded.value, EquipmentKind::Panel);
        assert!(decoded.is_exact());
    }

    #[test]
    fn decode_unknown_kind_falls_back_with_warning() {
        let decoded = EquipmentKind::decode("TRANSFORMER");
        assert_eq!(decoded.value, EquipmentKind::Cabinet);

        let warning = decoded.warning.unwrap();
        assert_eq!(warning.raw, "TRANSFORMER");
        assert_eq!(warning.fallback, "CABINET");
    }

    #[test]
    fn type_id_follows_the_kind() {
        let panel = Equipment::Panel(PanelDetail {
            id: EntityId::new("E2"),
            name: "Panel A".to_string(),
            panel_type_id: EntityId::new("PT-9"),
            location_id: EntityId::new("L1"),
            tag: None,
        });

        assert_eq!(cabinet().type_id().as_str(), "CT-1");
        assert_eq!(panel.type_id().as_str(), "PT-9");
        assert_eq!(panel.kind(), EquipmentKind::Panel);
    }

    #[test]
    fn equipment_serializes_with_kind_tag() {
        let json = serde_json::to_value(cabinet()).unwrap();
        assert_eq!(json["kind"], "CABINET");
        assert_eq!(json["cabinetTypeId"], "CT-1");

        let back: Equipment = serde_json::from_value(json).unwrap();
        assert_eq!(back, cabinet());
    }

    #[test]
    fn listing_with_unknown_kind_still_deserializes() {
        let summary: EquipmentSummary = serde_json::from_str(
            r#"{"id":"E7","name":"Transformer","kind":"TRANSFORMER","locationId":"L1"}"#,
        )
        .unwrap();
        assert_eq!(summary.kind, EquipmentKind::Cabinet);
    }

    #[test]
    fn summary_keeps_identity() {
        let summary = cabinet().summary();
        assert_eq!(summary.id.as_str(), "E1");
        assert_eq!(summary.kind, EquipmentKind::Cabinet);
    }
}
