//! Domain primitives for the field-service console
//!
//! Newtypes validate on construction and keep their inner value private,
//! so anything holding a [`SupervisorName`] or [`CircuitNumber`] is known
//! to be well formed.

mod circuit;
mod decode;
mod equipment;
mod error;
mod ids;
mod location;
mod service;
mod supervisor;

pub use circuit::CircuitNumber;
pub use decode::{DecodeWarning, Decoded};
pub use equipment::{
    CabinetDetail, CircuitAssignmentRecord, Equipment, EquipmentKind, EquipmentSummary,
    PanelDetail, PanelSummary,
};
pub use error::{FieldError, ValidationError};
pub use ids::{
    AreaId, AssignmentId, ClientId, EntityId, EquipmentId, LocationId, PanelId, PlantId,
    ProjectId, ServiceId,
};
pub use location::{LocationLevel, OptionItem};
pub use service::ServiceType;
pub use supervisor::SupervisorName;
