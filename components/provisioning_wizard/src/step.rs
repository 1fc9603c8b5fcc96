use field_primitives::{
    EquipmentId, EquipmentKind, FieldError, ProjectId, ServiceType, SupervisorName,
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepId {
    ServiceType,
    Equipment,
    Confirmation,
}

impl StepId {
    /// Step order of the flow
    pub const ALL: [StepId; 3] = [StepId::ServiceType, StepId::Equipment, StepId::Confirmation];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepId::ServiceType => "service-type",
            StepId::Equipment => "equipment",
            StepId::Confirmation => "confirmation",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validity {
    Valid,
    Invalid(Vec<FieldError>),
}

impl Validity {
    fn from_errors(errors: Vec<FieldError>) -> Self {
        if errors.is_empty() {
            Validity::Valid
        } else {
            Validity::Invalid(errors)
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Validity::Valid)
    }

    pub fn errors(&self) -> &[FieldError] {
        match self {
            Validity::Valid => &[],
            Validity::Invalid(errors) => errors,
        }
    }
}

// ============================================================================
// Step payloads
// ============================================================================
//
// Every field is optional. Merging a payload replaces the fields it sets and
// keeps the rest.

fn merge_field<T>(current: &mut Option<T>, update: Option<T>) {
    if update.is_some() {
        *current = update;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTypeData {
    pub service_type: Option<ServiceType>,
}

impl ServiceTypeData {
    fn merge(&mut self, update: ServiceTypeData) {
        merge_field(&mut self.service_type, update.service_type);
    }

    fn validity(&self) -> Validity {
        let mut errors = Vec::new();
        if self.service_type.is_none() {
            errors.push(FieldError::new("serviceType", "choose a service type"));
        }
        Validity::from_errors(errors)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentData {
    pub equipment_id: Option<EquipmentId>,
    pub equipment_kind: Option<EquipmentKind>,
}

impl EquipmentData {
    fn merge(&mut self, update: EquipmentData) {
        merge_field(&mut self.equipment_id, update.equipment_id);
        merge_field(&mut self.equipment_kind, update.equipment_kind);
    }

    /// Circuit assignments are shown on this step but do not gate it
    fn validity(&self) -> Validity {
        let mut errors = Vec::new();
        if self.equipment_id.is_none() {
            errors.push(FieldError::new("equipmentId", "choose an equipment"));
        }
        if self.equipment_kind.is_none() {
            errors.push(FieldError::new("equipmentType", "choose cabinet or panel"));
        }
        Validity::from_errors(errors)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationData {
    /// Raw input; checked against [`SupervisorName`] rules on validation
    pub supervisor_name: Option<String>,
    pub project_id: Option<ProjectId>,
    pub observations: Option<String>,
}

impl ConfirmationData {
    fn merge(&mut self, update: ConfirmationData) {
        merge_field(&mut self.supervisor_name, update.supervisor_name);
        merge_field(&mut self.project_id, update.project_id);
        merge_field(&mut self.observations, update.observations);
    }

    fn validity(&self) -> Validity {
        let error = match self.supervisor_name.as_deref().map(SupervisorName::new) {
            None => Some(FieldError::new("supervisorName", "supervisor name is required")),
            Some(Err(e)) => Some(FieldError::from_validation("supervisorName", &e)),
            Some(Ok(_)) => None,
        };
        Validity::from_errors(error.into_iter().collect())
    }
}

/// Partial input for one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepPayload {
    ServiceType(ServiceTypeData),
    Equipment(EquipmentData),
    Confirmation(ConfirmationData),
}

impl StepPayload {
    pub fn step(&self) -> StepId {
        match self {
            StepPayload::ServiceType(_) => StepId::ServiceType,
            StepPayload::Equipment(_) => StepId::Equipment,
            StepPayload::Confirmation(_) => StepId::Confirmation,
        }
    }

    pub fn service_type(service_type: ServiceType) -> Self {
        StepPayload::ServiceType(ServiceTypeData {
            service_type: Some(service_type),
        })
    }

    pub fn supervisor_name(name: impl Into<String>) -> Self {
        StepPayload::Confirmation(ConfirmationData {
            supervisor_name: Some(name.into()),
            ..Default::default()
        })
    }
}

/// Everything the steps have collected so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepData {
    pub service_type: ServiceTypeData,
    pub equipment: EquipmentData,
    pub confirmation: ConfirmationData,
}

impl StepData {
    pub(crate) fn merge(&mut self, payload: StepPayload) {
        match payload {
            StepPayload::ServiceType(update) => self.service_type.merge(update),
            StepPayload::Equipment(update) => self.equipment.merge(update),
            StepPayload::Confirmation(update) => self.confirmation.merge(update),
        }
    }

    pub fn validity(&self, step: StepId) -> Validity {
        match step {
            StepId::ServiceType => self.service_type.validity(),
            StepId::Equipment => self.equipment.validity(),
            StepId::Confirmation => self.confirmation.validity(),
        }
    }
}

/// One line of the step overview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepSummary {
    pub index: usize,
    pub step: StepId,
    pub valid: bool,
    pub current: bool,
}
