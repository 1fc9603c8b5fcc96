use field_primitives::{
    AreaId, ClientId, EquipmentId, EquipmentKind, LocationId, PlantId, ProjectId, ServiceType,
    SupervisorName,
};
use serde::{Deserialize, Serialize};

/// Location scope applied to an equipment listing; unset fields do not filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<ClientId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plant_id: Option<PlantId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_id: Option<AreaId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<LocationId>,
}

/// Everything the wizard collected, flattened into one creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequest {
    pub service_type: ServiceType,
    pub equipment_id: EquipmentId,
    pub equipment_type: EquipmentKind,
    pub supervisor_name: SupervisorName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
    #[serde(flatten)]
    pub scope: EquipmentFilters,
}
