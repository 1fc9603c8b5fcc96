use crate::error::Result;
use crate::request::{CreateServiceRequest, EquipmentFilters};
use async_trait::async_trait;
use field_primitives::{
    CircuitAssignmentRecord, EntityId, Equipment, EquipmentId, EquipmentKind, EquipmentSummary,
    LocationLevel, OptionItem, PanelId, PanelSummary, ServiceId,
};

/// Plain create/read/update/delete over one kind of record
#[async_trait]
pub trait ResourceRepository<T>: Send + Sync
where
    T: Send + 'static,
{
    async fn get_by_id(&self, id: &EntityId) -> Result<T>;
    async fn get_all(&self) -> Result<Vec<T>>;

    /// Store a new record, returning it as stored (with its assigned id)
    async fn create(&self, record: T) -> Result<T>;
    async fn update(&self, id: &EntityId, record: T) -> Result<T>;
    async fn delete(&self, id: &EntityId) -> Result<()>;
}

/// Read and create operations the provisioning core needs from the backend
#[async_trait]
pub trait FieldServiceApi: Send + Sync {
    /// Options for one hierarchy level; `parent` is `None` only for clients
    async fn list_locations(
        &self,
        level: LocationLevel,
        parent: Option<&EntityId>,
    ) -> Result<Vec<OptionItem>>;

    async fn list_equipment(
        &self,
        kind: EquipmentKind,
        filters: &EquipmentFilters,
    ) -> Result<Vec<EquipmentSummary>>;

    async fn get_equipment(&self, id: &EquipmentId, kind: EquipmentKind) -> Result<Equipment>;

    async fn list_circuit_assignments(
        &self,
        equipment_id: &EquipmentId,
    ) -> Result<Vec<CircuitAssignmentRecord>>;

    async fn get_panel(&self, panel_id: &PanelId) -> Result<PanelSummary>;

    async fn create_service(&self, request: &CreateServiceRequest) -> Result<ServiceId>;
}
