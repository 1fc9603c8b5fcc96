//! In-memory backend seeded from a JSON fixture

use crate::api::{FieldServiceApi, ResourceRepository};
use crate::error::{RepositoryError, Result};
use crate::request::{CreateServiceRequest, EquipmentFilters};
use async_trait::async_trait;
use field_primitives::{
    CircuitAssignmentRecord, EntityId, Equipment, EquipmentId, EquipmentKind, EquipmentSummary,
    LocationLevel, OptionItem, PanelId, PanelSummary, ServiceId,
};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Option that belongs to a parent one level up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildItem {
    pub id: EntityId,
    pub label: String,
    pub parent_id: EntityId,
}

/// Seed data for [`InMemoryFieldService`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    #[serde(default)]
    pub clients: Vec<OptionItem>,
    #[serde(default)]
    pub plants: Vec<ChildItem>,
    #[serde(default)]
    pub areas: Vec<ChildItem>,
    #[serde(default)]
    pub locations: Vec<ChildItem>,
    #[serde(default)]
    pub equipment: Vec<Equipment>,
    #[serde(default)]
    pub panels: Vec<PanelSummary>,
    #[serde(default)]
    pub assignments: Vec<CircuitAssignmentRecord>,
}

impl Fixture {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RepositoryError::io(path, e))?;
        Self::from_json(&json)
    }

    fn level(&self, level: LocationLevel) -> &[ChildItem] {
        match level {
            LocationLevel::Client => &[],
            LocationLevel::Plant => &self.plants,
            LocationLevel::Area => &self.areas,
            LocationLevel::Location => &self.locations,
        }
    }

    fn parent_of(&self, level: LocationLevel, id: &EntityId) -> Option<&EntityId> {
        self.level(level)
            .iter()
            .find(|item| &item.id == id)
            .map(|item| &item.parent_id)
    }

    /// Walk from a location up to its client
    fn lineage(&self, location_id: &EntityId) -> EquipmentFilters {
        let area_id = self.parent_of(LocationLevel::Location, location_id).cloned();
        let plant_id = area_id
            .as_ref()
            .and_then(|area| self.parent_of(LocationLevel::Area, area))
            .cloned();
        let client_id = plant_id
            .as_ref()
            .and_then(|plant| self.parent_of(LocationLevel::Plant, plant))
            .cloned();

        EquipmentFilters {
            client_id,
            plant_id,
            area_id,
            location_id: Some(location_id.clone()),
        }
    }
}

/// Backend operations that can be observed and made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListLocations,
    ListEquipment,
    GetEquipment,
    ListCircuitAssignments,
    GetPanel,
    CreateService,
    GetAssignment,
    GetAllAssignments,
    CreateAssignment,
    UpdateAssignment,
    DeleteAssignment,
}

const ASSIGNMENT_PREFIX: &str = "ASG-";

struct Store {
    fixture: Fixture,
    services: Vec<(ServiceId, CreateServiceRequest)>,
    next_service: u64,
    next_assignment: u64,
}

pub struct InMemoryFieldService {
    store: RwLock<Store>,
    failures: Mutex<HashSet<Operation>>,
    calls: Mutex<HashMap<Operation, usize>>,
}

impl InMemoryFieldService {
    pub fn new(fixture: Fixture) -> Self {
        let next_assignment = fixture
            .assignments
            .iter()
            .filter_map(|record| record.id.as_ref())
            .filter_map(|id| id.as_str().strip_prefix(ASSIGNMENT_PREFIX)?.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            store: RwLock::new(Store {
                fixture,
                services: Vec::new(),
                next_service: 1,
                next_assignment,
            }),
            failures: Mutex::new(HashSet::new()),
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Make the next call of `operation` fail with [`RepositoryError::Unavailable`]
    pub fn fail_next(&self, operation: Operation) {
        self.failures.lock().insert(operation);
    }

    /// How many times `operation` has been invoked, failed calls included
    pub fn calls(&self, operation: Operation) -> usize {
        self.calls.lock().get(&operation).copied().unwrap_or(0)
    }

    pub fn created_services(&self) -> Vec<(ServiceId, CreateServiceRequest)> {
        self.store.read().services.clone()
    }

    fn enter(&self, operation: Operation) -> Result<()> {
        *self.calls.lock().entry(operation).or_insert(0) += 1;

        if self.failures.lock().remove(&operation) {
            tracing::debug!(?operation, "injected failure");
            return Err(RepositoryError::Unavailable(format!(
                "{:?} failed",
                operation
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl FieldServiceApi for InMemoryFieldService {
    async fn list_locations(
        &self,
        level: LocationLevel,
        parent: Option<&EntityId>,
    ) -> Result<Vec<OptionItem>> {
        self.enter(Operation::ListLocations)?;
        let store = self.store.read();

        match (level, parent) {
            (LocationLevel::Client, _) => Ok(store.fixture.clients.clone()),
            (_, None) => Err(RepositoryError::Rejected(format!(
                "{} options require a parent",
                level
            ))),
            (_, Some(parent)) => Ok(store
                .fixture
                .level(level)
                .iter()
                .filter(|item| &item.parent_id == parent)
                .map(|item| OptionItem::new(item.id.clone(), item.label.clone()))
                .collect()),
        }
    }

    async fn list_equipment(
        &self,
        kind: EquipmentKind,
        filters: &EquipmentFilters,
    ) -> Result<Vec<EquipmentSummary>> {
        self.enter(Operation::ListEquipment)?;
        let store = self.store.read();

        let in_scope = |location_id: &EntityId| {
            let lineage = store.fixture.lineage(location_id);
            let matches = |wanted: &Option<EntityId>, actual: &Option<EntityId>| {
                wanted.is_none() || wanted == actual
            };
            matches(&filters.client_id, &lineage.client_id)
                && matches(&filters.plant_id, &lineage.plant_id)
                && matches(&filters.area_id, &lineage.area_id)
                && matches(&filters.location_id, &lineage.location_id)
        };

        Ok(store
            .fixture
            .equipment
            .iter()
            .filter(|equipment| equipment.kind() == kind)
            .filter(|equipment| in_scope(equipment.location_id()))
            .map(Equipment::summary)
            .collect())
    }

    async fn get_equipment(&self, id: &EquipmentId, kind: EquipmentKind) -> Result<Equipment> {
        self.enter(Operation::GetEquipment)?;
        self.store
            .read()
            .fixture
            .equipment
            .iter()
            .find(|equipment| equipment.id() == id && equipment.kind() == kind)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("equipment", id))
    }

    async fn list_circuit_assignments(
        &self,
        equipment_id: &EquipmentId,
    ) -> Result<Vec<CircuitAssignmentRecord>> {
        self.enter(Operation::ListCircuitAssignments)?;
        Ok(self
            .store
            .read()
            .fixture
            .assignments
            .iter()
            .filter(|record| &record.equipment_id == equipment_id)
            .cloned()
            .collect())
    }

    async fn get_panel(&self, panel_id: &PanelId) -> Result<PanelSummary> {
        self.enter(Operation::GetPanel)?;
        self.store
            .read()
            .fixture
            .panels
            .iter()
            .find(|panel| &panel.id == panel_id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("panel", panel_id))
    }

    async fn create_service(&self, request: &CreateServiceRequest) -> Result<ServiceId> {
        self.enter(Operation::CreateService)?;
        let mut store = self.store.write();

        let id = EntityId::new(format!("SRV-{}", store.next_service));
        store.next_service += 1;
        store.services.push((id.clone(), request.clone()));

        tracing::info!(service_id = %id, service_type = %request.service_type, "service created");
        Ok(id)
    }
}

#[async_trait]
impl ResourceRepository<CircuitAssignmentRecord> for InMemoryFieldService {
    async fn get_by_id(&self, id: &EntityId) -> Result<CircuitAssignmentRecord> {
        self.enter(Operation::GetAssignment)?;
        self.store
            .read()
            .fixture
            .assignments
            .iter()
            .find(|record| record.id.as_ref() == Some(id))
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("circuit assignment", id))
    }

    async fn get_all(&self) -> Result<Vec<CircuitAssignmentRecord>> {
        self.enter(Operation::GetAllAssignments)?;
        Ok(self.store.read().fixture.assignments.clone())
    }

    async fn create(&self, mut record: CircuitAssignmentRecord) -> Result<CircuitAssignmentRecord> {
        self.enter(Operation::CreateAssignment)?;
        let mut store = self.store.write();

        if !store.fixture.panels.iter().any(|p| p.id == record.panel_id) {
            return Err(RepositoryError::Rejected(format!(
                "unknown panel '{}'",
                record.panel_id
            )));
        }

        // Fixture ids are not guaranteed to follow the counter
        let id = loop {
            let candidate = EntityId::new(format!("{ASSIGNMENT_PREFIX}{}", store.next_assignment));
            store.next_assignment += 1;
            let taken = store
                .fixture
                .assignments
                .iter()
                .any(|r| r.id.as_ref() == Some(&candidate));
            if !taken {
                break candidate;
            }
        };
        record.id = Some(id);
        store.fixture.assignments.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: &EntityId,
        mut record: CircuitAssignmentRecord,
    ) -> Result<CircuitAssignmentRecord> {
        self.enter(Operation::UpdateAssignment)?;
        let mut store = self.store.write();

        let slot = store
            .fixture
            .assignments
            .iter_mut()
            .find(|existing| existing.id.as_ref() == Some(id))
            .ok_or_else(|| RepositoryError::not_found("circuit assignment", id))?;

        record.id = Some(id.clone());
        *slot = record.clone();
        Ok(record)
    }

    async fn delete(&self, id: &EntityId) -> Result<()> {
        self.enter(Operation::DeleteAssignment)?;
        let mut store = self.store.write();

        let before = store.fixture.assignments.len();
        store
            .fixture
            .assignments
            .retain(|record| record.id.as_ref() != Some(id));

        if store.fixture.assignments.len() == before {
            return Err(RepositoryError::not_found("circuit assignment", id));
        }
        Ok(())
    }
}
