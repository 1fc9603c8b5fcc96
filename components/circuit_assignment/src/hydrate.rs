//! Loading the assignments already stored for an equipment

use field_primitives::{CircuitAssignmentRecord, EquipmentId, PanelSummary};
use field_repository::{FieldServiceApi, LoadError};
use futures::future::join_all;

/// Panel details for an existing assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelInfo {
    Loaded(PanelSummary),
    Failed(LoadError),
}

impl PanelInfo {
    pub fn name(&self) -> Option<&str> {
        match self {
            PanelInfo::Loaded(panel) => Some(&panel.name),
            PanelInfo::Failed(_) => None,
        }
    }
}

/// A stored assignment ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingAssignment {
    pub record: CircuitAssignmentRecord,
    pub panel: PanelInfo,
    pub range_text: String,
}

impl ExistingAssignment {
    fn new(record: CircuitAssignmentRecord, panel: PanelInfo) -> Self {
        let range_text = range_codec::encode(record.circuits.iter().map(|c| c.value()));
        Self {
            record,
            panel,
            range_text,
        }
    }
}

/// Ticket for loading an equipment's assignments
#[derive(Debug, Clone)]
pub struct HydrationRequest {
    pub(crate) equipment_id: EquipmentId,
    pub(crate) generation: u64,
}

impl HydrationRequest {
    pub fn equipment_id(&self) -> &EquipmentId {
        &self.equipment_id
    }

    /// List the assignments, then load every referenced panel concurrently
    ///
    /// A failing panel only marks its own assignment.
    pub async fn run(self, api: &dyn FieldServiceApi) -> HydrationOutcome {
        let result = match api.list_circuit_assignments(&self.equipment_id).await {
            Ok(records) => {
                let panels =
                    join_all(records.iter().map(|record| api.get_panel(&record.panel_id))).await;

                Ok(records
                    .into_iter()
                    .zip(panels)
                    .map(|(record, panel)| {
                        let panel = match panel {
                            Ok(summary) => PanelInfo::Loaded(summary),
                            Err(e) => {
                                tracing::warn!(
                                    panel_id = %record.panel_id,
                                    error = %e,
                                    "panel failed to load"
                                );
                                PanelInfo::Failed(LoadError::new(
                                    format!("loading panel {}", record.panel_id),
                                    &e,
                                ))
                            }
                        };
                        ExistingAssignment::new(record, panel)
                    })
                    .collect())
            }
            Err(e) => Err(LoadError::new(
                format!("loading assignments of {}", self.equipment_id),
                &e,
            )),
        };

        HydrationOutcome {
            equipment_id: self.equipment_id,
            generation: self.generation,
            result,
        }
    }
}

#[derive(Debug)]
pub struct HydrationOutcome {
    pub(crate) equipment_id: EquipmentId,
    pub(crate) generation: u64,
    pub(crate) result: Result<Vec<ExistingAssignment>, LoadError>,
}

/// What finishing a hydration did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hydration {
    Loaded { count: usize },
    Failed(LoadError),
    StaleResultDiscarded,
}
