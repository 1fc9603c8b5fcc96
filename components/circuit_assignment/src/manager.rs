use crate::error::{AssignmentError, OutOfRangeError};
use crate::hydrate::{ExistingAssignment, Hydration, HydrationOutcome, HydrationRequest};
use field_primitives::{AssignmentId, CircuitAssignmentRecord, CircuitNumber, EquipmentId, PanelId};
use field_repository::{FieldServiceApi, LoadError, ResourceRepository};
use std::collections::BTreeSet;

/// Lifecycle of the draft being edited
///
/// A successful commit returns the stored record and starts a fresh
/// `Draft`; a failed one leaves the manager `Rejected` with the selection
/// intact so it can be retried or edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentStatus {
    Draft,
    Submitted,
    Rejected(LoadError),
}

#[derive(Debug)]
pub struct CircuitAssignmentManager {
    panel_id: Option<PanelId>,
    selected: BTreeSet<CircuitNumber>,
    /// Stored assignment the draft was loaded from, if any
    editing: Option<AssignmentId>,
    status: AssignmentStatus,

    equipment_id: Option<EquipmentId>,
    existing: Vec<ExistingAssignment>,
    loading: bool,
    error: Option<LoadError>,
    generation: u64,
}

impl Default for CircuitAssignmentManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CircuitAssignmentManager {
    pub fn new() -> Self {
        Self {
            panel_id: None,
            selected: BTreeSet::new(),
            editing: None,
            status: AssignmentStatus::Draft,
            equipment_id: None,
            existing: Vec::new(),
            loading: false,
            error: None,
            generation: 0,
        }
    }

    // ========================================================================
    // Draft
    // ========================================================================

    pub fn panel_id(&self) -> Option<&PanelId> {
        self.panel_id.as_ref()
    }

    pub fn selected(&self) -> &BTreeSet<CircuitNumber> {
        &self.selected
    }

    pub fn editing(&self) -> Option<&AssignmentId> {
        self.editing.as_ref()
    }

    pub fn status(&self) -> &AssignmentStatus {
        &self.status
    }

    /// Change the supplying panel; the circuit selection is kept
    pub fn select_panel(&mut self, panel_id: Option<PanelId>) {
        self.touch();
        self.panel_id = panel_id;
    }

    /// Flip membership of circuit `n`, returning whether it is now selected
    pub fn toggle_circuit(&mut self, n: i64) -> Result<bool, OutOfRangeError> {
        let circuit = CircuitNumber::new(n).map_err(|_| OutOfRangeError(n))?;
        self.touch();

        if self.selected.remove(&circuit) {
            Ok(false)
        } else {
            self.selected.insert(circuit);
            Ok(true)
        }
    }

    pub fn select_all(&mut self) {
        self.touch();
        self.selected = CircuitNumber::all().collect();
    }

    pub fn clear(&mut self) {
        self.touch();
        self.selected.clear();
    }

    pub fn range_text(&self) -> String {
        range_codec::encode(self.selected.iter().map(|c| c.value()))
    }

    pub fn is_valid(&self) -> bool {
        self.panel_id.is_some() && !self.selected.is_empty()
    }

    /// Discard the draft and start over
    pub fn new_draft(&mut self) {
        self.panel_id = None;
        self.selected.clear();
        self.editing = None;
        self.status = AssignmentStatus::Draft;
    }

    /// Load a hydrated assignment into the draft so the next commit updates it
    pub fn edit_existing(&mut self, assignment_id: &AssignmentId) -> Result<(), AssignmentError> {
        let existing = self
            .existing
            .iter()
            .find(|e| e.record.id.as_ref() == Some(assignment_id))
            .ok_or_else(|| AssignmentError::UnknownAssignment(assignment_id.to_string()))?;

        self.panel_id = Some(existing.record.panel_id.clone());
        self.selected = existing.record.circuits.iter().copied().collect();
        self.editing = Some(assignment_id.clone());
        self.status = AssignmentStatus::Draft;
        Ok(())
    }

    /// Editing a rejected draft makes it a draft again
    fn touch(&mut self) {
        if matches!(self.status, AssignmentStatus::Rejected(_)) {
            self.status = AssignmentStatus::Draft;
        }
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Create or update the draft for `equipment_id`
    pub async fn commit(
        &mut self,
        repository: &dyn ResourceRepository<CircuitAssignmentRecord>,
        equipment_id: &EquipmentId,
    ) -> Result<CircuitAssignmentRecord, AssignmentError> {
        let panel_id = match (&self.panel_id, self.selected.is_empty()) {
            (Some(panel_id), false) => panel_id.clone(),
            _ => return Err(AssignmentError::Incomplete),
        };

        let record = CircuitAssignmentRecord {
            id: self.editing.clone(),
            equipment_id: equipment_id.clone(),
            panel_id,
            circuits: self.selected.iter().copied().collect(),
        };

        self.status = AssignmentStatus::Submitted;
        tracing::info!(
            equipment_id = %equipment_id,
            circuits = %self.range_text(),
            update = self.editing.is_some(),
            "submitting circuit assignment"
        );

        let result = match &self.editing {
            Some(id) => repository.update(id, record).await,
            None => repository.create(record).await,
        };

        match result {
            Ok(stored) => {
                tracing::info!(assignment_id = ?stored.id, "circuit assignment committed");
                self.new_draft();
                Ok(stored)
            }
            Err(e) => {
                let error = LoadError::new("saving circuit assignment", &e);
                tracing::warn!(%error, "circuit assignment rejected");
                self.status = AssignmentStatus::Rejected(error.clone());
                Err(AssignmentError::Rejected(error))
            }
        }
    }

    /// Delete a stored assignment and drop it from the hydrated list
    pub async fn remove_existing(
        &mut self,
        repository: &dyn ResourceRepository<CircuitAssignmentRecord>,
        assignment_id: &AssignmentId,
    ) -> Result<(), AssignmentError> {
        repository
            .delete(assignment_id)
            .await
            .map_err(|e| {
                AssignmentError::Rejected(LoadError::new("deleting circuit assignment", &e))
            })?;

        self.existing
            .retain(|e| e.record.id.as_ref() != Some(assignment_id));
        if self.editing.as_ref() == Some(assignment_id) {
            self.new_draft();
        }
        Ok(())
    }

    // ========================================================================
    // Hydration
    // ========================================================================

    pub fn equipment_id(&self) -> Option<&EquipmentId> {
        self.equipment_id.as_ref()
    }

    pub fn existing(&self) -> &[ExistingAssignment] {
        &self.existing
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&LoadError> {
        self.error.as_ref()
    }

    /// Switch to `equipment_id` and issue a load of its stored assignments
    pub fn begin_hydrate(&mut self, equipment_id: EquipmentId) -> HydrationRequest {
        self.generation += 1;
        self.equipment_id = Some(equipment_id.clone());
        self.existing.clear();
        self.loading = true;
        self.error = None;

        HydrationRequest {
            equipment_id,
            generation: self.generation,
        }
    }

    pub fn finish_hydrate(&mut self, outcome: HydrationOutcome) -> Hydration {
        if outcome.generation != self.generation
            || self.equipment_id.as_ref() != Some(&outcome.equipment_id)
        {
            tracing::debug!(equipment_id = %outcome.equipment_id, "discarding stale assignments");
            return Hydration::StaleResultDiscarded;
        }

        self.loading = false;
        match outcome.result {
            Ok(existing) => {
                let count = existing.len();
                self.existing = existing;
                Hydration::Loaded { count }
            }
            Err(error) => {
                tracing::warn!(%error, "existing assignments failed to load");
                self.error = Some(error.clone());
                Hydration::Failed(error)
            }
        }
    }

    /// Begin, run and finish a hydration in one go
    pub async fn hydrate(
        &mut self,
        api: &dyn FieldServiceApi,
        equipment_id: EquipmentId,
    ) -> Hydration {
        let request = self.begin_hydrate(equipment_id);
        let outcome = request.run(api).await;
        self.finish_hydrate(outcome)
    }

    /// Forget everything, including hydrated assignments
    pub fn reset(&mut self) {
        self.new_draft();
        self.generation += 1;
        self.equipment_id = None;
        self.existing.clear();
        self.loading = false;
        self.error = None;
    }
}
