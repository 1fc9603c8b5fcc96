use crate::error::{NavigationError, SubmitError, WizardError};
use crate::event::WizardEvent;
use crate::step::{StepData, StepId, StepPayload, StepSummary, Validity};
use cascading_selector::{
    location_selector, CascadingSelector, LoadOutcome, PendingLoad, Resolution,
};
use circuit_assignment::{CircuitAssignmentManager, Hydration};
use field_primitives::{
    EntityId, Equipment, EquipmentId, EquipmentKind, EquipmentSummary, FieldError, LocationLevel,
    ServiceId, SupervisorName,
};
use field_repository::{CreateServiceRequest, EquipmentFilters, FieldServiceApi, LoadError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

/// One "create service" session
///
/// Owns the step data, the location cascade and the circuit manager for the
/// equipment being serviced. Nothing is shared between sessions; drop the
/// wizard (or [`cancel`](Self::cancel) it) to discard everything.
pub struct ProvisioningWizard {
    api: Arc<dyn FieldServiceApi>,
    steps: Vec<StepId>,
    current: usize,
    data: StepData,

    locations: CascadingSelector<LocationLevel>,
    equipment_options: Vec<EquipmentSummary>,
    equipment_detail: Option<Equipment>,
    circuits: CircuitAssignmentManager,

    step_errors: HashMap<StepId, LoadError>,
    events: Option<mpsc::UnboundedSender<WizardEvent>>,
}

impl ProvisioningWizard {
    pub fn new(api: Arc<dyn FieldServiceApi>) -> Self {
        Self {
            locations: location_selector(api.clone()),
            api,
            steps: StepId::ALL.to_vec(),
            current: 0,
            data: StepData::default(),
            equipment_options: Vec::new(),
            equipment_detail: None,
            circuits: CircuitAssignmentManager::new(),
            step_errors: HashMap::new(),
            events: None,
        }
    }

    /// Report transitions on `events`
    pub fn with_events(mut self, events: mpsc::UnboundedSender<WizardEvent>) -> Self {
        self.events = Some(events);
        self
    }

    fn emit(&self, event: WizardEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }

    fn setup_failed(&mut self, step: StepId, error: LoadError) {
        tracing::warn!(%step, %error, "step setup failed");
        self.step_errors.insert(step, error.clone());
        self.emit(WizardEvent::SetupFailed { step, error });
    }

    // ========================================================================
    // State
    // ========================================================================

    pub fn steps(&self) -> &[StepId] {
        &self.steps
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> StepId {
        self.steps[self.current]
    }

    pub fn data(&self) -> &StepData {
        &self.data
    }

    pub fn validity(&self, step: StepId) -> Validity {
        self.data.validity(step)
    }

    /// Merge `payload` into its step's data and re-check that step
    pub fn set_step_data(&mut self, payload: StepPayload) -> Validity {
        let step = payload.step();
        self.data.merge(payload);
        self.validity(step)
    }

    /// Last background failure recorded for `step` since it was entered
    pub fn step_error(&self, step: StepId) -> Option<&LoadError> {
        self.step_errors.get(&step)
    }

    pub fn locations(&self) -> &CascadingSelector<LocationLevel> {
        &self.locations
    }

    pub fn equipment_options(&self) -> &[EquipmentSummary] {
        &self.equipment_options
    }

    pub fn equipment_detail(&self) -> Option<&Equipment> {
        self.equipment_detail.as_ref()
    }

    pub fn circuits(&self) -> &CircuitAssignmentManager {
        &self.circuits
    }

    pub fn circuits_mut(&mut self) -> &mut CircuitAssignmentManager {
        &mut self.circuits
    }

    pub fn summary(&self) -> Vec<StepSummary> {
        self.steps
            .iter()
            .enumerate()
            .map(|(index, &step)| StepSummary {
                index,
                step,
                valid: self.validity(step).is_valid(),
                current: index == self.current,
            })
            .collect()
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Advance one step if the current one is valid
    ///
    /// Setup of the entered step runs before this returns. Setup failures are
    /// recorded with [`step_error`](Self::step_error) and do not block.
    pub async fn go_next(&mut self) -> bool {
        let step = self.current_step();
        let validity = self.validity(step);
        if !validity.is_valid() {
            tracing::debug!(%step, errors = ?validity.errors(), "cannot advance");
            return false;
        }
        if self.current + 1 >= self.steps.len() {
            return false;
        }

        self.current += 1;
        self.enter_current().await;
        true
    }

    pub fn go_previous(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        self.emit(WizardEvent::StepEntered {
            index: self.current,
            step: self.current_step(),
        });
        true
    }

    /// Go back to any earlier step, or forward by exactly one valid step
    pub async fn go_to_step(&mut self, index: usize) -> Result<(), NavigationError> {
        if index >= self.steps.len() {
            return Err(NavigationError::OutOfBounds {
                index,
                len: self.steps.len(),
            });
        }

        if index <= self.current {
            while self.current > index {
                self.go_previous();
            }
            return Ok(());
        }

        if index > self.current + 1 {
            return Err(NavigationError::NotReachable {
                requested: index,
                current: self.current,
            });
        }

        let step = self.current_step();
        if let Validity::Invalid(errors) = self.validity(step) {
            return Err(NavigationError::StepInvalid { step, errors });
        }
        self.go_next().await;
        Ok(())
    }

    async fn enter_current(&mut self) {
        let step = self.current_step();
        tracing::info!(index = self.current, %step, "entering step");
        self.step_errors.remove(&step);
        self.emit(WizardEvent::StepEntered {
            index: self.current,
            step,
        });

        if step == StepId::Equipment {
            // The client list is kept across re-entries; only an empty one is reloaded
            let root_missing = self
                .locations
                .levels()
                .first()
                .is_some_and(|root| root.options().is_empty() && !root.is_loading());
            if root_missing {
                if let Some(Resolution::Failed(error)) = self.locations.load_root_and_wait().await
                {
                    self.setup_failed(step, error);
                }
            }
            self.refresh_equipment().await;
        }
    }

    // ========================================================================
    // Equipment step
    // ========================================================================

    /// Location scope from the cascade's current selections
    fn scope(&self) -> EquipmentFilters {
        let mut filters = EquipmentFilters::default();
        for (level, id) in self.locations.selections() {
            let slot = match level {
                LocationLevel::Client => &mut filters.client_id,
                LocationLevel::Plant => &mut filters.plant_id,
                LocationLevel::Area => &mut filters.area_id,
                LocationLevel::Location => &mut filters.location_id,
            };
            *slot = Some(id.clone());
        }
        filters
    }

    async fn load_equipment(&mut self, kind: EquipmentKind) -> Resolution {
        let filters = self.scope();
        self.equipment_options.clear();

        match self.api.list_equipment(kind, &filters).await {
            Ok(options) => {
                let count = options.len();
                tracing::info!(%kind, count, "equipment loaded");
                self.equipment_options = options;
                Resolution::Loaded { count }
            }
            Err(e) => Resolution::Failed(LoadError::new(format!("loading {} list", kind), &e)),
        }
    }

    /// Drop the equipment choice if the reloaded list no longer offers it
    fn forget_unlisted_equipment(&mut self) {
        let listed = match &self.data.equipment.equipment_id {
            Some(id) => self.equipment_options.iter().any(|e| &e.id == id),
            None => return,
        };
        if !listed {
            tracing::debug!("chosen equipment left the listing");
            self.data.equipment.equipment_id = None;
            self.equipment_detail = None;
            self.circuits.reset();
        }
    }

    async fn reload_equipment(&mut self, kind: EquipmentKind) -> Resolution {
        let resolution = self.load_equipment(kind).await;
        match &resolution {
            Resolution::Failed(error) => self.setup_failed(StepId::Equipment, error.clone()),
            _ => self.forget_unlisted_equipment(),
        }
        resolution
    }

    /// Reload the equipment list for the current scope, if a kind is chosen
    pub async fn refresh_equipment(&mut self) -> Option<Resolution> {
        let kind = self.data.equipment.equipment_kind?;
        Some(self.reload_equipment(kind).await)
    }

    /// Change a location selection without waiting for the next level
    ///
    /// The returned ticket loads the level below; run it and hand the outcome
    /// to [`resolve_location`](Self::resolve_location). Further selections may
    /// be made while it is in flight. When no ticket is returned, call
    /// [`refresh_equipment`](Self::refresh_equipment) to rescope the list.
    pub fn begin_select_location(
        &mut self,
        level: LocationLevel,
        id: Option<EntityId>,
    ) -> Result<Option<PendingLoad<LocationLevel>>, WizardError> {
        Ok(self.locations.select(level, id)?)
    }

    /// Apply a finished location load and rescope the equipment list
    ///
    /// Outcomes superseded by a later selection are discarded untouched.
    pub async fn resolve_location(&mut self, outcome: LoadOutcome<LocationLevel>) -> Resolution {
        let resolution = self.locations.resolve(outcome);
        if resolution != Resolution::StaleResultDiscarded {
            self.refresh_equipment().await;
        }
        resolution
    }

    /// Select a location level and wait for the next level and the equipment list
    pub async fn select_location(
        &mut self,
        level: LocationLevel,
        id: Option<EntityId>,
    ) -> Result<Option<Resolution>, WizardError> {
        match self.begin_select_location(level, id)? {
            Some(pending) => {
                let outcome = pending.run().await;
                Ok(Some(self.resolve_location(outcome).await))
            }
            None => {
                self.refresh_equipment().await;
                Ok(None)
            }
        }
    }

    /// Pick cabinet or panel and list matching equipment in the current scope
    pub async fn choose_equipment_kind(&mut self, kind: EquipmentKind) -> Resolution {
        self.data.equipment.equipment_kind = Some(kind);
        self.reload_equipment(kind).await
    }

    /// Choose equipment from the loaded list, fetch its detail and hydrate
    /// its circuit assignments
    pub async fn choose_equipment(&mut self, id: &EquipmentId) -> Result<Hydration, WizardError> {
        let summary = self
            .equipment_options
            .iter()
            .find(|e| &e.id == id)
            .cloned()
            .ok_or_else(|| WizardError::UnknownEquipment(id.to_string()))?;

        self.data.equipment.equipment_id = Some(summary.id.clone());
        self.data.equipment.equipment_kind = Some(summary.kind);
        self.equipment_detail = None;

        match self.api.get_equipment(&summary.id, summary.kind).await {
            Ok(detail) => self.equipment_detail = Some(detail),
            Err(e) => self.setup_failed(
                StepId::Equipment,
                LoadError::new(format!("loading equipment {}", summary.id), &e),
            ),
        }

        self.circuits.new_draft();
        let hydration = self.circuits.hydrate(self.api.as_ref(), summary.id).await;
        if let Hydration::Failed(error) = &hydration {
            self.setup_failed(StepId::Equipment, error.clone());
        }
        Ok(hydration)
    }

    // ========================================================================
    // Submission
    // ========================================================================

    fn invalid_steps(&self) -> Vec<(StepId, Vec<FieldError>)> {
        self.steps
            .iter()
            .filter_map(|&step| match self.validity(step) {
                Validity::Valid => None,
                Validity::Invalid(errors) => Some((step, errors)),
            })
            .collect()
    }

    /// Assemble the creation request, or report what is still missing
    pub fn request(&self) -> Result<CreateServiceRequest, SubmitError> {
        let incomplete = || SubmitError::Incomplete(self.invalid_steps());
        if !self.invalid_steps().is_empty() {
            return Err(incomplete());
        }

        let (Some(service_type), Some(equipment_id), Some(equipment_type), Some(raw_name)) = (
            self.data.service_type.service_type,
            self.data.equipment.equipment_id.clone(),
            self.data.equipment.equipment_kind,
            self.data.confirmation.supervisor_name.as_deref(),
        ) else {
            return Err(incomplete());
        };
        let supervisor_name = SupervisorName::new(raw_name).map_err(|_| incomplete())?;

        Ok(CreateServiceRequest {
            service_type,
            equipment_id,
            equipment_type,
            supervisor_name,
            project_id: self.data.confirmation.project_id.clone(),
            observations: self.data.confirmation.observations.clone(),
            scope: self.scope(),
        })
    }

    /// Send the request if every step is valid
    ///
    /// On failure the step data and current step are left untouched so the
    /// submission can be retried.
    pub async fn submit(&mut self) -> Result<ServiceId, SubmitError> {
        let request = self.request()?;

        tracing::info!(
            service_type = %request.service_type,
            equipment_id = %request.equipment_id,
            "submitting service"
        );
        match self.api.create_service(&request).await {
            Ok(service_id) => {
                tracing::info!(%service_id, "service created");
                self.emit(WizardEvent::Submitted {
                    service_id: service_id.clone(),
                });
                Ok(service_id)
            }
            Err(e) => {
                let error = LoadError::new("creating service", &e);
                tracing::warn!(%error, "submission failed");
                self.emit(WizardEvent::SubmissionFailed {
                    error: error.clone(),
                });
                Err(SubmitError::Failed(error))
            }
        }
    }

    /// Discard everything and return to the first step
    pub fn cancel(&mut self) {
        tracing::info!("wizard cancelled");
        self.current = 0;
        self.data = StepData::default();
        self.locations.reset();
        self.equipment_options.clear();
        self.equipment_detail = None;
        self.circuits.reset();
        self.step_errors.clear();
        self.emit(WizardEvent::Cancelled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::EquipmentData;
    use assert_matches::assert_matches;
    use field_primitives::{
        CabinetDetail, CircuitAssignmentRecord, CircuitNumber, OptionItem, PanelDetail,
        PanelSummary, ServiceType,
    };
    use field_repository::{ChildItem, Fixture, InMemoryFieldService, Operation};
    use rstest::rstest;

    fn id(s: &str) -> EntityId {
        EntityId::new(s)
    }

    fn child(child_id: &str, label: &str, parent: &str) -> ChildItem {
        ChildItem {
            id: id(child_id),
            label: label.to_string(),
            parent_id: id(parent),
        }
    }

    fn fixture() -> Fixture {
        Fixture {
            clients: vec![OptionItem::new("C1", "Acme"), OptionItem::new("C2", "Globex")],
            plants: vec![
                child("P1", "North plant", "C1"),
                child("P2", "East plant", "C1"),
                child("P9", "Globex plant", "C2"),
            ],
            areas: vec![child("A1", "Boilers", "P1"), child("A9", "Docks", "P9")],
            locations: vec![child("L1", "Room 1", "A1"), child("L9", "Dock 9", "A9")],
            equipment: vec![
                Equipment::Cabinet(CabinetDetail {
                    id: id("E1"),
                    name: "Main cabinet".to_string(),
                    cabinet_type_id: id("CT-1"),
                    location_id: id("L1"),
                    tag: None,
                }),
                Equipment::Panel(PanelDetail {
                    id: id("E2"),
                    name: "Control panel".to_string(),
                    panel_type_id: id("PT-1"),
                    location_id: id("L1"),
                    tag: None,
                }),
                Equipment::Cabinet(CabinetDetail {
                    id: id("E9"),
                    name: "Dock cabinet".to_string(),
                    cabinet_type_id: id("CT-1"),
                    location_id: id("L9"),
                    tag: None,
                }),
            ],
            panels: vec![PanelSummary {
                id: id("PNL-1"),
                name: "Board A".to_string(),
            }],
            assignments: vec![CircuitAssignmentRecord {
                id: Some(id("ASG-1")),
                equipment_id: id("E1"),
                panel_id: id("PNL-1"),
                circuits: [1, 2, 3, 7]
                    .into_iter()
                    .map(|n| CircuitNumber::new(n).unwrap())
                    .collect(),
            }],
        }
    }

    fn setup() -> (Arc<InMemoryFieldService>, ProvisioningWizard) {
        let api = Arc::new(InMemoryFieldService::new(fixture()));
        let wizard = ProvisioningWizard::new(api.clone());
        (api, wizard)
    }

    /// Drive the wizard to the confirmation step with E1 chosen
    async fn at_confirmation(wizard: &mut ProvisioningWizard) {
        wizard.set_step_data(StepPayload::service_type(ServiceType::Inspection));
        assert!(wizard.go_next().await);
        wizard
            .select_location(LocationLevel::Client, Some(id("C1")))
            .await
            .unwrap();
        wizard
            .select_location(LocationLevel::Plant, Some(id("P1")))
            .await
            .unwrap();
        wizard.choose_equipment_kind(EquipmentKind::Cabinet).await;
        wizard.choose_equipment(&id("E1")).await.unwrap();
        assert!(wizard.go_next().await);
    }

    #[tokio::test]
    async fn go_next_is_gated_by_validity() {
        let (_api, mut wizard) = setup();

        assert!(!wizard.go_next().await);
        assert_eq!(wizard.current_index(), 0);

        wizard.set_step_data(StepPayload::service_type(ServiceType::Maintenance));
        assert!(wizard.go_next().await);
        assert_eq!(wizard.current_step(), StepId::Equipment);

        assert!(!wizard.go_next().await);
        assert_eq!(wizard.current_index(), 1);
    }

    #[tokio::test]
    async fn inspection_of_a_cabinet_end_to_end() {
        let (api, mut wizard) = setup();

        wizard.set_step_data(StepPayload::service_type(ServiceType::Inspection));
        assert!(wizard.go_next().await);
        assert_eq!(wizard.locations().levels()[0].options().len(), 2);

        assert!(!wizard.go_next().await);

        wizard
            .select_location(LocationLevel::Client, Some(id("C1")))
            .await
            .unwrap();
        let plants = wizard.locations().level(LocationLevel::Plant).unwrap().options();
        assert_eq!(
            plants.iter().map(|o| o.id.as_str()).collect::<Vec<_>>(),
            vec!["P1", "P2"]
        );

        wizard
            .select_location(LocationLevel::Plant, Some(id("P1")))
            .await
            .unwrap();
        let areas = wizard.locations().level(LocationLevel::Area).unwrap().options();
        assert_eq!(areas, &[OptionItem::new("A1", "Boilers")]);

        assert_eq!(
            wizard.choose_equipment_kind(EquipmentKind::Cabinet).await,
            Resolution::Loaded { count: 1 }
        );
        assert_eq!(
            wizard.choose_equipment(&id("E1")).await.unwrap(),
            Hydration::Loaded { count: 1 }
        );
        assert_eq!(wizard.circuits().existing()[0].range_text, "1-3, 7");
        assert_matches!(wizard.equipment_detail(), Some(Equipment::Cabinet(_)));

        assert!(wizard.go_next().await);
        assert!(!wizard.validity(StepId::Confirmation).is_valid());

        wizard.set_step_data(StepPayload::supervisor_name("Ana Lima"));
        let service_id = wizard.submit().await.unwrap();

        assert_eq!(service_id, id("SRV-1"));
        let created = api.created_services();
        let request = &created[0].1;
        assert_eq!(request.service_type, ServiceType::Inspection);
        assert_eq!(request.equipment_id, id("E1"));
        assert_eq!(request.equipment_type, EquipmentKind::Cabinet);
        assert_eq!(request.supervisor_name.as_str(), "Ana Lima");
        assert_eq!(request.scope.client_id, Some(id("C1")));
        assert_eq!(request.scope.plant_id, Some(id("P1")));
        assert_eq!(request.scope.area_id, None);
    }

    #[tokio::test]
    async fn submit_without_every_step_valid_makes_no_call() {
        let (api, mut wizard) = setup();
        wizard.set_step_data(StepPayload::service_type(ServiceType::RaiseObservation));

        let result = wizard.submit().await;

        assert_matches!(result, Err(SubmitError::Incomplete(steps)) => {
            let invalid: Vec<StepId> = steps.iter().map(|(step, _)| *step).collect();
            assert_eq!(invalid, vec![StepId::Equipment, StepId::Confirmation]);
        });
        assert_eq!(api.calls(Operation::CreateService), 0);
    }

    #[rstest]
    #[case("Jo")]
    #[case("Jose123")]
    #[tokio::test]
    async fn bad_supervisor_name_blocks_submit(#[case] name: &str) {
        let (api, mut wizard) = setup();
        at_confirmation(&mut wizard).await;

        let validity = wizard.set_step_data(StepPayload::supervisor_name(name));
        assert_eq!(validity.errors()[0].field, "supervisorName");

        assert_matches!(wizard.submit().await, Err(SubmitError::Incomplete(_)));
        assert_eq!(api.calls(Operation::CreateService), 0);
    }

    #[tokio::test]
    async fn failed_submission_keeps_everything_for_retry() {
        let (api, mut wizard) = setup();
        at_confirmation(&mut wizard).await;
        wizard.set_step_data(StepPayload::supervisor_name("José Ñúñez"));
        let before = wizard.data().clone();

        api.fail_next(Operation::CreateService);
        assert_matches!(wizard.submit().await, Err(SubmitError::Failed(_)));

        assert_eq!(wizard.current_index(), 2);
        assert_eq!(wizard.data(), &before);

        assert!(wizard.submit().await.is_ok());
        assert_eq!(api.calls(Operation::CreateService), 2);
    }

    #[tokio::test]
    async fn setup_failure_does_not_block_navigation() {
        let (api, wizard) = setup();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut wizard = wizard.with_events(tx);

        api.fail_next(Operation::ListLocations);
        wizard.set_step_data(StepPayload::service_type(ServiceType::Maintenance));
        assert!(wizard.go_next().await);

        assert_eq!(wizard.current_step(), StepId::Equipment);
        assert!(wizard.step_error(StepId::Equipment).is_some());
        assert_eq!(
            rx.recv().await,
            Some(WizardEvent::StepEntered {
                index: 1,
                step: StepId::Equipment
            })
        );
        assert_matches!(
            rx.recv().await,
            Some(WizardEvent::SetupFailed {
                step: StepId::Equipment,
                ..
            })
        );
    }

    #[tokio::test]
    async fn go_to_step_only_reaches_back_or_one_valid_step() {
        let (_api, mut wizard) = setup();

        assert_matches!(
            wizard.go_to_step(2).await,
            Err(NavigationError::NotReachable { requested: 2, current: 0 })
        );
        assert_matches!(
            wizard.go_to_step(1).await,
            Err(NavigationError::StepInvalid {
                step: StepId::ServiceType,
                ..
            })
        );
        assert_matches!(
            wizard.go_to_step(7).await,
            Err(NavigationError::OutOfBounds { index: 7, len: 3 })
        );

        wizard.set_step_data(StepPayload::service_type(ServiceType::Inspection));
        wizard.go_to_step(1).await.unwrap();
        assert_eq!(wizard.current_index(), 1);

        wizard.go_to_step(0).await.unwrap();
        assert_eq!(wizard.current_index(), 0);
    }

    #[tokio::test]
    async fn going_back_preserves_later_data() {
        let (_api, mut wizard) = setup();
        at_confirmation(&mut wizard).await;

        assert!(wizard.go_previous());
        assert!(wizard.go_previous());
        assert!(!wizard.go_previous());

        assert_eq!(wizard.data().equipment.equipment_id, Some(id("E1")));
        assert!(wizard.go_next().await);
        assert!(wizard.go_next().await);
        assert_eq!(wizard.current_step(), StepId::Confirmation);
    }

    #[tokio::test]
    async fn changing_location_drops_equipment_outside_it() {
        let (_api, mut wizard) = setup();
        at_confirmation(&mut wizard).await;
        wizard.go_previous();

        wizard
            .select_location(LocationLevel::Client, Some(id("C2")))
            .await
            .unwrap();

        assert_eq!(wizard.equipment_options()[0].id, id("E9"));
        assert_eq!(wizard.data().equipment.equipment_id, None);
        assert!(wizard.circuits().existing().is_empty());
        assert!(!wizard.validity(StepId::Equipment).is_valid());
    }

    #[tokio::test]
    async fn switching_kind_forgets_equipment_of_the_other_kind() {
        let (_api, mut wizard) = setup();
        at_confirmation(&mut wizard).await;
        wizard.go_previous();

        assert_eq!(
            wizard.choose_equipment_kind(EquipmentKind::Panel).await,
            Resolution::Loaded { count: 1 }
        );

        assert_eq!(wizard.data().equipment.equipment_id, None);
        assert_eq!(wizard.data().equipment.equipment_kind, Some(EquipmentKind::Panel));
    }

    #[tokio::test]
    async fn unknown_equipment_is_rejected() {
        let (_api, mut wizard) = setup();
        wizard.choose_equipment_kind(EquipmentKind::Cabinet).await;

        assert_matches!(
            wizard.choose_equipment(&id("E404")).await,
            Err(WizardError::UnknownEquipment(_))
        );
    }

    #[tokio::test]
    async fn summary_marks_current_and_valid_steps() {
        let (_api, mut wizard) = setup();
        wizard.set_step_data(StepPayload::service_type(ServiceType::Inspection));
        wizard.go_next().await;

        let summary = wizard.summary();

        assert_eq!(summary.len(), 3);
        assert!(summary[0].valid && !summary[0].current);
        assert!(!summary[1].valid && summary[1].current);
        assert!(!summary[2].valid);
    }

    #[tokio::test]
    async fn cancel_discards_the_session() {
        let (_api, mut wizard) = setup();
        at_confirmation(&mut wizard).await;

        wizard.cancel();

        assert_eq!(wizard.current_index(), 0);
        assert_eq!(wizard.data(), &StepData::default());
        assert_eq!(wizard.locations().selected(LocationLevel::Client), None);
        assert!(wizard.equipment_options().is_empty());
        assert!(wizard.circuits().existing().is_empty());
    }

    #[tokio::test]
    async fn client_failure_survives_a_successful_equipment_load() {
        let (api, mut wizard) = setup();
        wizard.set_step_data(StepPayload::Equipment(EquipmentData {
            equipment_kind: Some(EquipmentKind::Cabinet),
            ..Default::default()
        }));
        wizard.set_step_data(StepPayload::service_type(ServiceType::Maintenance));

        api.fail_next(Operation::ListLocations);
        assert!(wizard.go_next().await);

        assert!(!wizard.equipment_options().is_empty());
        let client = wizard.locations().level(LocationLevel::Client).unwrap();
        assert!(client.error().is_some());
        assert_matches!(
            wizard.step_error(StepId::Equipment),
            Some(error) if error.operation.contains("client")
        );
    }

    #[tokio::test]
    async fn reentering_equipment_keeps_loaded_clients() {
        let (api, mut wizard) = setup();
        wizard.set_step_data(StepPayload::service_type(ServiceType::Inspection));
        assert!(wizard.go_next().await);
        wizard
            .select_location(LocationLevel::Client, Some(id("C1")))
            .await
            .unwrap();
        let calls = api.calls(Operation::ListLocations);

        assert!(wizard.go_previous());
        api.fail_next(Operation::ListLocations);
        assert!(wizard.go_next().await);

        assert_eq!(api.calls(Operation::ListLocations), calls);
        assert_eq!(wizard.step_error(StepId::Equipment), None);
        let client = wizard.locations().level(LocationLevel::Client).unwrap();
        assert_eq!(client.options().len(), 2);
        assert_eq!(client.selected_id(), Some(&id("C1")));
    }

    #[tokio::test]
    async fn reentering_equipment_retries_a_failed_client_list() {
        let (api, mut wizard) = setup();
        api.fail_next(Operation::ListLocations);
        wizard.set_step_data(StepPayload::service_type(ServiceType::Inspection));
        assert!(wizard.go_next().await);
        assert!(wizard.step_error(StepId::Equipment).is_some());

        assert!(wizard.go_previous());
        assert!(wizard.go_next().await);

        assert_eq!(api.calls(Operation::ListLocations), 2);
        assert_eq!(wizard.step_error(StepId::Equipment), None);
        let client = wizard.locations().level(LocationLevel::Client).unwrap();
        assert_eq!(client.options().len(), 2);
    }

    #[tokio::test]
    async fn superseded_client_selection_is_discarded() {
        let (_api, mut wizard) = setup();
        wizard.set_step_data(StepPayload::service_type(ServiceType::Inspection));
        assert!(wizard.go_next().await);
        wizard.choose_equipment_kind(EquipmentKind::Cabinet).await;

        let first = wizard
            .begin_select_location(LocationLevel::Client, Some(id("C1")))
            .unwrap()
            .unwrap();
        let second = wizard
            .begin_select_location(LocationLevel::Client, Some(id("C2")))
            .unwrap()
            .unwrap();
        let plant = wizard.locations().level(LocationLevel::Plant).unwrap();
        assert!(plant.is_loading());

        let second = second.run().await;
        let first = first.run().await;
        assert_eq!(
            wizard.resolve_location(second).await,
            Resolution::Loaded { count: 1 }
        );
        assert_eq!(
            wizard.resolve_location(first).await,
            Resolution::StaleResultDiscarded
        );

        let plant = wizard.locations().level(LocationLevel::Plant).unwrap();
        let plants: Vec<_> = plant.options().iter().map(|o| o.id.clone()).collect();
        assert_eq!(plants, vec![id("P9")]);
        let equipment: Vec<_> = wizard
            .equipment_options()
            .iter()
            .map(|e| e.id.clone())
            .collect();
        assert_eq!(equipment, vec![id("E9")]);
    }

    #[tokio::test]
    async fn clearing_a_selection_rescopes_equipment() {
        let (_api, mut wizard) = setup();
        wizard.set_step_data(StepPayload::service_type(ServiceType::Inspection));
        assert!(wizard.go_next().await);
        wizard.choose_equipment_kind(EquipmentKind::Cabinet).await;
        wizard
            .select_location(LocationLevel::Client, Some(id("C2")))
            .await
            .unwrap();
        assert_eq!(wizard.equipment_options().len(), 1);

        let pending = wizard
            .begin_select_location(LocationLevel::Client, None)
            .unwrap();
        assert!(pending.is_none());
        assert_eq!(
            wizard.refresh_equipment().await,
            Some(Resolution::Loaded { count: 2 })
        );
    }
}
