use crate::config::{LocationPath, ProvisionTask};
use crate::error::CtlError;
use cascading_selector::{location_selector, CascadingSelector, Resolution};
use circuit_assignment::{Hydration, PanelInfo};
use color_eyre::eyre::{eyre, Result};
use field_primitives::LocationLevel;
use field_repository::{FieldServiceApi, Fixture, InMemoryFieldService};
use provisioning_wizard::{
    ConfirmationData, ProvisioningWizard, StepPayload, SubmitError, WizardEvent,
};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

// ============================================================================
// Ranges
// ============================================================================

pub fn encode_ranges(values: &[i64]) -> String {
    range_codec::encode(values.iter().copied())
}

pub fn decode_ranges(text: &str) -> Result<String> {
    let values = range_codec::decode(text)?;
    Ok(values
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" "))
}

// ============================================================================
// Locations
// ============================================================================

async fn open_fixture(path: &Path) -> Result<Arc<InMemoryFieldService>> {
    let fixture = Fixture::load(path).await?;
    tracing::debug!(path = %path.display(), "fixture loaded");
    Ok(Arc::new(InMemoryFieldService::new(fixture)))
}

fn print_level(selector: &CascadingSelector<LocationLevel>, level: LocationLevel) {
    let Some(state) = selector.level(level) else {
        return;
    };

    if let Some(error) = state.error() {
        println!("{level}: failed ({error})");
        return;
    }

    println!("{level}:");
    for option in state.options() {
        let marker = if state.selected_id() == Some(&option.id) { "*" } else { " " };
        println!("  {marker} {} {}", option.id, option.label);
    }
}

/// Resolve the cascade along `path`, returning the levels that got options
pub async fn walk_locations(
    api: Arc<dyn FieldServiceApi>,
    path: &LocationPath,
) -> Result<CascadingSelector<LocationLevel>> {
    let mut selector = location_selector(api);
    selector.load_root_and_wait().await;

    for (level, id) in path {
        let resolution = selector.select_and_load(*level, Some(id.clone())).await?;
        if let Some(Resolution::Failed(error)) = resolution {
            tracing::warn!(%error, "cascade stopped");
            break;
        }
    }
    Ok(selector)
}

pub async fn show_locations(fixture: &Path, path: &LocationPath) -> Result<()> {
    let api = open_fixture(fixture).await?;
    let selector = walk_locations(api, path).await?;

    for level in LocationLevel::ALL {
        let reached = match level.parent() {
            None => true,
            Some(parent) => selector.selected(parent).is_some(),
        };
        if reached {
            print_level(&selector, level);
        }
    }
    Ok(())
}

// ============================================================================
// Provision
// ============================================================================

async fn advance(wizard: &mut ProvisioningWizard) -> Result<()> {
    let step = wizard.current_step();
    if wizard.go_next().await {
        return Ok(());
    }

    let errors = wizard
        .validity(step)
        .errors()
        .iter()
        .map(|e| format!("  {e}"))
        .collect::<Vec<_>>()
        .join("\n");
    Err(CtlError::Blocked(format!("step '{step}' is not complete:\n{errors}")).into())
}

fn print_circuits(wizard: &ProvisioningWizard) {
    let circuits = wizard.circuits();
    if let Some(error) = circuits.error() {
        println!("Existing assignments could not be loaded: {error}");
        return;
    }
    if circuits.existing().is_empty() {
        println!("No existing circuit assignments");
        return;
    }

    println!("Existing circuit assignments:");
    for existing in circuits.existing() {
        let panel = match &existing.panel {
            PanelInfo::Loaded(panel) => panel.name.clone(),
            PanelInfo::Failed(_) => format!("{} (unavailable)", existing.record.panel_id),
        };
        println!("  {panel}: {}", existing.range_text);
    }
}

/// Drive every wizard step from `task`, returning the created service id
pub async fn run_wizard(api: Arc<dyn FieldServiceApi>, task: &ProvisionTask) -> Result<String> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut wizard = ProvisioningWizard::new(api).with_events(tx);

    wizard.set_step_data(StepPayload::service_type(task.service_type));
    advance(&mut wizard).await?;

    for (level, id) in &task.path {
        wizard.select_location(*level, Some(id.clone())).await?;
    }
    if let Resolution::Failed(error) = wizard.choose_equipment_kind(task.equipment_kind).await {
        return Err(eyre!("equipment list unavailable: {error}"));
    }
    if let Hydration::Loaded { count } = wizard.choose_equipment(&task.equipment_id).await? {
        tracing::debug!(count, "existing assignments loaded");
    }
    print_circuits(&wizard);
    advance(&mut wizard).await?;

    wizard.set_step_data(StepPayload::Confirmation(ConfirmationData {
        supervisor_name: Some(task.supervisor.clone()),
        project_id: task.project_id.clone(),
        observations: task.observations.clone(),
    }));

    let result = wizard.submit().await;
    while let Ok(event) = rx.try_recv() {
        if let WizardEvent::SetupFailed { step, error } = event {
            println!("warning: {step}: {error}");
        }
    }

    match result {
        Ok(service_id) => Ok(service_id.to_string()),
        Err(SubmitError::Incomplete(steps)) => {
            let lines = steps
                .iter()
                .flat_map(|(step, errors)| errors.iter().map(move |e| format!("  {step}: {e}")))
                .collect::<Vec<_>>()
                .join("\n");
            Err(CtlError::Blocked(format!("service not submitted:\n{lines}")).into())
        }
        Err(e @ SubmitError::Failed(_)) => Err(e.into()),
    }
}

pub async fn provision(task: &ProvisionTask) -> Result<()> {
    let api = open_fixture(&task.fixture).await?;
    let service_id = run_wizard(api, task).await?;
    println!("Created service {service_id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use field_primitives::{EntityId, EquipmentKind, ServiceType};
    use field_repository::Operation;
    use rstest::rstest;
    use std::path::PathBuf;

    fn fixture_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/plant.json")
    }

    async fn service() -> Arc<InMemoryFieldService> {
        open_fixture(&fixture_path()).await.unwrap()
    }

    fn task(supervisor: &str) -> ProvisionTask {
        ProvisionTask {
            fixture: fixture_path(),
            service_type: ServiceType::Inspection,
            path: vec![
                (LocationLevel::Client, EntityId::new("C1")),
                (LocationLevel::Plant, EntityId::new("P1")),
            ],
            equipment_kind: EquipmentKind::Cabinet,
            equipment_id: EntityId::new("E1"),
            supervisor: supervisor.to_string(),
            project_id: Some(EntityId::new("PRJ-7")),
            observations: None,
        }
    }

    #[rstest]
    #[case(&[1, 2, 3, 7, 9, 10, 11], "1-3, 7, 9-11")]
    #[case(&[5], "5")]
    #[case(&[], "Sin circuitos")]
    fn encodes(#[case] values: &[i64], #[case] expected: &str) {
        assert_eq!(encode_ranges(values), expected);
    }

    #[test]
    fn decodes_to_sorted_numbers() {
        assert_eq!(decode_ranges("9-11, 1-3, 7").unwrap(), "1 2 3 7 9 10 11");
        assert!(decode_ranges("3-1").is_err());
    }

    #[tokio::test]
    async fn fixture_walks_down_to_areas() {
        let api = service().await;
        let path = vec![
            (LocationLevel::Client, EntityId::new("C1")),
            (LocationLevel::Plant, EntityId::new("P1")),
        ];

        let selector = walk_locations(api, &path).await.unwrap();

        let areas = selector.level(LocationLevel::Area).unwrap().options();
        assert_eq!(areas.len(), 2);
        assert!(selector.level(LocationLevel::Location).unwrap().options().is_empty());
    }

    #[tokio::test]
    async fn provisions_from_fixture() {
        let api = service().await;

        let service_id = run_wizard(api.clone(), &task("Ana Lima")).await.unwrap();

        assert_eq!(service_id, "SRV-1");
        let created = api.created_services();
        assert_eq!(created[0].1.project_id, Some(EntityId::new("PRJ-7")));
        assert_eq!(api.calls(Operation::GetPanel), 2);
    }

    #[tokio::test]
    async fn invalid_supervisor_is_reported_not_submitted() {
        let api = service().await;

        let error = run_wizard(api.clone(), &task("Jose123")).await.unwrap_err();

        assert_matches!(error.downcast_ref::<CtlError>(), Some(CtlError::Blocked(message)) => {
            assert!(message.contains("supervisorName"));
        });
        assert_eq!(api.calls(Operation::CreateService), 0);
    }
}
