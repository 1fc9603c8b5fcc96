use crate::step::StepId;
use field_primitives::ServiceId;
use field_repository::LoadError;

/// Transitions reported to whoever drives the presentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEvent {
    StepEntered { index: usize, step: StepId },
    /// Background setup of a step failed; the step was still entered
    SetupFailed { step: StepId, error: LoadError },
    Submitted { service_id: ServiceId },
    SubmissionFailed { error: LoadError },
    Cancelled,
}
