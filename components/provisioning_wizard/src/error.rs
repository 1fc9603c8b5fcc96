use crate::step::StepId;
use cascading_selector::SelectorError;
use field_primitives::FieldError;
use field_repository::LoadError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("step {index} does not exist ({len} steps)")]
    OutOfBounds { index: usize, len: usize },

    #[error("cannot jump from step {current} to step {requested}")]
    NotReachable { requested: usize, current: usize },

    #[error("step '{step}' is not complete")]
    StepInvalid { step: StepId, errors: Vec<FieldError> },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// Nothing was sent; these steps still need input
    #[error("{} step(s) are not complete", .0.len())]
    Incomplete(Vec<(StepId, Vec<FieldError>)>),

    /// The backend refused or could not be reached; all input is kept
    #[error("submission failed: {0}")]
    Failed(LoadError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error(transparent)]
    Selector(#[from] SelectorError),

    #[error("equipment '{0}' is not in the loaded list")]
    UnknownEquipment(String),
}
