//! Guided "create service" flow
//!
//! [`ProvisioningWizard`] walks three steps: pick a service type, pick the
//! equipment (through a location cascade, with its existing circuit
//! assignments loaded for display), then confirm with a supervisor name.
//! Forward navigation is gated by each step's [`Validity`]; submission
//! needs every step valid at once and produces a single creation request.

mod error;
mod event;
mod step;
mod wizard;

pub use error::{NavigationError, SubmitError, WizardError};
pub use event::WizardEvent;
pub use step::{
    ConfirmationData, EquipmentData, ServiceTypeData, StepData, StepId, StepPayload, StepSummary,
    Validity,
};
pub use wizard::ProvisioningWizard;
