//! Circuit selection for one piece of equipment against one panel
//!
//! The manager holds a draft (panel + circuit numbers), shows it as range
//! text, and commits it through a [`field_repository::ResourceRepository`].
//! It can also hydrate the assignments already stored for an equipment so
//! they can be displayed or loaded back into the draft for editing.

mod error;
mod hydrate;
mod manager;

pub use error::{AssignmentError, OutOfRangeError};
pub use hydrate::{ExistingAssignment, Hydration, HydrationOutcome, HydrationRequest, PanelInfo};
pub use manager::{AssignmentStatus, CircuitAssignmentManager};
