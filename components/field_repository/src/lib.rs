//! Collaborator capabilities consumed by the provisioning core
//!
//! The console talks to a remote API through per-entity services. The core
//! only needs the narrow capabilities defined here; how they are transported
//! is someone else's concern. [`InMemoryFieldService`] implements all of them
//! over a [`Fixture`] and backs both the tests and the command-line base.

mod api;
mod error;
mod memory;
mod request;

pub use api::{FieldServiceApi, ResourceRepository};
pub use error::{LoadError, RepositoryError, Result};
pub use memory::{ChildItem, Fixture, InMemoryFieldService, Operation};
pub use request::{CreateServiceRequest, EquipmentFilters};
