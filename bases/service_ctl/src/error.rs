use field_primitives::LocationLevel;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CtlError {
    #[error("--{level} needs --{parent} as well")]
    MissingParent {
        level: LocationLevel,
        parent: LocationLevel,
    },

    #[error("{0}")]
    Blocked(String),
}

pub type Result<T> = std::result::Result<T, CtlError>;
