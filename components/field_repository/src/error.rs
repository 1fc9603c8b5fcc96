use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("{resource} '{id}' not found")]
    NotFound { resource: &'static str, id: String },

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("invalid fixture")]
    Fixture(#[from] serde_json::Error),

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RepositoryError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        RepositoryError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RepositoryError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Non-fatal marker left on state when a collaborator call fails
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{operation} failed: {message}")]
pub struct LoadError {
    pub operation: String,
    pub message: String,
}

impl LoadError {
    pub fn new(operation: impl Into<String>, source: &RepositoryError) -> Self {
        LoadError {
            operation: operation.into(),
            message: source.to_string(),
        }
    }
}
