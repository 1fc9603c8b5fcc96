use field_repository::LoadError;
use thiserror::Error;

/// A circuit number outside `1..=30` reached the manager: a caller bug
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("circuit {0} is outside 1-30")]
pub struct OutOfRangeError(pub i64);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssignmentError {
    #[error("a panel and at least one circuit are required")]
    Incomplete,

    #[error("no existing assignment '{0}'")]
    UnknownAssignment(String),

    #[error("assignment was rejected: {0}")]
    Rejected(LoadError),
}
