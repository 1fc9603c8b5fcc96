use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Breaker position on a distribution panel, always within `1..=30`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct CircuitNumber(u8);

impl CircuitNumber {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 30;
    pub const DOMAIN_SIZE: usize = 30;

    pub fn new(n: i64) -> Result<Self, ValidationError> {
        if n < i64::from(Self::MIN) || n > i64::from(Self::MAX) {
            return Err(ValidationError::CircuitOutOfRange(n));
        }
        Ok(Self(n as u8))
    }

    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Every circuit of the domain in ascending order
    pub fn all() -> impl Iterator<Item = CircuitNumber> {
        (Self::MIN..=Self::MAX).map(CircuitNumber)
    }
}

impl TryFrom<i64> for CircuitNumber {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CircuitNumber> for i64 {
    fn from(circuit: CircuitNumber) -> Self {
        i64::from(circuit.0)
    }
}

impl fmt::Display for CircuitNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
