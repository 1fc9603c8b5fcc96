use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the supervisor responsible for a service
///
/// Trimmed, 3-100 characters, letters (accented Latin included, precomposed or
/// decomposed) and spaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SupervisorName(String);

impl SupervisorName {
    pub const MIN_LEN: usize = 3;
    pub const MAX_LEN: usize = 100;

    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();

        let len = trimmed.chars().count();
        if !(Self::MIN_LEN..=Self::MAX_LEN).contains(&len) {
            return Err(ValidationError::SupervisorNameLength(len));
        }

        if !has_name_characters(trimmed) {
            return Err(ValidationError::SupervisorNamePattern);
        }

        Ok(SupervisorName(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Letters and spaces, with combining diacritics allowed only on a letter
fn has_name_characters(name: &str) -> bool {
    let mut after_letter = false;
    name.chars().all(|c| {
        let ok = match c {
            ' ' => true,
            '\u{0300}'..='\u{036F}' => after_letter,
            _ => is_latin_letter(c),
        };
        after_letter = ok && c != ' ';
        ok
    })
}

fn is_latin_letter(c: char) -> bool {
    match c {
        'a'..='z' | 'A'..='Z' => true,
        // Latin-1 supplement letters, minus the multiplication and division signs
        '\u{00C0}'..='\u{00FF}' => c != '\u{00D7}' && c != '\u{00F7}',
        // Latin Extended-A
        '\u{0100}'..='\u{017F}' => true,
        _ => false,
    }
}

impl TryFrom<String> for SupervisorName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<SupervisorName> for String {
    fn from(name: SupervisorName) -> Self {
        name.0
    }
}

impl fmt::Display for SupervisorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rstest::rstest;

    #[rstest]
    #[case("Jose Perez")]
    #[case("José Ñúñez")]
    #[case("Ana Lima")]
    #[case("Zoë")]
    #[case("Jose\u{301} Perez")]
    #[case("Zoe\u{308}\u{301}")]
    fn accepts_valid_names(#[case] raw: &str) {
        assert!(SupervisorName::new(raw).is_ok());
    }

    #[test]
    fn rejects_short_names() {
        assert_matches!(
            SupervisorName::new("Jo"),
            Err(ValidationError::SupervisorNameLength(2))
        );
    }

    #[test]
    fn rejects_digits() {
        assert_matches!(
            SupervisorName::new("Jose123"),
            Err(ValidationError::SupervisorNamePattern)
        );
    }

    #[test]
    fn length_limit_is_inclusive() {
        assert!(SupervisorName::new(&"a".repeat(100)).is_ok());
        assert_matches!(
            SupervisorName::new(&"a".repeat(101)),
            Err(ValidationError::SupervisorNameLength(101))
        );
    }

    #[test]
    fn length_counts_characters_after_trimming() {
        assert_matches!(
            SupervisorName::new("  Jo  "),
            Err(ValidationError::SupervisorNameLength(2))
        );
        assert_eq!(SupervisorName::new("  Ñoño ").unwrap().as_str(), "Ñoño");
    }

    #[rstest]
    #[case("Ana-Lima")]
    #[case("Ana_Lima")]
    #[case("Ana × Lima")]
    #[case("李小龙")]
    #[case("\u{301}Ana")]
    #[case("Ana \u{301}Lima")]
    fn rejects_non_letter_characters(#[case] raw: &str) {
        assert_matches!(
            SupervisorName::new(raw),
            Err(ValidationError::SupervisorNamePattern)
        );
    }
}
