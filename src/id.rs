//! Identifier module.
//!
//! Provides the `Id` type used for every entity in a competition: teams,
//! clubs, players, contacts, stages, groups and matches. Uses `Arc<str>`
//! so IDs are cheap to clone while slots and registries pass them around.

use crate::error::{CompetitionError, Result};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use std::sync::Arc;

/// Maximum length of an identifier, in characters.
pub const MAX_ID_LEN: usize = 100;

/// Characters reserved by the team reference grammar.
const RESERVED: &[char] = &['"', ':', '{', '}', '?', '='];

/// A validated entity identifier.
///
/// An identifier is 1 to 100 printable ASCII characters and never contains
/// any of `" : { } ? =`, which belong to the reference grammar.
///
/// # Examples
///
/// ```rust
/// use vbcomp::Id;
///
/// let id = Id::new("TM1").unwrap();
/// assert_eq!(id.as_str(), "TM1");
///
/// assert!(Id::new("").is_err());
/// assert!(Id::new("A:B").is_err());
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Id(Arc<str>);

impl Serialize for Id {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Id::new(s).map_err(de::Error::custom)
    }
}

impl Id {
    /// Create a new `Id`, validating its length and character set.
    pub fn new(s: impl AsRef<str>) -> Result<Self> {
        let s = s.as_ref();
        validate(s)?;
        Ok(Self(Arc::from(s)))
    }

    /// Get the string representation of this `Id`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn validate(s: &str) -> Result<()> {
    if s.is_empty() {
        return Err(CompetitionError::Validation(
            "Invalid ID \"\": must be at least 1 character".to_string(),
        ));
    }
    if s.chars().count() > MAX_ID_LEN {
        return Err(CompetitionError::Validation(format!(
            "Invalid ID \"{}\": must be at most {} characters",
            s, MAX_ID_LEN
        )));
    }
    if let Some(c) = s
        .chars()
        .find(|c| !(c.is_ascii_graphic() || *c == ' ') || RESERVED.contains(c))
    {
        return Err(CompetitionError::Validation(format!(
            "Invalid ID \"{}\": character {:?} is not allowed",
            s, c
        )));
    }
    Ok(())
}

impl FromStr for Id {
    type Err = CompetitionError;

    fn from_str(s: &str) -> Result<Self> {
        Id::new(s)
    }
}

impl TryFrom<&str> for Id {
    type Error = CompetitionError;

    fn try_from(s: &str) -> Result<Self> {
        Id::new(s)
    }
}

impl TryFrom<String> for Id {
    type Error = CompetitionError;

    fn try_from(s: String) -> Result<Self> {
        validate(&s)?;
        Ok(Self(Arc::from(s)))
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id1 = Id::new("TM1").unwrap();
        let id2: Id = "TM1".parse().unwrap();
        assert_eq!(id1, id2);
        assert_eq!(id1.as_str(), "TM1");
    }

    #[test]
    fn test_id_length_limits() {
        assert!(Id::new("a".repeat(MAX_ID_LEN)).is_ok());
        assert!(Id::new("a".repeat(MAX_ID_LEN + 1)).is_err());
        assert!(Id::new("").is_err());
    }

    #[test]
    fn test_id_reserved_characters() {
        for bad in ["a\"b", "a:b", "{a", "a}", "a?", "a=b", "tab\there", "é"] {
            assert!(Id::new(bad).is_err(), "{} should be rejected", bad);
        }
        assert!(Id::new("Team-1 (A)").is_ok());
    }

    #[test]
    fn test_id_deserialize_validates() {
        let ok: Id = serde_json::from_str("\"NOR\"").unwrap();
        assert_eq!(ok.as_str(), "NOR");
        assert!(serde_json::from_str::<Id>("\"N:R\"").is_err());
    }

    #[test]
    fn test_id_ordering() {
        let a = Id::new("ALP").unwrap();
        let b = Id::new("BRA").unwrap();
        assert!(a < b);
    }
}
