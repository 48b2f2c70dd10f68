//! Error types for competition building and team resolution.
//!
//! All errors raised by the crate are represented by the
//! `CompetitionError` enum. Errors are always returned to the immediate
//! caller; nothing is swallowed internally.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CompetitionError>;

/// Format a reference cycle path as a readable string.
fn format_cycle_path(path: &[String]) -> String {
    if path.is_empty() {
        return String::from("(empty cycle)");
    }
    path.join(" -> ")
}

/// Errors that can occur while building a competition or resolving teams.
///
/// # Examples
///
/// ```rust
/// use vbcomp::CompetitionError;
///
/// let err = CompetitionError::UnknownStage("L".to_string());
/// assert_eq!(err.to_string(), "Stage with ID \"L\" not found");
/// assert!(err.is_not_found());
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompetitionError {
    /// A structural rule was broken while building the competition:
    /// duplicate IDs, malformed IDs, inconsistent configuration.
    #[error("{0}")]
    Validation(String),

    /// A placeholder reference could not be parsed.
    ///
    /// `reference` holds the (possibly truncated) offending text.
    #[error("Invalid team reference for {context}: \"{reference}\"")]
    MalformedReference { context: String, reference: String },

    /// A reference named a stage that does not exist.
    #[error("Stage with ID \"{0}\" not found")]
    UnknownStage(String),

    /// A reference named a group that does not exist in its stage.
    #[error("Group with ID \"{group}\" not found in stage \"{stage}\"")]
    UnknownGroup { stage: String, group: String },

    /// A reference named a match that does not exist in its group.
    #[error("Match with ID \"{id}\" not found in group \"{group}\"")]
    UnknownMatch { group: String, id: String },

    /// A registry lookup failed.
    #[error("{entity} with ID \"{id}\" not found")]
    NotFound { entity: String, id: String },

    /// A reference depends on a match or group that has no result yet.
    #[error("Cannot resolve {0}: not decided yet")]
    NotDecidedYet(String),

    /// A result was requested from a match that has no complete score.
    #[error("Match \"{0}\" is not complete")]
    NotComplete(String),

    /// Recorded scores do not satisfy the scoring configuration.
    #[error("Invalid score for match \"{match_id}\": {reason}")]
    InvalidScore { match_id: String, reason: String },

    /// A match manager was neither a team nor a person, or was both.
    #[error("Invalid match manager: {0}")]
    InvalidManager(String),

    /// Match officials were neither a team nor a set of people, or were both.
    #[error("Invalid match officials: {0}")]
    InvalidOfficials(String),

    /// A date string was malformed or named a non-existent calendar date.
    #[error("Invalid date \"{0}\": must be a real date in the format YYYY-MM-DD")]
    InvalidDate(String),

    /// Team references form a cycle.
    ///
    /// Contains the path of references involved, closed on its first entry.
    #[error("Reference cycle detected: {}", format_cycle_path(.path))]
    ReferenceCycle { path: Vec<String> },
}

impl CompetitionError {
    /// Whether this error reports a failed lookup of a stage, group, match
    /// or registry entity.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CompetitionError::UnknownStage(_)
                | CompetitionError::UnknownGroup { .. }
                | CompetitionError::UnknownMatch { .. }
                | CompetitionError::NotFound { .. }
        )
    }

    pub(crate) fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        CompetitionError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub(crate) fn invalid_score(match_id: impl std::fmt::Display, reason: impl Into<String>) -> Self {
        CompetitionError::InvalidScore {
            match_id: match_id.to_string(),
            reason: reason.into(),
        }
    }

    /// Build the duplicate-ID error used by every scoped registry.
    pub(crate) fn duplicate(entity: &str, id: impl std::fmt::Display, scope: &str) -> Self {
        CompetitionError::Validation(format!(
            "{} with ID \"{}\" already exists in the {}",
            entity, id, scope
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CompetitionError::not_found("Team", "TM9");
        assert_eq!(err.to_string(), "Team with ID \"TM9\" not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_duplicate_display() {
        let err = CompetitionError::duplicate("Club", "NOR", "competition");
        let display = err.to_string();
        assert!(display.contains("\"NOR\""));
        assert!(display.contains("already exists"));
    }

    #[test]
    fn test_cycle_error_display() {
        let err = CompetitionError::ReferenceCycle {
            path: vec!["K:F:M1".into(), "K:F:M2".into(), "K:F:M1".into()],
        };
        let display = err.to_string();
        assert!(display.contains("Reference cycle detected"));
        assert!(display.contains("K:F:M1 -> K:F:M2 -> K:F:M1"));
    }

    #[test]
    fn test_not_decided_is_not_not_found() {
        let err = CompetitionError::NotDecidedYet("{L:RR:league:1}".into());
        assert!(!err.is_not_found());
    }
}
