//! Team reference grammar.
//!
//! A team slot is either a literal team ID or a placeholder naming the
//! outcome of another part of the competition:
//!
//! ```text
//! {STAGE:GROUP:MATCH:winner}     winner of a match
//! {STAGE:GROUP:MATCH:loser}      loser of a match
//! {STAGE:GROUP:league:N}         team ranked N in a league group
//! {STAGE:GROUP:N}                team in position N of a group
//! ```
//!
//! Parsing is pure. It never checks that the named stage, group or match
//! exists; that happens when the slot is resolved.

use crate::error::{CompetitionError, Result};
use crate::id::Id;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Longest piece of an offending reference echoed back in error messages.
const MAX_ECHO: usize = 30;

/// What a reference asks of the group it names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SlotTarget {
    /// The winning team of a match.
    Winner(Id),
    /// The losing team of a match.
    Loser(Id),
    /// League table position (1-based).
    Rank(usize),
    /// Group position (1-based), interpreted by the group kind.
    Position(usize),
}

impl SlotTarget {
    /// The match this target depends on, if it names one.
    pub fn match_id(&self) -> Option<&Id> {
        match self {
            SlotTarget::Winner(id) | SlotTarget::Loser(id) => Some(id),
            SlotTarget::Rank(_) | SlotTarget::Position(_) => None,
        }
    }
}

/// A placeholder naming a stage, a group within it, and a target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub stage: Id,
    pub group: Id,
    pub target: SlotTarget,
}

impl Reference {
    /// Build a reference from its parts.
    pub fn new(stage: Id, group: Id, target: SlotTarget) -> Self {
        Self {
            stage,
            group,
            target,
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            SlotTarget::Winner(m) => write!(f, "{{{}:{}:{}:winner}}", self.stage, self.group, m),
            SlotTarget::Loser(m) => write!(f, "{{{}:{}:{}:loser}}", self.stage, self.group, m),
            SlotTarget::Rank(n) => write!(f, "{{{}:{}:league:{}}}", self.stage, self.group, n),
            SlotTarget::Position(n) => write!(f, "{{{}:{}:{}}}", self.stage, self.group, n),
        }
    }
}

/// A match side: a literal team or an unresolved reference.
///
/// # Examples
///
/// ```rust
/// use vbcomp::{SlotTarget, TeamSlot};
///
/// let slot = TeamSlot::parse("{C:CO:CO1:winner}").unwrap();
/// match &slot {
///     TeamSlot::Reference(r) => {
///         assert_eq!(r.stage.as_str(), "C");
///         assert!(matches!(r.target, SlotTarget::Winner(_)));
///     }
///     TeamSlot::Literal(_) => unreachable!(),
/// }
/// assert_eq!(slot.to_string(), "{C:CO:CO1:winner}");
///
/// assert!(TeamSlot::parse("TM1").unwrap().is_literal());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TeamSlot {
    Literal(Id),
    Reference(Reference),
}

impl TeamSlot {
    /// Parse a slot expression with a generic error context.
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_in(text, "team slot")
    }

    /// Parse a slot expression; `context` names the owner (usually a match)
    /// in any error message.
    pub fn parse_in(text: &str, context: &str) -> Result<Self> {
        if !text.contains(['{', '}']) {
            return Id::new(text).map(TeamSlot::Literal);
        }

        let malformed = || CompetitionError::MalformedReference {
            context: context.to_string(),
            reference: truncate(text),
        };

        let inner = text
            .strip_prefix('{')
            .and_then(|t| t.strip_suffix('}'))
            .ok_or_else(malformed)?;
        if inner.contains(['{', '}']) {
            return Err(malformed());
        }

        let fields: Vec<&str> = inner.split(':').collect();
        let id = |s: &str| Id::new(s).map_err(|_| malformed());
        let position = |s: &str| match s.parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(malformed()),
        };

        let (stage, group, target) = match fields.as_slice() {
            [stage, group, pos] => (stage, group, SlotTarget::Position(position(pos)?)),
            [stage, group, "league", pos] => (stage, group, SlotTarget::Rank(position(pos)?)),
            [stage, group, m, "winner"] => (stage, group, SlotTarget::Winner(id(m)?)),
            [stage, group, m, "loser"] => (stage, group, SlotTarget::Loser(id(m)?)),
            _ => return Err(malformed()),
        };

        Ok(TeamSlot::Reference(Reference::new(
            id(stage)?,
            id(group)?,
            target,
        )))
    }

    /// A slot naming a team directly.
    pub fn literal(id: Id) -> Self {
        TeamSlot::Literal(id)
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, TeamSlot::Literal(_))
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, TeamSlot::Reference(_))
    }

    /// The reference, unless this slot is a literal team ID.
    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            TeamSlot::Reference(r) => Some(r),
            TeamSlot::Literal(_) => None,
        }
    }
}

/// Parse a team slot expression. Shorthand for [`TeamSlot::parse`].
pub fn parse_slot(text: &str) -> Result<TeamSlot> {
    TeamSlot::parse(text)
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_ECHO {
        text.to_string()
    } else {
        let mut s: String = text.chars().take(MAX_ECHO).collect();
        s.push_str("...");
        s
    }
}

impl fmt::Display for TeamSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamSlot::Literal(id) => write!(f, "{}", id),
            TeamSlot::Reference(r) => write!(f, "{}", r),
        }
    }
}

impl Serialize for TeamSlot {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TeamSlot {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        TeamSlot::parse(&s).map_err(de::Error::custom)
    }
}
