//! Team slot resolver.
//!
//! Turns a team slot into a concrete team ID. Literals are looked up in the
//! competition's team registry. References are followed to their stage and
//! group, and the group answers the target, resolving any slots of its own
//! along the way.
//!
//! There is no cache: every resolution re-derives its answer from the
//! current match scores, so results always reflect the live model. The
//! resolver keeps the chain of references it is currently following and
//! fails with [`CompetitionError::ReferenceCycle`] instead of recursing
//! forever if a reference leads back to itself.

use crate::competition::Competition;
use crate::error::{CompetitionError, Result};
use crate::id::Id;
use crate::reference::{Reference, TeamSlot};
use tracing::trace;

/// A single resolution pass over a competition.
///
/// # Examples
///
/// ```rust
/// use vbcomp::{Competition, CompetitionTeam, Id, TeamSlot};
/// use vbcomp::resolver::Resolver;
///
/// let mut competition = Competition::new("Cup");
/// competition.add_team(CompetitionTeam::new(Id::new("TM1").unwrap(), "Team 1")).unwrap();
///
/// let mut resolver = Resolver::new(&competition);
/// let team = resolver.resolve_slot(&TeamSlot::parse("TM1").unwrap()).unwrap();
/// assert_eq!(team.as_str(), "TM1");
/// ```
pub struct Resolver<'a> {
    competition: &'a Competition,
    /// References currently being followed, outermost first.
    path: Vec<Reference>,
}

impl<'a> Resolver<'a> {
    /// Start a resolution against `competition` with an empty path.
    pub fn new(competition: &'a Competition) -> Self {
        Self {
            competition,
            path: Vec::new(),
        }
    }

    pub fn competition(&self) -> &'a Competition {
        self.competition
    }

    /// Resolve a slot to a team registered in the competition.
    pub fn resolve_slot(&mut self, slot: &TeamSlot) -> Result<Id> {
        match slot {
            TeamSlot::Literal(id) => {
                if self.competition.has_team(id) {
                    Ok(id.clone())
                } else {
                    Err(CompetitionError::not_found("Team", id))
                }
            }
            TeamSlot::Reference(reference) => self.resolve_reference(reference),
        }
    }

    /// Follow a reference to its stage and group and ask the group for the
    /// target.
    pub fn resolve_reference(&mut self, reference: &Reference) -> Result<Id> {
        if self.path.contains(reference) {
            let mut path: Vec<String> = self.path.iter().map(Reference::to_string).collect();
            path.push(reference.to_string());
            let start = path.iter().position(|r| *r == path[path.len() - 1]).unwrap_or(0);
            return Err(CompetitionError::ReferenceCycle {
                path: path[start..].to_vec(),
            });
        }

        trace!(reference = %reference, depth = self.path.len(), "resolving reference");
        let competition = self.competition;
        let group = competition
            .get_stage(&reference.stage)?
            .get_group(&reference.group)?;

        self.path.push(reference.clone());
        let resolved = group.resolve(reference, self);
        self.path.pop();

        let team = resolved?;
        trace!(reference = %reference, team = %team, "resolved reference");
        Ok(team)
    }
}
