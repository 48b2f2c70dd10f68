//! Matches.
//!
//! A match holds two team slots and an optional score. Its state is
//! derived from the score: with no complete score it is pending; once a
//! complete score passes evaluation it is complete and has an outcome.

use crate::competition::Competition;
use crate::error::{CompetitionError, Result};
use crate::id::Id;
use crate::officials::{MatchManager, MatchOfficials};
use crate::reference::TeamSlot;
use crate::schedule::{Break, Schedule};
use crate::sets::{Evaluation, Outcome, ScoringRules, SetScore, Side};
use tracing::debug;

/// Completion state of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchState {
    /// No complete score has been recorded. Partial scores may be present.
    Pending,
    /// A complete, valid score has been recorded.
    Complete(Evaluation),
}

/// A single match between two team slots.
///
/// # Examples
///
/// ```rust
/// use vbcomp::{Id, Match, ScoringRules, Side, TeamSlot};
///
/// let mut m = Match::new(
///     Id::new("M1").unwrap(),
///     TeamSlot::parse("TM1").unwrap(),
///     TeamSlot::parse("TM2").unwrap(),
/// );
/// assert!(!m.is_complete());
///
/// let rules = ScoringRules::default();
/// m.record_score(&[(25, 17), (25, 19), (25, 21)], &rules).unwrap();
/// assert!(m.is_complete());
/// assert_eq!(m.winner_side().unwrap(), Side::Home);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    id: Id,
    home: TeamSlot,
    away: TeamSlot,
    scores: Vec<SetScore>,
    state: MatchState,
    friendly: bool,
    pub court: Option<String>,
    pub venue: Option<String>,
    pub schedule: Schedule,
    manager: Option<MatchManager>,
    officials: Option<MatchOfficials>,
    pub mvp: Option<String>,
    pub notes: Option<String>,
}

impl Match {
    /// Create a pending match between two slots.
    pub fn new(id: Id, home: TeamSlot, away: TeamSlot) -> Self {
        Self {
            id,
            home,
            away,
            scores: Vec::new(),
            state: MatchState::Pending,
            friendly: false,
            court: None,
            venue: None,
            schedule: Schedule::default(),
            manager: None,
            officials: None,
            mvp: None,
            notes: None,
        }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    /// The home slot as declared, literal or reference.
    pub fn home(&self) -> &TeamSlot {
        &self.home
    }

    pub fn away(&self) -> &TeamSlot {
        &self.away
    }

    /// The slot playing on `side`.
    pub fn slot(&self, side: Side) -> &TeamSlot {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    /// Recorded scores, one pair per set. Empty until something is recorded.
    pub fn scores(&self) -> &[SetScore] {
        &self.scores
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.state, MatchState::Complete(_))
    }

    /// Friendlies count towards completion but not towards league tables.
    pub fn is_friendly(&self) -> bool {
        self.friendly
    }

    pub fn set_friendly(&mut self, friendly: bool) {
        self.friendly = friendly;
    }

    /// Record a complete score.
    ///
    /// The scores are evaluated first; if they are invalid the match is left
    /// exactly as it was.
    pub fn record_score(&mut self, scores: &[SetScore], rules: &ScoringRules) -> Result<Outcome> {
        let evaluation = rules.evaluate(&self.id, scores)?;
        self.scores = scores.to_vec();
        self.state = MatchState::Complete(evaluation);
        debug!(match_id = %self.id, outcome = ?evaluation.outcome, "recorded score");
        Ok(evaluation.outcome)
    }

    /// Record the score of a match still being played. The match stays
    /// pending.
    pub fn record_partial_score(&mut self, scores: &[SetScore], rules: &ScoringRules) -> Result<()> {
        rules.check_partial(&self.id, scores)?;
        self.scores = scores.to_vec();
        self.state = MatchState::Pending;
        Ok(())
    }

    /// Drop any recorded score and return to pending.
    pub fn clear_score(&mut self) {
        self.scores.clear();
        self.state = MatchState::Pending;
    }

    /// Outcome of a complete match.
    pub fn outcome(&self) -> Result<Outcome> {
        self.evaluation().map(|e| e.outcome)
    }

    /// Outcome and set counts of a complete match, or `NotComplete`.
    pub fn evaluation(&self) -> Result<Evaluation> {
        match self.state {
            MatchState::Complete(evaluation) => Ok(evaluation),
            MatchState::Pending => Err(CompetitionError::NotComplete(self.id.to_string())),
        }
    }

    /// The winning side.
    ///
    /// # Errors
    ///
    /// * `NotComplete` while the match is pending
    /// * a validation error if the match was drawn
    pub fn winner_side(&self) -> Result<Side> {
        self.outcome()?.winner().ok_or_else(|| self.drawn())
    }

    /// The losing side. Fails like [`Match::winner_side`].
    pub fn loser_side(&self) -> Result<Side> {
        self.outcome()?.loser().ok_or_else(|| self.drawn())
    }

    fn drawn(&self) -> CompetitionError {
        CompetitionError::Validation(format!(
            "Match \"{}\" ended in a draw and has no winner or loser",
            self.id
        ))
    }

    /// Resolve the winning team against its competition.
    pub fn winner_team_id(&self, competition: &Competition) -> Result<Id> {
        competition.resolve_slot(self.slot(self.winner_side()?))
    }

    /// Resolve the losing team against its competition.
    pub fn loser_team_id(&self, competition: &Competition) -> Result<Id> {
        competition.resolve_slot(self.slot(self.loser_side()?))
    }

    /// The match manager, if one is assigned.
    pub fn manager(&self) -> Option<&MatchManager> {
        self.manager.as_ref()
    }

    pub fn manager_mut(&mut self) -> Option<&mut MatchManager> {
        self.manager.as_mut()
    }

    /// Assign or clear the match manager.
    pub fn set_manager(&mut self, manager: Option<MatchManager>) {
        self.manager = manager;
    }

    /// The officials, if any are assigned.
    pub fn officials(&self) -> Option<&MatchOfficials> {
        self.officials.as_ref()
    }

    pub fn officials_mut(&mut self) -> Option<&mut MatchOfficials> {
        self.officials.as_mut()
    }

    /// Assign or clear the officials.
    pub fn set_officials(&mut self, officials: Option<MatchOfficials>) {
        self.officials = officials;
    }

    /// Every team slot this match mentions: both sides, plus manager and
    /// officials when a team holds those roles.
    pub fn slots(&self) -> Vec<&TeamSlot> {
        let mut slots = vec![&self.home, &self.away];
        slots.extend(self.manager.as_ref().and_then(MatchManager::team_slot));
        slots.extend(self.officials.as_ref().and_then(MatchOfficials::team_slot));
        slots
    }
}

/// An entry in a group's ordered match list.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupEntry {
    Match(Match),
    Break(Break),
}

impl GroupEntry {
    pub fn as_match(&self) -> Option<&Match> {
        match self {
            GroupEntry::Match(m) => Some(m),
            GroupEntry::Break(_) => None,
        }
    }

    pub fn as_match_mut(&mut self) -> Option<&mut Match> {
        match self {
            GroupEntry::Match(m) => Some(m),
            GroupEntry::Break(_) => None,
        }
    }
}
