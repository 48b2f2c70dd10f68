//! Groups.
//!
//! A group is an ordered list of matches (and breaks) inside a stage.
//! The three kinds share the match list and completion rule and differ in
//! how they answer a reference:
//!
//! - **League**: keeps a table; ranks and positions come from it.
//! - **Crossover**: one-off pairings; position `2k-1` is the winner of the
//!   k-th match and `2k` its loser.
//! - **Knockout**: rounds of matches referencing earlier rounds; positions
//!   come from an explicit standing list.

use crate::competition::Competition;
use crate::error::{CompetitionError, Result};
use crate::id::Id;
use crate::matches::{GroupEntry, Match};
use crate::reference::{Reference, SlotTarget, TeamSlot};
use crate::resolver::Resolver;
use crate::schedule::Break;
use crate::sets::{MatchType, Outcome, ScoringRules, SetConfig, SetScore};
use crate::standings::{compute_standings, LeagueConfig, LeagueResult, StandingsRow};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The kind tag of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupType {
    League,
    Crossover,
    Knockout,
}

/// Knockout settings: which slot holds each final position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnockoutConfig {
    pub standing: Vec<TeamSlot>,
}

/// A group kind with its kind-specific configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupKind {
    League(LeagueConfig),
    Crossover,
    Knockout(KnockoutConfig),
}

impl GroupKind {
    /// The plain type tag of this kind.
    pub fn group_type(&self) -> GroupType {
        match self {
            GroupKind::League(_) => GroupType::League,
            GroupKind::Crossover => GroupType::Crossover,
            GroupKind::Knockout(_) => GroupType::Knockout,
        }
    }
}

/// A group of matches within a stage.
#[derive(Debug, Clone)]
pub struct Group {
    id: Id,
    pub name: Option<String>,
    pub notes: Option<String>,
    kind: GroupKind,
    entries: Vec<GroupEntry>,
    match_index: HashMap<Id, usize>,
    set_config: SetConfig,
    match_type: MatchType,
    draws_allowed: bool,
}

impl Group {
    /// Create an empty group.
    ///
    /// Scoring starts from [`SetConfig::default`] with draws disallowed.
    pub fn new(id: Id, kind: GroupKind, match_type: MatchType) -> Self {
        Self {
            id,
            name: None,
            notes: None,
            kind,
            entries: Vec::new(),
            match_index: HashMap::new(),
            set_config: SetConfig::default(),
            match_type,
            draws_allowed: false,
        }
    }

    /// Create a league group played in sets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vbcomp::{Group, GroupType, Id, LeagueConfig};
    ///
    /// let group = Group::league(Id::new("P1").unwrap(), LeagueConfig::default());
    /// assert_eq!(group.group_type(), GroupType::League);
    /// assert!(group.is_complete());
    /// ```
    pub fn league(id: Id, config: LeagueConfig) -> Self {
        Self::new(id, GroupKind::League(config), MatchType::Sets)
    }

    /// Create a crossover group played in sets.
    pub fn crossover(id: Id) -> Self {
        Self::new(id, GroupKind::Crossover, MatchType::Sets)
    }

    /// Create a knockout group with its final standing.
    pub fn knockout(id: Id, config: KnockoutConfig) -> Self {
        Self::new(id, GroupKind::Knockout(config), MatchType::Sets)
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    /// The group kind with its configuration.
    pub fn kind(&self) -> &GroupKind {
        &self.kind
    }

    pub fn group_type(&self) -> GroupType {
        self.kind.group_type()
    }

    pub fn match_type(&self) -> MatchType {
        self.match_type
    }

    /// The scoring configuration for this group's matches.
    pub fn set_config(&self) -> &SetConfig {
        &self.set_config
    }

    /// Replace the scoring configuration. Scores already recorded are not
    /// re-evaluated.
    pub fn set_set_config(&mut self, config: SetConfig) -> Result<()> {
        config.validate()?;
        self.set_config = config;
        Ok(())
    }

    /// Whether a match in this group may end level.
    pub fn draws_allowed(&self) -> bool {
        self.draws_allowed
    }

    /// Only league groups may allow draws.
    pub fn set_draws_allowed(&mut self, allowed: bool) -> Result<()> {
        if allowed && self.group_type() != GroupType::League {
            return Err(CompetitionError::Validation(format!(
                "Group \"{}\" is not a league and cannot allow draws",
                self.id
            )));
        }
        self.draws_allowed = allowed;
        Ok(())
    }

    /// The rules every score in this group is checked against.
    pub fn rules(&self) -> ScoringRules {
        ScoringRules::new(self.set_config, self.match_type, self.draws_allowed)
    }

    /// Append a match to the end of the entry list.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the group already has a match with this ID.
    pub fn add_match(&mut self, m: Match) -> Result<()> {
        if self.match_index.contains_key(m.id()) {
            return Err(CompetitionError::duplicate("Match", m.id(), "group"));
        }
        self.match_index.insert(m.id().clone(), self.entries.len());
        self.entries.push(GroupEntry::Match(m));
        Ok(())
    }

    /// Append a break to the end of the entry list.
    pub fn add_break(&mut self, b: Break) {
        self.entries.push(GroupEntry::Break(b));
    }

    /// Matches and breaks in declaration order.
    pub fn entries(&self) -> &[GroupEntry] {
        &self.entries
    }

    /// Matches in declaration order, skipping breaks.
    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.entries.iter().filter_map(GroupEntry::as_match)
    }

    pub fn has_match(&self, id: &Id) -> bool {
        self.match_index.contains_key(id)
    }

    /// Position of a match in the entry list, breaks included.
    pub(crate) fn match_position(&self, id: &Id) -> Option<usize> {
        self.match_index.get(id).copied()
    }

    /// Look up a match, failing with `UnknownMatch`.
    pub fn get_match(&self, id: &Id) -> Result<&Match> {
        self.match_index
            .get(id)
            .and_then(|&i| self.entries[i].as_match())
            .ok_or_else(|| self.unknown_match(id))
    }

    /// Mutable form of [`Group::get_match`].
    pub fn get_match_mut(&mut self, id: &Id) -> Result<&mut Match> {
        let unknown = self.unknown_match(id);
        let Some(&i) = self.match_index.get(id) else {
            return Err(unknown);
        };
        self.entries[i].as_match_mut().ok_or(unknown)
    }

    fn unknown_match(&self, id: &Id) -> CompetitionError {
        CompetitionError::UnknownMatch {
            group: self.id.to_string(),
            id: id.to_string(),
        }
    }

    /// Record a complete score for one of this group's matches under the
    /// group's scoring rules.
    pub fn record_score(&mut self, match_id: &Id, scores: &[SetScore]) -> Result<Outcome> {
        let rules = self.rules();
        self.get_match_mut(match_id)?.record_score(scores, &rules)
    }

    /// Record an in-progress score. The match stays pending.
    pub fn record_partial_score(&mut self, match_id: &Id, scores: &[SetScore]) -> Result<()> {
        let rules = self.rules();
        self.get_match_mut(match_id)?.record_partial_score(scores, &rules)
    }

    /// True when every match is complete. Breaks are ignored.
    pub fn is_complete(&self) -> bool {
        self.matches().all(Match::is_complete)
    }

    /// Every team playing in this group, in order of first appearance.
    pub fn teams(&self, competition: &Competition) -> Result<Vec<Id>> {
        self.teams_with(&mut Resolver::new(competition), false)
    }

    /// The current league table. Only league groups have one.
    pub fn standings(&self, competition: &Competition) -> Result<Vec<StandingsRow>> {
        self.standings_with(&mut Resolver::new(competition))
    }

    fn teams_with(&self, resolver: &mut Resolver<'_>, skip_friendlies: bool) -> Result<Vec<Id>> {
        let mut teams: Vec<Id> = Vec::new();
        for m in self.matches().filter(|m| !(skip_friendlies && m.is_friendly())) {
            for slot in [m.home(), m.away()] {
                let team = resolver.resolve_slot(slot)?;
                if !teams.contains(&team) {
                    teams.push(team);
                }
            }
        }
        Ok(teams)
    }

    pub(crate) fn standings_with(&self, resolver: &mut Resolver<'_>) -> Result<Vec<StandingsRow>> {
        let GroupKind::League(config) = &self.kind else {
            return Err(CompetitionError::Validation(format!(
                "Group \"{}\" is not a league and has no standings",
                self.id
            )));
        };

        let teams = self.teams_with(resolver, true)?;
        let mut results = Vec::new();
        for m in self.matches().filter(|m| !m.is_friendly() && m.is_complete()) {
            results.push(LeagueResult {
                home: resolver.resolve_slot(m.home())?,
                away: resolver.resolve_slot(m.away())?,
                evaluation: m.evaluation()?,
                scores: m.scores().to_vec(),
            });
        }
        Ok(compute_standings(&teams, &results, self.match_type, config))
    }

    /// Answer a reference aimed at this group.
    pub(crate) fn resolve(&self, reference: &Reference, resolver: &mut Resolver<'_>) -> Result<Id> {
        let not_decided = || CompetitionError::NotDecidedYet(reference.to_string());
        if let SlotTarget::Rank(0) | SlotTarget::Position(0) = reference.target {
            return Err(self.no_position(0));
        }

        match &reference.target {
            SlotTarget::Winner(match_id) | SlotTarget::Loser(match_id) => {
                let m = self.get_match(match_id)?;
                if !m.is_complete() {
                    return Err(not_decided());
                }
                let side = match reference.target {
                    SlotTarget::Winner(_) => m.winner_side()?,
                    _ => m.loser_side()?,
                };
                resolver.resolve_slot(m.slot(side))
            }
            SlotTarget::Rank(position) => match &self.kind {
                GroupKind::League(_) => self.league_position(*position, reference, resolver),
                _ => Err(CompetitionError::Validation(format!(
                    "Cannot resolve {}: group \"{}\" is not a league",
                    reference, self.id
                ))),
            },
            SlotTarget::Position(position) => match &self.kind {
                GroupKind::League(_) => self.league_position(*position, reference, resolver),
                GroupKind::Crossover => {
                    let m = self
                        .matches()
                        .nth((position - 1) / 2)
                        .ok_or_else(|| self.no_position(*position))?;
                    if !self.is_complete() {
                        return Err(not_decided());
                    }
                    let side = if position % 2 == 1 { m.winner_side()? } else { m.loser_side()? };
                    resolver.resolve_slot(m.slot(side))
                }
                GroupKind::Knockout(config) => {
                    let slot = config
                        .standing
                        .get(position - 1)
                        .ok_or_else(|| self.no_position(*position))?;
                    if !self.is_complete() {
                        return Err(not_decided());
                    }
                    resolver.resolve_slot(slot)
                }
            },
        }
    }

    fn league_position(&self, position: usize, reference: &Reference, resolver: &mut Resolver<'_>) -> Result<Id> {
        if !self.is_complete() {
            return Err(CompetitionError::NotDecidedYet(reference.to_string()));
        }
        let table = self.standings_with(resolver)?;
        table
            .into_iter()
            .nth(position - 1)
            .map(|row| row.team)
            .ok_or_else(|| self.no_position(position))
    }

    fn no_position(&self, position: usize) -> CompetitionError {
        CompetitionError::not_found(&format!("Group \"{}\" position", self.id), position)
    }

    /// Every slot in this group that may hold a reference, with the entry
    /// index it belongs to (`None` for group-level slots).
    pub(crate) fn slots(&self) -> Vec<(Option<usize>, &TeamSlot)> {
        let mut slots = Vec::new();
        for (idx, entry) in self.entries.iter().enumerate() {
            if let GroupEntry::Match(m) = entry {
                slots.extend(m.slots().into_iter().map(|s| (Some(idx), s)));
            }
        }
        if let GroupKind::Knockout(config) = &self.kind {
            slots.extend(config.standing.iter().map(|s| (None, s)));
        }
        slots
    }
}
