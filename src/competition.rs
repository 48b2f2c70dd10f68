//! The competition: root owner of stages and the team, club and player
//! registries, and the entry point for team resolution.

use crate::error::{CompetitionError, Result};
use crate::graph::ReferenceGraph;
use crate::group::Group;
use crate::id::Id;
use crate::matches::Match;
use crate::player::{Player, PlayerTeam};
use crate::reference::TeamSlot;
use crate::resolver::Resolver;
use crate::sets::{Outcome, SetScore};
use crate::stage::Stage;
use crate::team::{Club, CompetitionTeam};
use std::collections::HashMap;
use tracing::debug;

/// A whole competition.
///
/// Every collection is keyed by ID and kept in declaration order. Links
/// between entities (team to club, player to team) are IDs looked up
/// through the competition.
///
/// # Examples
///
/// ```rust
/// use vbcomp::{Competition, CompetitionTeam, Group, Id, Match, Stage, TeamSlot};
///
/// let id = |s: &str| Id::new(s).unwrap();
/// let slot = |s: &str| TeamSlot::parse(s).unwrap();
///
/// let mut competition = Competition::new("Summer Cup");
/// competition.add_team(CompetitionTeam::new(id("TM1"), "Team 1")).unwrap();
/// competition.add_team(CompetitionTeam::new(id("TM2"), "Team 2")).unwrap();
///
/// let mut group = Group::crossover(id("CO"));
/// group.add_match(Match::new(id("CO1"), slot("TM1"), slot("TM2"))).unwrap();
/// let mut stage = Stage::new(id("C"));
/// stage.add_group(group).unwrap();
/// competition.add_stage(stage).unwrap();
///
/// assert!(competition.get_team_id("{C:CO:CO1:winner}").is_err());
///
/// competition
///     .record_score(&id("C"), &id("CO"), &id("CO1"), &[(25, 20), (25, 20), (25, 20)])
///     .unwrap();
/// assert_eq!(competition.get_team_id("{C:CO:CO1:winner}").unwrap(), id("TM1"));
/// assert_eq!(competition.get_team("{C:CO:CO1:loser}").unwrap().name, "Team 2");
/// ```
#[derive(Debug, Clone)]
pub struct Competition {
    pub name: String,
    pub notes: Option<String>,
    stages: Vec<Stage>,
    stage_index: HashMap<Id, usize>,
    teams: Vec<CompetitionTeam>,
    team_index: HashMap<Id, usize>,
    clubs: Vec<Club>,
    club_index: HashMap<Id, usize>,
    players: Vec<Player>,
    player_index: HashMap<Id, usize>,
}

impl Competition {
    /// Create an empty competition with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            notes: None,
            stages: Vec::new(),
            stage_index: HashMap::new(),
            teams: Vec::new(),
            team_index: HashMap::new(),
            clubs: Vec::new(),
            club_index: HashMap::new(),
            players: Vec::new(),
            player_index: HashMap::new(),
        }
    }

    // Clubs

    /// Register a club.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a club with the same ID already exists.
    pub fn add_club(&mut self, club: Club) -> Result<()> {
        if self.club_index.contains_key(club.id()) {
            return Err(CompetitionError::duplicate("Club", club.id(), "competition"));
        }
        self.club_index.insert(club.id().clone(), self.clubs.len());
        self.clubs.push(club);
        Ok(())
    }

    /// All clubs in declaration order.
    pub fn clubs(&self) -> &[Club] {
        &self.clubs
    }

    /// Whether a club with this ID is registered.
    pub fn has_club(&self, id: &Id) -> bool {
        self.club_index.contains_key(id)
    }

    /// Look up a club, failing with `NotFound` if it is unknown.
    pub fn get_club_by_id(&self, id: &Id) -> Result<&Club> {
        self.club_index
            .get(id)
            .map(|&i| &self.clubs[i])
            .ok_or_else(|| CompetitionError::not_found("Club", id))
    }

    /// Mutable form of [`Competition::get_club_by_id`].
    pub fn get_club_by_id_mut(&mut self, id: &Id) -> Result<&mut Club> {
        match self.club_index.get(id) {
            Some(&i) => Ok(&mut self.clubs[i]),
            None => Err(CompetitionError::not_found("Club", id)),
        }
    }

    /// Teams belonging to a club, in declaration order.
    pub fn club_teams(&self, club_id: &Id) -> Result<Vec<&CompetitionTeam>> {
        self.get_club_by_id(club_id)?;
        Ok(self
            .teams
            .iter()
            .filter(|t| t.club_id() == Some(club_id))
            .collect())
    }

    // Teams

    /// Register a team. A club named by the team must already exist.
    pub fn add_team(&mut self, team: CompetitionTeam) -> Result<()> {
        if self.team_index.contains_key(team.id()) {
            return Err(CompetitionError::duplicate("Team", team.id(), "competition"));
        }
        if let Some(club) = team.club_id() {
            self.get_club_by_id(club)?;
        }
        self.team_index.insert(team.id().clone(), self.teams.len());
        self.teams.push(team);
        Ok(())
    }

    /// All teams in declaration order.
    pub fn teams(&self) -> &[CompetitionTeam] {
        &self.teams
    }

    /// Whether a team with this ID is registered.
    pub fn has_team(&self, id: &Id) -> bool {
        self.team_index.contains_key(id)
    }

    /// Look up a registered team by its literal ID.
    ///
    /// Use [`Competition::get_team`] to resolve a reference expression.
    pub fn get_team_by_id(&self, id: &Id) -> Result<&CompetitionTeam> {
        self.team_index
            .get(id)
            .map(|&i| &self.teams[i])
            .ok_or_else(|| CompetitionError::not_found("Team", id))
    }

    /// Mutable form of [`Competition::get_team_by_id`].
    pub fn get_team_by_id_mut(&mut self, id: &Id) -> Result<&mut CompetitionTeam> {
        match self.team_index.get(id) {
            Some(&i) => Ok(&mut self.teams[i]),
            None => Err(CompetitionError::not_found("Team", id)),
        }
    }

    /// The club a team belongs to. A team without a club is `Ok(None)`.
    pub fn team_club(&self, team_id: &Id) -> Result<Option<&Club>> {
        match self.get_team_by_id(team_id)?.club_id() {
            Some(club) => self.get_club_by_id(club).map(Some),
            None => Ok(None),
        }
    }

    /// Move a team to another club, or out of any club with `None`.
    pub fn set_team_club(&mut self, team_id: &Id, club_id: Option<Id>) -> Result<()> {
        if let Some(club) = &club_id {
            self.get_club_by_id(club)?;
        }
        self.get_team_by_id_mut(team_id)?.club = club_id;
        Ok(())
    }

    // Players

    /// Register a player. Every team the player is affiliated with must
    /// already exist.
    pub fn add_player(&mut self, player: Player) -> Result<()> {
        if self.player_index.contains_key(player.id()) {
            return Err(CompetitionError::duplicate("Player", player.id(), "competition"));
        }
        for entry in player.teams() {
            self.get_team_by_id(entry.team_id())?;
        }
        self.player_index.insert(player.id().clone(), self.players.len());
        self.players.push(player);
        Ok(())
    }

    /// All players in declaration order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Look up a player, failing with `NotFound` if it is unknown.
    pub fn get_player_by_id(&self, id: &Id) -> Result<&Player> {
        self.player_index
            .get(id)
            .map(|&i| &self.players[i])
            .ok_or_else(|| CompetitionError::not_found("Player", id))
    }

    /// Mutable form of [`Competition::get_player_by_id`].
    pub fn get_player_by_id_mut(&mut self, id: &Id) -> Result<&mut Player> {
        match self.player_index.get(id) {
            Some(&i) => Ok(&mut self.players[i]),
            None => Err(CompetitionError::not_found("Player", id)),
        }
    }

    /// A player's team affiliations, in the order they were appended.
    pub fn player_teams(&self, player_id: &Id) -> Result<&[PlayerTeam]> {
        Ok(self.get_player_by_id(player_id)?.teams())
    }

    /// Append an affiliation to a player after checking the team exists.
    pub fn add_player_team(&mut self, player_id: &Id, entry: PlayerTeam) -> Result<()> {
        self.get_team_by_id(entry.team_id())?;
        self.get_player_by_id_mut(player_id)?.append_team_entry(entry);
        Ok(())
    }

    /// Players who have ever been affiliated with a team.
    pub fn team_players(&self, team_id: &Id) -> Result<Vec<&Player>> {
        self.get_team_by_id(team_id)?;
        Ok(self
            .players
            .iter()
            .filter(|p| p.has_played_for(team_id))
            .collect())
    }

    // Stages

    /// Append a stage after the existing ones.
    ///
    /// The stage's team slots are checked against the registries and the
    /// stages before it. On failure the competition is left unchanged.
    pub fn add_stage(&mut self, stage: Stage) -> Result<()> {
        if self.stage_index.contains_key(stage.id()) {
            return Err(CompetitionError::duplicate("Stage", stage.id(), "competition"));
        }
        self.stage_index.insert(stage.id().clone(), self.stages.len());
        self.stages.push(stage);

        let checked = self
            .stages
            .last()
            .map_or(Ok(()), |stage| self.check_literals(stage))
            .and_then(|_| self.reference_graph());
        if let Err(err) = checked {
            if let Some(stage) = self.stages.pop() {
                self.stage_index.remove(stage.id());
            }
            return Err(err);
        }

        if let Some(stage) = self.stages.last() {
            debug!(
                stage = %stage.id(),
                groups = stage.groups().len(),
                matches = stage.groups().iter().map(|g| g.matches().count()).sum::<usize>(),
                "added stage"
            );
        }
        Ok(())
    }

    /// Stages in declaration order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Whether a stage with this ID exists.
    pub fn has_stage(&self, id: &Id) -> bool {
        self.stage_index.contains_key(id)
    }

    /// Look up a stage, failing with `UnknownStage`.
    pub fn get_stage(&self, id: &Id) -> Result<&Stage> {
        self.stage_index
            .get(id)
            .map(|&i| &self.stages[i])
            .ok_or_else(|| CompetitionError::UnknownStage(id.to_string()))
    }

    /// Mutable access to a stage. Changes made through it are not
    /// re-checked until [`Competition::validate`] is called.
    pub fn get_stage_mut(&mut self, id: &Id) -> Result<&mut Stage> {
        match self.stage_index.get(id) {
            Some(&i) => Ok(&mut self.stages[i]),
            None => Err(CompetitionError::UnknownStage(id.to_string())),
        }
    }

    /// Look up a group by stage and group ID.
    pub fn get_group(&self, stage_id: &Id, group_id: &Id) -> Result<&Group> {
        self.get_stage(stage_id)?.get_group(group_id)
    }

    /// Mutable form of [`Competition::get_group`].
    pub fn get_group_mut(&mut self, stage_id: &Id, group_id: &Id) -> Result<&mut Group> {
        self.get_stage_mut(stage_id)?.get_group_mut(group_id)
    }

    /// Look up a match by its full path.
    ///
    /// # Arguments
    ///
    /// * `stage_id` - The stage holding the group
    /// * `group_id` - The group holding the match
    /// * `match_id` - The match itself
    ///
    /// # Errors
    ///
    /// `UnknownStage`, `UnknownGroup` or `UnknownMatch` for the first part of
    /// the path that does not exist.
    pub fn get_match(&self, stage_id: &Id, group_id: &Id, match_id: &Id) -> Result<&Match> {
        self.get_group(stage_id, group_id)?.get_match(match_id)
    }

    /// Mutable form of [`Competition::get_match`].
    pub fn get_match_mut(&mut self, stage_id: &Id, group_id: &Id, match_id: &Id) -> Result<&mut Match> {
        self.get_group_mut(stage_id, group_id)?.get_match_mut(match_id)
    }

    /// Record a complete score under the owning group's scoring rules.
    pub fn record_score(
        &mut self,
        stage_id: &Id,
        group_id: &Id,
        match_id: &Id,
        scores: &[SetScore],
    ) -> Result<Outcome> {
        self.get_group_mut(stage_id, group_id)?.record_score(match_id, scores)
    }

    /// True when every stage is complete.
    pub fn is_complete(&self) -> bool {
        self.stages.iter().all(Stage::is_complete)
    }

    // Resolution

    /// Resolve a slot to the ID of a registered team.
    pub fn resolve_slot(&self, slot: &TeamSlot) -> Result<Id> {
        Resolver::new(self).resolve_slot(slot)
    }

    /// Resolve a team expression (a literal team ID or a reference) to a
    /// team ID. Nothing is cached, so the answer always reflects the
    /// current scores.
    pub fn get_team_id(&self, expression: &str) -> Result<Id> {
        let slot = TeamSlot::parse_in(expression, "team lookup")?;
        self.resolve_slot(&slot)
    }

    /// Resolve a team expression to the registered team.
    pub fn get_team(&self, expression: &str) -> Result<&CompetitionTeam> {
        let id = self.get_team_id(expression)?;
        self.get_team_by_id(&id)
    }

    /// Re-run the structural checks over the whole competition.
    ///
    /// Needed after changing stages through mutable access.
    pub fn validate(&self) -> Result<()> {
        for stage in &self.stages {
            self.check_literals(stage)?;
        }
        self.reference_graph().map(|_| ())
    }

    /// Build and cycle-check the reference graph of every stage.
    pub fn reference_graph(&self) -> Result<ReferenceGraph> {
        let graph = ReferenceGraph::build(&self.stages)?;
        graph.detect_cycles()?;
        Ok(graph)
    }

    fn check_literals(&self, stage: &Stage) -> Result<()> {
        for group in stage.groups() {
            for (_, slot) in group.slots() {
                if let TeamSlot::Literal(id) = slot {
                    if !self.has_team(id) {
                        return Err(CompetitionError::not_found("Team", id));
                    }
                }
            }
        }
        Ok(())
    }
}
