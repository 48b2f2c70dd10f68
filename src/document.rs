//! Competition documents.
//!
//! The on-disk shape of a competition, as `serde` types with camelCase
//! keys, and the one-pass build that turns a document into a validated
//! [`Competition`]. The build registers clubs, then teams, then players,
//! then stages, in declaration order, and stops at the first violation;
//! a document is never partially applied.
//!
//! Match entries in a group carry a `type` of `match` or `break`:
//!
//! ```json
//! { "type": "match", "id": "M1", "homeTeam": "TM1", "awayTeam": "{L:P1:league:1}",
//!   "scores": { "home": [25, 25, 25], "away": [20, 19, 23] } }
//! ```

use crate::competition::Competition;
use crate::error::{CompetitionError, Result};
use crate::group::{Group, GroupKind, GroupType, KnockoutConfig};
use crate::id::Id;
use crate::matches::Match;
use crate::officials::{MatchManager, MatchOfficials, OfficialPersons};
use crate::player::{Player, PlayerTeam};
use crate::reference::TeamSlot;
use crate::schedule::{Break, Schedule};
use crate::sets::{MatchType, SetConfig, SetScore};
use crate::stage::Stage;
use crate::standings::LeagueConfig;
use crate::team::{Club, CompetitionTeam, Contact, ContactRole};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionDocument {
    pub name: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub clubs: Vec<ClubDocument>,
    #[serde(default)]
    pub teams: Vec<TeamDocument>,
    #[serde(default)]
    pub players: Vec<PlayerDocument>,
    #[serde(default)]
    pub stages: Vec<StageDocument>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubDocument {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDocument {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub club: Option<Id>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub contacts: Vec<ContactDocument>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDocument {
    pub id: Id,
    #[serde(default)]
    pub name: Option<String>,
    pub roles: Vec<ContactRole>,
    #[serde(default)]
    pub emails: Vec<String>,
    #[serde(default)]
    pub phones: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDocument {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub teams: Vec<PlayerTeamDocument>,
}

/// One affiliation of a player: the team ID and an optional date range.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerTeamDocument {
    pub id: Id,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub until: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageDocument {
    pub id: Id,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub groups: Vec<GroupDocument>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDocument {
    pub id: Id,
    #[serde(rename = "type")]
    pub group_type: GroupType,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub match_type: MatchType,
    #[serde(default)]
    pub sets: SetConfig,
    #[serde(default)]
    pub draws_allowed: bool,
    /// League ranking settings; league groups only.
    #[serde(default)]
    pub league: Option<LeagueConfig>,
    /// Final positions as team slots; knockout groups only.
    #[serde(default)]
    pub standing: Vec<String>,
    #[serde(default)]
    pub matches: Vec<EntryDocument>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntryDocument {
    Match(MatchDocument),
    Break(BreakDocument),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDocument {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub warmup: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
}

impl ScheduleDocument {
    fn build(&self) -> Result<Schedule> {
        let mut schedule = Schedule::default();
        if let Some(date) = &self.date {
            schedule.set_date(date)?;
        }
        if let Some(warmup) = &self.warmup {
            schedule.set_warmup(warmup)?;
        }
        if let Some(start) = &self.start {
            schedule.set_start(start)?;
        }
        if let Some(duration) = &self.duration {
            schedule.set_duration(duration)?;
        }
        Ok(schedule)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakDocument {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub schedule: ScheduleDocument,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoresDocument {
    #[serde(default)]
    pub home: Vec<i32>,
    #[serde(default)]
    pub away: Vec<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManagerDocument {
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficialsDocument {
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub first: Option<String>,
    #[serde(default)]
    pub second: Option<String>,
    #[serde(default)]
    pub challenge: Option<String>,
    #[serde(default)]
    pub assistant_challenge: Option<String>,
    #[serde(default)]
    pub reserve: Option<String>,
    #[serde(default)]
    pub scorer: Option<String>,
    #[serde(default)]
    pub assistant_scorer: Option<String>,
    #[serde(default)]
    pub linespersons: Vec<String>,
    #[serde(default)]
    pub ball_crew: Vec<String>,
}

impl OfficialsDocument {
    fn has_persons(&self) -> bool {
        self.first.is_some()
            || self.second.is_some()
            || self.challenge.is_some()
            || self.assistant_challenge.is_some()
            || self.reserve.is_some()
            || self.scorer.is_some()
            || self.assistant_scorer.is_some()
            || !self.linespersons.is_empty()
            || !self.ball_crew.is_empty()
    }

    fn build(self, context: &str) -> Result<MatchOfficials> {
        let persons = if self.has_persons() {
            Some(OfficialPersons {
                first: self.first.unwrap_or_default(),
                second: self.second,
                challenge: self.challenge,
                assistant_challenge: self.assistant_challenge,
                reserve: self.reserve,
                scorer: self.scorer,
                assistant_scorer: self.assistant_scorer,
                linespersons: self.linespersons,
                ball_crew: self.ball_crew,
            })
        } else {
            None
        };
        let team = self
            .team
            .as_deref()
            .map(|t| TeamSlot::parse_in(t, context))
            .transpose()?;
        MatchOfficials::from_parts(team, persons)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDocument {
    pub id: Id,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub scores: ScoresDocument,
    /// `false` records the scores as a match still in progress.
    #[serde(default)]
    pub complete: Option<bool>,
    #[serde(default)]
    pub friendly: bool,
    #[serde(default)]
    pub court: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(flatten)]
    pub schedule: ScheduleDocument,
    #[serde(default)]
    pub manager: Option<ManagerDocument>,
    #[serde(default)]
    pub officials: Option<OfficialsDocument>,
    #[serde(default)]
    pub mvp: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl MatchDocument {
    /// Build the match and record any scores under `group`'s rules.
    fn build(self, group: &Group) -> Result<Match> {
        let context = format!("match \"{}\"", self.id);
        let home = TeamSlot::parse_in(&self.home_team, &context)?;
        let away = TeamSlot::parse_in(&self.away_team, &context)?;

        let mut m = Match::new(self.id.clone(), home, away);
        m.set_friendly(self.friendly);
        m.court = self.court;
        m.venue = self.venue;
        m.mvp = self.mvp;
        m.notes = self.notes;
        m.schedule = self.schedule.build()?;

        if let Some(manager) = self.manager {
            let team = manager
                .team
                .as_deref()
                .map(|t| TeamSlot::parse_in(t, &context))
                .transpose()?;
            m.set_manager(Some(MatchManager::from_parts(team, manager.name)?));
        }
        if let Some(officials) = self.officials {
            m.set_officials(Some(officials.build(&context)?));
        }

        if self.scores.home.len() != self.scores.away.len() {
            return Err(CompetitionError::invalid_score(
                &self.id,
                format!(
                    "{} home scores but {} away scores",
                    self.scores.home.len(),
                    self.scores.away.len()
                ),
            ));
        }
        let scores: Vec<SetScore> = self
            .scores
            .home
            .iter()
            .copied()
            .zip(self.scores.away.iter().copied())
            .collect();

        let rules = group.rules();
        match self.complete {
            Some(false) => m.record_partial_score(&scores, &rules)?,
            Some(true) => {
                m.record_score(&scores, &rules)?;
            }
            None if !scores.is_empty() => {
                m.record_score(&scores, &rules)?;
            }
            None => {}
        }
        Ok(m)
    }
}

impl GroupDocument {
    fn build(self) -> Result<Group> {
        let invalid = |what: &str| {
            CompetitionError::Validation(format!(
                "Group \"{}\" is not a {} group and cannot have {}",
                self.id,
                if what == "standing" { "knockout" } else { "league" },
                what
            ))
        };
        if self.group_type != GroupType::League && self.league.is_some() {
            return Err(invalid("league settings"));
        }
        if self.group_type != GroupType::Knockout && !self.standing.is_empty() {
            return Err(invalid("standing"));
        }

        let kind = match self.group_type {
            GroupType::League => GroupKind::League(self.league.unwrap_or_default()),
            GroupType::Crossover => GroupKind::Crossover,
            GroupType::Knockout => {
                let context = format!("group \"{}\" standing", self.id);
                let standing = self
                    .standing
                    .iter()
                    .map(|s| TeamSlot::parse_in(s, &context))
                    .collect::<Result<Vec<_>>>()?;
                GroupKind::Knockout(KnockoutConfig { standing })
            }
        };

        let mut group = Group::new(self.id, kind, self.match_type);
        group.name = self.name;
        group.notes = self.notes;
        group.set_set_config(self.sets)?;
        group.set_draws_allowed(self.draws_allowed)?;

        for entry in self.matches {
            match entry {
                EntryDocument::Match(doc) => {
                    let m = doc.build(&group)?;
                    group.add_match(m)?;
                }
                EntryDocument::Break(doc) => {
                    let mut b = Break::new(doc.name);
                    b.schedule = doc.schedule.build()?;
                    group.add_break(b);
                }
            }
        }
        Ok(group)
    }
}

impl StageDocument {
    fn build(self) -> Result<Stage> {
        let mut stage = Stage::new(self.id);
        stage.name = self.name;
        stage.notes = self.notes;
        for group in self.groups {
            stage.add_group(group.build()?)?;
        }
        Ok(stage)
    }
}

impl TeamDocument {
    fn build(self) -> Result<CompetitionTeam> {
        let mut team = CompetitionTeam::new(self.id, self.name);
        team.notes = self.notes;
        team.club = self.club;
        for doc in self.contacts {
            let mut contact = Contact::new(doc.id, doc.roles)?;
            contact.name = doc.name;
            contact.emails = doc.emails;
            contact.phones = doc.phones;
            team.add_contact(contact)?;
        }
        Ok(team)
    }
}

impl PlayerDocument {
    fn build(self) -> Result<Player> {
        let mut player = Player::new(self.id, self.name);
        player.number = self.number;
        player.notes = self.notes;
        for doc in self.teams {
            let mut entry = PlayerTeam::new(doc.id);
            if let Some(from) = &doc.from {
                entry.set_from(from)?;
            }
            if let Some(until) = &doc.until {
                entry.set_until(until)?;
            }
            entry.notes = doc.notes;
            player.append_team_entry(entry);
        }
        Ok(player)
    }
}

impl Competition {
    /// Build a competition from a parsed document.
    pub fn from_document(doc: CompetitionDocument) -> Result<Self> {
        debug!(
            name = %doc.name,
            clubs = doc.clubs.len(),
            teams = doc.teams.len(),
            players = doc.players.len(),
            stages = doc.stages.len(),
            "loading competition"
        );
        let mut competition = Competition::new(doc.name);
        competition.notes = doc.notes;

        for club in doc.clubs {
            let mut c = Club::new(club.id, club.name);
            c.notes = club.notes;
            competition.add_club(c)?;
        }
        for team in doc.teams {
            competition.add_team(team.build()?)?;
        }
        for player in doc.players {
            competition.add_player(player.build()?)?;
        }
        for stage in doc.stages {
            competition.add_stage(stage.build()?)?;
        }
        Ok(competition)
    }

    /// Parse a JSON competition document and build it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vbcomp::Competition;
    ///
    /// let competition = Competition::from_json_str(r#"{
    ///     "name": "Friendly Cup",
    ///     "teams": [{ "id": "TM1", "name": "Team 1" }, { "id": "TM2", "name": "Team 2" }],
    ///     "stages": [{
    ///         "id": "F",
    ///         "groups": [{
    ///             "id": "KO",
    ///             "type": "knockout",
    ///             "standing": ["{F:KO:FIN:winner}", "{F:KO:FIN:loser}"],
    ///             "matches": [{
    ///                 "type": "match", "id": "FIN", "homeTeam": "TM1", "awayTeam": "TM2",
    ///                 "scores": { "home": [25, 22, 25, 25], "away": [20, 25, 18, 23] }
    ///             }]
    ///         }]
    ///     }]
    /// }"#).unwrap();
    ///
    /// assert_eq!(competition.get_team("{F:KO:1}").unwrap().name, "Team 1");
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let doc: CompetitionDocument = serde_json::from_str(json)
            .map_err(|e| CompetitionError::Validation(format!("Invalid competition document: {}", e)))?;
        Self::from_document(doc)
    }
}
