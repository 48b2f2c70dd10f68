//! Players and their team affiliations.

use crate::error::Result;
use crate::id::Id;
use crate::schedule::parse_date;
use chrono::NaiveDate;

/// A period during which a player played for a team.
///
/// `until` is open-ended when absent.
///
/// # Examples
///
/// ```rust
/// use vbcomp::{Id, PlayerTeam};
///
/// let mut entry = PlayerTeam::new(Id::new("TM1").unwrap());
/// entry.set_from("2024-01-01").unwrap();
/// entry.set_until("2024-06-30").unwrap();
///
/// assert!(entry.set_until("2024-02-30").is_err());
/// assert_eq!(entry.until().unwrap().to_string(), "2024-06-30");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerTeam {
    team: Id,
    from: Option<NaiveDate>,
    until: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl PlayerTeam {
    /// An open-ended affiliation with `team`.
    pub fn new(team: Id) -> Self {
        Self {
            team,
            from: None,
            until: None,
            notes: None,
        }
    }

    pub fn team_id(&self) -> &Id {
        &self.team
    }

    /// First day of the affiliation, if known.
    pub fn from(&self) -> Option<NaiveDate> {
        self.from
    }

    /// Last day of the affiliation. `None` means still current.
    pub fn until(&self) -> Option<NaiveDate> {
        self.until
    }

    /// Set the start date. An invalid date leaves the previous value.
    pub fn set_from(&mut self, date: &str) -> Result<()> {
        self.from = Some(parse_date(date)?);
        Ok(())
    }

    /// Set the end date. An invalid date leaves the previous value.
    pub fn set_until(&mut self, date: &str) -> Result<()> {
        self.until = Some(parse_date(date)?);
        Ok(())
    }

    pub fn clear_until(&mut self) {
        self.until = None;
    }

    /// Whether the affiliation covers `date`.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| from <= date) && self.until.map_or(true, |until| date <= until)
    }
}

/// A registered player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    id: Id,
    pub name: String,
    pub number: Option<u32>,
    pub notes: Option<String>,
    teams: Vec<PlayerTeam>,
}

impl Player {
    pub fn new(id: Id, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            number: None,
            notes: None,
            teams: Vec::new(),
        }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    /// Affiliations in the order they were appended.
    pub fn teams(&self) -> &[PlayerTeam] {
        &self.teams
    }

    pub fn teams_mut(&mut self) -> &mut [PlayerTeam] {
        &mut self.teams
    }

    /// Append an affiliation. Later entries win in [`Player::team_on`].
    ///
    /// Does not check that the team exists; use
    /// [`Competition::add_player_team`](crate::Competition::add_player_team) for that.
    pub fn append_team_entry(&mut self, entry: PlayerTeam) {
        self.teams.push(entry);
    }

    /// The latest-appended affiliation active on `date`.
    pub fn team_on(&self, date: NaiveDate) -> Option<&Id> {
        self.teams
            .iter()
            .rev()
            .find(|t| t.is_active_on(date))
            .map(PlayerTeam::team_id)
    }

    /// Whether any affiliation, past or present, names `team`.
    pub fn has_played_for(&self, team: &Id) -> bool {
        self.teams.iter().any(|t| &t.team == team)
    }
}
