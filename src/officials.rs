//! Match manager and match officials.
//!
//! Both are "team or person" values: either a team (usually a reference
//! such as the loser of an earlier match) does the job, or named people
//! do. They are modelled as enums so the two modes can never be mixed;
//! switching mode replaces the whole value.

use crate::error::{CompetitionError, Result};
use crate::reference::TeamSlot;

fn check_name(name: &str, err: impl Fn(String) -> CompetitionError) -> Result<()> {
    if name.trim().is_empty() {
        return Err(err("name must not be empty".to_string()));
    }
    Ok(())
}

/// Who manages a match.
///
/// # Examples
///
/// ```rust
/// use vbcomp::{MatchManager, TeamSlot};
///
/// let mut manager = MatchManager::person("Alice Alison").unwrap();
/// assert!(!manager.is_team());
///
/// manager.set_team(TeamSlot::parse("TM3").unwrap());
/// assert!(manager.is_team());
/// assert_eq!(manager.manager_name(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchManager {
    Team(TeamSlot),
    Person(String),
}

impl MatchManager {
    /// Build a manager from optional parts; exactly one must be supplied.
    pub fn from_parts(team: Option<TeamSlot>, person: Option<String>) -> Result<Self> {
        match (team, person) {
            (Some(team), None) => Ok(MatchManager::Team(team)),
            (None, Some(person)) => Self::person(person),
            (Some(_), Some(_)) => Err(CompetitionError::InvalidManager(
                "a manager must be a team or a person, not both".to_string(),
            )),
            (None, None) => Err(CompetitionError::InvalidManager(
                "a manager must be a team or a person".to_string(),
            )),
        }
    }

    /// A team acting as manager.
    pub fn team(slot: TeamSlot) -> Self {
        MatchManager::Team(slot)
    }

    /// A named person acting as manager. The name must not be empty.
    pub fn person(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        check_name(&name, CompetitionError::InvalidManager)?;
        Ok(MatchManager::Person(name))
    }

    pub fn is_team(&self) -> bool {
        matches!(self, MatchManager::Team(_))
    }

    /// The managing team's slot in team mode.
    pub fn team_slot(&self) -> Option<&TeamSlot> {
        match self {
            MatchManager::Team(slot) => Some(slot),
            MatchManager::Person(_) => None,
        }
    }

    /// The manager's name in person mode.
    pub fn manager_name(&self) -> Option<&str> {
        match self {
            MatchManager::Person(name) => Some(name),
            MatchManager::Team(_) => None,
        }
    }

    /// Switch to team mode, dropping any person.
    pub fn set_team(&mut self, slot: TeamSlot) {
        *self = MatchManager::Team(slot);
    }

    /// Switch to person mode, dropping any team.
    pub fn set_manager_name(&mut self, name: impl Into<String>) -> Result<()> {
        *self = Self::person(name)?;
        Ok(())
    }
}

/// The people officiating a match. Only the first referee is required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfficialPersons {
    pub first: String,
    pub second: Option<String>,
    pub challenge: Option<String>,
    pub assistant_challenge: Option<String>,
    pub reserve: Option<String>,
    pub scorer: Option<String>,
    pub assistant_scorer: Option<String>,
    pub linespersons: Vec<String>,
    pub ball_crew: Vec<String>,
}

impl OfficialPersons {
    /// Officials with only a first referee.
    pub fn new(first: impl Into<String>) -> Result<Self> {
        let first = first.into();
        check_name(&first, CompetitionError::InvalidOfficials)?;
        Ok(Self {
            first,
            ..Default::default()
        })
    }
}

/// Who officiates a match: a team, or a set of named people.
///
/// # Examples
///
/// ```rust
/// use vbcomp::{MatchOfficials, TeamSlot};
///
/// let mut officials = MatchOfficials::persons("A First").unwrap();
/// officials.set_second_ref("B Second").unwrap();
/// assert!(officials.has_second_ref());
///
/// officials.set_team(TeamSlot::parse("{L:RR:M1:loser}").unwrap());
/// assert!(officials.is_team());
/// assert!(!officials.has_second_ref());
/// assert_eq!(officials.first_ref(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOfficials {
    Team(TeamSlot),
    Persons(OfficialPersons),
}

macro_rules! optional_official {
    ($get:ident, $has:ident, $set:ident, $field:ident) => {
        /// Name holding this role, if any.
        pub fn $get(&self) -> Option<&str> {
            self.people().and_then(|p| p.$field.as_deref())
        }

        pub fn $has(&self) -> bool {
            self.$get().is_some()
        }

        /// Set this role; only valid once a first referee is named.
        pub fn $set(&mut self, name: impl Into<String>) -> Result<()> {
            let name = name.into();
            check_name(&name, CompetitionError::InvalidOfficials)?;
            match self {
                MatchOfficials::Persons(p) => {
                    p.$field = Some(name);
                    Ok(())
                }
                MatchOfficials::Team(_) => Err(CompetitionError::InvalidOfficials(format!(
                    "cannot set {} while a team is officiating; set the first referee instead",
                    stringify!($field)
                ))),
            }
        }
    };
}

impl MatchOfficials {
    /// Build officials from optional parts; exactly one of team or people
    /// must be supplied.
    pub fn from_parts(team: Option<TeamSlot>, persons: Option<OfficialPersons>) -> Result<Self> {
        match (team, persons) {
            (Some(team), None) => Ok(MatchOfficials::Team(team)),
            (None, Some(persons)) => {
                check_name(&persons.first, CompetitionError::InvalidOfficials)?;
                Ok(MatchOfficials::Persons(persons))
            }
            (Some(_), Some(_)) => Err(CompetitionError::InvalidOfficials(
                "officials must be a team or people, not both".to_string(),
            )),
            (None, None) => Err(CompetitionError::InvalidOfficials(
                "officials must be a team or include a first referee".to_string(),
            )),
        }
    }

    /// A team acting as officials.
    pub fn team(slot: TeamSlot) -> Self {
        MatchOfficials::Team(slot)
    }

    /// Named officials, starting from the first referee.
    pub fn persons(first: impl Into<String>) -> Result<Self> {
        Ok(MatchOfficials::Persons(OfficialPersons::new(first)?))
    }

    pub fn is_team(&self) -> bool {
        matches!(self, MatchOfficials::Team(_))
    }

    pub fn team_slot(&self) -> Option<&TeamSlot> {
        match self {
            MatchOfficials::Team(slot) => Some(slot),
            MatchOfficials::Persons(_) => None,
        }
    }

    /// The named officials in person mode.
    pub fn people(&self) -> Option<&OfficialPersons> {
        match self {
            MatchOfficials::Persons(p) => Some(p),
            MatchOfficials::Team(_) => None,
        }
    }

    /// Switch to team mode, dropping every person.
    pub fn set_team(&mut self, slot: TeamSlot) {
        *self = MatchOfficials::Team(slot);
    }

    /// The first referee. `None` while a team officiates.
    pub fn first_ref(&self) -> Option<&str> {
        self.people().map(|p| p.first.as_str())
    }

    pub fn has_first_ref(&self) -> bool {
        self.first_ref().is_some()
    }

    /// Name the first referee, switching to person mode if a team was set.
    pub fn set_first_ref(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        match self {
            MatchOfficials::Persons(p) => {
                check_name(&name, CompetitionError::InvalidOfficials)?;
                p.first = name;
            }
            MatchOfficials::Team(_) => *self = Self::persons(name)?,
        }
        Ok(())
    }

    optional_official!(second_ref, has_second_ref, set_second_ref, second);
    optional_official!(challenge_ref, has_challenge_ref, set_challenge_ref, challenge);
    optional_official!(
        assistant_challenge_ref,
        has_assistant_challenge_ref,
        set_assistant_challenge_ref,
        assistant_challenge
    );
    optional_official!(reserve_ref, has_reserve_ref, set_reserve_ref, reserve);
    optional_official!(scorer, has_scorer, set_scorer, scorer);
    optional_official!(
        assistant_scorer,
        has_assistant_scorer,
        set_assistant_scorer,
        assistant_scorer
    );

    /// Linespersons in person mode. Empty in team mode.
    pub fn linespersons(&self) -> &[String] {
        self.people().map(|p| p.linespersons.as_slice()).unwrap_or(&[])
    }

    pub fn ball_crew(&self) -> &[String] {
        self.people().map(|p| p.ball_crew.as_slice()).unwrap_or(&[])
    }

    /// Replace the linespersons. Fails while a team officiates.
    pub fn set_linespersons(&mut self, names: Vec<String>) -> Result<()> {
        match self {
            MatchOfficials::Persons(p) => {
                p.linespersons = names;
                Ok(())
            }
            MatchOfficials::Team(_) => Err(CompetitionError::InvalidOfficials(
                "cannot set linespersons while a team is officiating".to_string(),
            )),
        }
    }

    /// Replace the ball crew. Fails while a team officiates.
    pub fn set_ball_crew(&mut self, names: Vec<String>) -> Result<()> {
        match self {
            MatchOfficials::Persons(p) => {
                p.ball_crew = names;
                Ok(())
            }
            MatchOfficials::Team(_) => Err(CompetitionError::InvalidOfficials(
                "cannot set ball crew while a team is officiating".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(s: &str) -> TeamSlot {
        TeamSlot::parse(s).unwrap()
    }

    #[test]
    fn test_manager_exclusive_or() {
        assert!(MatchManager::from_parts(Some(slot("TM1")), None).unwrap().is_team());
        assert!(!MatchManager::from_parts(None, Some("Ann".into())).unwrap().is_team());

        let both = MatchManager::from_parts(Some(slot("TM1")), Some("Ann".into()));
        assert!(matches!(both, Err(CompetitionError::InvalidManager(_))));
        let neither = MatchManager::from_parts(None, None);
        assert!(matches!(neither, Err(CompetitionError::InvalidManager(_))));
        assert!(MatchManager::person("  ").is_err());
    }

    #[test]
    fn test_manager_switches_mode() {
        let mut manager = MatchManager::team(slot("TM1"));
        manager.set_manager_name("Ann Manager").unwrap();
        assert!(!manager.is_team());
        assert_eq!(manager.team_slot(), None);
        assert_eq!(manager.manager_name(), Some("Ann Manager"));

        manager.set_team(slot("TM2"));
        assert!(manager.is_team());
        assert_eq!(manager.manager_name(), None);
        assert_eq!(manager.team_slot(), Some(&slot("TM2")));
    }

    #[test]
    fn test_officials_exclusive_or() {
        let both = MatchOfficials::from_parts(Some(slot("TM1")), Some(OfficialPersons::new("A").unwrap()));
        assert!(matches!(both, Err(CompetitionError::InvalidOfficials(_))));
        let neither = MatchOfficials::from_parts(None, None);
        assert!(matches!(neither, Err(CompetitionError::InvalidOfficials(_))));
        let nameless = MatchOfficials::from_parts(None, Some(OfficialPersons::default()));
        assert!(matches!(nameless, Err(CompetitionError::InvalidOfficials(_))));
    }

    #[test]
    fn test_officials_person_to_team_clears_people() {
        let mut officials = MatchOfficials::persons("First Ref").unwrap();
        officials.set_second_ref("Second Ref").unwrap();
        officials.set_challenge_ref("Challenge Ref").unwrap();
        officials.set_scorer("Scorer").unwrap();
        officials
            .set_linespersons(vec!["L1".into(), "L2".into()])
            .unwrap();

        officials.set_team(slot("TM4"));

        assert!(officials.is_team());
        assert!(!officials.has_first_ref());
        assert!(!officials.has_second_ref());
        assert!(!officials.has_challenge_ref());
        assert!(!officials.has_scorer());
        assert_eq!(officials.first_ref(), None);
        assert_eq!(officials.second_ref(), None);
        assert!(officials.linespersons().is_empty());
    }

    #[test]
    fn test_officials_team_to_person() {
        let mut officials = MatchOfficials::team(slot("TM4"));
        assert!(officials.set_second_ref("Too Early").is_err());
        assert!(officials.is_team());

        officials.set_first_ref("First Ref").unwrap();
        assert!(!officials.is_team());
        assert_eq!(officials.team_slot(), None);
        assert_eq!(officials.first_ref(), Some("First Ref"));
        assert!(!officials.has_second_ref());
    }
}
