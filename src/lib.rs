//! # vbcomp - Multi-Stage Competition Model
//!
//! A model of a multi-stage sports competition that resolves team
//! placeholders across stages, groups and matches:
//! - **Deterministic** scoring: the same set scores always give the same outcome
//! - **Lazy** resolution: nothing is cached, answers follow the live scores
//! - **Validated** structure: references are checked and cycle-free at build time
//!
//! ## Core Concepts
//!
//! ### Competition Tree
//!
//! ```text
//! Competition → Stage → Group (league | crossover | knockout) → Match
//! ```
//!
//! Every match has a home and an away [`TeamSlot`]. A slot is either a
//! literal team ID or a reference to another result:
//!
//! | Expression              | Meaning                              |
//! |-------------------------|--------------------------------------|
//! | `TM1`                   | the team with ID `TM1`               |
//! | `{L:P1:M3:winner}`      | winner of match `M3` in group `P1`   |
//! | `{L:P1:M3:loser}`       | loser of that match                  |
//! | `{L:P1:league:2}`       | second in the league table of `P1`   |
//! | `{C:CO:3}`              | third position of group `CO`         |
//!
//! References resolve once what they point at is decided; until then the
//! resolver reports [`CompetitionError::NotDecidedYet`].
//!
//! ## Example
//!
//! ```rust
//! use vbcomp::*;
//!
//! let id = |s: &str| Id::new(s).unwrap();
//! let slot = |s: &str| TeamSlot::parse(s).unwrap();
//!
//! let mut competition = Competition::new("Spring Tournament");
//! for (team, name) in [("TM1", "Alpha"), ("TM2", "Bravo"), ("TM3", "Charlie"), ("TM4", "Delta")] {
//!     competition.add_team(CompetitionTeam::new(id(team), name)).unwrap();
//! }
//!
//! let mut ko = Group::knockout(id("KO"), KnockoutConfig::default());
//! ko.add_match(Match::new(id("SF1"), slot("TM1"), slot("TM4"))).unwrap();
//! ko.add_match(Match::new(id("SF2"), slot("TM2"), slot("TM3"))).unwrap();
//! ko.add_match(Match::new(id("FIN"), slot("{F:KO:SF1:winner}"), slot("{F:KO:SF2:winner}"))).unwrap();
//! let mut finals = Stage::new(id("F"));
//! finals.add_group(ko).unwrap();
//! competition.add_stage(finals).unwrap();
//!
//! let (f, ko) = (id("F"), id("KO"));
//! competition.record_score(&f, &ko, &id("SF1"), &[(25, 18), (25, 21), (25, 16)]).unwrap();
//! competition.record_score(&f, &ko, &id("SF2"), &[(22, 25), (25, 23), (20, 25), (21, 25)]).unwrap();
//!
//! assert!(matches!(
//!     competition.get_team("{F:KO:FIN:winner}"),
//!     Err(CompetitionError::NotDecidedYet(_))
//! ));
//! assert_eq!(competition.get_team("{F:KO:SF2:winner}").unwrap().name, "Charlie");
//! ```
//!
//! ## Modules
//!
//! - [`id`] - Identifier type
//! - [`reference`] - Team slot grammar
//! - [`sets`] - Scoring configuration and score evaluation
//! - [`matches`] - Matches and their state
//! - [`officials`] - Match manager and officials
//! - [`schedule`] - Dates, times and breaks
//! - [`standings`] - League tables and tie-breaks
//! - [`group`] / [`stage`] / [`competition`] - The competition tree
//! - [`resolver`] - Team slot resolution
//! - [`graph`] - Reference dependency graph
//! - [`team`] / [`player`] - Clubs, teams, contacts and players
//! - [`document`] - Loading from JSON documents
//! - [`error`] - Error types

pub mod competition;
pub mod document;
pub mod error;
pub mod graph;
pub mod group;
pub mod id;
pub mod matches;
pub mod officials;
pub mod player;
pub mod reference;
pub mod resolver;
pub mod schedule;
pub mod sets;
pub mod stage;
pub mod standings;
pub mod team;

// Re-export main types for convenience
pub use competition::Competition;
pub use document::CompetitionDocument;
pub use error::{CompetitionError, Result};
pub use group::{Group, GroupKind, GroupType, KnockoutConfig};
pub use id::Id;
pub use matches::{GroupEntry, Match, MatchState};
pub use reference::{parse_slot, Reference, SlotTarget, TeamSlot};
pub use stage::Stage;

// Scoring and standings
pub use sets::{Evaluation, MatchType, Outcome, ScoringRules, SetConfig, SetScore, Side};
pub use standings::{LeagueConfig, PointsConfig, RankKey, StandingsRow};

// Registries and match metadata
pub use officials::{MatchManager, MatchOfficials, OfficialPersons};
pub use player::{Player, PlayerTeam};
pub use schedule::{Break, Schedule};
pub use team::{Club, CompetitionTeam, Contact, ContactRole};
