//! Set and score evaluation.
//!
//! Turns recorded set scores into a match outcome under a configurable
//! scoring regime. Evaluation is pure: the same scores and rules always
//! produce the same outcome.

use crate::error::{CompetitionError, Result};
use crate::id::Id;
use serde::{Deserialize, Serialize};

/// A single set score as `(home, away)` points.
pub type SetScore = (i32, i32);

/// Scoring configuration for set-based matches.
///
/// Every field is optional on input; missing fields take the defaults
/// shown in [`SetConfig::default`].
///
/// # Examples
///
/// ```rust
/// use vbcomp::SetConfig;
///
/// let config: SetConfig = serde_json::from_str("{}").unwrap();
/// assert_eq!(config.max_sets(), 5);
/// assert_eq!(config.sets_to_win(), 3);
/// assert_eq!(config.last_set_points_to_win(), 15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SetConfig {
    max_sets: u32,
    sets_to_win: u32,
    clear_points: u32,
    min_points: u32,
    points_to_win: u32,
    last_set_points_to_win: u32,
    max_points: u32,
    last_set_max_points: u32,
}

impl Default for SetConfig {
    fn default() -> Self {
        Self {
            max_sets: 5,
            sets_to_win: 3,
            clear_points: 2,
            min_points: 1,
            points_to_win: 25,
            last_set_points_to_win: 15,
            max_points: 1000,
            last_set_max_points: 1000,
        }
    }
}

impl SetConfig {
    /// Volleyball defaults: best of five, sets to 25, deciding set to 15.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that the configuration can describe a finishable match.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: &str| Err(CompetitionError::Validation(format!("Invalid set config: {}", msg)));
        if self.max_sets == 0 {
            return fail("maxSets must be at least 1");
        }
        if self.sets_to_win == 0 || self.sets_to_win > self.max_sets {
            return fail("setsToWin must be between 1 and maxSets");
        }
        if self.clear_points == 0 {
            return fail("clearPoints must be at least 1");
        }
        if self.points_to_win > self.max_points {
            return fail("pointsToWin must not exceed maxPoints");
        }
        if self.last_set_points_to_win > self.last_set_max_points {
            return fail("lastSetPointsToWin must not exceed lastSetMaxPoints");
        }
        Ok(())
    }

    /// Most sets a match can run to.
    pub fn max_sets(&self) -> u32 {
        self.max_sets
    }

    /// Sets needed to take the match.
    pub fn sets_to_win(&self) -> u32 {
        self.sets_to_win
    }

    /// Margin a set must be won by, unless it reaches the cap.
    pub fn clear_points(&self) -> u32 {
        self.clear_points
    }

    /// Lowest winning score a set may have.
    pub fn min_points(&self) -> u32 {
        self.min_points
    }

    /// Target score for every set but the last.
    pub fn points_to_win(&self) -> u32 {
        self.points_to_win
    }

    /// Target score for the deciding set.
    pub fn last_set_points_to_win(&self) -> u32 {
        self.last_set_points_to_win
    }

    /// Cap on a set score; reaching it wins the set outright.
    pub fn max_points(&self) -> u32 {
        self.max_points
    }

    /// Cap on the deciding set score.
    pub fn last_set_max_points(&self) -> u32 {
        self.last_set_max_points
    }

    /// Set the number of sets.
    ///
    /// Setters chain and do not validate; call [`SetConfig::validate`] once
    /// the configuration is complete.
    pub fn set_max_sets(&mut self, value: u32) -> &mut Self {
        self.max_sets = value;
        self
    }

    pub fn set_sets_to_win(&mut self, value: u32) -> &mut Self {
        self.sets_to_win = value;
        self
    }

    pub fn set_clear_points(&mut self, value: u32) -> &mut Self {
        self.clear_points = value;
        self
    }

    /// Also applies to the winning score of a continuous match.
    pub fn set_min_points(&mut self, value: u32) -> &mut Self {
        self.min_points = value;
        self
    }

    pub fn set_points_to_win(&mut self, value: u32) -> &mut Self {
        self.points_to_win = value;
        self
    }

    pub fn set_last_set_points_to_win(&mut self, value: u32) -> &mut Self {
        self.last_set_points_to_win = value;
        self
    }

    pub fn set_max_points(&mut self, value: u32) -> &mut Self {
        self.max_points = value;
        self
    }

    pub fn set_last_set_max_points(&mut self, value: u32) -> &mut Self {
        self.last_set_max_points = value;
        self
    }

    /// Win threshold and point cap for a 1-based set number.
    fn thresholds(&self, set_no: usize) -> (i64, i64) {
        if set_no as u64 == u64::from(self.max_sets) {
            (
                i64::from(self.last_set_points_to_win),
                i64::from(self.last_set_max_points),
            )
        } else {
            (i64::from(self.points_to_win), i64::from(self.max_points))
        }
    }
}

/// How a group's matches are scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// Matches are played as a sequence of sets.
    #[default]
    Sets,
    /// Matches have one running score.
    Continuous,
}

/// One side of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    /// The other side.
    pub fn opposite(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

/// The result of a complete match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Decided { winner: Side, loser: Side },
    Draw,
}

impl Outcome {
    fn won_by(side: Side) -> Self {
        Outcome::Decided {
            winner: side,
            loser: side.opposite(),
        }
    }

    /// The winning side, `None` for a draw.
    pub fn winner(&self) -> Option<Side> {
        match self {
            Outcome::Decided { winner, .. } => Some(*winner),
            Outcome::Draw => None,
        }
    }

    /// The losing side, `None` for a draw.
    pub fn loser(&self) -> Option<Side> {
        match self {
            Outcome::Decided { loser, .. } => Some(*loser),
            Outcome::Draw => None,
        }
    }

    pub fn is_draw(&self) -> bool {
        matches!(self, Outcome::Draw)
    }
}

/// An evaluated score: the outcome plus sets won by each side.
///
/// For continuous matches the set counts are 1-0, 0-1 or 0-0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub outcome: Outcome,
    pub home_sets: u32,
    pub away_sets: u32,
}

/// The complete scoring regime of a group: set configuration, match type
/// and whether draws are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoringRules {
    pub config: SetConfig,
    pub match_type: MatchType,
    pub draws_allowed: bool,
}

impl ScoringRules {
    /// Combine a set configuration with how the match is played.
    pub fn new(config: SetConfig, match_type: MatchType, draws_allowed: bool) -> Self {
        Self {
            config,
            match_type,
            draws_allowed,
        }
    }

    /// Evaluate the complete scores of a match.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vbcomp::{Id, MatchType, Outcome, ScoringRules, SetConfig, Side};
    ///
    /// let mut config = SetConfig::new();
    /// config.set_max_sets(3).set_sets_to_win(2);
    /// let rules = ScoringRules::new(config, MatchType::Sets, false);
    ///
    /// let eval = rules.evaluate(&Id::new("M1").unwrap(), &[(25, 20), (25, 18)]).unwrap();
    /// assert_eq!(eval.outcome.winner(), Some(Side::Home));
    /// assert_eq!((eval.home_sets, eval.away_sets), (2, 0));
    /// ```
    pub fn evaluate(&self, match_id: &Id, scores: &[SetScore]) -> Result<Evaluation> {
        if scores.is_empty() {
            return Err(CompetitionError::invalid_score(match_id, "no scores recorded"));
        }
        let evaluation = match self.match_type {
            MatchType::Continuous => self.evaluate_continuous(match_id, scores)?,
            MatchType::Sets => self.evaluate_sets(match_id, scores)?,
        };
        if evaluation.outcome.is_draw() && !self.draws_allowed {
            return Err(CompetitionError::invalid_score(
                match_id,
                "scores show a draw but draws are not allowed",
            ));
        }
        Ok(evaluation)
    }

    /// Check scores of a match still in progress.
    ///
    /// Only structural limits apply: no negative points, no points beyond a
    /// set's cap, and no more sets than the configuration allows.
    pub fn check_partial(&self, match_id: &Id, scores: &[SetScore]) -> Result<()> {
        let max_sets = match self.match_type {
            MatchType::Continuous => 1,
            MatchType::Sets => self.config.max_sets as usize,
        };
        if scores.len() > max_sets {
            return Err(CompetitionError::invalid_score(
                match_id,
                format!("{} scores recorded but at most {} are allowed", scores.len(), max_sets),
            ));
        }
        for (idx, &(home, away)) in scores.iter().enumerate() {
            let (_, cap) = self.config.thresholds(idx + 1);
            check_range(match_id, idx + 1, home, away, cap)?;
        }
        Ok(())
    }

    fn evaluate_continuous(&self, match_id: &Id, scores: &[SetScore]) -> Result<Evaluation> {
        let &[(home, away)] = scores else {
            return Err(CompetitionError::invalid_score(
                match_id,
                "a continuous match must have exactly one score",
            ));
        };
        check_range(match_id, 1, home, away, i64::from(self.config.max_points))?;

        if home == away {
            return Ok(Evaluation {
                outcome: Outcome::Draw,
                home_sets: 0,
                away_sets: 0,
            });
        }
        let side = if home > away { Side::Home } else { Side::Away };
        let high = i64::from(home.max(away));
        if high < i64::from(self.config.min_points) {
            return Err(CompetitionError::invalid_score(
                match_id,
                format!("winning score {} is below the minimum of {} points", high, self.config.min_points),
            ));
        }
        Ok(Evaluation {
            outcome: Outcome::won_by(side),
            home_sets: u32::from(side == Side::Home),
            away_sets: u32::from(side == Side::Away),
        })
    }

    fn evaluate_sets(&self, match_id: &Id, scores: &[SetScore]) -> Result<Evaluation> {
        let config = &self.config;
        if scores.len() > config.max_sets as usize {
            return Err(CompetitionError::invalid_score(
                match_id,
                format!(
                    "{} sets recorded but at most {} can be played",
                    scores.len(),
                    config.max_sets
                ),
            ));
        }

        let (mut home_sets, mut away_sets) = (0u32, 0u32);
        for (idx, &(home, away)) in scores.iter().enumerate() {
            let set_no = idx + 1;
            if home_sets >= config.sets_to_win || away_sets >= config.sets_to_win {
                return Err(CompetitionError::invalid_score(
                    match_id,
                    format!("set {} was recorded after the match was already won", set_no),
                ));
            }
            match self.set_winner(match_id, set_no, home, away)? {
                Side::Home => home_sets += 1,
                Side::Away => away_sets += 1,
            }
        }

        let outcome = if home_sets >= config.sets_to_win {
            Outcome::won_by(Side::Home)
        } else if away_sets >= config.sets_to_win {
            Outcome::won_by(Side::Away)
        } else if home_sets == away_sets && scores.len() == config.max_sets as usize {
            Outcome::Draw
        } else {
            return Err(CompetitionError::invalid_score(
                match_id,
                format!(
                    "sets {}-{} do not show a completed match",
                    home_sets, away_sets
                ),
            ));
        };

        Ok(Evaluation {
            outcome,
            home_sets,
            away_sets,
        })
    }

    /// Decide a single finished set.
    fn set_winner(&self, match_id: &Id, set_no: usize, home: i32, away: i32) -> Result<Side> {
        let config = &self.config;
        let (target, cap) = config.thresholds(set_no);
        check_range(match_id, set_no, home, away, cap)?;

        let invalid = |reason: String| Err(CompetitionError::invalid_score(match_id, reason));
        if home == away {
            return invalid(format!("set {} score {}-{} has no winner", set_no, home, away));
        }

        let (side, high, low) = if home > away {
            (Side::Home, i64::from(home), i64::from(away))
        } else {
            (Side::Away, i64::from(away), i64::from(home))
        };
        let clear = i64::from(config.clear_points);

        if high < i64::from(config.min_points) {
            return invalid(format!(
                "set {} winning score {} is below the minimum of {} points",
                set_no, high, config.min_points
            ));
        }

        let won = high == cap || (high >= target && high - low >= clear);
        if !won {
            return invalid(format!(
                "set {} score {}-{} is not a finished set",
                set_no, home, away
            ));
        }

        // The point before the last must not already have decided the set.
        let previous = high - 1;
        if previous >= target && previous - low >= clear {
            return invalid(format!(
                "set {} score {}-{} has more points than needed to win the set",
                set_no, home, away
            ));
        }

        Ok(side)
    }
}

fn check_range(match_id: &Id, set_no: usize, home: i32, away: i32, cap: i64) -> Result<()> {
    if home < 0 || away < 0 {
        return Err(CompetitionError::invalid_score(
            match_id,
            format!("set {} has a negative score", set_no),
        ));
    }
    if i64::from(home) > cap || i64::from(away) > cap {
        return Err(CompetitionError::invalid_score(
            match_id,
            format!(
                "set {} score {}-{} exceeds the maximum of {} points",
                set_no, home, away, cap
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mid() -> Id {
        Id::new("M1").unwrap()
    }

    fn best_of_three() -> ScoringRules {
        let mut config = SetConfig::new();
        config.set_max_sets(3).set_sets_to_win(2);
        ScoringRules::new(config, MatchType::Sets, false)
    }

    #[test]
    fn test_defaults() {
        let config: SetConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SetConfig::default());
        assert_eq!(config.max_sets(), 5);
        assert_eq!(config.sets_to_win(), 3);
        assert_eq!(config.clear_points(), 2);
        assert_eq!(config.min_points(), 1);
        assert_eq!(config.points_to_win(), 25);
        assert_eq!(config.last_set_points_to_win(), 15);
        assert_eq!(config.max_points(), 1000);
        assert_eq!(config.last_set_max_points(), 1000);
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let config: SetConfig =
            serde_json::from_str(r#"{"maxSets": 3, "setsToWin": 2, "pointsToWin": 21}"#).unwrap();
        assert_eq!(config.max_sets(), 3);
        assert_eq!(config.sets_to_win(), 2);
        assert_eq!(config.points_to_win(), 21);
        assert_eq!(config.last_set_points_to_win(), 15);
        assert_eq!(config.clear_points(), 2);
    }

    #[test]
    fn test_validate_rejects_impossible_config() {
        let mut config = SetConfig::new();
        config.set_sets_to_win(6);
        assert!(config.validate().is_err());
        let mut config = SetConfig::new();
        config.set_points_to_win(40).set_max_points(30);
        assert!(config.validate().is_err());
        assert!(SetConfig::new().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unreachable_last_set() {
        let mut config = SetConfig::new();
        config.set_last_set_points_to_win(20).set_last_set_max_points(18);
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid set config: lastSetPointsToWin must not exceed lastSetMaxPoints"
        );
    }

    #[test]
    fn test_min_points_in_sets() {
        let mut config = SetConfig::new();
        config
            .set_max_sets(3)
            .set_sets_to_win(2)
            .set_points_to_win(10)
            .set_min_points(12);
        let rules = ScoringRules::new(config, MatchType::Sets, false);

        let err = rules.evaluate(&mid(), &[(10, 5), (10, 5)]).unwrap_err();
        assert!(err
            .to_string()
            .contains("set 1 winning score 10 is below the minimum of 12 points"));
        assert!(rules.evaluate(&mid(), &[(12, 10), (12, 10)]).is_ok());
    }

    #[test]
    fn test_min_points_in_continuous() {
        let mut config = SetConfig::new();
        config.set_min_points(5);
        let rules = ScoringRules::new(config, MatchType::Continuous, false);

        let err = rules.evaluate(&mid(), &[(3, 1)]).unwrap_err();
        assert!(err
            .to_string()
            .contains("winning score 3 is below the minimum of 5 points"));
        assert_eq!(rules.evaluate(&mid(), &[(5, 1)]).unwrap().outcome.winner(), Some(Side::Home));
    }

    #[test]
    fn test_straight_sets_win() {
        let eval = best_of_three().evaluate(&mid(), &[(25, 20), (25, 18)]).unwrap();
        assert_eq!(
            eval.outcome,
            Outcome::Decided {
                winner: Side::Home,
                loser: Side::Away
            }
        );
        assert_eq!((eval.home_sets, eval.away_sets), (2, 0));
    }

    #[test]
    fn test_deciding_set_uses_last_set_threshold() {
        let eval = best_of_three()
            .evaluate(&mid(), &[(25, 20), (18, 25), (13, 15)])
            .unwrap();
        assert_eq!(eval.outcome.winner(), Some(Side::Away));
        assert_eq!((eval.home_sets, eval.away_sets), (1, 2));
    }

    #[test]
    fn test_extended_set_needs_clear_margin() {
        let rules = best_of_three();
        assert!(rules.evaluate(&mid(), &[(27, 25), (25, 23)]).is_ok());
        assert!(rules.evaluate(&mid(), &[(26, 25), (25, 23)]).is_err());
    }

    #[test]
    fn test_rejects_points_beyond_set_end() {
        let err = best_of_three()
            .evaluate(&mid(), &[(30, 20), (25, 23)])
            .unwrap_err();
        assert!(err.to_string().contains("more points than needed"));
    }

    #[test]
    fn test_max_points_caps_a_set() {
        let mut config = SetConfig::new();
        config.set_max_sets(3).set_sets_to_win(2).set_max_points(30);
        let rules = ScoringRules::new(config, MatchType::Sets, false);
        assert!(rules.evaluate(&mid(), &[(30, 29), (25, 20)]).is_ok());
        assert!(rules.evaluate(&mid(), &[(31, 29), (25, 20)]).is_err());
    }

    #[test]
    fn test_rejects_sets_after_match_won() {
        let err = best_of_three()
            .evaluate(&mid(), &[(25, 20), (25, 18), (15, 10)])
            .unwrap_err();
        assert!(err.to_string().contains("already won"));
    }

    #[test]
    fn test_rejects_negative_and_unfinished() {
        let rules = best_of_three();
        assert!(rules.evaluate(&mid(), &[(-1, 25), (25, 20)]).is_err());
        assert!(rules.evaluate(&mid(), &[(20, 18), (25, 20)]).is_err());
        assert!(rules.evaluate(&mid(), &[(25, 20)]).is_err());
        assert!(rules.evaluate(&mid(), &[]).is_err());
    }

    #[test]
    fn test_draw_when_allowed() {
        let mut config = SetConfig::new();
        config.set_max_sets(2).set_sets_to_win(2).set_last_set_points_to_win(25);
        let rules = ScoringRules::new(config, MatchType::Sets, true);
        let eval = rules.evaluate(&mid(), &[(25, 20), (20, 25)]).unwrap();
        assert!(eval.outcome.is_draw());
        assert_eq!((eval.home_sets, eval.away_sets), (1, 1));
    }

    #[test]
    fn test_draw_when_not_allowed() {
        let mut config = SetConfig::new();
        config.set_max_sets(2).set_sets_to_win(2).set_last_set_points_to_win(25);
        let rules = ScoringRules::new(config, MatchType::Sets, false);
        let err = rules.evaluate(&mid(), &[(25, 20), (20, 25)]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("M1"));
        assert!(msg.contains("scores show a draw but draws are not allowed"));
    }

    #[test]
    fn test_continuous() {
        let rules = ScoringRules::new(SetConfig::new(), MatchType::Continuous, false);
        let eval = rules.evaluate(&mid(), &[(3, 7)]).unwrap();
        assert_eq!(eval.outcome.winner(), Some(Side::Away));
        assert!(rules.evaluate(&mid(), &[(3, 3)]).is_err());
        assert!(rules.evaluate(&mid(), &[(3, 1), (2, 1)]).is_err());

        let drawable = ScoringRules::new(SetConfig::new(), MatchType::Continuous, true);
        assert!(drawable.evaluate(&mid(), &[(3, 3)]).unwrap().outcome.is_draw());
    }

    #[test]
    fn test_partial_scores() {
        let rules = best_of_three();
        assert!(rules.check_partial(&mid(), &[(25, 20), (10, 12)]).is_ok());
        assert!(rules.check_partial(&mid(), &[(1, 0), (1, 0), (1, 0), (1, 0)]).is_err());
        assert!(rules.check_partial(&mid(), &[(-3, 0)]).is_err());
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let rules = best_of_three();
        let scores = [(25, 23), (22, 25), (15, 9)];
        assert_eq!(
            rules.evaluate(&mid(), &scores).unwrap(),
            rules.evaluate(&mid(), &scores).unwrap()
        );
    }
}
