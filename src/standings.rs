//! League standings.
//!
//! Ranks the teams of a league group by a configurable chain of criteria.
//! The chain is applied block by block: teams still level after one
//! criterion are separated by the next. Teams level after the whole chain
//! keep the order in which they first appear in the group, so the table
//! is always total.

use crate::id::Id;
use crate::sets::{Evaluation, MatchType, Outcome, SetScore, Side};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A ranking criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RankKey {
    /// League points.
    #[serde(rename = "PTS")]
    Points,
    #[serde(rename = "WINS")]
    Wins,
    /// Fewer is better.
    #[serde(rename = "LOSSES")]
    Losses,
    /// Wins in matches between the tied teams only.
    #[serde(rename = "H2H")]
    HeadToHead,
    #[serde(rename = "PF")]
    PointsFor,
    /// Fewer is better.
    #[serde(rename = "PA")]
    PointsAgainst,
    #[serde(rename = "PD")]
    PointsDifference,
    #[serde(rename = "SF")]
    SetsFor,
    /// Fewer is better.
    #[serde(rename = "SA")]
    SetsAgainst,
    #[serde(rename = "SD")]
    SetsDifference,
    #[serde(rename = "SR")]
    SetRatio,
    #[serde(rename = "PR")]
    PointRatio,
}

impl RankKey {
    /// Comparable value for a row; higher always ranks first.
    fn value(self, row: &StandingsRow) -> f64 {
        match self {
            RankKey::Points => row.league_points as f64,
            RankKey::Wins => f64::from(row.wins),
            RankKey::Losses => -f64::from(row.losses),
            RankKey::PointsFor => row.points_for as f64,
            RankKey::PointsAgainst => -(row.points_against as f64),
            RankKey::PointsDifference => (row.points_for - row.points_against) as f64,
            RankKey::SetsFor => f64::from(row.sets_for),
            RankKey::SetsAgainst => -f64::from(row.sets_against),
            RankKey::SetsDifference => f64::from(row.sets_for) - f64::from(row.sets_against),
            RankKey::SetRatio => ratio(f64::from(row.sets_for), f64::from(row.sets_against)),
            RankKey::PointRatio => ratio(row.points_for as f64, row.points_against as f64),
            // Needs the other tied teams; handled by the caller.
            RankKey::HeadToHead => 0.0,
        }
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        if num == 0.0 {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        num / den
    }
}

/// League points awarded per match.
///
/// `win_by_one`/`lose_by_one` apply to set-based matches decided by a
/// single set (for example 3-2); when unset the plain `win`/`lose` values
/// are used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PointsConfig {
    pub played: i64,
    pub per_set: i64,
    pub win: i64,
    pub win_by_one: Option<i64>,
    pub lose: i64,
    pub lose_by_one: Option<i64>,
    pub draw: i64,
}

impl Default for PointsConfig {
    fn default() -> Self {
        Self {
            played: 0,
            per_set: 0,
            win: 3,
            win_by_one: None,
            lose: 0,
            lose_by_one: None,
            draw: 1,
        }
    }
}

/// How a league group ranks its teams.
///
/// # Examples
///
/// ```rust
/// use vbcomp::standings::{LeagueConfig, RankKey};
///
/// let config: LeagueConfig = serde_json::from_str(r#"{"ordering": ["PTS", "SD"]}"#).unwrap();
/// assert_eq!(config.ordering, vec![RankKey::Points, RankKey::SetsDifference]);
/// assert_eq!(config.points.win, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LeagueConfig {
    pub ordering: Vec<RankKey>,
    pub points: PointsConfig,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            ordering: vec![
                RankKey::Points,
                RankKey::HeadToHead,
                RankKey::SetRatio,
                RankKey::PointRatio,
            ],
            points: PointsConfig::default(),
        }
    }
}

/// One team's line in a league table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandingsRow {
    pub team: Id,
    pub played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub sets_for: u32,
    pub sets_against: u32,
    pub points_for: i64,
    pub points_against: i64,
    pub league_points: i64,
}

impl StandingsRow {
    fn new(team: Id) -> Self {
        Self {
            team,
            played: 0,
            wins: 0,
            losses: 0,
            draws: 0,
            sets_for: 0,
            sets_against: 0,
            points_for: 0,
            points_against: 0,
            league_points: 0,
        }
    }
}

/// A complete league match with both sides already resolved to teams.
#[derive(Debug, Clone)]
pub struct LeagueResult {
    pub home: Id,
    pub away: Id,
    pub evaluation: Evaluation,
    pub scores: Vec<SetScore>,
}

impl LeagueResult {
    fn winner(&self) -> Option<&Id> {
        match self.evaluation.outcome.winner()? {
            Side::Home => Some(&self.home),
            Side::Away => Some(&self.away),
        }
    }
}

/// Build the ranked table for `teams` (in first-appearance order) from
/// complete `results`.
pub fn compute_standings(
    teams: &[Id],
    results: &[LeagueResult],
    match_type: MatchType,
    config: &LeagueConfig,
) -> Vec<StandingsRow> {
    let mut rows: Vec<StandingsRow> = teams.iter().cloned().map(StandingsRow::new).collect();
    let index: HashMap<&Id, usize> = teams.iter().enumerate().map(|(i, t)| (t, i)).collect();

    for result in results {
        let (Some(&h), Some(&a)) = (index.get(&result.home), index.get(&result.away)) else {
            continue;
        };
        let (home_points, away_points) = result
            .scores
            .iter()
            .fold((0i64, 0i64), |(hp, ap), &(sh, sa)| (hp + i64::from(sh), ap + i64::from(sa)));
        let eval = result.evaluation;
        let by_one = match_type == MatchType::Sets && eval.home_sets.abs_diff(eval.away_sets) == 1;

        tally(&mut rows[h], &config.points, eval.home_sets, eval.away_sets, home_points, away_points);
        tally(&mut rows[a], &config.points, eval.away_sets, eval.home_sets, away_points, home_points);

        match eval.outcome {
            Outcome::Draw => {
                for i in [h, a] {
                    rows[i].draws += 1;
                    rows[i].league_points += config.points.draw;
                }
            }
            Outcome::Decided { winner, .. } => {
                let (w, l) = if winner == Side::Home { (h, a) } else { (a, h) };
                let points = &config.points;
                let (win, lose) = if by_one {
                    (points.win_by_one.unwrap_or(points.win), points.lose_by_one.unwrap_or(points.lose))
                } else {
                    (points.win, points.lose)
                };
                rows[w].wins += 1;
                rows[w].league_points += win;
                rows[l].losses += 1;
                rows[l].league_points += lose;
            }
        }
    }

    let order = rank_block((0..rows.len()).collect(), &config.ordering, &rows, results);
    let mut slots: Vec<Option<StandingsRow>> = rows.into_iter().map(Some).collect();
    order.into_iter().filter_map(|i| slots[i].take()).collect()
}

fn tally(row: &mut StandingsRow, points: &PointsConfig, sets_for: u32, sets_against: u32, pf: i64, pa: i64) {
    row.played += 1;
    row.sets_for += sets_for;
    row.sets_against += sets_against;
    row.points_for += pf;
    row.points_against += pa;
    row.league_points += points.played + points.per_set * i64::from(sets_for);
}

/// Order a block of tied rows by the first key, then split the block into
/// runs of equal value and order each run by the remaining keys.
fn rank_block(block: Vec<usize>, keys: &[RankKey], rows: &[StandingsRow], results: &[LeagueResult]) -> Vec<usize> {
    let Some((&key, rest)) = keys.split_first() else {
        return block;
    };
    if block.len() < 2 {
        return block;
    }

    let values: Vec<f64> = match key {
        RankKey::HeadToHead => head_to_head(&block, rows, results),
        _ => block.iter().map(|&i| key.value(&rows[i])).collect(),
    };
    let mut scored: Vec<(usize, f64)> = block.into_iter().zip(values).collect();
    // Stable, so equal values keep their incoming order.
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut ordered = Vec::with_capacity(scored.len());
    let mut start = 0;
    while start < scored.len() {
        let mut end = start + 1;
        while end < scored.len() && scored[end].1 == scored[start].1 {
            end += 1;
        }
        let run: Vec<usize> = scored[start..end].iter().map(|(i, _)| *i).collect();
        ordered.extend(rank_block(run, rest, rows, results));
        start = end;
    }
    ordered
}

/// Wins of each block member in matches played between block members.
fn head_to_head(block: &[usize], rows: &[StandingsRow], results: &[LeagueResult]) -> Vec<f64> {
    let members: HashMap<&Id, usize> = block
        .iter()
        .enumerate()
        .map(|(pos, &i)| (&rows[i].team, pos))
        .collect();
    let mut wins = vec![0.0; block.len()];
    for result in results {
        if !(members.contains_key(&result.home) && members.contains_key(&result.away)) {
            continue;
        }
        if let Some(pos) = result.winner().and_then(|w| members.get(w)) {
            wins[*pos] += 1.0;
        }
    }
    wins
}
