//! Team-scoped views: a team's record per year and per opponent.

use crate::domain::match_record::MatchRecord;
use crate::domain::stats::{OpponentStat, TeamYearStat};
use crate::stats::tally::Tally;
use crate::stats::{MatchFilter, StatsError};
use std::collections::BTreeMap;

/// Per-year record of `team` within `filter`, ascending by year.
pub fn yearly_summary(
    matches: &[MatchRecord],
    team: &str,
    filter: &MatchFilter,
) -> Result<Vec<TeamYearStat>, StatsError> {
    let team = require_team(team)?;

    let mut by_year: BTreeMap<i32, Tally> = BTreeMap::new();
    for m in filter.apply(matches) {
        let Some(p) = m.perspective(team) else {
            continue;
        };
        let Some(year) = m.year() else {
            tracing::debug!(date = %m.date, "skipping match with malformed year prefix");
            continue;
        };
        by_year.entry(year).or_default().record(&p);
    }

    Ok(by_year
        .into_iter()
        .map(|(year, t)| TeamYearStat {
            year,
            team: team.to_string(),
            played: t.played,
            wins: t.wins,
            draws: t.draws,
            losses: t.losses,
            goals_for: t.goals_for,
            goals_against: t.goals_against,
            goal_diff: t.goal_diff(),
            win_rate: t.win_rate(),
        })
        .collect())
}

/// Head-to-head record of `team` against each opponent over the whole filtered range.
///
/// Opponents with fewer than `min_matches` games are dropped; the rest are ordered by games
/// played (descending) then name, and truncated to `top`.
pub fn opponent_summary(
    matches: &[MatchRecord],
    team: &str,
    filter: &MatchFilter,
    min_matches: u32,
    top: usize,
) -> Result<Vec<OpponentStat>, StatsError> {
    let team = require_team(team)?;

    let mut by_opponent: BTreeMap<&str, Tally> = BTreeMap::new();
    for m in filter.apply(matches) {
        if let Some(p) = m.perspective(team) {
            by_opponent.entry(p.opponent).or_default().record(&p);
        }
    }

    let mut out: Vec<OpponentStat> = by_opponent
        .into_iter()
        .filter(|(_, t)| t.played >= min_matches)
        .map(|(opponent, t)| OpponentStat {
            opponent: opponent.to_string(),
            played: t.played,
            wins: t.wins,
            draws: t.draws,
            losses: t.losses,
            goals_for: t.goals_for,
            goals_against: t.goals_against,
            goal_diff: t.goal_diff(),
            win_rate: t.win_rate(),
        })
        .collect();

    // BTreeMap iteration is already name-ascending; a stable sort keeps that for ties.
    out.sort_by(|a, b| b.played.cmp(&a.played));
    out.truncate(top);
    Ok(out)
}

fn require_team(team: &str) -> Result<&str, StatsError> {
    let team = team.trim();
    if team.is_empty() {
        return Err(StatsError::MissingTeam);
    }
    Ok(team)
}
