//! League-table style rankings built from both sides of every match.

use crate::domain::match_record::{MatchRecord, Side};
use crate::domain::stats::{RankingEntry, RankingMetric, RankingSnapshot};
use crate::stats::tally::RankTally;
use crate::stats::MatchFilter;
use std::cmp::Ordering;
use std::collections::BTreeMap;

type YearTable<'a> = BTreeMap<i32, BTreeMap<&'a str, RankTally>>;

/// Top `top` teams of each year by `metric`, years ascending.
pub fn top_by_year(
    matches: &[MatchRecord],
    metric: RankingMetric,
    top: usize,
    filter: &MatchFilter,
) -> Vec<RankingSnapshot> {
    tally_by_year(matches, filter)
        .into_iter()
        .map(|(year, teams)| RankingSnapshot {
            year,
            top_entries: rank(teams.into_iter(), metric, top),
        })
        .collect()
}

/// Like [`top_by_year`], but each year's snapshot ranks all-time totals through that year.
///
/// Years are folded in ascending order; a snapshot is emitted once a year's contributions
/// have been added to the running totals, so the snapshot for year `Y` covers every year
/// up to and including `Y`. Teams tied on every ranking key keep the order in which they
/// first appeared (earlier year first, then name). An empty input emits nothing.
pub fn top_cumulative(
    matches: &[MatchRecord],
    metric: RankingMetric,
    top: usize,
    filter: &MatchFilter,
) -> Vec<RankingSnapshot> {
    tally_by_year(matches, filter)
        .into_iter()
        .scan(
            BTreeMap::<&str, (usize, RankTally)>::new(),
            |running, (year, teams)| {
                for (team, t) in teams {
                    let seq = running.len();
                    running.entry(team).or_insert((seq, RankTally::default())).1 += t;
                }
                let mut seen: Vec<(usize, &str, RankTally)> =
                    running.iter().map(|(k, (seq, v))| (*seq, *k, *v)).collect();
                seen.sort_by_key(|(seq, _, _)| *seq);
                Some(RankingSnapshot {
                    year,
                    top_entries: rank(seen.into_iter().map(|(_, k, v)| (k, v)), metric, top),
                })
            },
        )
        .collect()
}

/// Groups home and away contributions of every filtered match by `(year, team)`.
fn tally_by_year<'a>(matches: &'a [MatchRecord], filter: &MatchFilter) -> YearTable<'a> {
    let mut table = YearTable::new();
    for m in matches.iter().filter(|m| filter.matches(m)) {
        let Some(year) = m.year() else {
            tracing::debug!(date = %m.date, "skipping match with malformed year prefix");
            continue;
        };
        let teams = table.entry(year).or_default();
        for side in [Side::Home, Side::Away] {
            let p = m.side(side);
            teams.entry(p.team).or_default().record(&p);
        }
    }
    table
}

/// Sorts stably, so `teams` order decides full ties.
fn rank<'a>(
    teams: impl Iterator<Item = (&'a str, RankTally)>,
    metric: RankingMetric,
    top: usize,
) -> Vec<RankingEntry> {
    let mut rows: Vec<RankingEntry> = teams
        .map(|(team, t)| RankingEntry {
            team: team.to_string(),
            wins: t.wins,
            goals_for: t.goals_for,
            played: t.played,
        })
        .collect();
    rows.sort_by(|a, b| compare(metric, a, b));
    rows.truncate(top);
    rows
}

/// Metric, then goals for, then wins, all descending; fewer games played ranks higher.
fn compare(metric: RankingMetric, a: &RankingEntry, b: &RankingEntry) -> Ordering {
    metric
        .value(b)
        .cmp(&metric.value(a))
        .then_with(|| b.goals_for.cmp(&a.goals_for))
        .then_with(|| b.wins.cmp(&a.wins))
        .then_with(|| a.played.cmp(&b.played))
}
