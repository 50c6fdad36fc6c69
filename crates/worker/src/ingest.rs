use anyhow::Context;
use matchstats_core::domain::match_record::MatchRecord;
use serde::Serialize;
use std::collections::BTreeSet;

/// Shape of a parsed results file, logged on every run and stored with the ingest record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub rows: usize,
    pub tournaments: usize,
    pub teams: usize,
    pub unplayed: usize,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

pub fn summarize(matches: &[MatchRecord]) -> IngestSummary {
    let mut tournaments = BTreeSet::new();
    let mut teams = BTreeSet::new();
    let mut unplayed = 0;
    for m in matches {
        tournaments.insert(m.tournament.as_str());
        teams.insert(m.home_team.as_str());
        teams.insert(m.away_team.as_str());
        if m.home_score.is_none() || m.away_score.is_none() {
            unplayed += 1;
        }
    }

    IngestSummary {
        rows: matches.len(),
        tournaments: tournaments.len(),
        teams: teams.len(),
        unplayed,
        first_date: matches.iter().map(|m| m.date.as_str()).min().map(str::to_string),
        last_date: matches.iter().map(|m| m.date.as_str()).max().map(str::to_string),
    }
}

pub async fn load_matches(
    pool: &sqlx::PgPool,
    matches: &[MatchRecord],
    batch_size: usize,
) -> anyhow::Result<u64> {
    anyhow::ensure!(!matches.is_empty(), "results csv contained no matches");

    let inserted =
        matchstats_core::storage::matches::replace_all_matches(pool, matches, batch_size)
            .await
            .context("replace matches failed")?;

    anyhow::ensure!(
        inserted == matches.len() as u64,
        "inserted {inserted} rows but parsed {}",
        matches.len()
    );
    Ok(inserted)
}
