//! Parser for the international results CSV
//! (`date,home_team,away_team,home_score,away_score,tournament,city,country,neutral`).

use crate::domain::match_record::MatchRecord;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ResultsRow {
    date: String,
    home_team: String,
    away_team: String,
    home_score: Option<String>,
    away_score: Option<String>,
    tournament: String,
    city: Option<String>,
    country: Option<String>,
    neutral: Option<String>,
}

pub fn read_results_csv(path: &Path) -> Result<Vec<MatchRecord>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open results csv {}", path.display()))?;
    parse_results_csv(file).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn parse_results_csv<R: Read>(reader: R) -> Result<Vec<MatchRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut out = Vec::new();
    for (idx, row) in rdr.deserialize::<ResultsRow>().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        let row = row.with_context(|| format!("malformed csv row at line {line}"))?;
        out.push(into_record(row).with_context(|| format!("invalid match at line {line}"))?);
    }
    Ok(out)
}

fn into_record(row: ResultsRow) -> Result<MatchRecord> {
    let date = row.date;
    anyhow::ensure!(
        date.len() == 10 && NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_ok(),
        "date must be YYYY-MM-DD (got {date:?})"
    );
    anyhow::ensure!(!row.home_team.is_empty(), "home_team must be non-empty");
    anyhow::ensure!(!row.away_team.is_empty(), "away_team must be non-empty");

    Ok(MatchRecord {
        date,
        home_team: row.home_team,
        away_team: row.away_team,
        home_score: parse_score("home_score", row.home_score.as_deref())?,
        away_score: parse_score("away_score", row.away_score.as_deref())?,
        tournament: row.tournament,
        city: row.city.filter(|s| !s.is_empty()),
        country: row.country.filter(|s| !s.is_empty()),
        neutral: row.neutral.as_deref().map(is_truthy).unwrap_or(false),
    })
}

/// Unplayed fixtures carry `NA` (or nothing) instead of a score.
fn parse_score(field: &str, raw: Option<&str>) -> Result<Option<u32>> {
    match raw {
        None | Some("") => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("na") => Ok(None),
        Some(s) => s
            .parse::<u32>()
            .map(Some)
            .with_context(|| format!("{field} must be a non-negative integer (got {s:?})")),
    }
}

fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.to_ascii_lowercase().as_str(),
        "1" | "true" | "t" | "yes" | "y"
    )
}
