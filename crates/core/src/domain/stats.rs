use serde::{Deserialize, Serialize};

/// A team's record over one calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamYearStat {
    pub year: i32,
    pub team: String,
    #[serde(rename = "matches")]
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    #[serde(rename = "gf")]
    pub goals_for: u32,
    #[serde(rename = "ga")]
    pub goals_against: u32,
    #[serde(rename = "gd")]
    pub goal_diff: i64,
    pub win_rate: f64,
}

/// A team's head-to-head record against one opponent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentStat {
    pub opponent: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    #[serde(rename = "gf")]
    pub goals_for: u32,
    #[serde(rename = "ga")]
    pub goals_against: u32,
    #[serde(rename = "gd")]
    pub goal_diff: i64,
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub team: String,
    pub wins: u32,
    #[serde(rename = "gf")]
    pub goals_for: u32,
    pub played: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingSnapshot {
    pub year: i32,
    #[serde(rename = "top")]
    pub top_entries: Vec<RankingEntry>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankingMetric {
    #[default]
    #[serde(rename = "wins")]
    Wins,
    #[serde(rename = "gf")]
    GoalsFor,
}

impl RankingMetric {
    /// Anything that is not a goals-for spelling ranks by wins.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("gf" | "goals_for" | "goalsFor") => Self::GoalsFor,
            _ => Self::Wins,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wins => "wins",
            Self::GoalsFor => "gf",
        }
    }

    pub fn value(self, entry: &RankingEntry) -> u32 {
        match self {
            Self::Wins => entry.wins,
            Self::GoalsFor => entry.goals_for,
        }
    }
}
