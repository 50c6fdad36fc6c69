use serde::{Deserialize, Serialize};

/// One historical result row. Scores are optional because the source data carries
/// scheduled-but-unplayed fixtures; aggregations count a missing score as zero goals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// `YYYY-MM-DD`; compared lexicographically.
    pub date: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub tournament: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub neutral: bool,
}

/// A persisted match with its surrogate key, as returned by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMatch {
    pub id: i64,
    #[serde(flatten)]
    pub record: MatchRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

/// A match seen from one team's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Perspective<'a> {
    pub side: Side,
    pub team: &'a str,
    pub opponent: &'a str,
    pub goals_for: u32,
    pub goals_against: u32,
}

impl Perspective<'_> {
    pub fn outcome(&self) -> Outcome {
        match self.goals_for.cmp(&self.goals_against) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Equal => Outcome::Draw,
            std::cmp::Ordering::Less => Outcome::Loss,
        }
    }
}

impl MatchRecord {
    /// Leading four characters of `date` as a year, if they are all ASCII digits.
    pub fn year(&self) -> Option<i32> {
        let prefix = self.date.get(..4)?;
        if !prefix.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        prefix.parse().ok()
    }

    pub fn home_goals(&self) -> u32 {
        self.home_score.unwrap_or(0)
    }

    pub fn away_goals(&self) -> u32 {
        self.away_score.unwrap_or(0)
    }

    pub fn involves(&self, team: &str) -> bool {
        self.home_team == team || self.away_team == team
    }

    pub fn side(&self, side: Side) -> Perspective<'_> {
        match side {
            Side::Home => Perspective {
                side,
                team: &self.home_team,
                opponent: &self.away_team,
                goals_for: self.home_goals(),
                goals_against: self.away_goals(),
            },
            Side::Away => Perspective {
                side,
                team: &self.away_team,
                opponent: &self.home_team,
                goals_for: self.away_goals(),
                goals_against: self.home_goals(),
            },
        }
    }

    /// Resolves `team` to exactly one side. Home wins when both names match.
    pub fn perspective(&self, team: &str) -> Option<Perspective<'_>> {
        if self.home_team == team {
            Some(self.side(Side::Home))
        } else if self.away_team == team {
            Some(self.side(Side::Away))
        } else {
            None
        }
    }
}

#[cfg(test)]
pub(crate) fn fixture(date: &str, home: &str, away: &str, hs: u32, aws: u32) -> MatchRecord {
    MatchRecord {
        date: date.to_string(),
        home_team: home.to_string(),
        away_team: away.to_string(),
        home_score: Some(hs),
        away_score: Some(aws),
        tournament: "Friendly".to_string(),
        city: None,
        country: None,
        neutral: false,
    }
}
