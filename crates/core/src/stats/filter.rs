use crate::domain::match_record::MatchRecord;
use crate::stats::StatsError;
use chrono::NaiveDate;

/// Conjunction of optional constraints; an absent field does not restrict.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchFilter {
    pub team: Option<String>,
    pub opponent: Option<String>,
    pub tournament: Option<String>,
    /// Inclusive lower bound, compared lexicographically against `date`.
    pub date_from: Option<String>,
    /// Inclusive upper bound, compared lexicographically against `date`.
    pub date_to: Option<String>,
}

impl MatchFilter {
    /// Builds a filter from raw query values; blank strings are treated as absent.
    pub fn from_params(
        team: Option<&str>,
        opponent: Option<&str>,
        tournament: Option<&str>,
        date_from: Option<&str>,
        date_to: Option<&str>,
    ) -> Self {
        Self {
            team: clean(team),
            opponent: clean(opponent),
            tournament: clean(tournament),
            date_from: clean(date_from),
            date_to: clean(date_to),
        }
    }

    /// Range only; used by the aggregations, which take the team separately.
    pub fn range(tournament: Option<&str>, date_from: Option<&str>, date_to: Option<&str>) -> Self {
        Self::from_params(None, None, tournament, date_from, date_to)
    }

    /// Rejects date bounds that are not calendar dates in `YYYY-MM-DD` form.
    pub fn validate(&self) -> Result<(), StatsError> {
        check_date("date_from", self.date_from.as_deref())?;
        check_date("date_to", self.date_to.as_deref())?;
        Ok(())
    }

    pub fn matches(&self, m: &MatchRecord) -> bool {
        if let Some(team) = self.team.as_deref() {
            if !m.involves(team) {
                return false;
            }
        }
        if let Some(opponent) = self.opponent.as_deref() {
            if !m.involves(opponent) {
                return false;
            }
        }
        if let Some(tournament) = self.tournament.as_deref() {
            if m.tournament != tournament {
                return false;
            }
        }
        if let Some(from) = self.date_from.as_deref() {
            if m.date.as_str() < from {
                return false;
            }
        }
        if let Some(to) = self.date_to.as_deref() {
            if m.date.as_str() > to {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(
        &'a self,
        matches: &'a [MatchRecord],
    ) -> impl Iterator<Item = &'a MatchRecord> + 'a {
        matches.iter().filter(move |m| self.matches(m))
    }
}

fn clean(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn check_date(field: &'static str, value: Option<&str>) -> Result<(), StatsError> {
    let Some(value) = value else {
        return Ok(());
    };
    let well_formed = value.len() == 10 && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok();
    if well_formed {
        Ok(())
    } else {
        Err(StatsError::InvalidDate {
            field,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::match_record::fixture;

    #[test]
    fn empty_filter_keeps_everything() {
        let m = fixture("1990-06-01", "A", "B", 2, 1);
        assert!(MatchFilter::default().matches(&m));
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let m = fixture("1990-06-01", "A", "B", 2, 1);
        let f = MatchFilter::range(None, Some("1990-06-01"), Some("1990-06-01"));
        assert!(f.matches(&m));
        let f = MatchFilter::range(None, Some("1990-06-02"), None);
        assert!(!f.matches(&m));
        let f = MatchFilter::range(None, None, Some("1990-05-31"));
        assert!(!f.matches(&m));
    }

    #[test]
    fn tournament_and_sides_restrict() {
        let mut m = fixture("1990-06-01", "A", "B", 2, 1);
        m.tournament = "FIFA World Cup".to_string();
        assert!(MatchFilter::range(Some("FIFA World Cup"), None, None).matches(&m));
        assert!(!MatchFilter::range(Some("Friendly"), None, None).matches(&m));

        let f = MatchFilter::from_params(Some("B"), Some("A"), None, None, None);
        assert!(f.matches(&m));
        let f = MatchFilter::from_params(Some("B"), Some("C"), None, None, None);
        assert!(!f.matches(&m));
    }

    #[test]
    fn blank_params_are_absent() {
        let f = MatchFilter::from_params(Some("  "), None, Some(""), None, Some(" "));
        assert_eq!(f, MatchFilter::default());
    }

    #[test]
    fn validate_rejects_malformed_dates() {
        assert!(MatchFilter::range(None, Some("1990-01-01"), Some("2017-12-31"))
            .validate()
            .is_ok());
        let err = MatchFilter::range(None, Some("1990"), None).validate().unwrap_err();
        assert_eq!(
            err,
            StatsError::InvalidDate {
                field: "date_from",
                value: "1990".to_string()
            }
        );
        assert!(MatchFilter::range(None, None, Some("1990-02-30")).validate().is_err());
        assert!(MatchFilter::range(None, None, Some("1990-2-3")).validate().is_err());
    }
}
