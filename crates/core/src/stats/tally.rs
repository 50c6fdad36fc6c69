use crate::domain::match_record::{Outcome, Perspective};
use crate::stats::round3;
use std::ops::AddAssign;

/// Win/draw/loss and goal counters for one grouping key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Tally {
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

impl Tally {
    pub fn record(&mut self, p: &Perspective<'_>) {
        self.played += 1;
        self.goals_for += p.goals_for;
        self.goals_against += p.goals_against;
        match p.outcome() {
            Outcome::Win => self.wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::Loss => self.losses += 1,
        }
    }

    pub fn goal_diff(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }

    pub fn win_rate(&self) -> f64 {
        if self.played == 0 {
            return 0.0;
        }
        round3(f64::from(self.wins) / f64::from(self.played))
    }
}

/// Counters feeding the rankings: one contribution per side per match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RankTally {
    pub wins: u32,
    pub goals_for: u32,
    pub played: u32,
}

impl RankTally {
    pub fn record(&mut self, p: &Perspective<'_>) {
        self.played += 1;
        self.goals_for += p.goals_for;
        if p.outcome() == Outcome::Win {
            self.wins += 1;
        }
    }
}

impl AddAssign for RankTally {
    fn add_assign(&mut self, rhs: Self) {
        self.wins += rhs.wins;
        self.goals_for += rhs.goals_for;
        self.played += rhs.played;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::match_record::fixture;

    #[test]
    fn tally_classifies_each_match_once() {
        let mut t = Tally::default();
        for m in [
            fixture("2000-01-01", "A", "B", 2, 0),
            fixture("2000-01-02", "B", "A", 1, 1),
            fixture("2000-01-03", "B", "A", 3, 0),
        ] {
            t.record(&m.perspective("A").unwrap());
        }
        assert_eq!(t.played, 3);
        assert_eq!((t.wins, t.draws, t.losses), (1, 1, 1));
        assert_eq!((t.goals_for, t.goals_against), (3, 4));
        assert_eq!(t.goal_diff(), -1);
        assert_eq!(t.win_rate(), 0.333);
    }

    #[test]
    fn empty_tally_has_zero_rate() {
        assert_eq!(Tally::default().win_rate(), 0.0);
    }
}
