//! Aggregation engine: turns a flat match log into per-year, per-opponent and ranked views.
//!
//! Every entry point is a pure function over a borrowed slice of matches. Filters are applied
//! here as well, so callers may pass either a pre-narrowed or the full dataset.

pub mod error;
pub mod filter;
pub mod ranking;
pub mod team;

mod tally;

pub use error::StatsError;
pub use filter::MatchFilter;
pub use ranking::{top_by_year, top_cumulative};
pub use team::{opponent_summary, yearly_summary};

/// Rounds to three decimals, halves away from zero.
pub fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}
