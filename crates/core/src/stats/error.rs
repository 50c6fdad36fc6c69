use std::fmt;

/// Caller input the engine cannot default around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    MissingTeam,
    InvalidDate { field: &'static str, value: String },
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTeam => write!(f, "query parameter `team` is required"),
            Self::InvalidDate { field, value } => {
                write!(f, "`{field}` must be a YYYY-MM-DD date (got {value:?})")
            }
        }
    }
}

impl std::error::Error for StatsError {}
