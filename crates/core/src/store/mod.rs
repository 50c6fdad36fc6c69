use crate::domain::match_record::{MatchRecord, StoredMatch};
use crate::stats::MatchFilter;
use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod memory;

pub use memory::MemoryMatchStore;

pub const MAX_PAGE_SIZE: u32 = 200;

/// One-based page of the `(date, id)`-ordered match listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub page_size: u32,
}

impl Page {
    pub fn try_new(page: u32, page_size: u32) -> Result<Self> {
        anyhow::ensure!(page >= 1, "page must be >= 1 (got {page})");
        anyhow::ensure!(
            (1..=MAX_PAGE_SIZE).contains(&page_size),
            "page_size must be 1..={MAX_PAGE_SIZE} (got {page_size})"
        );
        Ok(Self { page, page_size })
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPage {
    pub total: u64,
    pub items: Vec<StoredMatch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentCount {
    pub name: String,
    pub matches: u64,
}

/// Read access to the match table.
#[async_trait::async_trait]
pub trait MatchStore: Send + Sync {
    fn store_name(&self) -> &'static str;

    async fn fetch_matches(&self, filter: &MatchFilter) -> Result<Vec<MatchRecord>>;

    async fn count_matches(&self, filter: &MatchFilter) -> Result<u64>;

    async fn list_matches(&self, filter: &MatchFilter, page: Page) -> Result<MatchPage>;

    /// Tournaments by match count (descending), then name.
    async fn list_tournaments(&self) -> Result<Vec<TournamentCount>>;
}
