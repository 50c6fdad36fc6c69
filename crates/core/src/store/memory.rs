use crate::domain::match_record::{MatchRecord, StoredMatch};
use crate::stats::MatchFilter;
use crate::store::{MatchPage, MatchStore, Page, TournamentCount};
use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Immutable in-process match table. Ids are one-based load positions.
#[derive(Debug, Clone, Default)]
pub struct MemoryMatchStore {
    rows: Arc<Vec<StoredMatch>>,
}

impl MemoryMatchStore {
    pub fn new(matches: Vec<MatchRecord>) -> Self {
        let rows = matches
            .into_iter()
            .zip(1_i64..)
            .map(|(record, id)| StoredMatch { id, record })
            .collect();
        Self {
            rows: Arc::new(rows),
        }
    }

    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let matches = crate::ingest::results_csv::read_results_csv(path)?;
        tracing::info!(path = %path.display(), rows = matches.len(), "loaded matches into memory");
        Ok(Self::new(matches))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn filtered<'a>(&'a self, filter: &'a MatchFilter) -> impl Iterator<Item = &'a StoredMatch> + 'a {
        self.rows.iter().filter(move |r| filter.matches(&r.record))
    }
}

#[async_trait::async_trait]
impl MatchStore for MemoryMatchStore {
    fn store_name(&self) -> &'static str {
        "memory"
    }

    async fn fetch_matches(&self, filter: &MatchFilter) -> Result<Vec<MatchRecord>> {
        Ok(self.filtered(filter).map(|r| r.record.clone()).collect())
    }

    async fn count_matches(&self, filter: &MatchFilter) -> Result<u64> {
        Ok(self.filtered(filter).count() as u64)
    }

    async fn list_matches(&self, filter: &MatchFilter, page: Page) -> Result<MatchPage> {
        let mut hits: Vec<&StoredMatch> = self.filtered(filter).collect();
        hits.sort_by(|a, b| a.record.date.cmp(&b.record.date).then(a.id.cmp(&b.id)));

        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let items = hits
            .iter()
            .skip(offset)
            .take(page.page_size as usize)
            .map(|r| (*r).clone())
            .collect();

        Ok(MatchPage {
            total: hits.len() as u64,
            items,
        })
    }

    async fn list_tournaments(&self) -> Result<Vec<TournamentCount>> {
        let mut counts: HashMap<&str, u64> = HashMap::new();
        for r in self.rows.iter() {
            *counts.entry(r.record.tournament.as_str()).or_default() += 1;
        }

        let mut out: Vec<TournamentCount> = counts
            .into_iter()
            .map(|(name, matches)| TournamentCount {
                name: name.to_string(),
                matches,
            })
            .collect();
        out.sort_by(|a, b| b.matches.cmp(&a.matches).then_with(|| a.name.cmp(&b.name)));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::match_record::fixture;

    fn store() -> MemoryMatchStore {
        let mut cup = fixture("1998-07-12", "Brazil", "France", 0, 3);
        cup.tournament = "FIFA World Cup".to_string();
        MemoryMatchStore::new(vec![
            fixture("2002-01-01", "England", "Germany", 1, 5),
            cup,
            fixture("1990-01-01", "England", "Brazil", 1, 0),
            fixture("1990-01-01", "Germany", "France", 2, 2),
        ])
    }

    #[tokio::test]
    async fn list_orders_by_date_then_id_and_pages() {
        let s = store();
        let page = s
            .list_matches(&MatchFilter::default(), Page::try_new(1, 3).unwrap())
            .await
            .unwrap();
        assert_eq!(page.total, 4);
        let ids: Vec<i64> = page.items.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 4, 2]);

        let page = s
            .list_matches(&MatchFilter::default(), Page::try_new(2, 3).unwrap())
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, 1);
    }

    #[tokio::test]
    async fn count_and_fetch_apply_filter() {
        let s = store();
        let england = MatchFilter::from_params(Some("England"), None, None, None, None);
        assert_eq!(s.count_matches(&england).await.unwrap(), 2);

        let h2h = MatchFilter::from_params(Some("England"), Some("Germany"), None, None, None);
        let rows = s.fetch_matches(&h2h).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, "2002-01-01");
    }

    #[tokio::test]
    async fn tournaments_sorted_by_count_then_name() {
        let out = store().list_tournaments().await.unwrap();
        assert_eq!(
            out,
            vec![
                TournamentCount {
                    name: "Friendly".to_string(),
                    matches: 3
                },
                TournamentCount {
                    name: "FIFA World Cup".to_string(),
                    matches: 1
                },
            ]
        );
    }
}
