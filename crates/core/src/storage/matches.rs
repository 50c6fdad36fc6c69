use crate::domain::match_record::{MatchRecord, StoredMatch};
use crate::stats::MatchFilter;
use crate::store::{MatchPage, MatchStore, Page, TournamentCount};
use anyhow::{Context, Result};
use sqlx::{PgPool, Postgres, QueryBuilder};

type MatchRow = (
    i64,
    String,
    String,
    String,
    Option<i32>,
    Option<i32>,
    String,
    Option<String>,
    Option<String>,
    bool,
);

const SELECT_MATCHES: &str = "SELECT id, date, home_team, away_team, home_score, away_score, \
                              tournament, city, country, neutral FROM matches";

// Byte-order collation so name ties sort the same as the in-memory store.
const SELECT_TOURNAMENTS: &str = "SELECT tournament, COUNT(*) AS matches FROM matches \
                                  GROUP BY tournament \
                                  ORDER BY matches DESC, tournament COLLATE \"C\" ASC";

#[derive(Debug, Clone)]
pub struct PgMatchStore {
    pool: PgPool,
}

impl PgMatchStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl MatchStore for PgMatchStore {
    fn store_name(&self) -> &'static str {
        "postgres"
    }

    async fn fetch_matches(&self, filter: &MatchFilter) -> Result<Vec<MatchRecord>> {
        let mut qb = QueryBuilder::<Postgres>::new(SELECT_MATCHES);
        push_filter(&mut qb, filter);

        let t0 = std::time::Instant::now();
        let rows = qb
            .build_query_as::<MatchRow>()
            .fetch_all(&self.pool)
            .await
            .context("select matches failed")?;

        tracing::debug!(
            rows = rows.len(),
            elapsed_ms = t0.elapsed().as_millis(),
            "fetched matches"
        );
        Ok(rows.into_iter().map(|row| from_row(row).record).collect())
    }

    async fn count_matches(&self, filter: &MatchFilter) -> Result<u64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM matches");
        push_filter(&mut qb, filter);

        let count: i64 = qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .context("count matches failed")?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn list_matches(&self, filter: &MatchFilter, page: Page) -> Result<MatchPage> {
        let total = self.count_matches(filter).await?;

        let mut qb = QueryBuilder::<Postgres>::new(SELECT_MATCHES);
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY date ASC, id ASC LIMIT ")
            .push_bind(i64::from(page.page_size))
            .push(" OFFSET ")
            .push_bind(i64::try_from(page.offset()).context("page offset out of range")?);

        let rows = qb
            .build_query_as::<MatchRow>()
            .fetch_all(&self.pool)
            .await
            .context("select matches page failed")?;

        Ok(MatchPage {
            total,
            items: rows.into_iter().map(from_row).collect(),
        })
    }

    async fn list_tournaments(&self) -> Result<Vec<TournamentCount>> {
        let rows = sqlx::query_as::<_, (String, i64)>(SELECT_TOURNAMENTS)
            .fetch_all(&self.pool)
            .await
            .context("select tournaments failed")?;

        Ok(rows
            .into_iter()
            .map(|(name, matches)| TournamentCount {
                name,
                matches: u64::try_from(matches).unwrap_or(0),
            })
            .collect())
    }
}

/// Replaces the whole table in one transaction, inserting in batches of `batch_size`.
pub async fn replace_all_matches(
    pool: &PgPool,
    matches: &[MatchRecord],
    batch_size: usize,
) -> Result<u64> {
    anyhow::ensure!(batch_size >= 1, "batch_size must be >= 1");

    let mut tx = pool.begin().await.context("begin transaction failed")?;

    let deleted = sqlx::query("DELETE FROM matches")
        .execute(&mut *tx)
        .await
        .context("clear matches failed")?
        .rows_affected();
    tracing::info!(deleted, "cleared matches table");

    let mut inserted: u64 = 0;
    for (batch_idx, chunk) in matches.chunks(batch_size).enumerate() {
        let t0 = std::time::Instant::now();
        let mut rows = Vec::with_capacity(chunk.len());
        for m in chunk {
            rows.push((m, score_column(m.home_score)?, score_column(m.away_score)?));
        }

        let mut qb = QueryBuilder::<Postgres>::new(
            "INSERT INTO matches (date, home_team, away_team, home_score, away_score, tournament, city, country, neutral) ",
        );
        qb.push_values(rows, |mut b, (m, home_score, away_score)| {
            b.push_bind(m.date.clone())
                .push_bind(m.home_team.clone())
                .push_bind(m.away_team.clone())
                .push_bind(home_score)
                .push_bind(away_score)
                .push_bind(m.tournament.clone())
                .push_bind(m.city.clone())
                .push_bind(m.country.clone())
                .push_bind(m.neutral);
        });

        let res = qb
            .build()
            .persistent(false)
            .execute(&mut *tx)
            .await
            .context("batch insert matches failed")?;
        inserted += res.rows_affected();

        tracing::debug!(
            batch_idx,
            batch_size = chunk.len(),
            elapsed_ms = t0.elapsed().as_millis(),
            "matches batch insert"
        );
    }

    tx.commit().await.context("commit transaction failed")?;
    Ok(inserted)
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &MatchFilter) {
    qb.push(" WHERE TRUE");
    if let Some(team) = &filter.team {
        qb.push(" AND (home_team = ")
            .push_bind(team.clone())
            .push(" OR away_team = ")
            .push_bind(team.clone())
            .push(")");
    }
    if let Some(opponent) = &filter.opponent {
        qb.push(" AND (home_team = ")
            .push_bind(opponent.clone())
            .push(" OR away_team = ")
            .push_bind(opponent.clone())
            .push(")");
    }
    if let Some(tournament) = &filter.tournament {
        qb.push(" AND tournament = ").push_bind(tournament.clone());
    }
    if let Some(from) = &filter.date_from {
        qb.push(" AND date >= ").push_bind(from.clone());
    }
    if let Some(to) = &filter.date_to {
        qb.push(" AND date <= ").push_bind(to.clone());
    }
}

fn score_column(score: Option<u32>) -> Result<Option<i32>> {
    score
        .map(i32::try_from)
        .transpose()
        .context("score does not fit in an INTEGER column")
}

fn from_row(row: MatchRow) -> StoredMatch {
    let (id, date, home_team, away_team, home_score, away_score, tournament, city, country, neutral) =
        row;
    StoredMatch {
        id,
        record: MatchRecord {
            date,
            home_team,
            away_team,
            // Negative scores cannot come from the ingest; treat them like missing ones.
            home_score: home_score.and_then(|s| u32::try_from(s).ok()),
            away_score: away_score.and_then(|s| u32::try_from(s).ok()),
            tournament,
            city,
            country,
            neutral,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_sql_binds_every_present_constraint() {
        let filter = MatchFilter::from_params(
            Some("England"),
            Some("Germany"),
            Some("FIFA World Cup"),
            Some("1990-01-01"),
            Some("2017-12-31"),
        );
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM matches");
        push_filter(&mut qb, &filter);
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM matches WHERE TRUE \
             AND (home_team = $1 OR away_team = $2) \
             AND (home_team = $3 OR away_team = $4) \
             AND tournament = $5 AND date >= $6 AND date <= $7"
        );
    }

    #[test]
    fn empty_filter_sql_is_unrestricted() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM matches");
        push_filter(&mut qb, &MatchFilter::default());
        assert_eq!(qb.sql(), "SELECT COUNT(*) FROM matches WHERE TRUE");
    }

    #[test]
    fn tournament_ties_sort_by_byte_order() {
        assert!(SELECT_TOURNAMENTS.ends_with(r#"ORDER BY matches DESC, tournament COLLATE "C" ASC"#));
    }

    #[test]
    fn row_mapping_drops_negative_scores() {
        let stored = from_row((
            5,
            "2000-01-01".to_string(),
            "A".to_string(),
            "B".to_string(),
            Some(-1),
            Some(2),
            "Friendly".to_string(),
            None,
            Some("X".to_string()),
            true,
        ));
        assert_eq!(stored.id, 5);
        assert_eq!(stored.record.home_score, None);
        assert_eq!(stored.record.away_score, Some(2));
        assert!(stored.record.neutral);
    }
}
