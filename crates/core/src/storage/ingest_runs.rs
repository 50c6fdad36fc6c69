use anyhow::Context;
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct IngestRun<'a> {
    pub started_at: DateTime<Utc>,
    pub source: &'a str,
    pub rows_loaded: Option<u64>,
    pub error: Option<&'a str>,
    pub summary: Option<Value>,
}

pub async fn record_ingest_run(pool: &sqlx::PgPool, run: IngestRun<'_>) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    let finished_at: DateTime<Utc> = Utc::now();
    let status = if run.error.is_some() { "error" } else { "success" };
    let rows_loaded = run.rows_loaded.and_then(|n| i64::try_from(n).ok());

    sqlx::query(
        "INSERT INTO ingest_runs (id, started_at, finished_at, source, status, rows_loaded, error, summary) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .persistent(false)
    .bind(id)
    .bind(run.started_at)
    .bind(finished_at)
    .bind(run.source)
    .bind(status)
    .bind(rows_loaded)
    .bind(run.error)
    .bind(run.summary)
    .execute(pool)
    .await
    .context("insert ingest_runs failed")?;

    Ok(id)
}
