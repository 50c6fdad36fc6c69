use anyhow::Context;

pub mod ingest_runs;
pub mod lock;
pub mod matches;

pub use matches::PgMatchStore;

pub async fn migrate(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("sqlx migrations failed")?;
    Ok(())
}
