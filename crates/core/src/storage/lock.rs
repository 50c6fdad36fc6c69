use anyhow::Context;

// Advisory locks are scoped to the Postgres session, so acquire and release must go through
// the same connection. Guards against two ingest runs replacing the table at once.
const INGEST_LOCK_KEY: i64 = 0x4D41_5443_4845; // "MATCHE"

pub async fn try_acquire_ingest_lock(conn: &mut sqlx::PgConnection) -> anyhow::Result<bool> {
    let acquired: (bool,) = sqlx::query_as("SELECT pg_try_advisory_lock($1)")
        .persistent(false)
        .bind(INGEST_LOCK_KEY)
        .fetch_one(conn)
        .await
        .with_context(|| format!("failed to acquire advisory lock (key={INGEST_LOCK_KEY})"))?;
    Ok(acquired.0)
}

pub async fn release_ingest_lock(conn: &mut sqlx::PgConnection) -> anyhow::Result<()> {
    sqlx::query("SELECT pg_advisory_unlock($1)")
        .persistent(false)
        .bind(INGEST_LOCK_KEY)
        .execute(conn)
        .await
        .with_context(|| format!("failed to release advisory lock (key={INGEST_LOCK_KEY})"))?;
    Ok(())
}
