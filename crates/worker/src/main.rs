use anyhow::Context;
use clap::Parser;
use matchstats_core::storage::ingest_runs::{record_ingest_run, IngestRun};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod ingest;

#[derive(Debug, Parser)]
#[command(name = "matchstats_worker")]
struct Args {
    /// Results CSV to load.
    #[arg(long, default_value = "data/results.csv")]
    csv: PathBuf,

    /// Parse and summarize the CSV without touching the database.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = matchstats_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    let started_at = chrono::Utc::now();
    let source = args.csv.display().to_string();

    let matches = matchstats_core::ingest::results_csv::read_results_csv(&args.csv)?;
    let summary = ingest::summarize(&matches);

    tracing::info!(
        %source,
        rows = summary.rows,
        tournaments = summary.tournaments,
        teams = summary.teams,
        unplayed = summary.unplayed,
        first_date = summary.first_date.as_deref().unwrap_or("-"),
        last_date = summary.last_date.as_deref().unwrap_or("-"),
        dry_run = args.dry_run,
        "parsed results csv"
    );

    if args.dry_run {
        return Ok(());
    }

    let db_url = settings.require_database_url()?;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(db_url)
        .await
        .context("connect DATABASE_URL failed")?;

    matchstats_core::storage::migrate(&pool).await?;

    let mut lock_conn = pool.acquire().await.context("acquire lock connection failed")?;
    let acquired = matchstats_core::storage::lock::try_acquire_ingest_lock(&mut lock_conn).await?;
    if !acquired {
        tracing::warn!(%source, "ingest lock not acquired; another run in progress");
        return Ok(());
    }

    let summary_json = serde_json::to_value(&summary).ok();
    let result = ingest::load_matches(&pool, &matches, settings.insert_batch).await;

    match &result {
        Ok(inserted) => {
            let run_id = record_ingest_run(
                &pool,
                IngestRun {
                    started_at,
                    source: &source,
                    rows_loaded: Some(*inserted),
                    error: None,
                    summary: summary_json,
                },
            )
            .await?;
            tracing::info!(%source, %run_id, inserted, "ingest complete");
        }
        Err(err) => {
            sentry_anyhow::capture_anyhow(err);
            let message = format!("{err:#}");
            let run_id = record_ingest_run(
                &pool,
                IngestRun {
                    started_at,
                    source: &source,
                    rows_loaded: None,
                    error: Some(&message),
                    summary: summary_json,
                },
            )
            .await?;
            tracing::error!(%source, %run_id, error = %message, "ingest failed");
        }
    }

    let _ = matchstats_core::storage::lock::release_ingest_lock(&mut lock_conn).await;
    result.map(|_| ())
}

fn init_sentry(settings: &matchstats_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
