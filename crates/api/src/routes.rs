use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use matchstats_core::domain::match_record::{MatchRecord, StoredMatch};
use matchstats_core::domain::stats::{OpponentStat, RankingMetric, RankingSnapshot, TeamYearStat};
use matchstats_core::stats::{self, MatchFilter, StatsError};
use matchstats_core::store::{MatchStore, Page, TournamentCount, MAX_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

const DEFAULT_PAGE_SIZE: u32 = 50;
const DEFAULT_OPPONENTS_TOP: u32 = 25;
const DEFAULT_RANKING_TOP: usize = 10;

pub type ApiError = (StatusCode, String);
pub type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Clone)]
pub struct AppState {
    /// `None` when neither a database nor a CSV could be loaded; data routes answer 503.
    pub store: Option<Arc<dyn MatchStore>>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/healthz", get(healthz))
        .route("/matches", get(list_matches))
        .route("/matches/count", get(count_matches))
        .route("/stats/yearly", get(stats_yearly))
        .route("/stats/opponents", get(stats_opponents))
        .route("/stats/top_by_year", get(stats_top_by_year))
        .route("/stats/top_cumulative", get(stats_top_cumulative))
        .route("/meta/tournaments", get(list_tournaments))
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Football API is running" }))
}

async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Default, Deserialize)]
pub struct CountParams {
    pub team: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

pub async fn count_matches(
    State(state): State<AppState>,
    Query(params): Query<CountParams>,
) -> ApiResult<CountResponse> {
    let store = require_store(&state)?;
    let filter = MatchFilter::from_params(params.team.as_deref(), None, None, None, None);
    let count = store.count_matches(&filter).await.map_err(internal)?;
    Ok(Json(CountResponse { count }))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub team: Option<String>,
    pub opponent: Option<String>,
    pub tournament: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct MatchesResponse {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub items: Vec<StoredMatch>,
}

pub async fn list_matches(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<MatchesResponse> {
    let store = require_store(&state)?;
    let filter = MatchFilter::from_params(
        params.team.as_deref(),
        params.opponent.as_deref(),
        params.tournament.as_deref(),
        params.date_from.as_deref(),
        params.date_to.as_deref(),
    );
    filter.validate().map_err(bad_request)?;
    let page = Page::try_new(
        params.page.unwrap_or(1),
        params.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
    )
    .map_err(bad_request)?;

    let result = store.list_matches(&filter, page).await.map_err(internal)?;
    Ok(Json(MatchesResponse {
        page: page.page,
        page_size: page.page_size,
        total: result.total,
        items: result.items,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct YearlyParams {
    pub team: Option<String>,
    pub tournament: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OpponentParams {
    pub team: Option<String>,
    pub tournament: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub min_matches: Option<u32>,
    pub top: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct TeamStatsResponse<T> {
    pub team: String,
    pub tournament: Option<String>,
    pub items: Vec<T>,
}

pub async fn stats_yearly(
    State(state): State<AppState>,
    Query(params): Query<YearlyParams>,
) -> ApiResult<TeamStatsResponse<TeamYearStat>> {
    let store = require_store(&state)?;
    let team = require_team(params.team.as_deref())?;
    let range = range_filter(
        params.tournament.as_deref(),
        params.date_from.as_deref(),
        params.date_to.as_deref(),
    )?;

    let matches = fetch_for_team(&**store, &team, &range).await?;
    let items = stats::yearly_summary(&matches, &team, &range).map_err(bad_request)?;

    Ok(Json(TeamStatsResponse {
        team,
        tournament: range.tournament,
        items,
    }))
}

pub async fn stats_opponents(
    State(state): State<AppState>,
    Query(params): Query<OpponentParams>,
) -> ApiResult<TeamStatsResponse<OpponentStat>> {
    let store = require_store(&state)?;
    let team = require_team(params.team.as_deref())?;
    let range = range_filter(
        params.tournament.as_deref(),
        params.date_from.as_deref(),
        params.date_to.as_deref(),
    )?;

    let min_matches = params.min_matches.unwrap_or(1);
    if min_matches < 1 {
        return Err(bad_request(format!("min_matches must be >= 1 (got {min_matches})")));
    }
    let top = params.top.unwrap_or(DEFAULT_OPPONENTS_TOP);
    if !(1..=MAX_PAGE_SIZE).contains(&top) {
        return Err(bad_request(format!("top must be 1..={MAX_PAGE_SIZE} (got {top})")));
    }

    let matches = fetch_for_team(&**store, &team, &range).await?;
    let items = stats::opponent_summary(&matches, &team, &range, min_matches, top as usize)
        .map_err(bad_request)?;

    Ok(Json(TeamStatsResponse {
        team,
        tournament: range.tournament,
        items,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct RankingParams {
    pub metric: Option<String>,
    pub top: Option<usize>,
    pub tournament: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RankingResponse {
    pub metric: RankingMetric,
    pub top: usize,
    pub items: Vec<RankingSnapshot>,
}

pub async fn stats_top_by_year(
    State(state): State<AppState>,
    Query(params): Query<RankingParams>,
) -> ApiResult<RankingResponse> {
    ranking(&state, params, stats::top_by_year).await
}

pub async fn stats_top_cumulative(
    State(state): State<AppState>,
    Query(params): Query<RankingParams>,
) -> ApiResult<RankingResponse> {
    ranking(&state, params, stats::top_cumulative).await
}

type RankingFn = fn(
    &[MatchRecord],
    RankingMetric,
    usize,
    &MatchFilter,
) -> Vec<RankingSnapshot>;

async fn ranking(
    state: &AppState,
    params: RankingParams,
    compute: RankingFn,
) -> ApiResult<RankingResponse> {
    let store = require_store(state)?;
    let range = range_filter(
        params.tournament.as_deref(),
        params.date_from.as_deref(),
        params.date_to.as_deref(),
    )?;
    let metric = RankingMetric::from_param(params.metric.as_deref());
    let top = params.top.unwrap_or(DEFAULT_RANKING_TOP);

    let matches = store.fetch_matches(&range).await.map_err(internal)?;
    let items = compute(&matches, metric, top, &range);

    tracing::debug!(
        metric = metric.as_str(),
        top,
        matches = matches.len(),
        snapshots = items.len(),
        "computed ranking"
    );
    Ok(Json(RankingResponse { metric, top, items }))
}

pub async fn list_tournaments(State(state): State<AppState>) -> ApiResult<Vec<TournamentCount>> {
    let store = require_store(&state)?;
    let out = store.list_tournaments().await.map_err(internal)?;
    Ok(Json(out))
}

fn require_store(state: &AppState) -> Result<&Arc<dyn MatchStore>, ApiError> {
    state.store.as_ref().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "match store unavailable (degraded mode)".to_string(),
        )
    })
}

fn require_team(team: Option<&str>) -> Result<String, ApiError> {
    team.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or_else(|| bad_request(StatsError::MissingTeam))
}

fn range_filter(
    tournament: Option<&str>,
    date_from: Option<&str>,
    date_to: Option<&str>,
) -> Result<MatchFilter, ApiError> {
    let filter = MatchFilter::range(tournament, date_from, date_to);
    filter.validate().map_err(bad_request)?;
    Ok(filter)
}

/// Narrows the store query to `team`'s matches; the engine applies `range` itself.
async fn fetch_for_team(
    store: &dyn MatchStore,
    team: &str,
    range: &MatchFilter,
) -> Result<Vec<MatchRecord>, ApiError> {
    let filter = MatchFilter {
        team: Some(team.to_string()),
        ..range.clone()
    };
    store.fetch_matches(&filter).await.map_err(internal)
}

fn bad_request(err: impl std::fmt::Display) -> ApiError {
    (StatusCode::BAD_REQUEST, err.to_string())
}

fn internal(err: anyhow::Error) -> ApiError {
    sentry_anyhow::capture_anyhow(&err);
    tracing::error!(error = %err, "match store query failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal error".to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use matchstats_core::store::MemoryMatchStore;

    fn record(date: &str, home: &str, away: &str, hs: u32, aws: u32, tournament: &str) -> MatchRecord {
        MatchRecord {
            date: date.to_string(),
            home_team: home.to_string(),
            away_team: away.to_string(),
            home_score: Some(hs),
            away_score: Some(aws),
            tournament: tournament.to_string(),
            city: None,
            country: None,
            neutral: false,
        }
    }

    fn state() -> AppState {
        let store = MemoryMatchStore::new(vec![
            record("1990-06-01", "A", "B", 2, 1, "Friendly"),
            record("1990-06-05", "B", "A", 0, 0, "Friendly"),
            record("1991-07-01", "C", "A", 1, 3, "FIFA World Cup"),
            record("1991-07-04", "B", "C", 5, 3, "FIFA World Cup"),
        ]);
        AppState {
            store: Some(Arc::new(store)),
        }
    }

    fn degraded() -> AppState {
        AppState { store: None }
    }

    #[tokio::test]
    async fn yearly_reports_each_year() {
        let params = YearlyParams {
            team: Some("A".to_string()),
            ..Default::default()
        };
        let Json(body) = stats_yearly(State(state()), Query(params)).await.unwrap();
        assert_eq!(body.team, "A");
        assert_eq!(body.items.len(), 2);
        let y1990 = &body.items[0];
        assert_eq!((y1990.year, y1990.played, y1990.wins, y1990.draws), (1990, 2, 1, 1));
        assert_eq!(y1990.win_rate, 0.5);
        assert_eq!(body.items[1].goals_for, 3);
    }

    #[tokio::test]
    async fn yearly_requires_team() {
        let (status, msg) = stats_yearly(State(state()), Query(YearlyParams::default()))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(msg.contains("team"));
    }

    #[tokio::test]
    async fn yearly_rejects_malformed_dates() {
        let params = YearlyParams {
            team: Some("A".to_string()),
            date_from: Some("1990".to_string()),
            ..Default::default()
        };
        let (status, _) = stats_yearly(State(state()), Query(params)).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn opponents_respect_tournament_and_echo_it() {
        let params = OpponentParams {
            team: Some("A".to_string()),
            tournament: Some("FIFA World Cup".to_string()),
            ..Default::default()
        };
        let Json(body) = stats_opponents(State(state()), Query(params)).await.unwrap();
        assert_eq!(body.tournament.as_deref(), Some("FIFA World Cup"));
        assert_eq!(body.items.len(), 1);
        assert_eq!(body.items[0].opponent, "C");
        assert_eq!(body.items[0].wins, 1);
    }

    #[tokio::test]
    async fn opponents_validate_bounds() {
        let params = OpponentParams {
            team: Some("A".to_string()),
            top: Some(0),
            ..Default::default()
        };
        let (status, _) = stats_opponents(State(state()), Query(params)).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let params = OpponentParams {
            team: Some("A".to_string()),
            min_matches: Some(0),
            ..Default::default()
        };
        let (status, _) = stats_opponents(State(state()), Query(params)).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn top_by_year_coerces_unknown_metric() {
        let params = RankingParams {
            metric: Some("possession".to_string()),
            top: Some(1),
            ..Default::default()
        };
        let Json(body) = stats_top_by_year(State(state()), Query(params)).await.unwrap();
        assert_eq!(body.metric, RankingMetric::Wins);
        assert_eq!(body.items.len(), 2);
        assert_eq!(body.items[0].top_entries[0].team, "A");

        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["metric"], "wins");
        assert_eq!(v["items"][0]["top"][0]["gf"], 2);
    }

    #[tokio::test]
    async fn top_cumulative_by_goals() {
        let params = RankingParams {
            metric: Some("gf".to_string()),
            ..Default::default()
        };
        let Json(body) = stats_top_cumulative(State(state()), Query(params)).await.unwrap();
        assert_eq!(body.top, 10);
        let last = body.items.last().unwrap();
        assert_eq!(last.year, 1991);
        // Through 1991: B 1+0+5 = 6 goals, A 2+0+3 = 5, C 1+3 = 4.
        let names: Vec<&str> = last.top_entries.iter().map(|e| e.team.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[tokio::test]
    async fn empty_range_yields_no_snapshots() {
        let params = RankingParams {
            date_from: Some("2050-01-01".to_string()),
            ..Default::default()
        };
        let Json(body) = stats_top_cumulative(State(state()), Query(params)).await.unwrap();
        assert!(body.items.is_empty());
    }

    #[tokio::test]
    async fn matches_listing_pages_and_counts() {
        let params = ListParams {
            team: Some("A".to_string()),
            page_size: Some(2),
            ..Default::default()
        };
        let Json(body) = list_matches(State(state()), Query(params)).await.unwrap();
        assert_eq!(body.total, 3);
        assert_eq!(body.items.len(), 2);
        assert_eq!(body.page, 1);

        let params = ListParams {
            page: Some(0),
            ..Default::default()
        };
        let (status, _) = list_matches(State(state()), Query(params)).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let Json(count) = count_matches(
            State(state()),
            Query(CountParams {
                team: Some("C".to_string()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(count.count, 2);
    }

    #[tokio::test]
    async fn tournaments_listed_by_count() {
        let Json(body) = list_tournaments(State(state())).await.unwrap();
        assert_eq!(body.len(), 2);
        assert_eq!(body[0].matches, 2);
        assert_eq!(body[0].name, "FIFA World Cup");
    }

    #[tokio::test]
    async fn degraded_mode_returns_503() {
        let (status, _) = list_tournaments(State(degraded())).await.unwrap_err();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
