use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query, State},
    http::request::Parts,
    routing::{get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use tracing::{info, instrument};

use super::types::{
    ApiResponse, CompareQuery, LeaderboardQuery, RecentQuery, RefreshResponse, TimeSeriesQuery,
    DEFAULT_RECENT_LIMIT,
};
use crate::records::{GameResult, RejectedRow};
use crate::shared::{AppError, AppState};
use crate::stats::{
    DateRange, HeadToHead, LeaderboardRow, PerfectGames, PlayerStats, ScoreAnalyzer, ScoreBucket,
    StatsError, Summary, TimeSeriesPoint, TrendReport,
};

/// Query-string extractor whose rejection is reported as a JSON 400.
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Routes for every analytics view plus refresh.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/leaderboard", get(leaderboard))
        .route("/players", get(list_players))
        .route("/players/:name", get(player_stats))
        .route("/players/:name/trend", get(player_trend))
        .route("/players/:name/history", get(player_history))
        .route("/compare", get(compare_players))
        .route("/distribution", get(score_distribution))
        .route("/perfect-games", get(perfect_games))
        .route("/summary", get(summary))
        .route("/recent", get(recent_games))
        .route("/timeseries", get(time_series))
        .route("/rejected", get(rejected_rows))
        .route("/refresh", post(refresh))
        .with_state(state)
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

/// Loads the current snapshot, narrows it to `range` and runs `query`.
async fn analyze<T, F>(state: &AppState, range: DateRange, query: F) -> ApiResult<T>
where
    F: FnOnce(&ScoreAnalyzer<'_>) -> Result<T, StatsError>,
{
    let snapshot = state.dashboard.snapshot().await?;
    let results = range.apply(&snapshot.outcome.results);
    let data = query(&ScoreAnalyzer::new(&results))?;
    Ok(Json(ApiResponse::new(data, &snapshot)))
}

pub async fn health() -> &'static str {
    "ok"
}

/// GET /leaderboard?metric=average&limit=10
#[instrument(name = "leaderboard", skip(state))]
pub async fn leaderboard(
    State(state): State<AppState>,
    ApiQuery(range): ApiQuery<DateRange>,
    ApiQuery(params): ApiQuery<LeaderboardQuery>,
) -> ApiResult<Vec<LeaderboardRow>> {
    analyze(&state, range, |analyzer| {
        Ok(analyzer.leaderboard(params.metric, params.limit))
    })
    .await
}

/// GET /players
#[instrument(name = "list_players", skip(state))]
pub async fn list_players(
    State(state): State<AppState>,
    ApiQuery(range): ApiQuery<DateRange>,
) -> ApiResult<Vec<PlayerStats>> {
    analyze(&state, range, |analyzer| Ok(analyzer.all_player_stats())).await
}

/// GET /players/:name
#[instrument(name = "player_stats", skip(state))]
pub async fn player_stats(
    State(state): State<AppState>,
    Path(name): Path<String>,
    ApiQuery(range): ApiQuery<DateRange>,
) -> ApiResult<PlayerStats> {
    analyze(&state, range, |analyzer| analyzer.player_stats(&name)).await
}

/// GET /players/:name/trend
#[instrument(name = "player_trend", skip(state))]
pub async fn player_trend(
    State(state): State<AppState>,
    Path(name): Path<String>,
    ApiQuery(range): ApiQuery<DateRange>,
) -> ApiResult<TrendReport> {
    analyze(&state, range, |analyzer| analyzer.trend(&name)).await
}

/// GET /players/:name/history
#[instrument(name = "player_history", skip(state))]
pub async fn player_history(
    State(state): State<AppState>,
    Path(name): Path<String>,
    ApiQuery(range): ApiQuery<DateRange>,
) -> ApiResult<Vec<GameResult>> {
    analyze(&state, range, |analyzer| analyzer.player_history(&name)).await
}

/// GET /compare?player1=..&player2=..
#[instrument(name = "compare_players", skip(state))]
pub async fn compare_players(
    State(state): State<AppState>,
    ApiQuery(range): ApiQuery<DateRange>,
    ApiQuery(params): ApiQuery<CompareQuery>,
) -> ApiResult<HeadToHead> {
    analyze(&state, range, |analyzer| {
        analyzer.head_to_head(&params.player1, &params.player2)
    })
    .await
}

/// GET /distribution
#[instrument(name = "score_distribution", skip(state))]
pub async fn score_distribution(
    State(state): State<AppState>,
    ApiQuery(range): ApiQuery<DateRange>,
) -> ApiResult<Vec<ScoreBucket>> {
    analyze(&state, range, |analyzer| Ok(analyzer.score_distribution())).await
}

/// GET /perfect-games
#[instrument(name = "perfect_games", skip(state))]
pub async fn perfect_games(
    State(state): State<AppState>,
    ApiQuery(range): ApiQuery<DateRange>,
) -> ApiResult<PerfectGames> {
    analyze(&state, range, |analyzer| Ok(analyzer.perfect_games())).await
}

/// GET /summary
#[instrument(name = "summary", skip(state))]
pub async fn summary(
    State(state): State<AppState>,
    ApiQuery(range): ApiQuery<DateRange>,
) -> ApiResult<Summary> {
    analyze(&state, range, |analyzer| Ok(analyzer.summary())).await
}

/// GET /recent?limit=10
#[instrument(name = "recent_games", skip(state))]
pub async fn recent_games(
    State(state): State<AppState>,
    ApiQuery(range): ApiQuery<DateRange>,
    ApiQuery(params): ApiQuery<RecentQuery>,
) -> ApiResult<Vec<GameResult>> {
    let limit = params.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    analyze(&state, range, |analyzer| Ok(analyzer.recent_games(limit))).await
}

/// GET /timeseries?player=..&period=week
#[instrument(name = "time_series", skip(state))]
pub async fn time_series(
    State(state): State<AppState>,
    ApiQuery(range): ApiQuery<DateRange>,
    ApiQuery(params): ApiQuery<TimeSeriesQuery>,
) -> ApiResult<Vec<TimeSeriesPoint>> {
    // `?player=` with no value means every player.
    let player = params
        .player
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());
    analyze(&state, range, |analyzer| analyzer.time_series(player, params.period)).await
}

/// GET /rejected
///
/// Rows of the current load that failed validation. Not date-filtered:
/// a rejected row may not have a usable date.
#[instrument(name = "rejected_rows", skip(state))]
pub async fn rejected_rows(State(state): State<AppState>) -> ApiResult<Vec<RejectedRow>> {
    let snapshot = state.dashboard.snapshot().await?;
    let rejected = snapshot.outcome.rejected.clone();
    Ok(Json(ApiResponse::new(rejected, &snapshot)))
}

/// POST /refresh
#[instrument(name = "refresh", skip(state))]
pub async fn refresh(State(state): State<AppState>) -> Result<Json<RefreshResponse>, AppError> {
    let snapshot = state.dashboard.refresh().await?;

    let response = RefreshResponse {
        valid_rows: snapshot.outcome.results.len(),
        rejected_rows: snapshot.outcome.rejected.len(),
        loaded_at: snapshot.loaded_at,
    };
    info!(
        valid_rows = response.valid_rows,
        rejected_rows = response.rejected_rows,
        "Refresh completed"
    );

    Ok(Json(response))
}
