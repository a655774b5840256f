use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::{macros::format_description, Date, OffsetDateTime};
use tracing::{info, instrument, warn};

use super::{
    dto::{EndSeasonRequest, SeasonsResponse, StartSeasonRequest},
    repo_types::{Season, StartOutcome},
};
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    extract::AppJson,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/seasons", get(list_seasons))
        .route("/seasons/start", post(start_season))
        .route("/seasons/end", post(end_season))
}

fn parse_date(raw: &str) -> AppResult<Date> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::BadRequest("Start date is required".into()));
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map_err(|_| AppError::BadRequest("Start date must be YYYY-MM-DD".into()))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_seasons(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<SeasonsResponse>> {
    let seasons = state
        .seasons
        .list(user.id)
        .await
        .map_err(|e| AppError::internal("Failed to load seasons", e))?;
    Ok(Json(SeasonsResponse { seasons }))
}

/// Start a season unless one of the same type is still open.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn start_season(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(req): AppJson<StartSeasonRequest>,
) -> AppResult<(StatusCode, Json<Season>)> {
    let started_at = parse_date(&req.date)?;
    let already_open = || {
        warn!(kind = %req.kind, "season already open");
        AppError::Conflict(format!("You already have an open {} season.", req.kind))
    };

    let open = state
        .seasons
        .latest_open(user.id, req.kind)
        .await
        .map_err(|e| AppError::internal(&format!("Failed to start {} season", req.kind), e))?;
    if open.is_some() {
        return Err(already_open());
    }

    match state
        .seasons
        .start(user.id, req.kind, started_at)
        .await
        .map_err(|e| AppError::internal(&format!("Failed to start {} season", req.kind), e))?
    {
        StartOutcome::Started(season) => {
            info!(id = %season.id, kind = %season.kind, "season started");
            Ok((StatusCode::CREATED, Json(season)))
        }
        StartOutcome::AlreadyOpen => Err(already_open()),
    }
}

/// End the most recently started open season of the given type, dated today (UTC).
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn end_season(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(req): AppJson<EndSeasonRequest>,
) -> AppResult<Json<Season>> {
    let no_open = || AppError::NotFound(format!("No open {} season to end.", req.kind));
    let fail = |e: anyhow::Error| AppError::internal(&format!("Failed to end {} season", req.kind), e);

    let open = state
        .seasons
        .latest_open(user.id, req.kind)
        .await
        .map_err(fail)?
        .ok_or_else(no_open)?;

    let today = OffsetDateTime::now_utc().date();
    let season = state
        .seasons
        .end(user.id, open.id, today)
        .await
        .map_err(fail)?
        .ok_or_else(no_open)?;

    info!(id = %season.id, kind = %season.kind, "season ended");
    Ok(Json(season))
}
