use axum::{extract::State, routing::post, Json, Router};
use tracing::{error, info, instrument};

use super::{
    dto::{SuggestionRequest, SuggestionsResponse},
    prompt,
};
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    extract::AppJson,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/suggestions", post(suggest))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn suggest(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(req): AppJson<SuggestionRequest>,
) -> AppResult<Json<SuggestionsResponse>> {
    if !req.has_target() {
        return Err(AppError::BadRequest(
            "Please fill at least one macronutrient value".into(),
        ));
    }

    let system = prompt::system_prompt(req.period);
    let user_msg = prompt::user_prompt(req.carbs, req.protein, req.fat);

    let suggestions = state
        .suggestions
        .complete(&system, &user_msg)
        .await
        .and_then(|content| prompt::parse_reply(&content))
        .map_err(|e| {
            error!(error = %format!("{e:#}"), "Error getting AI suggestions");
            AppError::Upstream("Failed to get AI suggestions".into())
        })?;

    info!(count = suggestions.len(), "suggestions returned");
    Ok(Json(SuggestionsResponse { suggestions }))
}
