use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use super::dto::{PeriodFoods, TrackerView};
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    foods::{FoodItem, MealPeriod},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/tracker", get(tracker_view))
}

/// Split items into the four periods, keeping their creation order.
fn group_by_period(items: Vec<FoodItem>) -> Vec<PeriodFoods> {
    let mut groups: Vec<PeriodFoods> = MealPeriod::ALL
        .iter()
        .map(|&period| PeriodFoods {
            period,
            items: Vec::new(),
        })
        .collect();
    for item in items {
        if let Some(group) = groups.iter_mut().find(|g| g.period == item.period) {
            group.items.push(item);
        }
    }
    groups
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn tracker_view(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<TrackerView>> {
    let (foods, seasons) = tokio::try_join!(
        state.foods.list(user.id, None),
        state.seasons.list(user.id),
    )
    .map_err(|e| AppError::internal("Failed to load tracker", e))?;

    Ok(Json(TrackerView {
        user_email: user.email,
        periods: group_by_period(foods),
        open_seasons: seasons.into_iter().filter(|s| s.is_open()).collect(),
    }))
}
