use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{CreateFoodRequest, FromSuggestionRequest, ListQuery, UpdateFoodRequest},
    repo_types::FoodItem,
    services,
};
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    extract::{AppJson, AppPath, AppQuery},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/foods", get(list_foods).post(create_food))
        .route("/foods/from-suggestion", post(create_from_suggestion))
        .route("/foods/:id", patch(update_food).delete(delete_food))
        .route("/foods/:id/toggle", post(toggle_food))
}

fn not_found(id: Uuid) -> AppError {
    warn!(%id, "food item not found");
    AppError::NotFound("Food item not found".into())
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_foods(
    State(state): State<AppState>,
    user: AuthUser,
    AppQuery(q): AppQuery<ListQuery>,
) -> AppResult<Json<Vec<FoodItem>>> {
    let items = state
        .foods
        .list(user.id, q.period)
        .await
        .map_err(|e| AppError::internal("Failed to load food items", e))?;
    Ok(Json(items))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn create_food(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(req): AppJson<CreateFoodRequest>,
) -> AppResult<(StatusCode, Json<FoodItem>)> {
    let food = services::validate_new(req)?;
    let item = state
        .foods
        .insert(user.id, food)
        .await
        .map_err(|e| AppError::internal("Failed to add food item", e))?;
    info!(id = %item.id, period = %item.period, "food item added");
    Ok((StatusCode::CREATED, Json(item)))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn create_from_suggestion(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(req): AppJson<FromSuggestionRequest>,
) -> AppResult<(StatusCode, Json<FoodItem>)> {
    let food = services::from_suggestion(req.suggestion, req.period)?;
    let item = state
        .foods
        .insert(user.id, food)
        .await
        .map_err(|e| AppError::internal("Failed to add food item", e))?;
    info!(id = %item.id, "food item added from suggestion");
    Ok((StatusCode::CREATED, Json(item)))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn update_food(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<UpdateFoodRequest>,
) -> AppResult<Json<FoodItem>> {
    let patch = services::validate_patch(req)?;
    state
        .foods
        .update(user.id, id, patch)
        .await
        .map_err(|e| AppError::internal("Failed to update food", e))?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn toggle_food(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<FoodItem>> {
    state
        .foods
        .toggle_completed(user.id, id)
        .await
        .map_err(|e| AppError::internal("Failed to update food", e))?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_food(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<StatusCode> {
    let deleted = state
        .foods
        .delete(user.id, id)
        .await
        .map_err(|e| AppError::internal("Failed to delete food", e))?;
    if !deleted {
        return Err(not_found(id));
    }
    info!(%id, "food item deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request, Router};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::app::build_app;

    async fn call(app: &Router, token: &str, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .header("content-type", "application/json")
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
            .unwrap();
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn setup() -> (Router, String) {
        let state = AppState::fake();
        let token = state.test_token();
        (build_app(state), token)
    }

    #[tokio::test]
    async fn inserted_item_is_listed_for_its_period() {
        let (app, token) = setup();
        let (status, item) = call(
            &app,
            &token,
            "POST",
            "/api/v1/foods",
            Some(json!({"name": "Oatmeal", "grams": 80, "period": "morning"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(item["is_completed"], false);
        assert_eq!(item["unit"], Value::Null);

        let (_, morning) = call(&app, &token, "GET", "/api/v1/foods?period=morning", None).await;
        assert_eq!(morning.as_array().unwrap().len(), 1);
        assert_eq!(morning[0]["name"], "Oatmeal");
        assert_eq!(morning[0]["grams"], 80);

        let (_, dinner) = call(&app, &token, "GET", "/api/v1/foods?period=dinner", None).await;
        assert!(dinner.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn toggling_twice_restores_state() {
        let (app, token) = setup();
        let (_, item) = call(
            &app,
            &token,
            "POST",
            "/api/v1/foods",
            Some(json!({"name": "Egg", "unit": "2", "period": "lunch"})),
        )
        .await;
        let uri = format!("/api/v1/foods/{}/toggle", item["id"].as_str().unwrap());

        let (_, once) = call(&app, &token, "POST", &uri, None).await;
        assert_eq!(once["is_completed"], true);
        let (_, twice) = call(&app, &token, "POST", &uri, None).await;
        assert_eq!(twice["is_completed"], false);
    }

    #[tokio::test]
    async fn deleted_item_disappears() {
        let (app, token) = setup();
        let (_, item) = call(
            &app,
            &token,
            "POST",
            "/api/v1/foods",
            Some(json!({"name": "Rice", "grams": 150, "period": "dinner"})),
        )
        .await;
        let uri = format!("/api/v1/foods/{}", item["id"].as_str().unwrap());

        let (status, _) = call(&app, &token, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, all) = call(&app, &token, "GET", "/api/v1/foods", None).await;
        assert!(all.as_array().unwrap().is_empty());

        let (status, _) = call(&app, &token, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_swaps_quantity_kind() {
        let (app, token) = setup();
        let (_, item) = call(
            &app,
            &token,
            "POST",
            "/api/v1/foods",
            Some(json!({"name": "Chicken", "grams": 200, "period": "lunch"})),
        )
        .await;
        let uri = format!("/api/v1/foods/{}", item["id"].as_str().unwrap());

        let (status, updated) = call(
            &app,
            &token,
            "PATCH",
            &uri,
            Some(json!({"name": "Chicken breast", "unit": "1 fillet"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["name"], "Chicken breast");
        assert_eq!(updated["unit"], "1 fillet");
        assert_eq!(updated["grams"], Value::Null);
    }

    #[tokio::test]
    async fn items_are_scoped_to_owner() {
        let state = AppState::fake();
        let mine = state.test_token();
        let theirs = state.token_for(Uuid::new_v4(), "other@example.com");
        let app = build_app(state);

        let (_, item) = call(
            &app,
            &mine,
            "POST",
            "/api/v1/foods",
            Some(json!({"name": "Yogurt", "grams": 170, "period": "afternoon"})),
        )
        .await;
        let uri = format!("/api/v1/foods/{}", item["id"].as_str().unwrap());

        let (_, list) = call(&app, &theirs, "GET", "/api/v1/foods", None).await;
        assert!(list.as_array().unwrap().is_empty());
        let (status, _) = call(&app, &theirs, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn suggestion_is_added_with_parsed_grams() {
        let (app, token) = setup();
        let (status, item) = call(
            &app,
            &token,
            "POST",
            "/api/v1/foods/from-suggestion",
            Some(json!({
                "period": "afternoon",
                "suggestion": {"foodName": "Greek yogurt", "amount": "1 cup", "grams": "170g"}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(item["grams"], 170);
        assert_eq!(item["period"], "afternoon");
    }

    #[tokio::test]
    async fn invalid_body_and_missing_token_are_rejected() {
        let (app, token) = setup();
        let (status, body) = call(
            &app,
            &token,
            "POST",
            "/api/v1/foods",
            Some(json!({"name": "Oats", "period": "morning"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Grams or unit is required");

        let (status, _) = call(&app, "garbage", "GET", "/api/v1/foods", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
