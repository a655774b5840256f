use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use super::{
    claims::Claims,
    dto::{AuthResponse, CredentialsRequest, PublicUser, RefreshRequest},
    extractors::AuthUser,
    jwt::JwtKeys,
    password::{hash_password, is_valid_email, normalize_email, verify_password, MIN_PASSWORD_LEN},
    repo::User,
};
use crate::{
    error::{AppError, AppResult},
    extract::AppJson,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

fn issue_tokens(state: &AppState, user: User) -> AppResult<Json<AuthResponse>> {
    let keys = JwtKeys::from_ref(state);
    let (access_token, refresh_token) = keys
        .sign_pair(user.id, &user.email)
        .map_err(|e| AppError::internal("Failed to sign tokens", e))?;
    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser {
            id: user.id,
            email: user.email,
        },
    }))
}

fn expires_at(claims: &Claims) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(claims.exp as i64).unwrap_or_else(|_| OffsetDateTime::now_utc())
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CredentialsRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let email = normalize_email(&payload.email);

    if !is_valid_email(&email) {
        warn!(%email, "invalid email");
        return Err(AppError::BadRequest("Invalid email".into()));
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(AppError::BadRequest("Password too short".into()));
    }

    let hash = hash_password(&payload.password)
        .map_err(|e| AppError::internal("Failed to create account", e))?;

    let user = state
        .users
        .create(&email, &hash)
        .await
        .map_err(|e| AppError::internal("Failed to create account", e))?
        .ok_or_else(|| {
            warn!(%email, "email already registered");
            AppError::Conflict("Email already registered".into())
        })?;

    info!(user_id = %user.id, email = %user.email, "user signed up");
    let body = issue_tokens(&state, user)?;
    Ok((StatusCode::CREATED, body))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CredentialsRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = normalize_email(&payload.email);

    if !is_valid_email(&email) {
        warn!(%email, "invalid email");
        return Err(AppError::BadRequest("Invalid email".into()));
    }

    let user = state
        .users
        .find_by_email(&email)
        .await
        .map_err(|e| AppError::internal("Failed to login", e))?
        .ok_or_else(|| {
            warn!(%email, "login unknown email");
            AppError::Unauthorized("Invalid credentials".into())
        })?;

    let ok = verify_password(&payload.password, &user.password_hash)
        .map_err(|e| AppError::internal("Failed to login", e))?;
    if !ok {
        warn!(%email, user_id = %user.id, "login invalid password");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    info!(user_id = %user.id, "user logged in");
    issue_tokens(&state, user)
}

/// Rotate a refresh token: the presented one is revoked, a new pair is issued.
///
/// The revoke insert is the only check, so two concurrent refreshes with
/// the same token cannot both succeed.
#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys.verify_refresh(&payload.refresh_token).map_err(|e| {
        warn!(error = %e, "refresh rejected");
        AppError::Unauthorized("Invalid refresh token".into())
    })?;

    let user = state
        .users
        .find_by_id(claims.sub)
        .await
        .map_err(|e| AppError::internal("Failed to refresh session", e))?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;

    let revoked_now = state
        .users
        .revoke_token(claims.jti, expires_at(&claims))
        .await
        .map_err(|e| AppError::internal("Failed to refresh session", e))?;
    if !revoked_now {
        warn!(user_id = %claims.sub, "revoked refresh token presented");
        return Err(AppError::Unauthorized("Invalid refresh token".into()));
    }

    issue_tokens(&state, user)
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn logout(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<RefreshRequest>,
) -> AppResult<StatusCode> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|_| AppError::Unauthorized("Invalid refresh token".into()))?;
    if claims.sub != user.id {
        warn!("logout with someone else's refresh token");
        return Err(AppError::Unauthorized("Invalid refresh token".into()));
    }

    // Already revoked is fine here; signing out twice is not an error.
    state
        .users
        .revoke_token(claims.jti, expires_at(&claims))
        .await
        .map_err(|e| AppError::internal("Failed to sign out", e))?;

    match state.users.purge_expired_revocations().await {
        Ok(n) if n > 0 => info!(purged = n, "expired revocations removed"),
        Ok(_) => {}
        Err(e) => warn!(error = %e, "purge of revoked tokens failed"),
    }

    info!("user signed out");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_me(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<PublicUser>> {
    let row = state
        .users
        .find_by_id(user.id)
        .await
        .map_err(|e| AppError::internal("Failed to load user", e))?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;

    Ok(Json(PublicUser {
        id: row.id,
        email: row.email,
    }))
}
