use axum::extract::{Extension, Json, State};
use serde::Serialize;

use crate::database::models::UserProfile;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::user_service::Credentials;
use crate::services::UserService;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /users/register
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<Credentials>,
) -> ApiResult<TokenResponse> {
    let token = UserService::new(state.pool.clone()).register(payload).await?;
    Ok(ApiResponse::success(TokenResponse { token }).with_message("User registered successfully"))
}

/// POST /users/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<Credentials>,
) -> ApiResult<TokenResponse> {
    let token = UserService::new(state.pool.clone()).login(payload).await?;
    Ok(ApiResponse::success(TokenResponse { token }))
}

/// GET /users/me - the authenticated user, password hash excluded
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<UserProfile> {
    let profile = UserService::new(state.pool.clone())
        .get_self(user.user_id)
        .await?;
    Ok(ApiResponse::success(profile))
}
