use axum::extract::{Extension, State};

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::bootstrap_service::BootstrapData;
use crate::services::BootstrapService;
use crate::AppState;

/// GET /bootstrap - identity, categories, items and stats in one read
pub async fn get_all(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<BootstrapData> {
    let data = BootstrapService::new(state.pool.clone()).fetch(&user).await?;
    Ok(ApiResponse::success(data))
}
