use axum::extract::{Extension, Json, Path, State};
use uuid::Uuid;

use crate::database::models::CategoryWithCount;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::category_service::{CreateCategory, UpdateCategory};
use crate::services::CategoryService;
use crate::AppState;

/// GET /categories
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<CategoryWithCount>> {
    let categories = CategoryService::new(state.pool.clone())
        .list(user.user_id)
        .await?;
    Ok(ApiResponse::success(categories))
}

/// GET /categories/:id
pub async fn get_one(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<CategoryWithCount> {
    let category = CategoryService::new(state.pool.clone())
        .get(user.user_id, id)
        .await?;
    Ok(ApiResponse::success(category))
}

/// POST /categories
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateCategory>,
) -> ApiResult<CategoryWithCount> {
    let category = CategoryService::new(state.pool.clone())
        .create(user.user_id, payload)
        .await?;
    Ok(ApiResponse::created(category).with_message("Category created successfully"))
}

/// PUT /categories/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCategory>,
) -> ApiResult<CategoryWithCount> {
    let category = CategoryService::new(state.pool.clone())
        .update(user.user_id, id, payload)
        .await?;
    Ok(ApiResponse::success(category).with_message("Category updated successfully"))
}

/// DELETE /categories/:id
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    CategoryService::new(state.pool.clone())
        .delete(user.user_id, id)
        .await?;
    Ok(ApiResponse::success(()).with_message("Category deleted successfully"))
}
