use axum::extract::{Extension, Json, Path, State};
use uuid::Uuid;

use crate::database::models::ItemWithCategory;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::item_service::{CreateItem, UpdateItem};
use crate::services::ItemService;
use crate::AppState;

/// GET /items
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<ItemWithCategory>> {
    let items = ItemService::new(state.pool.clone()).list(user.user_id).await?;
    Ok(ApiResponse::success(items))
}

/// GET /items/:id
pub async fn get_one(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<ItemWithCategory> {
    let item = ItemService::new(state.pool.clone())
        .get(user.user_id, id)
        .await?;
    Ok(ApiResponse::success(item))
}

/// POST /items
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateItem>,
) -> ApiResult<ItemWithCategory> {
    let item = ItemService::new(state.pool.clone())
        .create(user.user_id, payload)
        .await?;
    Ok(ApiResponse::created(item).with_message("Item created successfully"))
}

/// PUT /items/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateItem>,
) -> ApiResult<ItemWithCategory> {
    let item = ItemService::new(state.pool.clone())
        .update(user.user_id, id, payload)
        .await?;
    Ok(ApiResponse::success(item).with_message("Item updated successfully"))
}

/// DELETE /items/:id
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    ItemService::new(state.pool.clone())
        .delete(user.user_id, id)
        .await?;
    Ok(ApiResponse::success(()).with_message("Item deleted successfully"))
}
