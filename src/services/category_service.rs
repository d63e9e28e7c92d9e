use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{Category, CategoryWithCount};
use crate::database::patch::Patch;
use crate::error::ApiError;

use super::{conflict_on_unique, normalize_description, normalize_name, validate_color};

const DEFAULT_COLOR: &str = "#FFFFFF";
const DUPLICATE_MSG: &str = "Category with this name already exists";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategory {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategory {
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub description: Patch<String>,
    #[serde(default)]
    pub color: Patch<String>,
    #[serde(default)]
    pub is_active: Patch<bool>,
}

/// Owner-scoped category store. Every query filters by user_id; a category
/// belonging to another user is indistinguishable from one that does not exist.
pub struct CategoryService {
    pool: SqlitePool,
}

impl CategoryService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All categories for the owner, name ascending, each with its live item count.
    pub async fn list(&self, owner: Uuid) -> Result<Vec<CategoryWithCount>, ApiError> {
        let categories = sqlx::query_as::<_, CategoryWithCount>(
            "SELECT c.*, \
               (SELECT COUNT(*) FROM items i \
                WHERE i.category_id = c.id AND i.user_id = c.user_id) AS item_count \
             FROM categories c WHERE c.user_id = ? ORDER BY c.name ASC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!("found {} categories for user {}", categories.len(), owner);
        Ok(categories)
    }

    pub async fn get(&self, owner: Uuid, category_id: Uuid) -> Result<CategoryWithCount, ApiError> {
        let category = self.fetch_owned(owner, category_id).await?;
        let item_count = self.item_count(owner, category_id).await?;
        Ok(CategoryWithCount {
            category,
            item_count,
        })
    }

    pub async fn create(
        &self,
        owner: Uuid,
        payload: CreateCategory,
    ) -> Result<CategoryWithCount, ApiError> {
        let mut errors = Vec::new();

        let name = match normalize_name(payload.name.as_deref(), "Category") {
            Ok(name) => name,
            Err(e) => {
                errors.push(e);
                String::new()
            }
        };
        let description = match normalize_description(payload.description.as_deref()) {
            Ok(description) => description,
            Err(e) => {
                errors.push(e);
                String::new()
            }
        };
        let color = match payload.color.as_deref() {
            Some(raw) => match validate_color(raw) {
                Ok(color) => color,
                Err(e) => {
                    errors.push(e);
                    String::new()
                }
            },
            None => DEFAULT_COLOR.to_string(),
        };

        if !errors.is_empty() {
            return Err(ApiError::validation_error("Validation Error", errors));
        }

        if self.name_taken(owner, &name, None).await? {
            return Err(ApiError::conflict(DUPLICATE_MSG));
        }

        let now = chrono::Utc::now();
        let category = Category {
            id: Uuid::new_v4(),
            name,
            description,
            user_id: owner,
            color,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO categories \
               (id, name, description, user_id, color, is_active, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.user_id)
        .bind(&category.color)
        .bind(category.is_active)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, DUPLICATE_MSG))?;

        tracing::info!("created category {} for user {}", category.id, owner);
        Ok(CategoryWithCount {
            category,
            item_count: 0,
        })
    }

    /// Partial update: only fields present in the payload are written. An
    /// explicit empty description is a real write, an absent key is not.
    pub async fn update(
        &self,
        owner: Uuid,
        category_id: Uuid,
        payload: UpdateCategory,
    ) -> Result<CategoryWithCount, ApiError> {
        let mut category = self.fetch_owned(owner, category_id).await?;
        let original_name = category.name.clone();

        let mut errors = Vec::new();

        if let Patch::Set(raw) = &payload.name {
            match normalize_name(Some(raw.as_str()), "Category") {
                Ok(name) => category.name = name,
                Err(e) => errors.push(e),
            }
        }
        if let Patch::Set(raw) = &payload.description {
            match normalize_description(Some(raw.as_str())) {
                Ok(description) => category.description = description,
                Err(e) => errors.push(e),
            }
        }
        if let Patch::Set(raw) = &payload.color {
            match validate_color(raw) {
                Ok(color) => category.color = color,
                Err(e) => errors.push(e),
            }
        }
        if let Patch::Set(is_active) = payload.is_active {
            category.is_active = is_active;
        }

        if !errors.is_empty() {
            return Err(ApiError::validation_error("Validation Error", errors));
        }

        if category.name != original_name
            && self
                .name_taken(owner, &category.name, Some(category_id))
                .await?
        {
            return Err(ApiError::conflict(DUPLICATE_MSG));
        }

        category.updated_at = chrono::Utc::now();

        sqlx::query(
            "UPDATE categories \
             SET name = ?, description = ?, color = ?, is_active = ?, updated_at = ? \
             WHERE id = ? AND user_id = ?",
        )
        .bind(&category.name)
        .bind(&category.description)
        .bind(&category.color)
        .bind(category.is_active)
        .bind(category.updated_at)
        .bind(category.id)
        .bind(owner)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, DUPLICATE_MSG))?;

        let item_count = self.item_count(owner, category_id).await?;
        Ok(CategoryWithCount {
            category,
            item_count,
        })
    }

    /// Delete a category, refused while any item still references it. The
    /// count check and delete share one transaction so an item created
    /// concurrently cannot slip between them.
    pub async fn delete(&self, owner: Uuid, category_id: Uuid) -> Result<(), ApiError> {
        let mut tx = self.pool.begin().await?;

        let exists: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE id = ? AND user_id = ?")
                .bind(category_id)
                .bind(owner)
                .fetch_one(&mut *tx)
                .await?;
        if exists == 0 {
            return Err(ApiError::not_found("Category not found"));
        }

        let item_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM items WHERE category_id = ? AND user_id = ?")
                .bind(category_id)
                .bind(owner)
                .fetch_one(&mut *tx)
                .await?;
        if item_count > 0 {
            return Err(ApiError::conflict(format!(
                "Cannot delete category: it contains {} items",
                item_count
            )));
        }

        sqlx::query("DELETE FROM categories WHERE id = ? AND user_id = ?")
            .bind(category_id)
            .bind(owner)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!("deleted category {} for user {}", category_id, owner);
        Ok(())
    }

    async fn fetch_owned(&self, owner: Uuid, category_id: Uuid) -> Result<Category, ApiError> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = ? AND user_id = ?")
            .bind(category_id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found("Category not found"))
    }

    async fn item_count(&self, owner: Uuid, category_id: Uuid) -> Result<i64, ApiError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM items WHERE category_id = ? AND user_id = ?")
                .bind(category_id)
                .bind(owner)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    async fn name_taken(
        &self,
        owner: Uuid,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, ApiError> {
        let count: i64 = match exclude {
            Some(id) => {
                sqlx::query_scalar(
                    "SELECT COUNT(*) FROM categories WHERE user_id = ? AND name = ? AND id != ?",
                )
                .bind(owner)
                .bind(name)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE user_id = ? AND name = ?")
                    .bind(owner)
                    .bind(name)
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(count > 0)
    }
}
