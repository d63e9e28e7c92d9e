use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{Item, ItemWithCategory};
use crate::database::patch::Patch;
use crate::error::ApiError;

use super::{conflict_on_unique, normalize_description, normalize_name};

const DUPLICATE_MSG: &str = "Item with this name already exists";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItem {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItem {
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub description: Patch<String>,
    #[serde(default)]
    pub category_id: Patch<Uuid>,
    #[serde(default)]
    pub quantity: Patch<i64>,
    #[serde(default)]
    pub price: Patch<f64>,
}

/// Owner-scoped item store. An item's category must belong to the same owner;
/// the check runs on create and whenever the category reference changes.
pub struct ItemService {
    pool: SqlitePool,
}

impl ItemService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All items for the owner, name ascending, joined with category name/color.
    pub async fn list(&self, owner: Uuid) -> Result<Vec<ItemWithCategory>, ApiError> {
        let items = sqlx::query_as::<_, ItemWithCategory>(
            "SELECT i.*, c.name AS category_name, c.color AS category_color \
             FROM items i JOIN categories c ON c.id = i.category_id \
             WHERE i.user_id = ? ORDER BY i.name ASC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!("found {} items for user {}", items.len(), owner);
        Ok(items)
    }

    pub async fn get(&self, owner: Uuid, item_id: Uuid) -> Result<ItemWithCategory, ApiError> {
        sqlx::query_as::<_, ItemWithCategory>(
            "SELECT i.*, c.name AS category_name, c.color AS category_color \
             FROM items i JOIN categories c ON c.id = i.category_id \
             WHERE i.id = ? AND i.user_id = ?",
        )
        .bind(item_id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Item not found"))
    }

    /// Create an item. Negative quantity/price are rejected here as well as on
    /// update; the reference implementation only checked on update.
    pub async fn create(
        &self,
        owner: Uuid,
        payload: CreateItem,
    ) -> Result<ItemWithCategory, ApiError> {
        let mut errors = Vec::new();

        let name = match normalize_name(payload.name.as_deref(), "Item") {
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
        if payload.category_id.is_none() {
            errors.push("Category ID is required".to_string());
        }
        let quantity = payload.quantity.unwrap_or(0);
        if quantity < 0 {
            errors.push("Quantity cannot be negative".to_string());
        }
        let price = payload.price.unwrap_or(0.0);
        if price < 0.0 {
            errors.push("Price cannot be negative".to_string());
        }

        let Some(category_id) = payload.category_id else {
            return Err(ApiError::validation_error("Validation Error", errors));
        };
        if !errors.is_empty() {
            return Err(ApiError::validation_error("Validation Error", errors));
        }

        let (category_name, category_color) = self.resolve_category(owner, category_id).await?;

        if self.name_taken(owner, &name, None).await? {
            return Err(ApiError::conflict(DUPLICATE_MSG));
        }

        let item = Item {
            id: Uuid::new_v4(),
            name,
            description,
            category_id,
            user_id: owner,
            quantity,
            price,
            created_at: chrono::Utc::now(),
        };

        sqlx::query(
            "INSERT INTO items \
               (id, name, description, category_id, user_id, quantity, price, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(item.id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.category_id)
        .bind(item.user_id)
        .bind(item.quantity)
        .bind(item.price)
        .bind(item.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, DUPLICATE_MSG))?;

        tracing::info!("created item {} for user {}", item.id, owner);
        Ok(ItemWithCategory {
            item,
            category_name,
            category_color,
        })
    }

    pub async fn update(
        &self,
        owner: Uuid,
        item_id: Uuid,
        payload: UpdateItem,
    ) -> Result<ItemWithCategory, ApiError> {
        let mut item = self.fetch_owned(owner, item_id).await?;
        let original_name = item.name.clone();

        let mut errors = Vec::new();

        if let Patch::Set(raw) = &payload.name {
            match normalize_name(Some(raw.as_str()), "Item") {
                Ok(name) => item.name = name,
                Err(e) => errors.push(e),
            }
        }
        if let Patch::Set(raw) = &payload.description {
            match normalize_description(Some(raw.as_str())) {
                Ok(description) => item.description = description,
                Err(e) => errors.push(e),
            }
        }
        if let Patch::Set(quantity) = payload.quantity {
            if quantity < 0 {
                errors.push("Quantity cannot be negative".to_string());
            } else {
                item.quantity = quantity;
            }
        }
        if let Patch::Set(price) = payload.price {
            if price < 0.0 {
                errors.push("Price cannot be negative".to_string());
            } else {
                item.price = price;
            }
        }

        if !errors.is_empty() {
            return Err(ApiError::validation_error("Validation Error", errors));
        }

        // Re-check the owner-scoped reference when the category changes
        if let Patch::Set(category_id) = payload.category_id {
            self.resolve_category(owner, category_id).await?;
            item.category_id = category_id;
        }

        if item.name != original_name && self.name_taken(owner, &item.name, Some(item_id)).await? {
            return Err(ApiError::conflict(DUPLICATE_MSG));
        }

        sqlx::query(
            "UPDATE items \
             SET name = ?, description = ?, category_id = ?, quantity = ?, price = ? \
             WHERE id = ? AND user_id = ?",
        )
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.category_id)
        .bind(item.quantity)
        .bind(item.price)
        .bind(item.id)
        .bind(owner)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, DUPLICATE_MSG))?;

        let (category_name, category_color) =
            self.resolve_category(owner, item.category_id).await?;
        Ok(ItemWithCategory {
            item,
            category_name,
            category_color,
        })
    }

    /// Unconditional delete once owner-scoped existence is confirmed. No
    /// cascade; category counts are derived on the next read.
    pub async fn delete(&self, owner: Uuid, item_id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM items WHERE id = ? AND user_id = ?")
            .bind(item_id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Item not found"));
        }

        tracing::info!("deleted item {} for user {}", item_id, owner);
        Ok(())
    }

    async fn fetch_owned(&self, owner: Uuid, item_id: Uuid) -> Result<Item, ApiError> {
        sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = ? AND user_id = ?")
            .bind(item_id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found("Item not found"))
    }

    /// Resolve a category reference within the owner's scope, returning its
    /// name and color for the joined response.
    async fn resolve_category(
        &self,
        owner: Uuid,
        category_id: Uuid,
    ) -> Result<(String, String), ApiError> {
        let row: Option<(String, String)> =
            sqlx::query_as("SELECT name, color FROM categories WHERE id = ? AND user_id = ?")
                .bind(category_id)
                .bind(owner)
                .fetch_optional(&self.pool)
                .await?;

        row.ok_or_else(|| ApiError::invalid_reference("Category not found"))
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
                    "SELECT COUNT(*) FROM items WHERE user_id = ? AND name = ? AND id != ?",
                )
                .bind(owner)
                .bind(name)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM items WHERE user_id = ? AND name = ?")
                    .bind(owner)
                    .bind(name)
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(count > 0)
    }
}
