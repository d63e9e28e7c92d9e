use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{CategoryWithCount, ItemWithCategory};
use crate::error::ApiError;
use crate::middleware::AuthUser;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapData {
    pub user: IdentitySummary,
    pub categories: Vec<CategoryWithCount>,
    pub items: Vec<ItemWithCategory>,
    pub stats: BootstrapStats,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentitySummary {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapStats {
    pub total_categories: i64,
    pub total_items: i64,
    pub total_value: f64,
    pub active_categories: i64,
}

/// Read-only composite view: two owner-scoped reads plus in-memory stats, so a
/// client can hydrate in one round trip. Filtering and join semantics match
/// the per-resource endpoints; the category counts come from a join/group
/// instead of per-row subqueries but must agree with them.
pub struct BootstrapService {
    pool: SqlitePool,
}

impl BootstrapService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn fetch(&self, user: &AuthUser) -> Result<BootstrapData, ApiError> {
        let categories = sqlx::query_as::<_, CategoryWithCount>(
            "SELECT c.*, COUNT(i.id) AS item_count \
             FROM categories c \
             LEFT JOIN items i ON i.category_id = c.id AND i.user_id = c.user_id \
             WHERE c.user_id = ? \
             GROUP BY c.id \
             ORDER BY c.name ASC",
        )
        .bind(user.user_id)
        .fetch_all(&self.pool)
        .await?;

        // Newest first, unlike /items which sorts by name
        let items = sqlx::query_as::<_, ItemWithCategory>(
            "SELECT i.*, c.name AS category_name, c.color AS category_color \
             FROM items i JOIN categories c ON c.id = i.category_id \
             WHERE i.user_id = ? ORDER BY i.created_at DESC",
        )
        .bind(user.user_id)
        .fetch_all(&self.pool)
        .await?;

        let stats = BootstrapStats {
            total_categories: categories.len() as i64,
            total_items: items.len() as i64,
            total_value: items
                .iter()
                .map(|entry| entry.item.quantity as f64 * entry.item.price)
                .sum(),
            active_categories: categories
                .iter()
                .filter(|entry| entry.item_count > 0)
                .count() as i64,
        };

        Ok(BootstrapData {
            user: IdentitySummary {
                id: user.user_id,
                username: user.username.clone(),
            },
            categories,
            items,
            stats,
        })
    }
}
