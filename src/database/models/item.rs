use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category_id: Uuid,
    pub user_id: Uuid,
    pub quantity: i64,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

/// Item joined with its category's name and color
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ItemWithCategory {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub item: Item,
    pub category_name: String,
    pub category_color: String,
}
