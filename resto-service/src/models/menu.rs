//! Menu catalog model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Menu item entity. Names are not unique; items are addressed by id.
#[derive(Debug, Clone, FromRow)]
pub struct MenuItem {
    pub menu_item_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub available: bool,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl MenuItem {
    pub fn new(
        name: String,
        description: Option<String>,
        price: Decimal,
        available: bool,
        category: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            menu_item_id: Uuid::new_v4(),
            name,
            description,
            price,
            available,
            category,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

fn default_available() -> bool {
    true
}

/// Request to create a menu item. Price must be non-negative; checked in
/// the handler because `validator` has no Decimal range support.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMenuItemRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default = "default_available")]
    pub available: bool,
    pub category: Option<String>,
}

/// Partial update for a menu item. Set-only semantics: omitted fields
/// are left unchanged, and `description`/`category` cannot be cleared
/// back to null here.
#[derive(Debug, Deserialize)]
pub struct UpdateMenuItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub available: Option<bool>,
    pub category: Option<String>,
}

/// Menu item response for API.
#[derive(Debug, Serialize)]
pub struct MenuItemResponse {
    pub menu_item_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub available: bool,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<MenuItem> for MenuItemResponse {
    fn from(m: MenuItem) -> Self {
        Self {
            menu_item_id: m.menu_item_id,
            name: m.name,
            description: m.description,
            price: m.price,
            available: m.available,
            category: m.category,
            created_at: m.created_at,
            updated_at: m.updated_at,
            deleted_at: m.deleted_at,
        }
    }
}
