//! Kitchen preparation tracker model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::OrderStatus;

/// Per order-item preparation record. Shares the order status vocabulary
/// but advances independently of the parent order.
#[derive(Debug, Clone, FromRow)]
pub struct Preparation {
    pub prep_id: Uuid,
    pub order_item_id: Uuid,
    pub cook_id: Uuid,
    pub status: String,
    pub cancelled: bool,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Preparation {
    pub fn new(order_item_id: Uuid, cook_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            prep_id: Uuid::new_v4(),
            order_item_id,
            cook_id,
            status: OrderStatus::Pending.as_str().to_string(),
            cancelled: false,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Request to start tracking preparation of an order item. The cook is
/// the authenticated caller.
#[derive(Debug, Deserialize)]
pub struct StartPreparationRequest {
    pub order_item_id: Uuid,
}

/// Request to advance a preparation's status.
#[derive(Debug, Deserialize)]
pub struct UpdatePreparationStatusRequest {
    pub status: String,
}

/// Request to cancel a preparation. The reason is mandatory.
#[derive(Debug, Deserialize)]
pub struct CancelPreparationRequest {
    pub reason: String,
}

/// Preparation response for API.
#[derive(Debug, Serialize)]
pub struct PreparationResponse {
    pub prep_id: Uuid,
    pub order_item_id: Uuid,
    pub cook_id: Uuid,
    pub status: String,
    pub cancelled: bool,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Preparation> for PreparationResponse {
    fn from(p: Preparation) -> Self {
        Self {
            prep_id: p.prep_id,
            order_item_id: p.order_item_id,
            cook_id: p.cook_id,
            status: p.status,
            cancelled: p.cancelled,
            cancellation_reason: p.cancellation_reason,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}
