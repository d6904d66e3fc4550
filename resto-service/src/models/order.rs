//! Order lifecycle model: status state machine, orders and line items.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Shared order status vocabulary, also used by kitchen preparations.
///
/// Legal moves: unassigned -> pending | in_progress, pending -> in_progress,
/// in_progress -> ready, ready -> delivered. `canceled` is reachable from
/// every non-terminal state. `delivered` and `canceled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Unassigned,
    Pending,
    InProgress,
    Ready,
    Delivered,
    Canceled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Unassigned => "unassigned",
            OrderStatus::Pending => "pending",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Canceled => "canceled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "unassigned" => Some(OrderStatus::Unassigned),
            "pending" => Some(OrderStatus::Pending),
            "in_progress" => Some(OrderStatus::InProgress),
            "ready" => Some(OrderStatus::Ready),
            "delivered" => Some(OrderStatus::Delivered),
            "canceled" => Some(OrderStatus::Canceled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Canceled)
    }

    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        if next == OrderStatus::Canceled {
            return true;
        }
        matches!(
            (self, next),
            (OrderStatus::Unassigned, OrderStatus::Pending)
                | (OrderStatus::Unassigned, OrderStatus::InProgress)
                | (OrderStatus::Pending, OrderStatus::InProgress)
                | (OrderStatus::InProgress, OrderStatus::Ready)
                | (OrderStatus::Ready, OrderStatus::Delivered)
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order entity. `total` always equals the sum over its line items; it is
/// recomputed server-side at creation and never taken from the client.
#[derive(Debug, Clone, FromRow)]
pub struct Order {
    pub order_id: Uuid,
    pub table_id: Uuid,
    pub waiter_id: Uuid,
    pub status: String,
    pub total: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Order {
    pub fn new(table_id: Uuid, waiter_id: Uuid, total: Decimal, notes: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            order_id: Uuid::new_v4(),
            table_id,
            waiter_id,
            status: OrderStatus::Pending.as_str().to_string(),
            total,
            notes,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn status(&self) -> Option<OrderStatus> {
        OrderStatus::parse(&self.status)
    }
}

/// Line item: a quantity of one menu item at a price snapshot.
#[derive(Debug, Clone, FromRow)]
pub struct OrderItem {
    pub order_item_id: Uuid,
    pub order_id: Uuid,
    pub menu_item_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl OrderItem {
    pub fn new(
        order_id: Uuid,
        menu_item_id: Uuid,
        quantity: i32,
        unit_price: Decimal,
        notes: Option<String>,
    ) -> Self {
        Self {
            order_item_id: Uuid::new_v4(),
            order_id,
            menu_item_id,
            quantity,
            unit_price,
            notes,
            created_at: Utc::now(),
        }
    }

    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Sum of quantity x unit_price over a set of line items.
pub fn compute_total(items: &[OrderItem]) -> Decimal {
    items.iter().map(OrderItem::line_total).sum()
}

/// One requested line in an order creation call.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemSpec {
    pub menu_item_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub notes: Option<String>,
}

/// Request to create an order against a table + waiter (both in the path).
/// A client-supplied `total` is accepted for wire compatibility but
/// ignored; the persisted total is recomputed from the items.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(nested, length(min = 1))]
    pub items: Vec<OrderItemSpec>,
    pub notes: Option<String>,
    pub total: Option<Decimal>,
}

/// Request to move an order to a new status.
#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

/// Order line item response.
#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    pub order_item_id: Uuid,
    pub menu_item_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub notes: Option<String>,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(i: OrderItem) -> Self {
        Self {
            order_item_id: i.order_item_id,
            menu_item_id: i.menu_item_id,
            quantity: i.quantity,
            unit_price: i.unit_price,
            notes: i.notes,
        }
    }
}

/// Order aggregate: the order row plus its eagerly loaded items.
#[derive(Debug, Clone)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Order response with items.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub order_id: Uuid,
    pub table_id: Uuid,
    pub waiter_id: Uuid,
    pub status: String,
    pub total: Decimal,
    pub notes: Option<String>,
    pub items: Vec<OrderItemResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<OrderWithItems> for OrderResponse {
    fn from(o: OrderWithItems) -> Self {
        Self {
            order_id: o.order.order_id,
            table_id: o.order.table_id,
            waiter_id: o.order.waiter_id,
            status: o.order.status,
            total: o.order.total,
            notes: o.order.notes,
            items: o.items.into_iter().map(OrderItemResponse::from).collect(),
            created_at: o.order.created_at,
            updated_at: o.order.updated_at,
            deleted_at: o.order.deleted_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn happy_path_transitions_are_legal() {
        assert!(OrderStatus::Unassigned.can_transition_to(OrderStatus::Pending));
        assert!(OrderStatus::Unassigned.can_transition_to(OrderStatus::InProgress));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::InProgress));
        assert!(OrderStatus::InProgress.can_transition_to(OrderStatus::Ready));
        assert!(OrderStatus::Ready.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn cancel_is_reachable_from_every_non_terminal_state() {
        for status in [
            OrderStatus::Unassigned,
            OrderStatus::Pending,
            OrderStatus::InProgress,
            OrderStatus::Ready,
        ] {
            assert!(status.can_transition_to(OrderStatus::Canceled));
        }
    }

    #[test]
    fn terminal_states_admit_no_transition() {
        for from in [OrderStatus::Delivered, OrderStatus::Canceled] {
            for to in [
                OrderStatus::Unassigned,
                OrderStatus::Pending,
                OrderStatus::InProgress,
                OrderStatus::Ready,
                OrderStatus::Delivered,
                OrderStatus::Canceled,
            ] {
                assert!(!from.can_transition_to(to), "{from:?} -> {to:?}");
            }
        }
    }

    #[test]
    fn skips_and_backward_moves_are_rejected() {
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Ready));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Ready.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::InProgress.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn total_is_sum_of_quantity_times_unit_price() {
        let order_id = Uuid::new_v4();
        let items = vec![
            OrderItem::new(order_id, Uuid::new_v4(), 2, dec!(5.50), None),
            OrderItem::new(order_id, Uuid::new_v4(), 1, dec!(12.50), None),
        ];
        assert_eq!(compute_total(&items), dec!(23.50));
    }

    #[test]
    fn total_of_no_items_is_zero() {
        assert_eq!(compute_total(&[]), Decimal::ZERO);
    }
}
