//! Order lifecycle handlers. Mutations are waiter-gated at the router.

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use std::collections::HashMap;
use uuid::Uuid;
use validator::Validate;

use crate::models::order::{
    compute_total, CreateOrderRequest, OrderResponse, UpdateOrderStatusRequest,
};
use crate::models::{Order, OrderItem, OrderStatus, OrderWithItems, Role};
use crate::services::ServiceError;
use crate::AppState;
use service_core::error::AppError;

/// Open an order against a table. Unit prices are snapshotted from the
/// catalog and the total is recomputed server-side; any client-supplied
/// total is ignored.
///
/// POST /orders/waiter/:waiter_id/table/:table_id
pub async fn create_order(
    State(state): State<AppState>,
    Path((waiter_id, table_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), AppError> {
    req.validate()?;

    if !state
        .db
        .has_active_role_profile(waiter_id, Role::Waiter)
        .await?
    {
        return Err(AppError::NotFound(anyhow::anyhow!(
            "Waiter profile not found"
        )));
    }
    if state.db.find_table_by_id(table_id).await?.is_none() {
        return Err(ServiceError::TableNotFound.into());
    }

    let ids: Vec<Uuid> = req.items.iter().map(|spec| spec.menu_item_id).collect();
    let catalog: HashMap<Uuid, _> = state
        .db
        .find_menu_items_by_ids(&ids)
        .await?
        .into_iter()
        .map(|item| (item.menu_item_id, item))
        .collect();

    let order = Order::new(table_id, waiter_id, Default::default(), req.notes);
    let mut items = Vec::with_capacity(req.items.len());
    for spec in &req.items {
        let menu_item = catalog
            .get(&spec.menu_item_id)
            .ok_or(ServiceError::UnknownMenuItem(spec.menu_item_id))
            .map_err(AppError::from)?;
        items.push(OrderItem::new(
            order.order_id,
            spec.menu_item_id,
            spec.quantity,
            menu_item.price,
            spec.notes.clone(),
        ));
    }

    let order = Order {
        total: compute_total(&items),
        ..order
    };
    state.db.insert_order_with_items(&order, &items).await?;

    tracing::info!(order_id = %order.order_id, table_id = %table_id, "Order created");

    Ok((
        StatusCode::CREATED,
        Json(OrderResponse::from(OrderWithItems { order, items })),
    ))
}

/// List all active orders with their items.
///
/// GET /orders
pub async fn list_orders(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderResponse>>, AppError> {
    let orders = state.db.list_orders().await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

/// List active orders for one table.
///
/// GET /orders/table/:table_id
pub async fn list_orders_by_table(
    State(state): State<AppState>,
    Path(table_id): Path<Uuid>,
) -> Result<Json<Vec<OrderResponse>>, AppError> {
    let orders = state.db.list_orders_by_table(table_id).await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

/// Fetch one active order with its items.
///
/// GET /orders/:order_id
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state
        .db
        .find_order_by_id(order_id)
        .await?
        .ok_or(ServiceError::OrderNotFound)
        .map_err(AppError::from)?;
    let items = state.db.find_order_items(order_id).await?;

    Ok(Json(OrderResponse::from(OrderWithItems { order, items })))
}

/// Move an order to a new status, enforcing the state machine.
///
/// PATCH /orders/:order_id/status
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(req): Json<UpdateOrderStatusRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    let new_status = OrderStatus::parse(&req.status).ok_or_else(|| {
        AppError::BadRequest(anyhow::anyhow!("Unknown order status '{}'", req.status))
    })?;

    let order = state
        .db
        .find_order_by_id(order_id)
        .await?
        .ok_or(ServiceError::OrderNotFound)
        .map_err(AppError::from)?;

    let current = order
        .status()
        .ok_or_else(|| AppError::InternalError(anyhow::anyhow!("Corrupt order status")))?;

    if !current.can_transition_to(new_status) {
        return Err(ServiceError::InvalidTransition {
            from: current,
            to: new_status,
        }
        .into());
    }

    let updated = state.db.update_order_status(order_id, new_status).await?;
    let items = state.db.find_order_items(order_id).await?;

    tracing::info!(order_id = %order_id, from = %current.as_str(), to = %new_status.as_str(), "Order status updated");

    Ok(Json(OrderResponse::from(OrderWithItems {
        order: updated,
        items,
    })))
}

/// Soft-delete an order. Items and payments are kept.
///
/// DELETE /orders/:order_id
pub async fn delete_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .db
        .soft_delete_order(order_id)
        .await?
        .ok_or(ServiceError::OrderNotFound)
        .map_err(AppError::from)?;

    Ok(StatusCode::NO_CONTENT)
}
