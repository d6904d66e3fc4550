//! Menu catalog handlers. Reads are open to any authenticated user,
//! item mutations are cook-gated, seed and wipe are admin-gated.

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::middleware::AuthUser;
use crate::models::menu::{CreateMenuItemRequest, MenuItemResponse, UpdateMenuItemRequest};
use crate::models::{Audit, MenuItem};
use crate::services::ServiceError;
use crate::AppState;
use service_core::error::AppError;

fn require_non_negative_price(price: Decimal) -> Result<(), AppError> {
    if price < Decimal::ZERO {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Price must be non-negative"
        )));
    }
    Ok(())
}

/// Add a menu item.
///
/// POST /menu
pub async fn create_menu_item(
    State(state): State<AppState>,
    Json(req): Json<CreateMenuItemRequest>,
) -> Result<(StatusCode, Json<MenuItemResponse>), AppError> {
    req.validate()?;
    require_non_negative_price(req.price)?;

    let item = MenuItem::new(req.name, req.description, req.price, req.available, req.category);
    state.db.insert_menu_item(&item).await?;

    Ok((StatusCode::CREATED, Json(MenuItemResponse::from(item))))
}

/// List active menu items.
///
/// GET /menu
pub async fn list_menu_items(
    State(state): State<AppState>,
) -> Result<Json<Vec<MenuItemResponse>>, AppError> {
    let items = state.db.list_menu_items().await?;
    Ok(Json(items.into_iter().map(MenuItemResponse::from).collect()))
}

/// Fetch one active menu item.
///
/// GET /menu/:menu_item_id
pub async fn get_menu_item(
    State(state): State<AppState>,
    Path(menu_item_id): Path<Uuid>,
) -> Result<Json<MenuItemResponse>, AppError> {
    let item = state
        .db
        .find_menu_item_by_id(menu_item_id)
        .await?
        .ok_or(ServiceError::UnknownMenuItem(menu_item_id))
        .map_err(AppError::from)?;

    Ok(Json(MenuItemResponse::from(item)))
}

/// Partially update a menu item.
///
/// PATCH /menu/:menu_item_id
pub async fn update_menu_item(
    State(state): State<AppState>,
    Path(menu_item_id): Path<Uuid>,
    Json(req): Json<UpdateMenuItemRequest>,
) -> Result<Json<MenuItemResponse>, AppError> {
    let mut item = state
        .db
        .find_menu_item_by_id(menu_item_id)
        .await?
        .ok_or(ServiceError::UnknownMenuItem(menu_item_id))
        .map_err(AppError::from)?;

    if let Some(name) = req.name {
        item.name = name;
    }
    if let Some(description) = req.description {
        item.description = Some(description);
    }
    if let Some(price) = req.price {
        require_non_negative_price(price)?;
        item.price = price;
    }
    if let Some(available) = req.available {
        item.available = available;
    }
    if let Some(category) = req.category {
        item.category = Some(category);
    }

    let updated = state.db.update_menu_item(&item).await?;
    Ok(Json(MenuItemResponse::from(updated)))
}

/// Soft-delete a menu item.
///
/// DELETE /menu/:menu_item_id
pub async fn delete_menu_item(
    State(state): State<AppState>,
    Path(menu_item_id): Path<Uuid>,
) -> Result<Json<MenuItemResponse>, AppError> {
    let item = state
        .db
        .soft_delete_menu_item(menu_item_id)
        .await?
        .ok_or(ServiceError::UnknownMenuItem(menu_item_id))
        .map_err(AppError::from)?;

    Ok(Json(MenuItemResponse::from(item)))
}

/// Bulk-insert menu items in one transaction.
///
/// POST /menu/seed
pub async fn seed_menu(
    State(state): State<AppState>,
    Json(reqs): Json<Vec<CreateMenuItemRequest>>,
) -> Result<(StatusCode, Json<Vec<MenuItemResponse>>), AppError> {
    let mut items = Vec::with_capacity(reqs.len());
    for req in reqs {
        req.validate()?;
        require_non_negative_price(req.price)?;
        items.push(MenuItem::new(
            req.name,
            req.description,
            req.price,
            req.available,
            req.category,
        ));
    }

    state.db.seed_menu_items(&items).await?;

    tracing::info!(count = items.len(), "Menu seeded");

    Ok((
        StatusCode::CREATED,
        Json(items.into_iter().map(MenuItemResponse::from).collect()),
    ))
}

/// Soft-delete the entire active menu. Leaves an audit record.
///
/// DELETE /menu/wipe
pub async fn wipe_menu(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let wiped = state.db.wipe_menu().await?;

    let audit = Audit::new(
        claims.user_id,
        "menu.wipe",
        Some(format!("{wiped} items removed")),
        Some("menu_item".to_string()),
        None,
    );
    state.db.insert_audit(&audit).await?;

    tracing::warn!(count = wiped, admin_id = %claims.user_id, "Menu wiped");

    Ok(Json(serde_json::json!({ "wiped": wiped })))
}
