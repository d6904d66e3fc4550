//! Kitchen preparation handlers. Cook-gated at the router; the acting
//! cook is taken from the token, never from the payload.

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::middleware::AuthUser;
use crate::models::preparation::{
    CancelPreparationRequest, PreparationResponse, StartPreparationRequest,
    UpdatePreparationStatusRequest,
};
use crate::models::{OrderStatus, Preparation};
use crate::services::ServiceError;
use crate::AppState;
use service_core::error::AppError;

/// Start tracking preparation of an order item.
///
/// POST /preparations
pub async fn start_preparation(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<StartPreparationRequest>,
) -> Result<(StatusCode, Json<PreparationResponse>), AppError> {
    if state
        .db
        .find_order_item_by_id(req.order_item_id)
        .await?
        .is_none()
    {
        return Err(ServiceError::OrderItemNotFound.into());
    }

    let prep = Preparation::new(req.order_item_id, claims.user_id);
    state.db.insert_preparation(&prep).await?;

    Ok((StatusCode::CREATED, Json(PreparationResponse::from(prep))))
}

/// Fetch one preparation.
///
/// GET /preparations/:prep_id
pub async fn get_preparation(
    State(state): State<AppState>,
    Path(prep_id): Path<Uuid>,
) -> Result<Json<PreparationResponse>, AppError> {
    let prep = state
        .db
        .find_preparation_by_id(prep_id)
        .await?
        .ok_or(ServiceError::PreparationNotFound)
        .map_err(AppError::from)?;

    Ok(Json(PreparationResponse::from(prep)))
}

/// List the preparations attached to one order item.
///
/// GET /preparations/item/:order_item_id
pub async fn list_preparations_for_item(
    State(state): State<AppState>,
    Path(order_item_id): Path<Uuid>,
) -> Result<Json<Vec<PreparationResponse>>, AppError> {
    let preps = state.db.list_preparations_for_item(order_item_id).await?;
    Ok(Json(preps.into_iter().map(PreparationResponse::from).collect()))
}

/// Advance a preparation's status. Shares the order status vocabulary
/// and transition rules but moves independently of the parent order.
///
/// PATCH /preparations/:prep_id/status
pub async fn update_preparation_status(
    State(state): State<AppState>,
    Path(prep_id): Path<Uuid>,
    Json(req): Json<UpdatePreparationStatusRequest>,
) -> Result<Json<PreparationResponse>, AppError> {
    let new_status = OrderStatus::parse(&req.status).ok_or_else(|| {
        AppError::BadRequest(anyhow::anyhow!("Unknown status '{}'", req.status))
    })?;

    let prep = state
        .db
        .find_preparation_by_id(prep_id)
        .await?
        .ok_or(ServiceError::PreparationNotFound)
        .map_err(AppError::from)?;

    let current = OrderStatus::parse(&prep.status)
        .ok_or_else(|| AppError::InternalError(anyhow::anyhow!("Corrupt preparation status")))?;

    if !current.can_transition_to(new_status) {
        return Err(ServiceError::InvalidTransition {
            from: current,
            to: new_status,
        }
        .into());
    }

    let updated = state.db.update_preparation_status(prep_id, new_status).await?;
    Ok(Json(PreparationResponse::from(updated)))
}

/// Cancel a preparation. The reason is mandatory and must be non-empty.
///
/// POST /preparations/:prep_id/cancel
pub async fn cancel_preparation(
    State(state): State<AppState>,
    Path(prep_id): Path<Uuid>,
    Json(req): Json<CancelPreparationRequest>,
) -> Result<Json<PreparationResponse>, AppError> {
    let reason = req.reason.trim();
    if reason.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "A cancellation reason is required"
        )));
    }

    let prep = state
        .db
        .find_preparation_by_id(prep_id)
        .await?
        .ok_or(ServiceError::PreparationNotFound)
        .map_err(AppError::from)?;

    if prep.cancelled {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "Preparation is already cancelled"
        )));
    }

    let cancelled = state.db.cancel_preparation(prep_id, reason).await?;

    tracing::info!(prep_id = %prep_id, "Preparation cancelled");

    Ok(Json(PreparationResponse::from(cancelled)))
}
