//! Dining table handlers. Reads are open to any authenticated user;
//! mutations are waiter-gated at the router.

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::models::table::{CreateTableRequest, TableResponse, UpdateTableRequest};
use crate::models::{DiningTable, Role, TableStatus};
use crate::services::ServiceError;
use crate::AppState;
use service_core::error::AppError;

/// Register a new table.
///
/// POST /tables
pub async fn create_table(
    State(state): State<AppState>,
    Json(req): Json<CreateTableRequest>,
) -> Result<(StatusCode, Json<TableResponse>), AppError> {
    if !state
        .db
        .has_active_role_profile(req.waiter_id, Role::Waiter)
        .await?
    {
        return Err(AppError::NotFound(anyhow::anyhow!(
            "Waiter profile not found"
        )));
    }

    if state.db.table_number_taken(req.number).await? {
        return Err(ServiceError::DuplicateTableNumber.into());
    }

    let table = DiningTable::new(
        req.number,
        req.waiter_id,
        req.status.unwrap_or(TableStatus::Available),
        req.notes,
    );
    state.db.insert_table(&table).await?;

    Ok((StatusCode::CREATED, Json(TableResponse::from(table))))
}

/// List all active tables.
///
/// GET /tables
pub async fn list_tables(
    State(state): State<AppState>,
) -> Result<Json<Vec<TableResponse>>, AppError> {
    let tables = state.db.list_tables().await?;
    Ok(Json(tables.into_iter().map(TableResponse::from).collect()))
}

/// List the active tables assigned to one waiter.
///
/// GET /tables/waiter/:waiter_id
pub async fn list_tables_by_waiter(
    State(state): State<AppState>,
    Path(waiter_id): Path<Uuid>,
) -> Result<Json<Vec<TableResponse>>, AppError> {
    let tables = state.db.list_tables_by_waiter(waiter_id).await?;
    Ok(Json(tables.into_iter().map(TableResponse::from).collect()))
}

/// Fetch one active table.
///
/// GET /tables/:table_id
pub async fn get_table(
    State(state): State<AppState>,
    Path(table_id): Path<Uuid>,
) -> Result<Json<TableResponse>, AppError> {
    let table = state
        .db
        .find_table_by_id(table_id)
        .await?
        .ok_or(ServiceError::TableNotFound)
        .map_err(AppError::from)?;

    Ok(Json(TableResponse::from(table)))
}

/// Partially update a table.
///
/// PATCH /tables/:table_id
pub async fn update_table(
    State(state): State<AppState>,
    Path(table_id): Path<Uuid>,
    Json(req): Json<UpdateTableRequest>,
) -> Result<Json<TableResponse>, AppError> {
    let mut table = state
        .db
        .find_table_by_id(table_id)
        .await?
        .ok_or(ServiceError::TableNotFound)
        .map_err(AppError::from)?;

    if let Some(number) = req.number {
        if number != table.table_number && state.db.table_number_taken(number).await? {
            return Err(ServiceError::DuplicateTableNumber.into());
        }
        table.table_number = number;
    }
    if let Some(waiter_id) = req.waiter_id {
        if !state
            .db
            .has_active_role_profile(waiter_id, Role::Waiter)
            .await?
        {
            return Err(AppError::NotFound(anyhow::anyhow!(
                "Waiter profile not found"
            )));
        }
        table.waiter_id = waiter_id;
    }
    if let Some(status) = req.status {
        table.status = status.as_str().to_string();
    }
    if let Some(notes) = req.notes {
        table.notes = Some(notes);
    }

    let updated = state.db.update_table(&table).await?;
    Ok(Json(TableResponse::from(updated)))
}

/// Soft-delete a table.
///
/// DELETE /tables/:table_id
pub async fn delete_table(
    State(state): State<AppState>,
    Path(table_id): Path<Uuid>,
) -> Result<Json<TableResponse>, AppError> {
    let table = state
        .db
        .soft_delete_table(table_id)
        .await?
        .ok_or(ServiceError::TableNotFound)
        .map_err(AppError::from)?;

    Ok(Json(TableResponse::from(table)))
}
