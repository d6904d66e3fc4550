//! Audit log handlers. Admin-gated at the router.

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::middleware::AuthUser;
use crate::models::audit::{AuditResponse, RecordAuditRequest};
use crate::models::Audit;
use crate::services::ServiceError;
use crate::AppState;
use service_core::error::AppError;

/// Append an audit record attributed to the acting admin.
///
/// POST /audits
pub async fn record_audit(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<RecordAuditRequest>,
) -> Result<(StatusCode, Json<AuditResponse>), AppError> {
    if req.action.trim().is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Action must be non-empty"
        )));
    }

    let audit = Audit::new(
        claims.user_id,
        req.action,
        req.description,
        req.affected_entity,
        req.entity_id,
    );
    state.db.insert_audit(&audit).await?;

    Ok((StatusCode::CREATED, Json(AuditResponse::from(audit))))
}

/// List active audit records, newest first.
///
/// GET /audits
pub async fn list_audits(
    State(state): State<AppState>,
) -> Result<Json<Vec<AuditResponse>>, AppError> {
    let audits = state.db.list_audits().await?;
    Ok(Json(audits.into_iter().map(AuditResponse::from).collect()))
}

/// Soft-delete an audit record.
///
/// DELETE /audits/:audit_id
pub async fn delete_audit(
    State(state): State<AppState>,
    Path(audit_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .db
        .soft_delete_audit(audit_id)
        .await?
        .ok_or(ServiceError::AuditNotFound)
        .map_err(AppError::from)?;

    Ok(StatusCode::NO_CONTENT)
}
