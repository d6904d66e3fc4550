//! Role profile handlers. Admin-gated at the router.

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::middleware::AuthUser;
use crate::models::user::EmployeeResponse;
use crate::models::{Audit, Role};
use crate::services::ServiceError;
use crate::AppState;
use service_core::error::AppError;

/// List users together with their role sets.
///
/// GET /roles/employees
pub async fn list_employees(
    State(state): State<AppState>,
) -> Result<Json<Vec<EmployeeResponse>>, AppError> {
    let users = state.db.list_users().await?;

    let mut employees = Vec::with_capacity(users.len());
    for user in users {
        let roles = state.db.find_roles_for_user(user.user_id).await?;
        employees.push(EmployeeResponse::new(user, roles));
    }

    Ok(Json(employees))
}

/// Fetch one user with their role set.
///
/// GET /roles/employees/:user_id
pub async fn get_employee(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<EmployeeResponse>, AppError> {
    let user = state
        .db
        .find_user_by_id(user_id)
        .await?
        .ok_or(ServiceError::UserNotFound)
        .map_err(AppError::from)?;

    let roles = state.db.find_roles_for_user(user_id).await?;
    Ok(Json(EmployeeResponse::new(user, roles)))
}

/// Attach a role profile to a user. Assigning a variant the user already
/// holds is a conflict; different variants may coexist.
///
/// POST /roles/employees/:user_id/:role
pub async fn assign_role(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path((user_id, role)): Path<(Uuid, Role)>,
) -> Result<(StatusCode, Json<EmployeeResponse>), AppError> {
    let user = state
        .db
        .find_user_by_id(user_id)
        .await?
        .ok_or(ServiceError::UserNotFound)
        .map_err(AppError::from)?;

    if state.db.has_role_profile(user_id, role).await? {
        return Err(ServiceError::DuplicateRole(user_id, role).into());
    }

    state.db.insert_role_profile(user_id, role).await?;

    let audit = Audit::new(
        claims.user_id,
        format!("role.assign.{role}"),
        None,
        Some("user".to_string()),
        Some(user_id),
    );
    state.db.insert_audit(&audit).await?;

    tracing::info!(user_id = %user_id, role = %role, "Role assigned");

    let roles = state.db.find_roles_for_user(user_id).await?;
    Ok((StatusCode::CREATED, Json(EmployeeResponse::new(user, roles))))
}
