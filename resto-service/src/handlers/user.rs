//! User account handlers. Registration is public; everything else is
//! admin-gated at the router.

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::middleware::AuthUser;
use crate::models::user::{CreateUserRequest, UserResponse};
use crate::models::{Audit, User};
use crate::services::ServiceError;
use crate::utils::password::{hash_password, Password};
use crate::AppState;
use service_core::error::AppError;

/// Register a new user account.
///
/// POST /users
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    req.validate()?;

    if state.db.email_exists(&req.email).await? {
        return Err(ServiceError::EmailAlreadyRegistered.into());
    }

    let password_hash = hash_password(&Password::new(req.password))
        .map_err(AppError::InternalError)?
        .into_string();

    let user = User::new(req.name, req.email, password_hash);
    state.db.insert_user(&user).await?;

    tracing::info!(user_id = %user.user_id, "User registered");

    Ok((StatusCode::CREATED, Json(user.sanitized())))
}

/// List all active users.
///
/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = state.db.list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Fetch one active user.
///
/// GET /users/:user_id
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .db
        .find_user_by_id(user_id)
        .await?
        .ok_or(ServiceError::UserNotFound)
        .map_err(AppError::from)?;

    Ok(Json(user.sanitized()))
}

/// Soft-delete a user.
///
/// DELETE /users/:user_id
pub async fn soft_delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .db
        .soft_delete_user(user_id)
        .await?
        .ok_or(ServiceError::UserNotFound)
        .map_err(AppError::from)?;

    Ok(Json(user.sanitized()))
}

/// Restore a soft-deleted user.
///
/// POST /users/:user_id/restore
pub async fn restore_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .db
        .restore_user(user_id)
        .await?
        .ok_or(ServiceError::UserNotFound)
        .map_err(AppError::from)?;

    Ok(Json(user.sanitized()))
}

/// Physically delete a user and their role profiles. Leaves an audit
/// record attributed to the acting admin.
///
/// DELETE /users/:user_id/hard
pub async fn hard_delete_user(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.db.find_user_by_id_any(user_id).await?.is_none() {
        return Err(ServiceError::UserNotFound.into());
    }

    state.db.hard_delete_user(user_id).await?;

    let audit = Audit::new(
        claims.user_id,
        "user.hard_delete",
        None,
        Some("user".to_string()),
        Some(user_id),
    );
    state.db.insert_audit(&audit).await?;

    tracing::warn!(user_id = %user_id, admin_id = %claims.user_id, "User hard-deleted");

    Ok(StatusCode::NO_CONTENT)
}
