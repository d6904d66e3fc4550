//! Session handlers: login, logout, current-user lookup.

use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use validator::Validate;

use crate::middleware::{AuthUser, TOKEN_COOKIE};
use crate::models::user::EmployeeResponse;
use crate::services::auth::{LoginRequest, LoginResponse};
use crate::AppState;
use service_core::error::AppError;

/// Authenticate and issue an access token. The token is returned in the
/// body and also set as an HTTP-only cookie for browser clients.
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    req.validate()?;

    let response = state.auth_service.login(&req).await?;

    let cookie = Cookie::build((TOKEN_COOKIE, response.access_token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    Ok((jar.add(cookie), Json(response)))
}

/// Clear the session cookie.
///
/// POST /auth/logout
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    (
        jar.remove(Cookie::build((TOKEN_COOKIE, "")).path("/").build()),
        StatusCode::NO_CONTENT,
    )
}

/// Current authenticated user with their role set.
///
/// GET /auth/me
pub async fn me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<EmployeeResponse>, AppError> {
    let user = state
        .db
        .find_user_by_id(claims.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User not found")))?;

    let roles = state.db.find_roles_for_user(user.user_id).await?;

    Ok(Json(EmployeeResponse::new(user, roles)))
}
