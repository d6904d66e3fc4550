use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use service_core::error::AppError;

use crate::{models::Role, services::AccessTokenClaims, AppState};

/// HTTP-only cookie carrying the access token for browser clients.
pub const TOKEN_COOKIE: &str = "RESTOApiToken";

/// Middleware to require authentication. Accepts the token from the
/// Authorization header or, failing that, from the session cookie.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string);

    let token = match bearer {
        Some(token) => token,
        None => CookieJar::from_headers(req.headers())
            .get(TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .ok_or_else(|| {
                AppError::Unauthenticated(anyhow::anyhow!(
                    "Missing or invalid Authorization header"
                ))
            })?,
    };

    let claims = state
        .jwt
        .validate_access_token(&token)
        .map_err(|_| AppError::Unauthenticated(anyhow::anyhow!("Invalid or expired token")))?;

    // Store claims in request extensions so handlers can access them
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Middleware to require a role on already-authenticated requests.
/// Admin passes every check. Must be layered inside `auth_middleware`.
pub async fn require_role(role: Role, req: Request, next: Next) -> Result<Response, AppError> {
    let claims = req
        .extensions()
        .get::<AccessTokenClaims>()
        .ok_or_else(|| AppError::Unauthenticated(anyhow::anyhow!("Missing auth claims")))?;

    if !claims.has_role(role) {
        return Err(AppError::Forbidden(anyhow::anyhow!(
            "Requires the {role} role"
        )));
    }

    Ok(next.run(req).await)
}

/// Extractor to easily get claims in handlers
pub struct AuthUser(pub AccessTokenClaims);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<AccessTokenClaims>()
            .ok_or_else(|| {
                AppError::InternalError(anyhow::anyhow!("Auth claims missing from request extensions"))
            })?;

        Ok(AuthUser(claims.clone()))
    }
}
