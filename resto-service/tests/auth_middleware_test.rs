//! Authorization guard tests. These never touch the database: the guard
//! decides from the token alone, so a lazy pool is enough.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use resto_service::middleware::{auth_middleware, require_role, TOKEN_COOKIE};
use resto_service::models::Role;
use resto_service::{build_router, AppState};
use tower::util::ServiceExt;
use uuid::Uuid;

fn protected_app(state: AppState) -> Router {
    Router::new()
        .route("/protected", get(|| async { "protected" }))
        .layer(from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

fn role_gated_app(state: AppState, role: Role) -> Router {
    Router::new()
        .route("/gated", get(|| async { "gated" }))
        .layer(from_fn(move |req, next| require_role(role, req, next)))
        .layer(from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let app = protected_app(common::lazy_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/protected")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let app = protected_app(common::lazy_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/protected")
                .header("Authorization", "Bearer not_a_token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn valid_bearer_token_passes() {
    let state = common::lazy_state();
    let token = state
        .jwt
        .generate_access_token(Uuid::new_v4(), "alice@example.com", vec![Role::Waiter])
        .unwrap();
    let app = protected_app(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/protected")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn valid_cookie_token_passes() {
    let state = common::lazy_state();
    let token = state
        .jwt
        .generate_access_token(Uuid::new_v4(), "alice@example.com", vec![Role::Waiter])
        .unwrap();
    let app = protected_app(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/protected")
                .header("Cookie", format!("{TOKEN_COOKIE}={token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn wrong_role_is_forbidden() {
    let state = common::lazy_state();
    let token = state
        .jwt
        .generate_access_token(Uuid::new_v4(), "bob@example.com", vec![Role::Waiter])
        .unwrap();
    let app = role_gated_app(state, Role::Cook);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/gated")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_passes_any_role_gate() {
    let state = common::lazy_state();
    let token = state
        .jwt
        .generate_access_token(Uuid::new_v4(), "root@example.com", vec![Role::Admin])
        .unwrap();
    let app = role_gated_app(state, Role::Cashier);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/gated")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn request_id_is_echoed() {
    let app = build_router(common::lazy_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .header("x-request-id", "test-request-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "test-request-42"
    );
}

#[tokio::test]
async fn role_gated_route_rejects_anonymous() {
    let app = build_router(common::lazy_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/audits")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
