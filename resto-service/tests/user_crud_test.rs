//! User registration, login and soft-delete flows against a live
//! PostgreSQL. Run with `cargo test -- --ignored`.

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use http_body_util::BodyExt;
use resto_service::build_router;
use serde_json::json;
use tower::util::ServiceExt;
use uuid::Uuid;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn register_request(email: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "name": "Integration User",
                "email": email,
                "password": password,
            })
            .to_string(),
        ))
        .unwrap()
}

fn login_request(email: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "email": email, "password": password }).to_string()))
        .unwrap()
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn registration_and_duplicate_email() {
    let state = common::db_state().await;
    let app = build_router(state);

    let email = format!("reg-{}@example.com", Uuid::new_v4().simple());

    let response = app
        .clone()
        .oneshot(register_request(&email, "hunter2hunter2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["email"], email.as_str());
    assert!(body.get("password_hash").is_none());

    // Same address again, different case: still a conflict.
    let response = app
        .oneshot(register_request(&email.to_uppercase(), "hunter2hunter2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn login_issues_token_and_cookie() {
    let state = common::db_state().await;
    let app = build_router(state);

    let email = format!("login-{}@example.com", Uuid::new_v4().simple());
    let response = app
        .clone()
        .oneshot(register_request(&email, "hunter2hunter2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(login_request(&email, "hunter2hunter2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login sets the session cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("RESTOApiToken="));
    assert!(cookie.contains("HttpOnly"));

    let body = body_json(response).await;
    assert_eq!(body["token_type"], "bearer");
    assert_eq!(body["user_email"], email.as_str());
    assert!(body["access_token"].as_str().unwrap().len() > 20);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn login_failure_shape_is_uniform() {
    let state = common::db_state().await;
    let app = build_router(state);

    let email = format!("uniform-{}@example.com", Uuid::new_v4().simple());
    let response = app
        .clone()
        .oneshot(register_request(&email, "hunter2hunter2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Wrong password and unknown e-mail must be indistinguishable.
    let wrong_password = app
        .clone()
        .oneshot(login_request(&email, "not-the-password"))
        .await
        .unwrap();
    let unknown_email = app
        .oneshot(login_request("nobody@example.com", "hunter2hunter2"))
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(wrong_password).await,
        body_json(unknown_email).await
    );
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn soft_deleted_user_cannot_login_until_restored() {
    let state = common::db_state().await;
    let app = build_router(state.clone());

    let email = format!("softdel-{}@example.com", Uuid::new_v4().simple());
    let response = app
        .clone()
        .oneshot(register_request(&email, "hunter2hunter2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let user_id = body_json(response).await["user_id"]
        .as_str()
        .unwrap()
        .to_string();
    let user_id: Uuid = user_id.parse().unwrap();

    state.db.soft_delete_user(user_id).await.unwrap().unwrap();

    let response = app
        .clone()
        .oneshot(login_request(&email, "hunter2hunter2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    state.db.restore_user(user_id).await.unwrap().unwrap();

    let response = app
        .oneshot(login_request(&email, "hunter2hunter2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
