//! Role profile assignment flows against a live PostgreSQL.
//! Run with `cargo test -- --ignored`.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use resto_service::build_router;
use resto_service::models::Role;
use tower::util::ServiceExt;
use uuid::Uuid;

fn assign_request(user_id: Uuid, role: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/roles/employees/{user_id}/{role}"))
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn duplicate_role_conflicts_but_variants_coexist() {
    let state = common::db_state().await;
    let (_, admin_token) = common::seed_user(&state, &[Role::Admin]).await;
    let (employee, _) = common::seed_user(&state, &[]).await;
    let app = build_router(state);

    let response = app
        .clone()
        .oneshot(assign_request(employee.user_id, "waiter", &admin_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Same variant again fails.
    let response = app
        .clone()
        .oneshot(assign_request(employee.user_id, "waiter", &admin_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // A different variant is fine.
    let response = app
        .clone()
        .oneshot(assign_request(employee.user_id, "cook", &admin_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let roles = body["roles"].as_array().unwrap();
    assert!(roles.contains(&serde_json::json!("waiter")));
    assert!(roles.contains(&serde_json::json!("cook")));
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn role_assignment_requires_admin() {
    let state = common::db_state().await;
    let (_, waiter_token) = common::seed_user(&state, &[Role::Waiter]).await;
    let (employee, _) = common::seed_user(&state, &[]).await;
    let app = build_router(state);

    let response = app
        .oneshot(assign_request(employee.user_id, "cook", &waiter_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn assigning_to_missing_user_is_not_found() {
    let state = common::db_state().await;
    let (_, admin_token) = common::seed_user(&state, &[Role::Admin]).await;
    let app = build_router(state);

    let response = app
        .oneshot(assign_request(Uuid::new_v4(), "waiter", &admin_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn assignment_leaves_an_audit_record()  {
    let state = common::db_state().await;
    let (admin, admin_token) = common::seed_user(&state, &[Role::Admin]).await;
    let (employee, _) = common::seed_user(&state, &[]).await;
    let app = build_router(state.clone());

    let response = app
        .oneshot(assign_request(employee.user_id, "cashier", &admin_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let audits = state.db.list_audits().await.unwrap();
    assert!(audits.iter().any(|a| {
        a.admin_id == admin.user_id
            && a.action == "role.assign.cashier"
            && a.entity_id == Some(employee.user_id)
    }));
}
