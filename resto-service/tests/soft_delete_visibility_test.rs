//! Soft-delete visibility against a live PostgreSQL: deleted rows leave
//! the default listings, restored users come back, and retired waiters
//! can no longer be referenced. Run with `cargo test -- --ignored`.

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use http_body_util::BodyExt;
use resto_service::build_router;
use resto_service::models::{DiningTable, MenuItem, Role, TableStatus};
use rust_decimal_macros::dec;
use serde_json::json;
use tower::util::ServiceExt;
use uuid::Uuid;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get_request(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn listing_contains(body: &serde_json::Value, id_field: &str, id: Uuid) -> bool {
    body.as_array()
        .unwrap()
        .iter()
        .any(|row| row[id_field] == json!(id.to_string()))
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn soft_deleted_table_leaves_listings() {
    let state = common::db_state().await;
    let (waiter, token) = common::seed_user(&state, &[Role::Waiter]).await;
    let app = build_router(state.clone());

    let table = DiningTable::new(
        (Uuid::new_v4().as_u128() % 1_000_000) as i32,
        waiter.user_id,
        TableStatus::Available,
        None,
    );
    state.db.insert_table(&table).await.unwrap();

    let response = app.clone().oneshot(get_request("/tables", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(listing_contains(&body_json(response).await, "table_id", table.table_id));

    state.db.soft_delete_table(table.table_id).await.unwrap().unwrap();

    let response = app.clone().oneshot(get_request("/tables", &token)).await.unwrap();
    assert!(!listing_contains(&body_json(response).await, "table_id", table.table_id));

    // Direct fetch is gone too.
    let response = app
        .oneshot(get_request(&format!("/tables/{}", table.table_id), &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn soft_deleted_menu_item_leaves_listings() {
    let state = common::db_state().await;
    let (_, token) = common::seed_user(&state, &[Role::Cook]).await;
    let app = build_router(state.clone());

    let item = MenuItem::new("Ephemeral Soup".to_string(), None, dec!(4.00), true, None);
    state.db.insert_menu_item(&item).await.unwrap();

    let response = app.clone().oneshot(get_request("/menu", &token)).await.unwrap();
    assert!(listing_contains(&body_json(response).await, "menu_item_id", item.menu_item_id));

    state
        .db
        .soft_delete_menu_item(item.menu_item_id)
        .await
        .unwrap()
        .unwrap();

    let response = app.clone().oneshot(get_request("/menu", &token)).await.unwrap();
    assert!(!listing_contains(&body_json(response).await, "menu_item_id", item.menu_item_id));

    let response = app
        .oneshot(get_request(&format!("/menu/{}", item.menu_item_id), &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn soft_deleted_order_leaves_listings() {
    let state = common::db_state().await;
    let (waiter, token) = common::seed_user(&state, &[Role::Waiter]).await;
    let app = build_router(state.clone());

    let table = DiningTable::new(
        (Uuid::new_v4().as_u128() % 1_000_000) as i32,
        waiter.user_id,
        TableStatus::Available,
        None,
    );
    state.db.insert_table(&table).await.unwrap();

    let item = MenuItem::new("Toast".to_string(), None, dec!(2.50), true, None);
    state.db.insert_menu_item(&item).await.unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!(
                    "/orders/waiter/{}/table/{}",
                    waiter.user_id, table.table_id
                ))
                .header("Authorization", format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "items": [{ "menu_item_id": item.menu_item_id, "quantity": 1 }]
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let order_id: Uuid = body_json(response).await["order_id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    let response = app.clone().oneshot(get_request("/orders", &token)).await.unwrap();
    assert!(listing_contains(&body_json(response).await, "order_id", order_id));

    state.db.soft_delete_order(order_id).await.unwrap().unwrap();

    let response = app.clone().oneshot(get_request("/orders", &token)).await.unwrap();
    assert!(!listing_contains(&body_json(response).await, "order_id", order_id));

    let response = app
        .clone()
        .oneshot(get_request(
            &format!("/orders/table/{}", table.table_id),
            &token,
        ))
        .await
        .unwrap();
    assert!(!listing_contains(&body_json(response).await, "order_id", order_id));

    let response = app
        .oneshot(get_request(&format!("/orders/{order_id}"), &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn restored_user_reappears_in_listings() {
    let state = common::db_state().await;
    let (_, admin_token) = common::seed_user(&state, &[Role::Admin]).await;
    let (user, _) = common::seed_user(&state, &[]).await;
    let app = build_router(state.clone());

    state.db.soft_delete_user(user.user_id).await.unwrap().unwrap();

    let response = app
        .clone()
        .oneshot(get_request("/users", &admin_token))
        .await
        .unwrap();
    assert!(!listing_contains(&body_json(response).await, "user_id", user.user_id));

    state.db.restore_user(user.user_id).await.unwrap().unwrap();

    let response = app
        .oneshot(get_request("/users", &admin_token))
        .await
        .unwrap();
    assert!(listing_contains(&body_json(response).await, "user_id", user.user_id));
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn table_for_soft_deleted_waiter_is_rejected() {
    let state = common::db_state().await;
    let (waiter, _) = common::seed_user(&state, &[Role::Waiter]).await;
    let (_, active_token) = common::seed_user(&state, &[Role::Waiter]).await;
    let app = build_router(state.clone());

    state.db.soft_delete_user(waiter.user_id).await.unwrap().unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/tables")
                .header("Authorization", format!("Bearer {active_token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "number": (Uuid::new_v4().as_u128() % 1_000_000) as i32,
                        "waiter_id": waiter.user_id,
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
