//! Order lifecycle flows against a live PostgreSQL: creation with
//! server-side totals, the status state machine, payments and the
//! one-invoice-per-order rule. Run with `cargo test -- --ignored`.

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use resto_service::build_router;
use resto_service::models::{DiningTable, MenuItem, Role, TableStatus};
use resto_service::AppState;
use rust_decimal_macros::dec;
use serde_json::json;
use tower::util::ServiceExt;
use uuid::Uuid;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

struct Fixture {
    state: AppState,
    app: Router,
    waiter_id: Uuid,
    waiter_token: String,
    table_id: Uuid,
    burger_id: Uuid,
    salad_id: Uuid,
}

async fn fixture() -> Fixture {
    let state = common::db_state().await;
    let (waiter, waiter_token) = common::seed_user(&state, &[Role::Waiter]).await;

    let table = DiningTable::new(
        (Uuid::new_v4().as_u128() % 1_000_000) as i32,
        waiter.user_id,
        TableStatus::Available,
        None,
    );
    state.db.insert_table(&table).await.expect("insert table");

    let burger = MenuItem::new("Burger".to_string(), None, dec!(5.50), true, None);
    let salad = MenuItem::new("Salad".to_string(), None, dec!(12.50), true, None);
    state.db.insert_menu_item(&burger).await.expect("insert item");
    state.db.insert_menu_item(&salad).await.expect("insert item");

    Fixture {
        app: build_router(state.clone()),
        state,
        waiter_id: waiter.user_id,
        waiter_token,
        table_id: table.table_id,
        burger_id: burger.menu_item_id,
        salad_id: salad.menu_item_id,
    }
}

impl Fixture {
    fn create_order_request(&self, items: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(format!(
                "/orders/waiter/{}/table/{}",
                self.waiter_id, self.table_id
            ))
            .header("Authorization", format!("Bearer {}", self.waiter_token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "items": items }).to_string()))
            .unwrap()
    }

    fn status_request(&self, order_id: &str, status: &str) -> Request<Body> {
        Request::builder()
            .method("PATCH")
            .uri(format!("/orders/{order_id}/status"))
            .header("Authorization", format!("Bearer {}", self.waiter_token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "status": status }).to_string()))
            .unwrap()
    }
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn order_total_is_recomputed_server_side() {
    let fx = fixture().await;

    // The client claims a total of 1.00; the server must ignore it.
    let request = Request::builder()
        .method("POST")
        .uri(format!(
            "/orders/waiter/{}/table/{}",
            fx.waiter_id, fx.table_id
        ))
        .header("Authorization", format!("Bearer {}", fx.waiter_token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "items": [
                    { "menu_item_id": fx.burger_id, "quantity": 2 },
                    { "menu_item_id": fx.salad_id, "quantity": 1 },
                ],
                "total": "1.00",
            })
            .to_string(),
        ))
        .unwrap();

    let response = fx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["status"], "pending");
    assert_eq!(body["total"], json!("23.50"));
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn order_for_soft_deleted_waiter_is_not_found() {
    let fx = fixture().await;

    // Retiring the waiter leaves the profile row behind; creation must
    // still check the account itself.
    fx.state
        .db
        .soft_delete_user(fx.waiter_id)
        .await
        .unwrap()
        .unwrap();

    let response = fx
        .app
        .clone()
        .oneshot(fx.create_order_request(json!([
            { "menu_item_id": fx.burger_id, "quantity": 1 }
        ])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn unknown_menu_item_is_not_found() {
    let fx = fixture().await;

    let response = fx
        .app
        .clone()
        .oneshot(fx.create_order_request(json!([
            { "menu_item_id": Uuid::new_v4(), "quantity": 1 }
        ])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn status_machine_allows_happy_path_and_rejects_skips() {
    let fx = fixture().await;

    let response = fx
        .app
        .clone()
        .oneshot(fx.create_order_request(json!([
            { "menu_item_id": fx.burger_id, "quantity": 1 }
        ])))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let order_id = body_json(response).await["order_id"]
        .as_str()
        .unwrap()
        .to_string();

    // pending -> delivered skips two states.
    let response = fx
        .app
        .clone()
        .oneshot(fx.status_request(&order_id, "delivered"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    for status in ["in_progress", "ready", "delivered"] {
        let response = fx
            .app
            .clone()
            .oneshot(fx.status_request(&order_id, status))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "move to {status}");
    }

    // delivered is terminal.
    let response = fx
        .app
        .clone()
        .oneshot(fx.status_request(&order_id, "canceled"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn second_invoice_for_an_order_conflicts() {
    let fx = fixture().await;
    let (_, cashier_token) = common::seed_user(&fx.state, &[Role::Cashier]).await;

    let response = fx
        .app
        .clone()
        .oneshot(fx.create_order_request(json!([
            { "menu_item_id": fx.salad_id, "quantity": 1 }
        ])))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let order_id = body_json(response).await["order_id"]
        .as_str()
        .unwrap()
        .to_string();

    let invoice_request = || {
        Request::builder()
            .method("POST")
            .uri("/invoices")
            .header("Authorization", format!("Bearer {cashier_token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "order_id": order_id }).to_string()))
            .unwrap()
    };

    let response = fx.app.clone().oneshot(invoice_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["total_amount"], json!("12.50"));

    let response = fx.app.clone().oneshot(invoice_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore] // Requires running PostgreSQL
async fn cancel_preparation_requires_a_reason() {
    let fx = fixture().await;
    let (_, cook_token) = common::seed_user(&fx.state, &[Role::Cook]).await;

    let response = fx
        .app
        .clone()
        .oneshot(fx.create_order_request(json!([
            { "menu_item_id": fx.burger_id, "quantity": 1 }
        ])))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let order_item_id = body_json(response).await["items"][0]["order_item_id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = fx
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/preparations")
                .header("Authorization", format!("Bearer {cook_token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "order_item_id": order_item_id }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let prep_id = body_json(response).await["prep_id"]
        .as_str()
        .unwrap()
        .to_string();

    let cancel = |reason: &str| {
        Request::builder()
            .method("POST")
            .uri(format!("/preparations/{prep_id}/cancel"))
            .header("Authorization", format!("Bearer {cook_token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "reason": reason }).to_string()))
            .unwrap()
    };

    let response = fx.app.clone().oneshot(cancel("   ")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = fx.app.clone().oneshot(cancel("out of stock")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["cancelled"], json!(true));
    assert_eq!(body["cancellation_reason"], json!("out of stock"));
}
