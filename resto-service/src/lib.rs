pub mod config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, patch, post},
    Router,
};
use service_core::middleware::{
    security_headers::security_headers_middleware, tracing::request_id_middleware,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::RestoConfig;
use crate::middleware::{auth_middleware, require_role};
use crate::models::Role;
use crate::services::{AuthService, Database, JwtService};

#[derive(Clone)]
pub struct AppState {
    pub config: RestoConfig,
    pub db: Database,
    pub jwt: JwtService,
    pub auth_service: AuthService,
}

/// Build the application router: public routes, authenticated routes and
/// per-role route groups, wrapped in the shared middleware stack.
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/auth/login", post(handlers::auth::login))
        .route("/users", post(handlers::user::register));

    // Reads open to any authenticated user.
    let authenticated_routes = Router::new()
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
        .route("/tables", get(handlers::table::list_tables))
        .route("/tables/:table_id", get(handlers::table::get_table))
        .route(
            "/tables/waiter/:waiter_id",
            get(handlers::table::list_tables_by_waiter),
        )
        .route("/menu", get(handlers::menu::list_menu_items))
        .route("/menu/:menu_item_id", get(handlers::menu::get_menu_item))
        .route("/orders", get(handlers::order::list_orders))
        .route("/orders/:order_id", get(handlers::order::get_order))
        .route(
            "/orders/table/:table_id",
            get(handlers::order::list_orders_by_table),
        )
        .route(
            "/payment-methods",
            get(handlers::payment::list_payment_methods),
        )
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    let waiter_routes = Router::new()
        .route("/tables", post(handlers::table::create_table))
        .route(
            "/tables/:table_id",
            patch(handlers::table::update_table).delete(handlers::table::delete_table),
        )
        .route(
            "/orders/waiter/:waiter_id/table/:table_id",
            post(handlers::order::create_order),
        )
        .route(
            "/orders/:order_id/status",
            patch(handlers::order::update_order_status),
        )
        .route("/orders/:order_id", delete(handlers::order::delete_order))
        .layer(from_fn(|req, next| {
            require_role(Role::Waiter, req, next)
        }))
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    let cook_routes = Router::new()
        .route("/menu", post(handlers::menu::create_menu_item))
        .route(
            "/menu/:menu_item_id",
            patch(handlers::menu::update_menu_item).delete(handlers::menu::delete_menu_item),
        )
        .route(
            "/preparations",
            post(handlers::preparation::start_preparation),
        )
        .route(
            "/preparations/:prep_id",
            get(handlers::preparation::get_preparation),
        )
        .route(
            "/preparations/item/:order_item_id",
            get(handlers::preparation::list_preparations_for_item),
        )
        .route(
            "/preparations/:prep_id/status",
            patch(handlers::preparation::update_preparation_status),
        )
        .route(
            "/preparations/:prep_id/cancel",
            post(handlers::preparation::cancel_preparation),
        )
        .layer(from_fn(|req, next| require_role(Role::Cook, req, next)))
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    let cashier_routes = Router::new()
        .route("/payments", post(handlers::payment::record_payment))
        .route(
            "/payments/order/:order_id",
            get(handlers::payment::list_payments_by_order),
        )
        .route("/invoices", post(handlers::payment::issue_invoice))
        .route(
            "/invoices/order/:order_id",
            get(handlers::payment::get_invoice_by_order),
        )
        .layer(from_fn(|req, next| {
            require_role(Role::Cashier, req, next)
        }))
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    let admin_routes = Router::new()
        .route("/users", get(handlers::user::list_users))
        .route(
            "/users/:user_id",
            get(handlers::user::get_user).delete(handlers::user::soft_delete_user),
        )
        .route("/users/:user_id/restore", post(handlers::user::restore_user))
        .route("/users/:user_id/hard", delete(handlers::user::hard_delete_user))
        .route("/roles/employees", get(handlers::role::list_employees))
        .route(
            "/roles/employees/:user_id",
            get(handlers::role::get_employee),
        )
        .route(
            "/roles/employees/:user_id/:role",
            post(handlers::role::assign_role),
        )
        .route("/menu/seed", post(handlers::menu::seed_menu))
        .route("/menu/wipe", delete(handlers::menu::wipe_menu))
        .route(
            "/audits",
            post(handlers::audit::record_audit).get(handlers::audit::list_audits),
        )
        .route("/audits/:audit_id", delete(handlers::audit::delete_audit))
        .layer(from_fn(|req, next| require_role(Role::Admin, req, next)))
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    let allowed_origins: Vec<HeaderValue> = state
        .config
        .security
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Invalid CORS origin '{}': {}. Skipping.", origin, e);
                None
            }
        })
        .collect();

    public_routes
        .merge(authenticated_routes)
        .merge(waiter_routes)
        .merge(cook_routes)
        .merge(cashier_routes)
        .merge(admin_routes)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_credentials(true)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
        )
}
