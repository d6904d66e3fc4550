//! Payment and invoice handlers. Cashier-gated at the router; the
//! acting cashier is taken from the token.

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::middleware::AuthUser;
use crate::models::payment::{
    InvoiceResponse, IssueInvoiceRequest, PaymentResponse, RecordPaymentRequest,
};
use crate::models::{Invoice, Payment, PaymentMethod};
use crate::services::ServiceError;
use crate::AppState;
use service_core::error::AppError;

/// Record a payment against an order. The amount is not checked against
/// the remaining balance; partial and over-payments are both legal.
///
/// POST /payments
pub async fn record_payment(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<RecordPaymentRequest>,
) -> Result<(StatusCode, Json<PaymentResponse>), AppError> {
    if req.amount <= Decimal::ZERO {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Amount must be positive"
        )));
    }

    if state.db.find_order_by_id(req.order_id).await?.is_none() {
        return Err(ServiceError::OrderNotFound.into());
    }
    if state.db.find_payment_method(req.method_id).await?.is_none() {
        return Err(ServiceError::PaymentMethodNotFound.into());
    }

    let payment = Payment::new(
        req.order_id,
        claims.user_id,
        req.method_id,
        req.amount,
        req.notes,
        req.discounts_applied,
    );
    state.db.insert_payment(&payment).await?;

    tracing::info!(payment_id = %payment.payment_id, order_id = %payment.order_id, "Payment recorded");

    Ok((StatusCode::CREATED, Json(PaymentResponse::from(payment))))
}

/// List the payments recorded against one order.
///
/// GET /payments/order/:order_id
pub async fn list_payments_by_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Vec<PaymentResponse>>, AppError> {
    let payments = state.db.list_payments_by_order(order_id).await?;
    Ok(Json(payments.into_iter().map(PaymentResponse::from).collect()))
}

/// List the available payment methods.
///
/// GET /payment-methods
pub async fn list_payment_methods(
    State(state): State<AppState>,
) -> Result<Json<Vec<PaymentMethod>>, AppError> {
    Ok(Json(state.db.list_payment_methods().await?))
}

/// Issue the invoice for an order. At most one invoice per order; the
/// amount is taken from the order total, never from the payload.
///
/// POST /invoices
pub async fn issue_invoice(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<IssueInvoiceRequest>,
) -> Result<(StatusCode, Json<InvoiceResponse>), AppError> {
    let order = state
        .db
        .find_order_by_id(req.order_id)
        .await?
        .ok_or(ServiceError::OrderNotFound)
        .map_err(AppError::from)?;

    if state.db.find_invoice_by_order(req.order_id).await?.is_some() {
        return Err(ServiceError::InvoiceAlreadyExists.into());
    }

    let invoice = Invoice::new(order.order_id, claims.user_id, order.total, req.details);
    state.db.insert_invoice(&invoice).await?;

    tracing::info!(invoice_id = %invoice.invoice_id, order_id = %order.order_id, "Invoice issued");

    Ok((StatusCode::CREATED, Json(InvoiceResponse::from(invoice))))
}

/// Fetch the invoice linked to an order.
///
/// GET /invoices/order/:order_id
pub async fn get_invoice_by_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<InvoiceResponse>, AppError> {
    let invoice = state
        .db
        .find_invoice_by_order(order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice not found")))?;

    Ok(Json(InvoiceResponse::from(invoice)))
}
