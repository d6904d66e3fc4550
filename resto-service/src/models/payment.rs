//! Payment and invoice ledger models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Payment transaction against an order.
#[derive(Debug, Clone, FromRow)]
pub struct Payment {
    pub payment_id: Uuid,
    pub order_id: Uuid,
    pub cashier_id: Uuid,
    pub method_id: Uuid,
    pub amount: Decimal,
    pub payment_time: DateTime<Utc>,
    pub notes: Option<String>,
    pub discounts_applied: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(
        order_id: Uuid,
        cashier_id: Uuid,
        method_id: Uuid,
        amount: Decimal,
        notes: Option<String>,
        discounts_applied: Option<i32>,
    ) -> Self {
        let now = Utc::now();
        Self {
            payment_id: Uuid::new_v4(),
            order_id,
            cashier_id,
            method_id,
            amount,
            payment_time: now,
            notes,
            discounts_applied,
            created_at: now,
        }
    }
}

/// Shared payment method reference (cash, card, ...).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PaymentMethod {
    pub method_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Invoice: at most one per order.
#[derive(Debug, Clone, FromRow)]
pub struct Invoice {
    pub invoice_id: Uuid,
    pub order_id: Uuid,
    pub issuer_id: Uuid,
    pub invoice_number: String,
    pub issue_date: DateTime<Utc>,
    pub total_amount: Decimal,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    pub fn new(order_id: Uuid, issuer_id: Uuid, total_amount: Decimal, details: Option<String>) -> Self {
        let now = Utc::now();
        // Invoice numbers are derived from the invoice id; they only need
        // to be unique, not sequential.
        let invoice_id = Uuid::new_v4();
        Self {
            invoice_id,
            order_id,
            issuer_id,
            invoice_number: format!("INV-{}", invoice_id.simple()),
            issue_date: now,
            total_amount,
            details,
            created_at: now,
        }
    }
}

/// Request to record a payment. The cashier is the authenticated caller.
#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    pub order_id: Uuid,
    pub method_id: Uuid,
    pub amount: Decimal,
    pub notes: Option<String>,
    pub discounts_applied: Option<i32>,
}

/// Request to issue an invoice for an order. The issuer is the
/// authenticated caller; the amount is taken from the order total.
#[derive(Debug, Deserialize)]
pub struct IssueInvoiceRequest {
    pub order_id: Uuid,
    pub details: Option<String>,
}

/// Payment response for API.
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub payment_id: Uuid,
    pub order_id: Uuid,
    pub cashier_id: Uuid,
    pub method_id: Uuid,
    pub amount: Decimal,
    pub payment_time: DateTime<Utc>,
    pub notes: Option<String>,
    pub discounts_applied: Option<i32>,
}

impl From<Payment> for PaymentResponse {
    fn from(p: Payment) -> Self {
        Self {
            payment_id: p.payment_id,
            order_id: p.order_id,
            cashier_id: p.cashier_id,
            method_id: p.method_id,
            amount: p.amount,
            payment_time: p.payment_time,
            notes: p.notes,
            discounts_applied: p.discounts_applied,
        }
    }
}

/// Invoice response for API.
#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    pub invoice_id: Uuid,
    pub order_id: Uuid,
    pub issuer_id: Uuid,
    pub invoice_number: String,
    pub issue_date: DateTime<Utc>,
    pub total_amount: Decimal,
    pub details: Option<String>,
}

impl From<Invoice> for InvoiceResponse {
    fn from(i: Invoice) -> Self {
        Self {
            invoice_id: i.invoice_id,
            order_id: i.order_id,
            issuer_id: i.issuer_id,
            invoice_number: i.invoice_number,
            issue_date: i.issue_date,
            total_amount: i.total_amount,
            details: i.details,
        }
    }
}
