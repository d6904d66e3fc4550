use service_core::error::AppError;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{OrderStatus, Role};

/// Domain error taxonomy. The transport boundary maps each variant to a
/// fixed status code via `AppError`.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("User not found")]
    UserNotFound,

    #[error("Email already registered")]
    EmailAlreadyRegistered,

    #[error("User {0} already holds the {1} role")]
    DuplicateRole(Uuid, Role),

    #[error("Table not found")]
    TableNotFound,

    #[error("A table with that number already exists")]
    DuplicateTableNumber,

    #[error("Menu item {0} not found")]
    UnknownMenuItem(Uuid),

    #[error("Order not found")]
    OrderNotFound,

    #[error("Order item not found")]
    OrderItemNotFound,

    #[error("Illegal order status transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Preparation not found")]
    PreparationNotFound,

    #[error("Payment method not found")]
    PaymentMethodNotFound,

    #[error("Order already has an invoice")]
    InvoiceAlreadyExists,

    #[error("Audit record not found")]
    AuditNotFound,

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Database(e) => AppError::DatabaseError(anyhow::anyhow!(e)),
            ServiceError::Internal(e) => AppError::InternalError(e),
            ServiceError::InvalidCredentials => {
                AppError::Unauthenticated(anyhow::anyhow!("Invalid credentials"))
            }
            ServiceError::InvalidToken => {
                AppError::Unauthenticated(anyhow::anyhow!("Invalid token"))
            }
            ServiceError::TokenExpired => {
                AppError::Unauthenticated(anyhow::anyhow!("Token expired"))
            }
            ServiceError::UserNotFound => AppError::NotFound(anyhow::anyhow!("User not found")),
            ServiceError::EmailAlreadyRegistered => {
                AppError::Conflict(anyhow::anyhow!("Email is already registered"))
            }
            e @ ServiceError::DuplicateRole(..) => AppError::Conflict(anyhow::anyhow!("{e}")),
            ServiceError::TableNotFound => AppError::NotFound(anyhow::anyhow!("Table not found")),
            ServiceError::DuplicateTableNumber => {
                AppError::Conflict(anyhow::anyhow!("A table with that number already exists"))
            }
            e @ ServiceError::UnknownMenuItem(_) => AppError::NotFound(anyhow::anyhow!("{e}")),
            ServiceError::OrderNotFound => AppError::NotFound(anyhow::anyhow!("Order not found")),
            ServiceError::OrderItemNotFound => {
                AppError::NotFound(anyhow::anyhow!("Order item not found"))
            }
            e @ ServiceError::InvalidTransition { .. } => {
                AppError::BadRequest(anyhow::anyhow!("{e}"))
            }
            ServiceError::PreparationNotFound => {
                AppError::NotFound(anyhow::anyhow!("Preparation not found"))
            }
            ServiceError::PaymentMethodNotFound => {
                AppError::NotFound(anyhow::anyhow!("Payment method not found"))
            }
            ServiceError::InvoiceAlreadyExists => {
                AppError::Conflict(anyhow::anyhow!("Order already has an invoice"))
            }
            ServiceError::AuditNotFound => {
                AppError::NotFound(anyhow::anyhow!("Audit record not found"))
            }
            ServiceError::Validation(msg) => AppError::BadRequest(anyhow::anyhow!(msg)),
        }
    }
}
