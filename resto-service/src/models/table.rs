//! Dining table model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Closed table status vocabulary (the unified encoding; the historical
/// occupied-boolean variant does not survive here).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    Available,
    Occupied,
    Reserved,
    Cleaning,
    Maintenance,
}

impl TableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableStatus::Available => "available",
            TableStatus::Occupied => "occupied",
            TableStatus::Reserved => "reserved",
            TableStatus::Cleaning => "cleaning",
            TableStatus::Maintenance => "maintenance",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "available" => Some(TableStatus::Available),
            "occupied" => Some(TableStatus::Occupied),
            "reserved" => Some(TableStatus::Reserved),
            "cleaning" => Some(TableStatus::Cleaning),
            "maintenance" => Some(TableStatus::Maintenance),
            _ => None,
        }
    }
}

/// Dining table entity.
#[derive(Debug, Clone, FromRow)]
pub struct DiningTable {
    pub table_id: Uuid,
    pub table_number: i32,
    pub waiter_id: Uuid,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl DiningTable {
    pub fn new(table_number: i32, waiter_id: Uuid, status: TableStatus, notes: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            table_id: Uuid::new_v4(),
            table_number,
            waiter_id,
            status: status.as_str().to_string(),
            notes,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

/// Request to create a table.
#[derive(Debug, Deserialize)]
pub struct CreateTableRequest {
    pub number: i32,
    pub waiter_id: Uuid,
    #[serde(default)]
    pub status: Option<TableStatus>,
    pub notes: Option<String>,
}

/// Partial update for a table. Set-only semantics: omitted fields are
/// left unchanged, and `notes` cannot be cleared back to null here.
#[derive(Debug, Deserialize)]
pub struct UpdateTableRequest {
    pub number: Option<i32>,
    pub waiter_id: Option<Uuid>,
    pub status: Option<TableStatus>,
    pub notes: Option<String>,
}

/// Table response for API.
#[derive(Debug, Serialize)]
pub struct TableResponse {
    pub table_id: Uuid,
    pub number: i32,
    pub waiter_id: Uuid,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<DiningTable> for TableResponse {
    fn from(t: DiningTable) -> Self {
        Self {
            table_id: t.table_id,
            number: t.table_number,
            waiter_id: t.waiter_id,
            status: t.status,
            notes: t.notes,
            created_at: t.created_at,
            updated_at: t.updated_at,
            deleted_at: t.deleted_at,
        }
    }
}
