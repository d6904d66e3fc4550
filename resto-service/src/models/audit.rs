//! Audit log model: admin-attributable action records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Audit {
    pub audit_id: Uuid,
    pub admin_id: Uuid,
    pub action: String,
    pub description: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub affected_entity: Option<String>,
    pub entity_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Audit {
    pub fn new(
        admin_id: Uuid,
        action: impl Into<String>,
        description: Option<String>,
        affected_entity: Option<String>,
        entity_id: Option<Uuid>,
    ) -> Self {
        let now = Utc::now();
        Self {
            audit_id: Uuid::new_v4(),
            admin_id,
            action: action.into(),
            description,
            occurred_at: now,
            affected_entity,
            entity_id,
            created_at: now,
            deleted_at: None,
        }
    }
}

/// Request to append an audit record by hand. Most records are appended
/// implicitly by admin-gated mutations.
#[derive(Debug, Deserialize)]
pub struct RecordAuditRequest {
    pub action: String,
    pub description: Option<String>,
    pub affected_entity: Option<String>,
    pub entity_id: Option<Uuid>,
}

/// Audit response for API.
#[derive(Debug, Serialize)]
pub struct AuditResponse {
    pub audit_id: Uuid,
    pub admin_id: Uuid,
    pub action: String,
    pub description: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub affected_entity: Option<String>,
    pub entity_id: Option<Uuid>,
}

impl From<Audit> for AuditResponse {
    fn from(a: Audit) -> Self {
        Self {
            audit_id: a.audit_id,
            admin_id: a.admin_id,
            action: a.action,
            description: a.description,
            occurred_at: a.occurred_at,
            affected_entity: a.affected_entity,
            entity_id: a.entity_id,
        }
    }
}
