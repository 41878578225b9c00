use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuditKind {
    Update,
    Delete,
}

/// One audit record; data snapshots are stored as JSON text
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: Uuid,
    pub collection: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: AuditKind,
    pub old_data: String,
    pub new_data: String,
    pub created_date: DateTime<Utc>,
}

/// Writes audit entries to the `audit` tracing target
#[derive(Debug, Clone, Default)]
pub struct AuditLog;

impl AuditLog {
    pub fn new() -> Self {
        Self
    }

    pub fn log_update<O: Serialize, N: Serialize>(&self, collection: &str, user_id: &str, old: &O, new: &N) -> AuditEntry {
        self.emit(AuditEntry {
            id: Uuid::new_v4(),
            collection: collection.to_string(),
            user_id: user_id.to_string(),
            kind: AuditKind::Update,
            old_data: snapshot(old),
            new_data: snapshot(new),
            created_date: Utc::now(),
        })
    }

    pub fn log_delete<O: Serialize>(&self, collection: &str, user_id: &str, old: &O) -> AuditEntry {
        self.emit(AuditEntry {
            id: Uuid::new_v4(),
            collection: collection.to_string(),
            user_id: user_id.to_string(),
            kind: AuditKind::Delete,
            old_data: snapshot(old),
            new_data: String::new(),
            created_date: Utc::now(),
        })
    }

    fn emit(&self, entry: AuditEntry) -> AuditEntry {
        tracing::info!(
            target: "audit",
            id = %entry.id,
            collection = %entry.collection,
            user_id = %entry.user_id,
            kind = ?entry.kind,
            old_data = %entry.old_data,
            new_data = %entry.new_data,
            "audit"
        );
        entry
    }
}

fn snapshot<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}
