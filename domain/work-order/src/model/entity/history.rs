use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Audit trail entry of a work order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderHistoryEntry {
    pub action: String,
    #[serde(default)]
    pub changed_by: Option<String>,
    pub changed_at: DateTime<Utc>,
    #[serde(default)]
    pub changes: Value,
}
