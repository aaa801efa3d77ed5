use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkOrderStats {
    pub total: u64,
    pub by_status: BTreeMap<String, u64>,
    pub by_job_status: BTreeMap<String, u64>,
    pub by_area_code: BTreeMap<String, u64>,
    pub total_hours: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BulkUpdateResult {
    #[serde(alias = "matchedCount")]
    pub matched: u64,
    #[serde(alias = "modifiedCount")]
    pub modified: u64,
}
