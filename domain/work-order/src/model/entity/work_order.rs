use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::vo::{date, AreaCode, JobStatus, WorkOrderStatus};

/// One field-service job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub work_order_number: String,
    #[serde(with = "date")]
    pub visit_inst_date: NaiveDate,
    #[serde(alias = "type", default)]
    pub work_order_type: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub area_code: Option<AreaCode>,
    #[serde(default)]
    pub supervisor: Option<String>,
    #[serde(default)]
    pub technician: Option<String>,
    #[serde(default)]
    pub hours: Option<f64>,
    #[serde(default = "default_status")]
    pub work_order_status: WorkOrderStatus,
    #[serde(default)]
    pub job_status: Option<JobStatus>,
    #[serde(default)]
    pub distribution: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, with = "date::option")]
    pub reschedule_date: Option<NaiveDate>,
    #[serde(default)]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_status() -> WorkOrderStatus {
    WorkOrderStatus::Pending
}

impl WorkOrder {
    pub fn is_closed(&self) -> bool {
        matches!(
            self.work_order_status,
            WorkOrderStatus::Completed | WorkOrderStatus::Cancelled | WorkOrderStatus::Closed
        )
    }
}
