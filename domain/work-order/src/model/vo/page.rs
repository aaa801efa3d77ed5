use serde::{Deserialize, Serialize};

use super::{DEFAULT_LIMIT, DEFAULT_PAGE};
use crate::model::entity::WorkOrder;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderPage {
    #[serde(alias = "workOrders", default)]
    pub data: Vec<WorkOrder>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    #[serde(alias = "pages")]
    pub total_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            total: 0,
            total_pages: 0,
        }
    }
}

impl Pagination {
    #[inline]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    #[inline]
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Clamp a requested page into `[1, total_pages]`.
    pub fn clamp(&self, page: u32) -> u32 {
        page.clamp(1, self.total_pages.max(1))
    }
}
