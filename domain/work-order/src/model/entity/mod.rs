pub mod history;
pub mod kpi;
pub mod work_order;

#[rustfmt::skip]
pub use {
    history::WorkOrderHistoryEntry,
    kpi::{AgentDetail, AgentSummary, KpiRecord},
    work_order::WorkOrder,
};
