use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    exception::WorkOrderResult,
    model::entity::{AgentDetail, AgentSummary, KpiRecord},
};

/// Read-only access to agent KPIs.
#[async_trait]
pub trait TranscriberService: Send + Sync {
    async fn agents(&self) -> WorkOrderResult<Arc<Vec<AgentSummary>>>;
    async fn agent(&self, name: &str) -> WorkOrderResult<Arc<AgentDetail>>;
    async fn transcript(&self, id: &str) -> WorkOrderResult<Arc<KpiRecord>>;
}
