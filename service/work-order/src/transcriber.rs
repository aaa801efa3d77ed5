use std::sync::Arc;

use async_trait::async_trait;
use domain_work_order::{
    endpoint::{GetAgent, GetTranscript, ListAgents},
    exception::WorkOrderResult,
    model::entity::{AgentDetail, AgentSummary, KpiRecord},
    service::TranscriberService,
};
use typed_builder::TypedBuilder;

use crate::QueryCache;

#[derive(TypedBuilder)]
pub struct TranscriberServiceImpl {
    cache: Arc<QueryCache>,
}

#[async_trait]
impl TranscriberService for TranscriberServiceImpl {
    async fn agents(&self) -> WorkOrderResult<Arc<Vec<AgentSummary>>> {
        Ok(self.cache.query::<ListAgents>(&()).await?)
    }

    async fn agent(&self, name: &str) -> WorkOrderResult<Arc<AgentDetail>> {
        Ok(self.cache.query::<GetAgent>(&name.trim().to_owned()).await?)
    }

    async fn transcript(&self, id: &str) -> WorkOrderResult<Arc<KpiRecord>> {
        Ok(self.cache.query::<GetTranscript>(&id.trim().to_owned()).await?)
    }
}
