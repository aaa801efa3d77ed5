use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use mockall::mock;

use crate::{
    command::*,
    exception::WorkOrderResult,
    model::{entity::*, vo::*},
    service::*,
};

mock! {
    pub WorkOrderService {}
    #[async_trait]
    impl WorkOrderService for WorkOrderService {
        async fn list(&self, filter: ListFilter) -> WorkOrderResult<Arc<WorkOrderPage>>;
        async fn get(&self, id: &str) -> WorkOrderResult<Arc<WorkOrder>>;
        async fn find_by_number(&self, number: &str) -> WorkOrderResult<WorkOrder>;
        async fn history(&self, id: &str) -> WorkOrderResult<Arc<Vec<WorkOrderHistoryEntry>>>;
        async fn stats(&self) -> WorkOrderResult<Arc<WorkOrderStats>>;
        async fn create(&self, command: CreateWorkOrderCommand) -> WorkOrderResult<WorkOrder>;
        async fn update(&self, command: UpdateWorkOrderCommand) -> WorkOrderResult<WorkOrder>;
        async fn patch_status(&self, command: PatchStatusCommand) -> WorkOrderResult<WorkOrder>;
        async fn delete(&self, id: &str) -> WorkOrderResult<()>;
        async fn bulk_update(&self, command: BulkUpdateCommand) -> WorkOrderResult<BulkUpdateResult>;
    }
}

mock! {
    pub TranscriberService {}
    #[async_trait]
    impl TranscriberService for TranscriberService {
        async fn agents(&self) -> WorkOrderResult<Arc<Vec<AgentSummary>>>;
        async fn agent(&self, name: &str) -> WorkOrderResult<Arc<AgentDetail>>;
        async fn transcript(&self, id: &str) -> WorkOrderResult<Arc<KpiRecord>>;
    }
}

mock! {
    pub ExportService {}
    #[async_trait]
    impl ExportService for ExportService {
        async fn export(&self, command: ExportCommand) -> WorkOrderResult<ExportedFile>;
    }
}

mock! {
    pub DownloadSink {}
    #[async_trait]
    impl DownloadSink for DownloadSink {
        async fn save(&self, file_name: &str, bytes: &[u8]) -> anyhow::Result<PathBuf>;
    }
}
