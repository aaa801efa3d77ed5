use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    command::{BulkUpdateCommand, CreateWorkOrderCommand, PatchStatusCommand, UpdateWorkOrderCommand},
    exception::WorkOrderResult,
    model::{
        entity::{WorkOrder, WorkOrderHistoryEntry},
        vo::{BulkUpdateResult, ListFilter, WorkOrderPage, WorkOrderStats},
    },
};

/// # Work order service.
///
/// Reads are served through the client cache and shared as `Arc`s; writes
/// go straight to the server and invalidate the cached reads they affect.
#[async_trait]
pub trait WorkOrderService: Send + Sync {
    async fn list(&self, filter: ListFilter) -> WorkOrderResult<Arc<WorkOrderPage>>;
    async fn get(&self, id: &str) -> WorkOrderResult<Arc<WorkOrder>>;
    /// Exact match on the work-order number, never served from cache.
    async fn find_by_number(&self, number: &str) -> WorkOrderResult<WorkOrder>;
    async fn history(&self, id: &str) -> WorkOrderResult<Arc<Vec<WorkOrderHistoryEntry>>>;
    async fn stats(&self) -> WorkOrderResult<Arc<WorkOrderStats>>;
    async fn create(&self, command: CreateWorkOrderCommand) -> WorkOrderResult<WorkOrder>;
    async fn update(&self, command: UpdateWorkOrderCommand) -> WorkOrderResult<WorkOrder>;
    async fn patch_status(&self, command: PatchStatusCommand) -> WorkOrderResult<WorkOrder>;
    async fn delete(&self, id: &str) -> WorkOrderResult<()>;
    async fn bulk_update(&self, command: BulkUpdateCommand) -> WorkOrderResult<BulkUpdateResult>;
}
