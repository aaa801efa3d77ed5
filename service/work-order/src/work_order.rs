use std::sync::Arc;

use async_trait::async_trait;
use domain_work_order::{
    command::{BulkUpdateCommand, CreateWorkOrderCommand, PatchStatusCommand, UpdateWorkOrderCommand},
    endpoint::{
        BulkUpdateWorkOrders, CreateWorkOrder, DeleteWorkOrder, FindWorkOrderByNumber,
        GetWorkOrder, ListWorkOrders, NumberSearch, PatchWorkOrderStatus, UpdateWorkOrder,
        WorkOrderHistory, WorkOrderStatsOverview,
    },
    exception::{WorkOrderException, WorkOrderResult},
    model::{
        entity::{WorkOrder, WorkOrderHistoryEntry},
        vo::{BulkUpdateResult, ListFilter, WorkOrderField, WorkOrderPage, WorkOrderStats},
    },
    service::WorkOrderService,
};
use typed_builder::TypedBuilder;

use crate::QueryCache;

#[derive(TypedBuilder)]
pub struct WorkOrderServiceImpl {
    cache: Arc<QueryCache>,
}

#[async_trait]
impl WorkOrderService for WorkOrderServiceImpl {
    async fn list(&self, filter: ListFilter) -> WorkOrderResult<Arc<WorkOrderPage>> {
        Ok(self.cache.query::<ListWorkOrders>(&filter).await?)
    }

    async fn get(&self, id: &str) -> WorkOrderResult<Arc<WorkOrder>> {
        Ok(self.cache.query::<GetWorkOrder>(&id.to_owned()).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_number(&self, number: &str) -> WorkOrderResult<WorkOrder> {
        let number = number.trim();
        if number.is_empty() {
            return Err(WorkOrderException::validation(
                WorkOrderField::WorkOrderNumber,
                "Work order number is required",
            ));
        }
        let mut search = NumberSearch::new(number);
        loop {
            let page = self.cache.query::<FindWorkOrderByNumber>(&search).await?;
            if let Some(found) = FindWorkOrderByNumber::exact(number, &page.data) {
                return Ok(found);
            }
            if page.data.is_empty() || search.page >= page.pagination.total_pages {
                break;
            }
            tracing::debug!(page = search.page, "No exact match yet, fetching next page");
            search = search.next();
        }
        Err(WorkOrderException::NotFound {
            work_order_number: number.to_owned(),
        })
    }

    async fn history(&self, id: &str) -> WorkOrderResult<Arc<Vec<WorkOrderHistoryEntry>>> {
        Ok(self.cache.query::<WorkOrderHistory>(&id.to_owned()).await?)
    }

    async fn stats(&self) -> WorkOrderResult<Arc<WorkOrderStats>> {
        Ok(self.cache.query::<WorkOrderStatsOverview>(&()).await?)
    }

    #[tracing::instrument(skip_all, fields(number = %command.work_order_number))]
    async fn create(&self, mut command: CreateWorkOrderCommand) -> WorkOrderResult<WorkOrder> {
        command.validate()?;
        command.work_order_number = command.work_order_number.trim().to_owned();
        command.draft = command.draft.normalised();
        let created = self.cache.mutate::<CreateWorkOrder>(&command).await?;
        tracing::info!(id = %created.id, "Work order created");
        Ok(created)
    }

    #[tracing::instrument(skip_all, fields(id = %command.id))]
    async fn update(&self, mut command: UpdateWorkOrderCommand) -> WorkOrderResult<WorkOrder> {
        command.validate()?;
        command.draft = command.draft.normalised();
        let updated = self.cache.mutate::<UpdateWorkOrder>(&command).await?;
        tracing::info!("Work order updated");
        Ok(updated)
    }

    #[tracing::instrument(skip_all, fields(id = %command.id, status = %command.work_order_status))]
    async fn patch_status(&self, command: PatchStatusCommand) -> WorkOrderResult<WorkOrder> {
        Ok(self.cache.mutate::<PatchWorkOrderStatus>(&command).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: &str) -> WorkOrderResult<()> {
        self.cache.mutate::<DeleteWorkOrder>(&id.to_owned()).await?;
        tracing::info!("Work order deleted");
        Ok(())
    }

    #[tracing::instrument(skip_all, fields(count = command.ids.len()))]
    async fn bulk_update(&self, command: BulkUpdateCommand) -> WorkOrderResult<BulkUpdateResult> {
        command.validate()?;
        let result = self.cache.mutate::<BulkUpdateWorkOrders>(&command).await?;
        tracing::info!(matched = result.matched, modified = result.modified, "Bulk update applied");
        Ok(result)
    }
}
