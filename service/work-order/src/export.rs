use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use domain_session::service::{ApiGateway, Clock, SystemClock};
use domain_work_order::{
    command::ExportCommand,
    endpoint::ExportWorkOrders,
    exception::WorkOrderResult,
    service::{DownloadSink, ExportService, ExportedFile},
};
use typed_builder::TypedBuilder;

/// Downloads go straight through the gateway; the cache never sees them.
#[derive(TypedBuilder)]
pub struct ExportServiceImpl {
    gateway: Arc<dyn ApiGateway>,
    sink: Arc<dyn DownloadSink>,
    #[builder(default = Arc::new(SystemClock) as Arc<dyn Clock>)]
    clock: Arc<dyn Clock>,
}

#[async_trait]
impl ExportService for ExportServiceImpl {
    #[tracing::instrument(skip_all, fields(format = %command.format, range = %command.range))]
    async fn export(&self, command: ExportCommand) -> WorkOrderResult<ExportedFile> {
        let now = self.clock.now();
        let response = self
            .gateway
            .execute(ExportWorkOrders::request(&command, now))
            .await?;
        let file_name = command.file_name(now);
        let path = self
            .sink
            .save(&file_name, &response.body)
            .await
            .with_context(|| format!("Failed to save export {file_name}"))?;
        tracing::info!(path = %path.display(), size = response.body.len(), "Export saved");
        Ok(ExportedFile {
            file_name,
            path,
            size: response.body.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::{TimeZone, Utc};
    use domain_session::{mock::MockApiGateway, model::vo::ApiResponse, service::FixedClock};
    use domain_work_order::{
        mock::MockDownloadSink,
        model::vo::{DateRangeShortcut, ExportFormat},
    };

    use super::*;

    #[tokio::test]
    async fn export_uses_resolved_range_and_file_name() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let mut gateway = MockApiGateway::new();
        gateway
            .expect_execute()
            .withf(|request| {
                request.path == "/work-orders/export"
                    && request.query.get("startDate").map(String::as_str) == Some("2024-03-03")
                    && request.query.get("endDate").map(String::as_str) == Some("2024-03-10")
                    && request.query.get("format").map(String::as_str) == Some("xlsx")
            })
            .times(1)
            .returning(|_| Ok(ApiResponse::new(200, b"PK\x03\x04".to_vec())));
        let mut sink = MockDownloadSink::new();
        sink.expect_save()
            .withf(|name, bytes| name == "work-orders-7days-2024-03-10.xlsx" && bytes.len() == 4)
            .times(1)
            .returning(|name, _| Ok(PathBuf::from("/tmp").join(name)));

        let service = ExportServiceImpl::builder()
            .gateway(Arc::new(gateway))
            .sink(Arc::new(sink))
            .clock(Arc::new(FixedClock(now)))
            .build();
        let file = service
            .export(ExportCommand {
                format: ExportFormat::Xlsx,
                range: DateRangeShortcut::SevenDays,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(file.size, 4);
        assert_eq!(file.path, PathBuf::from("/tmp/work-orders-7days-2024-03-10.xlsx"));
    }
}
