use std::{sync::Arc, time::Duration};

use domain_session::service::ApiGateway;
use domain_work_order::{
    model::vo::{Column, UnknownVariant},
    service::{ExportService, TranscriberService, WorkOrderService},
};
use infrastructure_command::SessionSignal;
use service_gateway::{AuthGatewayImpl, SessionContext};
use service_work_order::{
    ExportServiceImpl, ListView, QueryCache, TranscriberServiceImpl, WorkOrderServiceImpl,
};

use super::{FileDownloadSink, FileSessionStore, ReqwestTransport};
use crate::config::DeskConfig;

/// Application entry in local storage; survives logout.
const COLUMNS_KEY: &str = "workOrderColumns";

/// Everything a command needs, wired once from the config.
pub struct ServiceProvider {
    pub config: DeskConfig,
    pub session: Arc<SessionContext>,
    pub session_store: Arc<FileSessionStore>,
    pub gateway: Arc<dyn ApiGateway>,
    pub cache: Arc<QueryCache>,
    pub work_orders: Arc<dyn WorkOrderService>,
    pub transcriber: Arc<dyn TranscriberService>,
    pub export: Arc<dyn ExportService>,
    pub signals: flume::Receiver<SessionSignal>,
}

impl ServiceProvider {
    pub fn build(config: DeskConfig) -> anyhow::Result<Self> {
        let (signal_sender, signals) = flume::unbounded();
        let session_store = Arc::new(FileSessionStore::new(&config.session.path));
        let session = Arc::new(
            SessionContext::builder()
                .store(session_store.clone())
                .signal_sender(signal_sender)
                .build(),
        );
        let transport = Arc::new(ReqwestTransport::new(
            &config.api.base_url,
            config.api.timeout_secs.map(Duration::from_secs),
        )?);
        let gateway: Arc<dyn ApiGateway> = Arc::new(
            AuthGatewayImpl::builder()
                .transport(transport)
                .session(session.clone())
                .build(),
        );
        let cache = Arc::new(
            QueryCache::builder()
                .gateway(gateway.clone())
                .keep_unused_for(Duration::from_secs(config.cache.keep_unused_for_secs))
                .build(),
        );
        let work_orders = Arc::new(WorkOrderServiceImpl::builder().cache(cache.clone()).build());
        let transcriber = Arc::new(TranscriberServiceImpl::builder().cache(cache.clone()).build());
        let export = Arc::new(
            ExportServiceImpl::builder()
                .gateway(gateway.clone())
                .sink(Arc::new(FileDownloadSink::new(&config.export.download_dir)))
                .build(),
        );

        Ok(Self {
            config,
            session,
            session_store,
            gateway,
            cache,
            work_orders,
            transcriber,
            export,
            signals,
        })
    }

    /// A table view with the configured page size and debounce. Columns saved
    /// with `list --save-columns` win over the configured ones.
    pub async fn list_view(&self) -> anyhow::Result<ListView> {
        let view = &self.config.view;
        let mut list = ListView::new(self.cache.clone(), Duration::from_millis(view.debounce_ms));
        list.set_limit(view.page_size);
        let saved = self.session_store.get_local(COLUMNS_KEY).await?;
        let columns = match saved.as_deref().map(parse_columns) {
            Some(Ok(columns)) if !columns.is_empty() => columns,
            Some(Err(e)) => {
                tracing::warn!("Ignoring saved columns: {e}");
                view.columns.clone()
            }
            _ => view.columns.clone(),
        };
        list.set_columns(columns);
        Ok(list)
    }

    pub async fn save_columns(&self, columns: &[Column]) -> anyhow::Result<()> {
        let value = columns
            .iter()
            .map(Column::as_str)
            .collect::<Vec<_>>()
            .join(",");
        self.session_store.set_local(COLUMNS_KEY, &value).await
    }
}

fn parse_columns(raw: &str) -> Result<Vec<Column>, UnknownVariant> {
    raw.split(',')
        .filter(|c| !c.trim().is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_columns_parse() {
        assert_eq!(
            parse_columns("workOrderNumber, hours").unwrap(),
            vec![Column::WorkOrderNumber, Column::Hours]
        );
        assert!(parse_columns("workOrderNumber,colour").is_err());
    }
}
