use std::path::PathBuf;

use async_trait::async_trait;

use crate::{command::ExportCommand, exception::WorkOrderResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub path: PathBuf,
    pub size: usize,
}

#[async_trait]
pub trait ExportService: Send + Sync {
    async fn export(&self, command: ExportCommand) -> WorkOrderResult<ExportedFile>;
}
