use std::path::PathBuf;

use async_trait::async_trait;

/// Destination of downloaded files.
#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Store `bytes` under `file_name` and return where it was written.
    async fn save(&self, file_name: &str, bytes: &[u8]) -> anyhow::Result<PathBuf>;
}
