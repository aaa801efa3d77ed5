use std::path::{Path, PathBuf};

use anyhow::bail;
use async_trait::async_trait;
use domain_work_order::service::DownloadSink;

/// Saves downloads into one directory, created on first use.
pub struct FileDownloadSink {
    dir: PathBuf,
}

impl FileDownloadSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl DownloadSink for FileDownloadSink {
    async fn save(&self, file_name: &str, bytes: &[u8]) -> anyhow::Result<PathBuf> {
        let name = Path::new(file_name);
        if name.file_name() != Some(name.as_os_str()) {
            bail!("refusing to write outside the download directory: {file_name}");
        }
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(name);
        tokio::fs::write(&path, bytes).await?;
        tracing::info!(path = %path.display(), size = bytes.len(), "Download saved");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn writes_into_the_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("downloads");
        let sink = FileDownloadSink::new(&dir);

        let path = sink.save("work-orders-all-2024-06-01.csv", b"a,b\n").await.unwrap();
        assert_eq!(path, dir.join("work-orders-all-2024-06-01.csv"));
        assert_eq!(std::fs::read(&path).unwrap(), b"a,b\n");

        assert!(sink.save("../escape.csv", b"").await.is_err());
    }
}
