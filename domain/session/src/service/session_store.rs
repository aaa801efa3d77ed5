use async_trait::async_trait;

use crate::model::{entity::Session, vo::StorageKey};

/// Client-side persistence of the session: state blob, cookies, local and
/// session storage.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> anyhow::Result<Session>;
    async fn persist(&self, session: &Session) -> anyhow::Result<()>;
    /// Removing absent keys is not an error.
    async fn remove(&self, keys: &[StorageKey]) -> anyhow::Result<()>;
}
