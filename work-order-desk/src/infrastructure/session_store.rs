use std::{collections::BTreeMap, io::ErrorKind, path::PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use domain_session::{
    model::{
        entity::Session,
        vo::{LocalKey, SessionCookie, StorageKey, PERSISTED_STATE_KEY},
    },
    service::SessionStore,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// On-disk layout mirroring the browser storage areas the session lives in.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StorageFile {
    #[serde(default)]
    local_storage: BTreeMap<String, String>,
    #[serde(default)]
    session_storage: BTreeMap<String, String>,
    #[serde(default)]
    cookies: BTreeMap<String, String>,
}

/// Session storage in one JSON file.
///
/// Local-storage entries that are not session keys are left alone by `remove`.
pub struct FileSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn read(&self) -> anyhow::Result<StorageFile> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(StorageFile::default()),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("corrupt session file {}", self.path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(StorageFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, file: &StorageFile) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_vec_pretty(file)?).await?;
        Ok(())
    }

    /// Store an application entry in local storage.
    pub async fn set_local(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let _guard = self.lock.lock().await;
        let mut file = self.read().await?;
        file.local_storage.insert(key.to_owned(), value.to_owned());
        self.write(&file).await
    }

    pub async fn get_local(&self, key: &str) -> anyhow::Result<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.read().await?.local_storage.remove(key))
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> anyhow::Result<Session> {
        let _guard = self.lock.lock().await;
        let mut file = self.read().await?;
        if let Some(state) = file.local_storage.remove(PERSISTED_STATE_KEY) {
            return serde_json::from_str(&state).context("corrupt persisted session state");
        }
        // older files only carried the cookies
        let cookie = |c: SessionCookie| file.cookies.get(c.name()).cloned();
        Ok(Session {
            access_token: cookie(SessionCookie::AccessToken).or_else(|| cookie(SessionCookie::Token)),
            refresh_token: cookie(SessionCookie::RefreshToken),
            otp_token: cookie(SessionCookie::OtpToken),
            user: None,
        })
    }

    async fn persist(&self, session: &Session) -> anyhow::Result<()> {
        let _guard = self.lock.lock().await;
        let mut file = self.read().await?;
        file.local_storage.insert(
            PERSISTED_STATE_KEY.to_owned(),
            serde_json::to_string(session)?,
        );

        let mut mirror = |cookie: SessionCookie, value: Option<&String>| match value {
            Some(value) => {
                file.cookies.insert(cookie.name().to_owned(), value.clone());
            }
            None => {
                file.cookies.remove(cookie.name());
            }
        };
        mirror(SessionCookie::AccessToken, session.access_token.as_ref());
        mirror(SessionCookie::Token, session.access_token.as_ref());
        mirror(SessionCookie::RefreshToken, session.refresh_token.as_ref());
        mirror(SessionCookie::OtpToken, session.otp_token.as_ref());

        if let Some(token) = &session.access_token {
            file.local_storage
                .insert(LocalKey::AuthToken.name().to_owned(), token.clone());
        }
        if let Some(user) = &session.user {
            file.local_storage.insert(
                LocalKey::AuthUser.name().to_owned(),
                serde_json::to_string(user)?,
            );
        }
        self.write(&file).await
    }

    async fn remove(&self, keys: &[StorageKey]) -> anyhow::Result<()> {
        let _guard = self.lock.lock().await;
        let mut file = self.read().await?;
        for key in keys {
            match key {
                StorageKey::PersistedState => {
                    file.local_storage.remove(PERSISTED_STATE_KEY);
                }
                StorageKey::Cookie(cookie) => {
                    file.cookies.remove(cookie.name());
                }
                StorageKey::Local(local) => {
                    file.local_storage.remove(local.name());
                }
                StorageKey::SessionStorage => file.session_storage.clear(),
            }
        }
        self.write(&file).await?;
        tracing::debug!(path = %self.path.display(), removed = keys.len(), "Session storage cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use domain_session::model::entity::SessionUser;
    use tempfile::TempDir;

    use super::*;

    fn temp_store() -> (FileSessionStore, TempDir) {
        let dir = TempDir::new().unwrap();
        (FileSessionStore::new(dir.path().join("session.json")), dir)
    }

    fn session() -> Session {
        Session {
            access_token: Some("h.p.s".into()),
            refresh_token: Some("refresh".into()),
            otp_token: None,
            user: Some(SessionUser {
                id: Some("7".into()),
                username: "maria".into(),
                role: Some("agent".into()),
            }),
        }
    }

    #[tokio::test]
    async fn missing_file_is_an_empty_session() {
        let (store, _dir) = temp_store();
        let loaded = store.load().await.unwrap();
        assert!(!loaded.is_active());
    }

    #[tokio::test]
    async fn persisted_session_is_restored() {
        let (store, dir) = temp_store();
        store.persist(&session()).await.unwrap();

        let loaded = FileSessionStore::new(dir.path().join("session.json"))
            .load()
            .await
            .unwrap();
        assert_eq!(loaded, session());
    }

    #[tokio::test]
    async fn teardown_keeps_application_entries() {
        let (store, dir) = temp_store();
        store.persist(&session()).await.unwrap();
        store.set_local("columns", "workOrderNumber").await.unwrap();

        store.remove(&StorageKey::teardown_set()).await.unwrap();

        assert!(!store.load().await.unwrap().is_active());
        assert_eq!(
            store.get_local("columns").await.unwrap().as_deref(),
            Some("workOrderNumber")
        );
        assert_eq!(store.get_local(LocalKey::AuthUser.name()).await.unwrap(), None);
        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(dir.path().join("session.json")).unwrap()).unwrap();
        assert_eq!(raw["cookies"], serde_json::json!({}));

        // removing again is not an error
        store.remove(&StorageKey::teardown_set()).await.unwrap();
    }
}
