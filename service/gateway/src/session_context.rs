use std::sync::Arc;

use domain_session::{
    exception::{SessionException, SessionResult},
    model::{
        entity::{Session, SessionUser},
        vo::{ApiRequest, Bearer, JwtPayload, StorageKey, LOGOUT_PATH},
    },
    service::{ApiGateway, SessionStore},
};
use infrastructure_command::{ExpiryReason, SessionSignal};
use tokio::sync::RwLock;
use typed_builder::TypedBuilder;

/// Explicit session state shared by the gateway and the views.
///
/// `clear` is the only place persisted session artifacts are removed.
#[derive(TypedBuilder)]
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
    signal_sender: flume::Sender<SessionSignal>,
    #[builder(default, setter(skip))]
    current: RwLock<Session>,
}

impl SessionContext {
    /// Load the persisted session into memory.
    pub async fn restore(&self) -> SessionResult<Session> {
        let session = self.store.load().await?;
        *self.current.write().await = session.clone();
        Ok(session)
    }

    pub async fn snapshot(&self) -> Session {
        self.current.read().await.clone()
    }

    pub async fn bearer(&self) -> Option<Bearer> {
        self.current.read().await.bearer()
    }

    pub async fn is_active(&self) -> bool {
        self.current.read().await.is_active()
    }

    /// Start a session from an issued access token.
    pub async fn login(&self, mut session: Session) -> SessionResult<Session> {
        let token = session.access_token.as_deref().ok_or(SessionException::NotLoggedIn)?;
        let payload = JwtPayload::from_token(token).map_err(|e| SessionException::InvalidToken {
            reason: e.to_string(),
        })?;
        if session.user.is_none() {
            session.user = payload.username.clone().map(|username| SessionUser {
                id: payload.sub.clone(),
                username,
                role: None,
            });
        }
        self.store.persist(&session).await?;
        *self.current.write().await = session.clone();
        tracing::info!(user = ?session.display_name(), "Session started");
        Ok(session)
    }

    /// Tell the server, then tear down locally whatever it answers.
    pub async fn logout(&self, gateway: &dyn ApiGateway) -> SessionResult<()> {
        if self.is_active().await {
            if let Err(e) = gateway.execute(ApiRequest::post(LOGOUT_PATH)).await {
                tracing::warn!("Logout request failed, clearing local session anyway: {e}");
            }
        }
        self.clear().await?;
        Ok(())
    }

    /// Remove every persisted session artifact and forget the in-memory session.
    ///
    /// Returns whether a session was active. Safe to call repeatedly.
    pub async fn clear(&self) -> SessionResult<bool> {
        let was_active = {
            let mut current = self.current.write().await;
            let was_active = current.is_active();
            *current = Session::default();
            was_active
        };
        self.store.remove(&StorageKey::teardown_set()).await?;
        Ok(was_active)
    }

    /// Clear the session and signal expiry, at most once per session.
    pub async fn expire(&self, reason: ExpiryReason) {
        let was_active = match self.clear().await {
            Ok(was_active) => was_active,
            Err(e) => {
                tracing::error!("Failed to clear persisted session: {e}");
                true
            }
        };
        if !was_active {
            return;
        }
        tracing::warn!("Session expired: {reason}");
        if let Err(e) = self.signal_sender.send(SessionSignal::Expired { reason }) {
            tracing::debug!("Nobody listens for session signals: {e}");
        }
    }
}
