use serde::{Deserialize, Serialize};

/// Key of the persisted client state blob.
pub const PERSISTED_STATE_KEY: &str = "persist:root";

/// Cookies that mirror the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionCookie {
    AccessToken,
    RefreshToken,
    OtpToken,
    Token,
}

impl SessionCookie {
    pub const ALL: [SessionCookie; 4] = [
        SessionCookie::AccessToken,
        SessionCookie::RefreshToken,
        SessionCookie::OtpToken,
        SessionCookie::Token,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::AccessToken => "accessToken",
            Self::RefreshToken => "refreshToken",
            Self::OtpToken => "otpToken",
            Self::Token => "token",
        }
    }
}

/// Local-storage entries owned by authentication. Anything else in local
/// storage belongs to the application and survives a logout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocalKey {
    AuthUser,
    AuthToken,
    User,
    Token,
}

impl LocalKey {
    pub const ALL: [LocalKey; 4] = [
        LocalKey::AuthUser,
        LocalKey::AuthToken,
        LocalKey::User,
        LocalKey::Token,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::AuthUser => "authUser",
            Self::AuthToken => "authToken",
            Self::User => "user",
            Self::Token => "token",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageKey {
    PersistedState,
    Cookie(SessionCookie),
    Local(LocalKey),
    /// The whole session storage area.
    SessionStorage,
}

impl StorageKey {
    /// Everything removed when a session ends.
    pub fn teardown_set() -> Vec<StorageKey> {
        let mut keys = vec![StorageKey::PersistedState];
        keys.extend(SessionCookie::ALL.into_iter().map(StorageKey::Cookie));
        keys.extend(LocalKey::ALL.into_iter().map(StorageKey::Local));
        keys.push(StorageKey::SessionStorage);
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn teardown_covers_every_session_artifact() {
        let keys = StorageKey::teardown_set();
        assert_eq!(keys.len(), 10);
        assert!(keys.contains(&StorageKey::PersistedState));
        assert!(keys.contains(&StorageKey::SessionStorage));
        for cookie in SessionCookie::ALL {
            assert!(keys.contains(&StorageKey::Cookie(cookie)));
        }
    }
}
