use serde::{Deserialize, Serialize};

use crate::model::vo::Bearer;

/// Client-side session, mirrored into the persisted state blob and cookies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub otp_token: Option<String>,
    pub user: Option<SessionUser>,
}

/// Logged-in operator. Work orders created by the client carry this name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(default)]
    pub id: Option<String>,
    pub username: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl Session {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            ..Default::default()
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.access_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn bearer(&self) -> Option<Bearer> {
        self.access_token.as_deref().filter(|t| !t.is_empty()).map(Bearer::new)
    }

    /// Name shown in prompts and stamped as `agentName` on created work orders.
    pub fn display_name(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_is_not_an_active_session() {
        let session = Session::new("");
        assert!(!session.is_active());
        assert!(session.bearer().is_none());
        assert!(!Session::default().is_active());
    }

    #[test]
    fn session_round_trips_camel_case() {
        let session = Session {
            access_token: Some("a.b.c".into()),
            refresh_token: Some("r".into()),
            otp_token: None,
            user: Some(SessionUser {
                id: Some("u1".into()),
                username: "maria".into(),
                role: None,
            }),
        };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["accessToken"], "a.b.c");
        assert_eq!(json["refreshToken"], "r");
        assert_eq!(session.display_name(), Some("maria"));
    }
}
