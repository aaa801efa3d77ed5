//! Commands to interact with infrastructure

use std::fmt;

use serde::{Deserialize, Serialize};

/// Signal sent from the request gateway to the application shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionSignal {
    /// Local session state was torn down; the user must log in again.
    Expired {
        /// Why the session ended.
        reason: ExpiryReason,
    },
}

/// Cause of a session teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpiryReason {
    /// The access token expired before the request was sent.
    TokenExpired,
    /// The token payload could not be decoded.
    MalformedToken,
    /// The server answered 401.
    Unauthorized,
    /// The server answered 403.
    Forbidden,
}

impl ExpiryReason {
    /// Map a rejected response status to a reason.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            401 => Some(Self::Unauthorized),
            403 => Some(Self::Forbidden),
            _ => None,
        }
    }
}

impl fmt::Display for ExpiryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::TokenExpired => "access token expired",
            Self::MalformedToken => "access token could not be decoded",
            Self::Unauthorized => "server rejected the credentials",
            Self::Forbidden => "server denied access",
        };
        f.write_str(text)
    }
}
