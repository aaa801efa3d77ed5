use infrastructure_command::ExpiryReason;
use thiserror::Error;

pub type GatewayResult<T> = Result<T, GatewayException>;

/// Failures produced by the request gateway.
///
/// Cloneable so that one failed fetch can be handed to every caller that
/// was waiting on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayException {
    #[error("Session ended: {reason} (status {status}).")]
    Unauthorized { status: u16, reason: ExpiryReason },

    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Connection error: {message}")]
    Connection { message: String },

    #[error("Unexpected response payload: {message}")]
    Decode { message: String },

    #[error("Request body could not be encoded: {message}")]
    Encode { message: String },
}

impl GatewayException {
    /// HTTP status attached to the failure, synthetic or real.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status, .. } | Self::Status { status, .. } => Some(*status),
            Self::Connection { .. } | Self::Decode { .. } | Self::Encode { .. } => None,
        }
    }
}

impl From<serde_json::Error> for GatewayException {
    fn from(e: serde_json::Error) -> Self {
        GatewayException::Decode {
            message: e.to_string(),
        }
    }
}

pub type SessionResult<T> = Result<T, SessionException>;

#[derive(Error, Debug)]
pub enum SessionException {
    #[error("No active session, log in first.")]
    NotLoggedIn,

    #[error("The provided token is not a usable JWT: {reason}")]
    InvalidToken { reason: String },

    #[error("Session internal error: {source}")]
    InternalError {
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for SessionException {
    fn from(e: anyhow::Error) -> Self {
        SessionException::InternalError { source: e }
    }
}
