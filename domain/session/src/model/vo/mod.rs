mod bearer;
mod request;
mod storage_key;

#[rustfmt::skip]
pub use {
    bearer::{Bearer, JwtPayload, CLOCK_SKEW_SECS},
    request::{ApiRequest, ApiResponse, HttpMethod, ResponseKind, LOGOUT_PATH},
    storage_key::{LocalKey, SessionCookie, StorageKey, PERSISTED_STATE_KEY},
};
