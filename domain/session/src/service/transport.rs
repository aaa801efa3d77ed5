use async_trait::async_trait;

use crate::model::vo::{ApiRequest, ApiResponse};

/// Raw HTTP. Any status code is a successful send; only I/O failures are errors.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> anyhow::Result<ApiResponse>;
}
