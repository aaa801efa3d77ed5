use async_trait::async_trait;

use crate::{
    exception::GatewayResult,
    model::vo::{ApiRequest, ApiResponse},
};

/// # Authenticated request gateway.
///
/// Every outbound API call goes through here. Non-2xx responses come back as
/// errors; 401/403 additionally end the local session.
#[async_trait]
pub trait ApiGateway: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> GatewayResult<ApiResponse>;
}
