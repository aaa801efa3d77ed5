use async_trait::async_trait;
use mockall::mock;

use crate::{
    exception::GatewayResult,
    model::{
        entity::Session,
        vo::{ApiRequest, ApiResponse, StorageKey},
    },
    service::{ApiGateway, HttpTransport, SessionStore},
};

mock! {
    pub HttpTransport {}
    #[async_trait]
    impl HttpTransport for HttpTransport {
        async fn send(&self, request: ApiRequest) -> anyhow::Result<ApiResponse>;
    }
}

mock! {
    pub SessionStore {}
    #[async_trait]
    impl SessionStore for SessionStore {
        async fn load(&self) -> anyhow::Result<Session>;
        async fn persist(&self, session: &Session) -> anyhow::Result<()>;
        async fn remove(&self, keys: &[StorageKey]) -> anyhow::Result<()>;
    }
}

mock! {
    pub ApiGateway {}
    #[async_trait]
    impl ApiGateway for ApiGateway {
        async fn execute(&self, request: ApiRequest) -> GatewayResult<ApiResponse>;
    }
}
