use std::sync::Arc;

use async_trait::async_trait;
use domain_session::{
    exception::{GatewayException, GatewayResult},
    model::vo::{ApiRequest, ApiResponse},
    service::{ApiGateway, Clock, HttpTransport, SystemClock},
};
use infrastructure_command::ExpiryReason;
use typed_builder::TypedBuilder;
use uuid::Uuid;

use crate::SessionContext;

#[derive(TypedBuilder)]
pub struct AuthGatewayImpl {
    transport: Arc<dyn HttpTransport>,
    session: Arc<SessionContext>,
    #[builder(default = Arc::new(SystemClock) as Arc<dyn Clock>)]
    clock: Arc<dyn Clock>,
}

#[async_trait]
impl ApiGateway for AuthGatewayImpl {
    #[tracing::instrument(name = "api", skip_all, fields(request = %request))]
    async fn execute(&self, request: ApiRequest) -> GatewayResult<ApiResponse> {
        let mut request = request.with_header("x-request-id", Uuid::new_v4().to_string());

        if let Some(bearer) = self.session.bearer().await {
            let expired = match bearer.payload() {
                Ok(payload) => payload
                    .is_expired_at(self.clock.now())
                    .then_some(ExpiryReason::TokenExpired),
                Err(e) => {
                    tracing::warn!("Access token payload is unreadable: {e}");
                    Some(ExpiryReason::MalformedToken)
                }
            };
            if let Some(reason) = expired {
                self.session.expire(reason).await;
                return Err(GatewayException::Unauthorized {
                    status: 401,
                    reason,
                });
            }
            request = request.with_header("Authorization", bearer.as_str());
        }

        let is_logout = request.is_logout();
        let response = self.transport.send(request).await.map_err(|e| {
            tracing::error!("Transport failure: {e:#}");
            GatewayException::Connection {
                message: format!("{e:#}"),
            }
        })?;
        tracing::debug!(status = response.status, "Response received");

        if response.is_success() {
            return Ok(response);
        }
        if !is_logout {
            if let Some(reason) = ExpiryReason::from_status(response.status) {
                self.session.expire(reason).await;
                return Err(GatewayException::Unauthorized {
                    status: response.status,
                    reason,
                });
            }
        }
        Err(GatewayException::Status {
            status: response.status,
            message: response.error_message(),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use domain_session::{
        mock::{MockHttpTransport, MockSessionStore},
        model::{entity::Session, vo::LOGOUT_PATH},
        service::FixedClock,
    };
    use infrastructure_command::SessionSignal;

    use super::*;

    const NOW: i64 = 1_760_000_000;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(NOW, 0).unwrap()
    }

    fn token_expiring_at(exp: i64) -> String {
        format!("h.{}.s", base64_url::encode(&format!(r#"{{"sub":"1","exp":{exp}}}"#)))
    }

    fn permissive_store() -> MockSessionStore {
        let mut store = MockSessionStore::new();
        store.expect_persist().returning(|_| Ok(()));
        store.expect_remove().returning(|_| Ok(()));
        store
    }

    async fn gateway(
        transport: MockHttpTransport,
        store: MockSessionStore,
        token: Option<String>,
    ) -> (AuthGatewayImpl, Arc<SessionContext>, flume::Receiver<SessionSignal>) {
        let (tx, rx) = flume::unbounded();
        let session = Arc::new(
            SessionContext::builder()
                .store(Arc::new(store))
                .signal_sender(tx)
                .build(),
        );
        if let Some(token) = token {
            session.login(Session::new(token)).await.unwrap();
        }
        let gateway = AuthGatewayImpl::builder()
            .transport(Arc::new(transport))
            .session(session.clone())
            .clock(Arc::new(FixedClock(now())))
            .build();
        (gateway, session, rx)
    }

    #[tokio::test]
    async fn expired_token_short_circuits_without_network() {
        let mut transport = MockHttpTransport::new();
        transport.expect_send().never();
        let (gateway, session, rx) =
            gateway(transport, permissive_store(), Some(token_expiring_at(NOW - 1))).await;

        let result = gateway.execute(ApiRequest::get("/work-orders")).await;

        assert_eq!(
            result,
            Err(GatewayException::Unauthorized {
                status: 401,
                reason: ExpiryReason::TokenExpired
            })
        );
        assert!(!session.is_active().await);
        assert!(matches!(rx.try_recv(), Ok(SessionSignal::Expired { .. })));
    }

    #[tokio::test]
    async fn valid_token_is_attached() {
        let token = token_expiring_at(NOW + 60);
        let expected = format!("Bearer {token}");
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(move |req| req.headers.get("Authorization") == Some(&expected))
            .times(1)
            .returning(|_| Ok(ApiResponse::new(200, "[]")));
        let (gateway, session, rx) = gateway(transport, permissive_store(), Some(token)).await;

        let response = gateway.execute(ApiRequest::get("/work-orders")).await.unwrap();

        assert_eq!(response.status, 200);
        assert!(session.is_active().await);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn anonymous_requests_are_forwarded_untouched() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|req| !req.headers.contains_key("Authorization"))
            .times(1)
            .returning(|_| Ok(ApiResponse::new(200, "{}")));
        let (gateway, _, _) = gateway(transport, permissive_store(), None).await;
        assert!(gateway.execute(ApiRequest::get("/work-orders/stats/overview")).await.is_ok());
    }

    #[tokio::test]
    async fn token_without_expiry_is_forwarded() {
        let token = format!("h.{}.s", base64_url::encode(r#"{"sub":"1","username":"dana"}"#));
        let expected = format!("Bearer {token}");
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(move |req| req.headers.get("Authorization") == Some(&expected))
            .times(1)
            .returning(|_| Ok(ApiResponse::new(200, "[]")));
        let mut store = MockSessionStore::new();
        store.expect_persist().returning(|_| Ok(()));
        store.expect_remove().never();
        let (gateway, session, rx) = gateway(transport, store, Some(token)).await;

        assert!(gateway.execute(ApiRequest::get("/work-orders")).await.is_ok());
        assert!(session.is_active().await);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn unauthorized_response_clears_session() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Ok(ApiResponse::new(401, "")));
        let (gateway, session, rx) =
            gateway(transport, permissive_store(), Some(token_expiring_at(NOW + 3600))).await;

        let result = gateway.execute(ApiRequest::get("/work-orders/stats/overview")).await;

        assert_eq!(
            result,
            Err(GatewayException::Unauthorized {
                status: 401,
                reason: ExpiryReason::Unauthorized
            })
        );
        assert!(!session.is_active().await);
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionSignal::Expired {
                reason: ExpiryReason::Unauthorized
            }
        );
    }

    #[tokio::test]
    async fn forbidden_response_clears_session() {
        let mut transport = MockHttpTransport::new();
        transport.expect_send().returning(|_| Ok(ApiResponse::new(403, "")));
        let (gateway, session, rx) =
            gateway(transport, permissive_store(), Some(token_expiring_at(NOW + 3600))).await;

        let result = gateway.execute(ApiRequest::delete("/work-orders/1")).await;

        assert!(matches!(
            result,
            Err(GatewayException::Unauthorized { status: 403, .. })
        ));
        assert!(!session.is_active().await);
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionSignal::Expired {
                reason: ExpiryReason::Forbidden
            }
        );
    }

    #[tokio::test]
    async fn unauthorized_logout_does_not_expire() {
        let mut transport = MockHttpTransport::new();
        transport.expect_send().returning(|_| Ok(ApiResponse::new(401, "")));
        let mut store = MockSessionStore::new();
        store.expect_persist().returning(|_| Ok(()));
        store.expect_remove().never();
        let (gateway, session, rx) =
            gateway(transport, store, Some(token_expiring_at(NOW + 3600))).await;

        let result = gateway.execute(ApiRequest::post(LOGOUT_PATH)).await;

        assert!(matches!(result, Err(GatewayException::Status { status: 401, .. })));
        assert!(session.is_active().await);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn server_errors_carry_message() {
        let mut transport = MockHttpTransport::new();
        transport.expect_send().returning(|_| {
            Ok(ApiResponse::json(
                409,
                &serde_json::json!({ "message": "Work order number already exists" }),
            ))
        });
        let (gateway, _, _) = gateway(transport, permissive_store(), None).await;
        let result = gateway.execute(ApiRequest::post("/work-orders")).await;
        assert_eq!(
            result,
            Err(GatewayException::Status {
                status: 409,
                message: "Work order number already exists".into()
            })
        );
    }

    #[tokio::test]
    async fn transport_failure_is_connection_error() {
        let mut transport = MockHttpTransport::new();
        transport.expect_send().returning(|_| Err(anyhow::anyhow!("connection refused")));
        let (gateway, _, _) = gateway(transport, permissive_store(), None).await;
        let result = gateway.execute(ApiRequest::get("/work-orders")).await;
        assert!(matches!(result, Err(GatewayException::Connection { .. })));
    }
}
