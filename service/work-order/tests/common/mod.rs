#![allow(dead_code)]

use std::{sync::Mutex, time::Duration};

use async_trait::async_trait;
use domain_session::{
    exception::GatewayResult,
    model::vo::{ApiRequest, ApiResponse, HttpMethod},
    service::ApiGateway,
};
use serde_json::json;

type Handler = dyn Fn(usize, &ApiRequest) -> (Duration, GatewayResult<ApiResponse>) + Send + Sync;

/// Scripted gateway that records every request it sees.
pub struct FakeGateway {
    calls: Mutex<Vec<ApiRequest>>,
    handler: Box<Handler>,
}

impl FakeGateway {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(usize, &ApiRequest) -> (Duration, GatewayResult<ApiResponse>) + Send + Sync + 'static,
    {
        Self {
            calls: Mutex::new(Vec::new()),
            handler: Box::new(handler),
        }
    }

    /// Answers list reads with one page of the given ids and everything else with `{}`.
    pub fn listing(ids: &'static [&'static str], latency: Duration) -> Self {
        Self::new(move |_, request| {
            let response = match (request.method, request.path.as_str()) {
                (HttpMethod::Get, "/work-orders") => page(ids, 1),
                _ => ApiResponse::json(200, &json!({})),
            };
            (latency, Ok(response))
        })
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, method: HttpMethod, path: &str) -> usize {
        self.calls()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

#[async_trait]
impl ApiGateway for FakeGateway {
    async fn execute(&self, request: ApiRequest) -> GatewayResult<ApiResponse> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(request.clone());
            calls.len()
        };
        let (latency, response) = (self.handler)(index, &request);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        response
    }
}

pub fn work_order(id: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "workOrderNumber": format!("WO-{id}"),
        "visitInstDate": "2024-02-01T00:00:00.000Z",
        "description": "Quarterly maintenance visit",
        "workOrderStatus": "Pending",
    })
}

pub fn page(ids: &[&str], total_pages: u32) -> ApiResponse {
    let data: Vec<_> = ids.iter().map(|id| work_order(id)).collect();
    ApiResponse::json(
        200,
        &json!({
            "data": data,
            "pagination": { "page": 1, "limit": 10, "total": ids.len(), "totalPages": total_pages },
        }),
    )
}
