use std::{collections::BTreeMap, time::Duration};

use anyhow::Context;
use async_trait::async_trait;
use domain_session::{
    model::vo::{ApiRequest, ApiResponse, HttpMethod, ResponseKind},
    service::HttpTransport,
};
use reqwest::{header::ACCEPT, Client, Method};
use url::Url;

/// `HttpTransport` over a shared reqwest client.
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
}

impl ReqwestTransport {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> anyhow::Result<Self> {
        // without the trailing slash `join` would replace the last segment
        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)
        } else {
            Url::parse(&format!("{base_url}/"))
        }
        .with_context(|| format!("invalid API base URL: {base_url}"))?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    fn url(&self, path: &str) -> anyhow::Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> anyhow::Result<ApiResponse> {
        let url = self.url(&request.path)?;
        let accept = match request.response_kind {
            ResponseKind::Json => "application/json",
            ResponseKind::Binary => "*/*",
        };
        let mut builder = self
            .client
            .request(method(request.method), url)
            .header(ACCEPT, accept);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_owned(), value.to_owned()))
            })
            .collect();
        let body = response.bytes().await?.to_vec();
        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_join_under_the_base_path() {
        let transport = ReqwestTransport::new("http://localhost:5000/api", None).unwrap();
        assert_eq!(
            transport.url("/work-orders/42").unwrap().as_str(),
            "http://localhost:5000/api/work-orders/42"
        );
        let transport = ReqwestTransport::new("https://desk.example.com/api/", None).unwrap();
        assert_eq!(
            transport.url("auth/logout").unwrap().as_str(),
            "https://desk.example.com/api/auth/logout"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(ReqwestTransport::new("not a url", None).is_err());
    }
}
