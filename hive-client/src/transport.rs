use async_trait::async_trait;
use reqwest::{header, redirect, Client};
use rewarder_core::CoreError;
use std::time::Duration;
use tracing::debug;

/// Raw HTTP answer from one endpoint.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// POSTs a JSON body to `url`. Connection-level failures are returned as
    /// errors; any HTTP status is a successful transport round trip.
    async fn post_json(&self, url: &str, body: String) -> Result<TransportResponse, CoreError>;
}

/// Production transport backed by one reusable `reqwest` session.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: Client,
}

impl HttpTransport {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, CoreError> {
        let http_client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, body: String) -> Result<TransportResponse, CoreError> {
        let response = self
            .http_client
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!("POST {} -> {} ({} bytes)", url, status, body.len());

        Ok(TransportResponse { status, body })
    }
}
