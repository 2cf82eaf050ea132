use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use sellpoint_core::{
    config::RemoteConfig,
    insights::{build_query, InsightSource},
    FetchError,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("could not build http client: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
}

/// Insight source backed by the knowledge-query proxy.
///
/// Requests carry no credentials; the proxy attaches the service key on its
/// side of the boundary.
#[derive(Clone, Debug)]
pub struct HttpInsightClient {
    client: Client,
    endpoint: String,
}

impl HttpInsightClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ClientBuildError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint: endpoint.into() })
    }

    pub fn from_config(config: &RemoteConfig) -> Result<Self, ClientBuildError> {
        Self::new(config.endpoint.trim(), Duration::from_secs(config.timeout_secs))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl InsightSource for HttpInsightClient {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn fetch(&self, category: &str) -> Result<Value, FetchError> {
        let query = build_query(category);

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(&QueryRequest { query: &query })
            .send()
            .await
            .map_err(|error| network_error(&error))?;

        let status = response.status();
        let body = response.text().await.map_err(|error| network_error(&error))?;

        if !status.is_success() {
            return Err(FetchError::Http { status: status.as_u16(), body });
        }

        debug!(
            event_name = "insight.remote.response",
            status = status.as_u16(),
            body_bytes = body.len(),
            "insight proxy responded"
        );

        serde_json::from_str(&body).map_err(|error| FetchError::Parse(error.to_string()))
    }
}

fn network_error(error: &reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Network(format!("request timed out: {error}"))
    } else {
        FetchError::Network(error.to_string())
    }
}
