//! reqwest-backed transport implementation

use super::types::{ApiRequest, ApiResponse, Method};
use super::Transport;
use crate::config::{AuthConfig, NetworkConfig};
use crate::error::{CourierError, CourierResult};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// HTTP transport backed by a shared reqwest client
pub struct HttpTransport {
    client: Client,
    network: NetworkConfig,
    auth: AuthConfig,
}

impl HttpTransport {
    /// Create a new transport
    ///
    /// The request deadline from [`NetworkConfig::timeout`] is applied to
    /// every request; an elapsed deadline surfaces as a retryable timeout
    /// error.
    pub fn new(network: NetworkConfig, auth: AuthConfig) -> CourierResult<Self> {
        let client = Client::builder()
            .timeout(network.timeout)
            .build()
            .map_err(|e| CourierError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            network,
            auth,
        })
    }

    fn apply_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            AuthConfig::None => builder,
            AuthConfig::Basic { username, password } => {
                builder.basic_auth(username, Some(password))
            }
            AuthConfig::Bearer { token } => builder.bearer_auth(token),
            AuthConfig::ApiKeyHeader { header, key } => builder.header(header, key),
            AuthConfig::ApiKeyQuery { param, key } => builder.query(&[(param, key)]),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn perform(&self, request: &ApiRequest) -> CourierResult<ApiResponse> {
        let url = self.network.join(&request.path);

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };

        for (key, value) in &self.network.headers {
            builder = builder.header(key, value);
        }
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = self.apply_auth(builder);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                CourierError::timeout(format!(
                    "request to {url} exceeded {}s",
                    self.network.timeout.as_secs()
                ))
            } else {
                CourierError::transport(format!("request to {url} failed: {e}"))
            }
        })?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| CourierError::transport(format!("failed to read response body: {e}")))?
            .to_vec();

        debug!(status, bytes = body.len(), "response received");

        Ok(ApiResponse::new(status, headers, body))
    }
}
