//! Request entry points

use super::types::ApiClient;
use crate::error::CourierResult;
use crate::transport::{ApiRequest, ApiResponse, Method};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

impl ApiClient {
    /// Execute a request through the full cache → admit → retry path
    ///
    /// GET requests are served from cache while a live entry exists; cache
    /// hits consume neither the rate limit nor the retry budget. Responses
    /// are cached only on success.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn call(&self, request: &ApiRequest) -> CourierResult<ApiResponse> {
        self.call_with_cancel(request, None).await
    }

    /// Like [`call`](Self::call), but abortable
    ///
    /// Cancelling the token during an admission wait or a backoff sleep
    /// fails the call with `Cancelled` and performs no further retries.
    pub async fn call_with_cancel(
        &self,
        request: &ApiRequest,
        cancel: Option<&CancellationToken>,
    ) -> CourierResult<ApiResponse> {
        let ttl = self.config.resilience.cache_ttl;

        if request.method == Method::Get && !ttl.is_zero() {
            let key = request.cache_key();
            return self
                .cache
                .get_or_fetch(&key, ttl, || self.execute_with_retry(request, cancel))
                .await;
        }

        self.execute_with_retry(request, cancel).await
    }

    /// GET an endpoint
    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> CourierResult<ApiResponse> {
        let mut request = ApiRequest::get(path);
        for (key, value) in query {
            request = request.with_query(*key, *value);
        }
        self.call(&request).await
    }

    /// GET an endpoint and decode the body as JSON
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> CourierResult<T> {
        self.get(path, query).await?.json()
    }

    /// POST a JSON body to an endpoint
    pub async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> CourierResult<ApiResponse> {
        self.call(&ApiRequest::post(path, body)).await
    }
}
