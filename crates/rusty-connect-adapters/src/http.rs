use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use rusty_connect_core::{ConnectError, Provider, ProviderError, RequestArguments, RequestProvider};

use crate::ConnectConfig;

/// A request-style provider backed by a plain JSON-RPC HTTP endpoint.
///
/// The response body is returned untouched; unwrapping the envelope is the shim's job.
#[derive(Debug)]
pub struct HttpProvider {
    url: String,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl HttpProvider {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ConnectError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConnectError::Transport(format!("failed to build http client: {e}")))?;
        Ok(Self {
            url: url.into(),
            client,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn with_config(config: &ConnectConfig) -> Result<Self, ConnectError> {
        let url = config
            .rpc_url
            .clone()
            .ok_or_else(|| ConnectError::config("RUSTY_CONNECT_RPC_URL is not configured."))?;
        Self::new(url, Duration::from_millis(config.request_timeout_ms))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn into_provider(self) -> Provider {
        Provider::RequestStyle(Arc::new(self))
    }
}

#[async_trait]
impl RequestProvider for HttpProvider {
    async fn request(&self, args: RequestArguments) -> Result<Value, ProviderError> {
        tracing::trace!(method = %args.method, url = %self.url, "http rpc request");
        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "id": self.next_id.fetch_add(1, Ordering::Relaxed),
            "method": args.method,
            "params": args.params,
        });
        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ProviderError::from_message(format!("rpc request failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_message(format!(
                "rpc endpoint returned status {status}: {body}"
            )));
        }
        response
            .json()
            .await
            .map_err(|e| ProviderError::from_message(format!("rpc response json decode failed: {e}")))
    }
}
