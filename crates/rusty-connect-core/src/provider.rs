//! The wallet provider as seen from this crate.
//!
//! Wallets expose one of three calling conventions. Each is its own trait; a
//! [`ProviderCapabilities`] bundle collects whichever ones a wallet object offers and
//! [`Provider::detect`] picks one, once, in priority order.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::errors::ConnectError;

/// EIP-1193 `4001`: the user rejected the request.
pub const USER_REJECTED_REQUEST: i64 = 4001;

/// A provider call that was rejected, as the provider reported it.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ProviderError {
    pub code: Option<i64>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ProviderError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
            data: None,
        }
    }

    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            data: None,
        }
    }

    pub fn user_rejected() -> Self {
        Self::new(USER_REJECTED_REQUEST, "User rejected the request.")
    }

    pub fn is_user_rejection(&self) -> bool {
        self.code == Some(USER_REJECTED_REQUEST)
    }
}

/// `{method, params}` as handed to an EIP-1193 `request` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestArguments {
    pub method: String,
    pub params: Vec<String>,
}

/// Full JSON-RPC envelope sent through the legacy `sendAsync` convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonRpcPayload {
    pub method: String,
    pub params: Vec<String>,
    pub from: Option<String>,
    pub jsonrpc: String,
    pub id: u64,
}

pub type SendAsyncCallback = Box<dyn FnOnce(Result<Value, ProviderError>) + Send>;

/// EIP-1193 providers: `request({method, params})`.
#[async_trait]
pub trait RequestProvider: Send + Sync {
    async fn request(&self, args: RequestArguments) -> Result<Value, ProviderError>;
}

/// Legacy web3.js style providers: `sendAsync(payload, callback)` plus the account
/// the wallet currently has selected.
pub trait CallbackProvider: Send + Sync {
    fn send_async(&self, payload: JsonRpcPayload, callback: SendAsyncCallback);
    fn selected_address(&self) -> Option<String>;
}

/// Pre EIP-1193 providers: `send(method, params)`.
#[async_trait]
pub trait PositionalProvider: Send + Sync {
    async fn send(&self, method: &str, params: Vec<String>) -> Result<Value, ProviderError>;
}

/// Whatever calling conventions a wallet object happens to expose.
#[derive(Clone, Default)]
pub struct ProviderCapabilities {
    pub request: Option<Arc<dyn RequestProvider>>,
    pub send_async: Option<Arc<dyn CallbackProvider>>,
    pub send: Option<Arc<dyn PositionalProvider>>,
}

impl ProviderCapabilities {
    pub fn with_request(mut self, provider: Arc<dyn RequestProvider>) -> Self {
        self.request = Some(provider);
        self
    }

    pub fn with_send_async(mut self, provider: Arc<dyn CallbackProvider>) -> Self {
        self.send_async = Some(provider);
        self
    }

    pub fn with_send(mut self, provider: Arc<dyn PositionalProvider>) -> Self {
        self.send = Some(provider);
        self
    }
}

/// A provider with its calling convention already resolved.
#[derive(Clone)]
pub enum Provider {
    RequestStyle(Arc<dyn RequestProvider>),
    CallbackStyle(Arc<dyn CallbackProvider>),
    PositionalStyle(Arc<dyn PositionalProvider>),
}

impl Provider {
    /// Picks the first usable convention: `request`, then `sendAsync` (only while an
    /// account is selected), then `send`.
    pub fn detect(capabilities: ProviderCapabilities) -> Result<Self, ConnectError> {
        let ProviderCapabilities {
            request,
            send_async,
            send,
        } = capabilities;
        if let Some(p) = request {
            return Ok(Self::RequestStyle(p));
        }
        if let Some(p) = send_async.filter(|p| p.selected_address().is_some()) {
            return Ok(Self::CallbackStyle(p));
        }
        if let Some(p) = send {
            return Ok(Self::PositionalStyle(p));
        }
        Err(ConnectError::ProviderIncompatible)
    }

    pub fn style(&self) -> &'static str {
        match self {
            Self::RequestStyle(_) => "request",
            Self::CallbackStyle(_) => "sendAsync",
            Self::PositionalStyle(_) => "send",
        }
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Provider").field(&self.style()).finish()
    }
}

impl From<Arc<dyn RequestProvider>> for Provider {
    fn from(provider: Arc<dyn RequestProvider>) -> Self {
        Self::RequestStyle(provider)
    }
}
