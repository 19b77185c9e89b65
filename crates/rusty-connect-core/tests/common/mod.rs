#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use rusty_connect_core::{
    connector_init, CallbackProvider, ConnectError, Connector, ConnectorInit, ConnectorParams,
    JsonRpcPayload, PositionalProvider, ProviderError, RequestArguments, RequestProvider,
    SendAsyncCallback, SessionHandle,
};

/// Replays queued responses; once the queue is empty it keeps answering `fallback`.
#[derive(Debug)]
pub struct Script {
    queue: Mutex<VecDeque<Result<Value, ProviderError>>>,
    fallback: Result<Value, ProviderError>,
}

impl Script {
    pub fn always(response: Result<Value, ProviderError>) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: response,
        }
    }

    fn next(&self) -> Result<Value, ProviderError> {
        self.queue
            .lock()
            .expect("script lock")
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[derive(Debug)]
pub struct MockRequestProvider {
    pub calls: Mutex<Vec<RequestArguments>>,
    script: Script,
}

impl MockRequestProvider {
    pub fn answering(response: Result<Value, ProviderError>) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            script: Script::always(response),
        })
    }

    pub fn calls(&self) -> Vec<RequestArguments> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl RequestProvider for MockRequestProvider {
    async fn request(&self, args: RequestArguments) -> Result<Value, ProviderError> {
        self.calls.lock().expect("calls lock").push(args);
        self.script.next()
    }
}

#[derive(Debug)]
pub struct MockCallbackProvider {
    pub selected: Option<String>,
    pub payloads: Mutex<Vec<JsonRpcPayload>>,
    script: Script,
}

impl MockCallbackProvider {
    pub fn answering(
        selected: Option<&str>,
        response: Result<Value, ProviderError>,
    ) -> Arc<Self> {
        Arc::new(Self {
            selected: selected.map(str::to_owned),
            payloads: Mutex::new(Vec::new()),
            script: Script::always(response),
        })
    }

    pub fn payloads(&self) -> Vec<JsonRpcPayload> {
        self.payloads.lock().expect("payloads lock").clone()
    }
}

impl CallbackProvider for MockCallbackProvider {
    fn send_async(&self, payload: JsonRpcPayload, callback: SendAsyncCallback) {
        self.payloads.lock().expect("payloads lock").push(payload);
        callback(self.script.next());
    }

    fn selected_address(&self) -> Option<String> {
        self.selected.clone()
    }
}

#[derive(Debug)]
pub struct MockPositionalProvider {
    pub calls: Mutex<Vec<(String, Vec<String>)>>,
    script: Script,
}

impl MockPositionalProvider {
    pub fn answering(response: Result<Value, ProviderError>) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            script: Script::always(response),
        })
    }

    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl PositionalProvider for MockPositionalProvider {
    async fn send(&self, method: &str, params: Vec<String>) -> Result<Value, ProviderError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push((method.to_owned(), params));
        self.script.next()
    }
}

/// Connector that echoes its params and classifies user rejections.
#[derive(Debug)]
pub struct StubConnector {
    pub id: &'static str,
}

impl Connector for StubConnector {
    fn id(&self) -> &str {
        self.id
    }

    fn web3_connector(&self, params: &ConnectorParams) -> Result<SessionHandle, ConnectError> {
        Ok(SessionHandle {
            connector_id: self.id.to_owned(),
            chain_ids: params.supported_chains.clone(),
            settings: Value::Object(params.options.clone()),
            provider: params.provider.clone(),
        })
    }

    fn handle_activation_error(&self, err: &ProviderError) -> Option<ConnectError> {
        err.is_user_rejection()
            .then_some(ConnectError::ConnectionRejected)
    }
}

pub fn stub_init(id: &'static str) -> ConnectorInit {
    connector_init(move || async move {
        Ok(Arc::new(StubConnector { id }) as Arc<dyn Connector>)
    })
}

/// An initializer that counts how often it actually ran.
pub fn counting_init(id: &'static str, runs: Arc<Mutex<u32>>) -> ConnectorInit {
    connector_init(move || {
        let runs = Arc::clone(&runs);
        async move {
            *runs.lock().expect("runs lock") += 1;
            Ok(Arc::new(StubConnector { id }) as Arc<dyn Connector>)
        }
    })
}

pub fn builtin_stubs() -> Vec<(String, ConnectorInit)> {
    ["frame", "injected", "portis", "provided", "walletconnect"]
        .into_iter()
        .map(|id| (id.to_owned(), stub_init(id)))
        .collect()
}
