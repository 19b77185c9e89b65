use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::errors::ConnectError;
use crate::provider::{Provider, ProviderError};

/// Everything a connector needs to build its session: the chains the dApp supports,
/// the backend specific options (API keys, RPC URLs, bridge URLs, ...) and, for
/// connectors wrapping a caller supplied wallet, the provider itself.
#[derive(Debug, Clone, Default)]
pub struct ConnectorParams {
    pub supported_chains: Vec<u64>,
    pub options: Map<String, Value>,
    pub provider: Option<Provider>,
}

impl ConnectorParams {
    pub fn new(supported_chains: Vec<u64>) -> Self {
        Self {
            supported_chains,
            ..Self::default()
        }
    }

    /// Merges the fields of a registry configuration object into the options.
    /// Non-object configuration values are ignored.
    pub fn with_config(mut self, config: Option<&Value>) -> Self {
        if let Some(Value::Object(fields)) = config {
            for (key, value) in fields {
                self.options.insert(key.clone(), value.clone());
            }
        }
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn first_chain(&self, connector: &str) -> Result<u64, ConnectError> {
        self.supported_chains.first().copied().ok_or_else(|| {
            ConnectError::config(format!(
                "The {connector} connector requires at least one supported chain."
            ))
        })
    }

    /// Reads the options into a connector's own typed option struct.
    pub fn options_as<T: DeserializeOwned>(&self, connector: &str) -> Result<T, ConnectError> {
        serde_json::from_value(Value::Object(self.options.clone())).map_err(|e| {
            ConnectError::config(format!("The {connector} connector options are invalid: {e}"))
        })
    }
}

/// What a connector hands back: the constructor arguments of the backend session,
/// ready for the wallet SDK, plus the provider when the connector wraps one.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    pub connector_id: String,
    pub chain_ids: Vec<u64>,
    pub settings: Value,
    pub provider: Option<Provider>,
}

/// The contract every wallet backend adapter satisfies.
pub trait Connector: Send + Sync {
    fn id(&self) -> &str;

    fn web3_connector(&self, params: &ConnectorParams) -> Result<SessionHandle, ConnectError>;

    /// Maps a raw activation failure to a known error, or `None` when the caller
    /// should surface the raw error unchanged.
    fn handle_activation_error(&self, _err: &ProviderError) -> Option<ConnectError> {
        None
    }
}

/// Classifies `err` with `connector`'s own classifier, falling back to the raw error.
pub fn classify_activation_error(connector: &dyn Connector, err: ProviderError) -> ConnectError {
    match connector.handle_activation_error(&err) {
        Some(classified) => classified,
        None => ConnectError::Provider(err),
    }
}
