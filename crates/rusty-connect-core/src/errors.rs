use thiserror::Error;

use crate::chain::network_name;
use crate::provider::ProviderError;

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("{}", chain_unsupported_message(.chain_id, .supported))]
    ChainUnsupported {
        /// `None` when the wallet did not report a usable chain at all.
        chain_id: Option<u64>,
        supported: Vec<u64>,
    },
    #[error("Unsupported connector: {0}.")]
    ConnectorUnsupported(String),
    #[error("The activation has been rejected by the provider.")]
    ConnectionRejected,
    #[error("{0}")]
    ConnectorConfig(String),
    #[error("chainId {0} is not an integer")]
    InvalidChainId(String),
    #[error("The Ethereum provider doesn't seem to provide a request method.")]
    ProviderIncompatible,
    #[error("{0}")]
    Rpc(String),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("transport error: {0}")]
    Transport(String),
    /// A thread panicked while holding the named piece of shared state.
    #[error("{0} lock poisoned")]
    LockPoisoned(&'static str),
}

impl ConnectError {
    pub fn config(detail: impl Into<String>) -> Self {
        Self::ConnectorConfig(detail.into())
    }

    /// The raw provider error, when this failure came straight from a provider call.
    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            Self::Provider(err) => Some(err),
            _ => None,
        }
    }
}

fn chain_unsupported_message(chain_id: &Option<u64>, supported: &[u64]) -> String {
    let requested = match *chain_id {
        Some(id) => format!("{} (Chain ID: {id})", network_name(id)),
        None => "Unknown".to_owned(),
    };
    let supported = supported
        .iter()
        .map(|id| format!("({}, ID: {id})", network_name(*id)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("Unsupported chain: {requested}. Supported chains: {supported}.")
}
