use std::sync::Arc;

use serde_json::json;

use rusty_connect_core::{
    ConnectError, Connector, ConnectorParams, ProviderError, SessionHandle,
};

/// Wraps a provider the dApp already holds.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProvidedConnector;

pub async fn init() -> Result<Arc<dyn Connector>, ConnectError> {
    Ok(Arc::new(ProvidedConnector))
}

impl Connector for ProvidedConnector {
    fn id(&self) -> &str {
        "provided"
    }

    fn web3_connector(&self, params: &ConnectorParams) -> Result<SessionHandle, ConnectError> {
        let provider = params.provider.clone().ok_or_else(|| {
            ConnectError::config("The provided connector requires a provider to be set.")
        })?;
        Ok(SessionHandle {
            connector_id: self.id().to_owned(),
            chain_ids: params.supported_chains.clone(),
            settings: json!({ "supportedChainIds": params.supported_chains }),
            provider: Some(provider),
        })
    }

    fn handle_activation_error(&self, err: &ProviderError) -> Option<ConnectError> {
        super::rejected_by_user(err)
    }
}
