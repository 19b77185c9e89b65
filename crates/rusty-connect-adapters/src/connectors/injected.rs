use std::sync::Arc;

use serde_json::json;

use rusty_connect_core::{
    ConnectError, Connector, ConnectorParams, ProviderError, SessionHandle,
};

/// Browser-injected wallets (`window.ethereum`).
#[derive(Debug, Clone, Copy, Default)]
pub struct InjectedConnector;

pub async fn init() -> Result<Arc<dyn Connector>, ConnectError> {
    Ok(Arc::new(InjectedConnector))
}

impl Connector for InjectedConnector {
    fn id(&self) -> &str {
        "injected"
    }

    fn web3_connector(&self, params: &ConnectorParams) -> Result<SessionHandle, ConnectError> {
        Ok(SessionHandle {
            connector_id: self.id().to_owned(),
            chain_ids: params.supported_chains.clone(),
            settings: json!({ "supportedChainIds": params.supported_chains }),
            provider: params.provider.clone(),
        })
    }

    fn handle_activation_error(&self, err: &ProviderError) -> Option<ConnectError> {
        super::rejected_by_user(err)
    }
}
