use std::sync::Arc;

use serde_json::json;

use rusty_connect_core::{
    ConnectError, Connector, ConnectorParams, ProviderError, SessionHandle,
};

/// The Frame desktop wallet.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameConnector;

pub async fn init() -> Result<Arc<dyn Connector>, ConnectError> {
    Ok(Arc::new(FrameConnector))
}

impl Connector for FrameConnector {
    fn id(&self) -> &str {
        "frame"
    }

    fn web3_connector(&self, params: &ConnectorParams) -> Result<SessionHandle, ConnectError> {
        Ok(SessionHandle {
            connector_id: self.id().to_owned(),
            chain_ids: params.supported_chains.clone(),
            settings: json!({ "supportedChainIds": params.supported_chains }),
            provider: None,
        })
    }

    fn handle_activation_error(&self, err: &ProviderError) -> Option<ConnectError> {
        super::rejected_by_user(err)
    }
}
