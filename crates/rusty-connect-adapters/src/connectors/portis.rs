use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use rusty_connect_core::{ConnectError, Connector, ConnectorParams, SessionHandle};

/// Portis hosted wallet.
#[derive(Debug, Clone, Copy, Default)]
pub struct PortisConnector;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PortisOptions {
    d_app_id: Option<String>,
}

pub async fn init() -> Result<Arc<dyn Connector>, ConnectError> {
    Ok(Arc::new(PortisConnector))
}

impl Connector for PortisConnector {
    fn id(&self) -> &str {
        "portis"
    }

    fn web3_connector(&self, params: &ConnectorParams) -> Result<SessionHandle, ConnectError> {
        let options: PortisOptions = params.options_as("Portis")?;
        let d_app_id = options
            .d_app_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ConnectError::config("The Portis connector requires dAppId to be set."))?;
        params.first_chain("Portis")?;
        Ok(SessionHandle {
            connector_id: self.id().to_owned(),
            chain_ids: params.supported_chains.clone(),
            settings: json!({ "dAppId": d_app_id, "networks": params.supported_chains }),
            provider: None,
        })
    }
}
