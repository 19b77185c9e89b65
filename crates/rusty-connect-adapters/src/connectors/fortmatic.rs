use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use rusty_connect_core::{ConnectError, Connector, ConnectorParams, SessionHandle};

#[derive(Debug, Clone, Copy, Default)]
pub struct FortmaticConnector;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FortmaticOptions {
    api_key: Option<String>,
}

pub async fn init() -> Result<Arc<dyn Connector>, ConnectError> {
    Ok(Arc::new(FortmaticConnector))
}

impl Connector for FortmaticConnector {
    fn id(&self) -> &str {
        "fortmatic"
    }

    fn web3_connector(&self, params: &ConnectorParams) -> Result<SessionHandle, ConnectError> {
        let options: FortmaticOptions = params.options_as("Fortmatic")?;
        let api_key = options.api_key.filter(|key| !key.is_empty()).ok_or_else(|| {
            ConnectError::config("The Fortmatic connector requires apiKey to be set.")
        })?;
        let chain_id = params.first_chain("Fortmatic")?;
        Ok(SessionHandle {
            connector_id: self.id().to_owned(),
            chain_ids: vec![chain_id],
            settings: json!({ "apiKey": api_key, "chainId": chain_id }),
            provider: None,
        })
    }
}
