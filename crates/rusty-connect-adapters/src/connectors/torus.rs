use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use rusty_connect_core::{ConnectError, Connector, ConnectorParams, SessionHandle};

#[derive(Debug, Clone, Copy, Default)]
pub struct TorusConnector;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TorusOptions {
    #[serde(default)]
    init_options: Value,
    #[serde(default)]
    constructor_options: Value,
}

pub async fn init() -> Result<Arc<dyn Connector>, ConnectError> {
    Ok(Arc::new(TorusConnector))
}

impl Connector for TorusConnector {
    fn id(&self) -> &str {
        "torus"
    }

    fn web3_connector(&self, params: &ConnectorParams) -> Result<SessionHandle, ConnectError> {
        let options: TorusOptions = params.options_as("Torus")?;
        let chain_id = params.first_chain("Torus")?;
        Ok(SessionHandle {
            connector_id: self.id().to_owned(),
            chain_ids: vec![chain_id],
            settings: json!({
                "chainId": chain_id,
                "constructorOptions": options.constructor_options,
                "initOptions": options.init_options,
            }),
            provider: None,
        })
    }
}
