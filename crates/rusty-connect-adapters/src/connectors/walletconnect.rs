use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use rusty_connect_core::{
    ConnectError, Connector, ConnectorParams, ProviderError, SessionHandle,
};

/// QR / bridge based wallets over WalletConnect.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalletConnectConnector;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WalletConnectOptions {
    rpc_url: Option<String>,
    bridge: Option<String>,
    polling_interval: Option<u64>,
}

pub async fn init() -> Result<Arc<dyn Connector>, ConnectError> {
    Ok(Arc::new(WalletConnectConnector))
}

impl Connector for WalletConnectConnector {
    fn id(&self) -> &str {
        "walletconnect"
    }

    fn web3_connector(&self, params: &ConnectorParams) -> Result<SessionHandle, ConnectError> {
        let options: WalletConnectOptions = params.options_as("WalletConnect")?;
        let rpc_url = options.rpc_url.filter(|url| !url.is_empty()).ok_or_else(|| {
            ConnectError::config("The WalletConnect connector requires rpcUrl to be set.")
        })?;
        if !super::is_http_url(&rpc_url) {
            return Err(ConnectError::config(
                "The WalletConnect connector requires rpcUrl to be an HTTP URL.",
            ));
        }
        let chain_id = params.first_chain("WalletConnect")?;

        let mut rpc = serde_json::Map::new();
        rpc.insert(chain_id.to_string(), json!(rpc_url));
        Ok(SessionHandle {
            connector_id: self.id().to_owned(),
            chain_ids: vec![chain_id],
            settings: json!({
                "bridge": options.bridge,
                "pollingInterval": options.polling_interval,
                "qrcode": true,
                "rpc": rpc,
            }),
            provider: None,
        })
    }

    fn handle_activation_error(&self, err: &ProviderError) -> Option<ConnectError> {
        super::rejected_by_user(err)
    }
}
