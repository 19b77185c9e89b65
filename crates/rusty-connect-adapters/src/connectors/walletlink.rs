use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use rusty_connect_core::{ConnectError, Connector, ConnectorParams, SessionHandle};

/// Coinbase WalletLink. Mainnet only.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalletLinkConnector;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WalletLinkOptions {
    url: Option<String>,
    app_name: Option<String>,
    app_logo_url: Option<String>,
}

pub async fn init() -> Result<Arc<dyn Connector>, ConnectError> {
    Ok(Arc::new(WalletLinkConnector))
}

impl Connector for WalletLinkConnector {
    fn id(&self) -> &str {
        "walletlink"
    }

    fn web3_connector(&self, params: &ConnectorParams) -> Result<SessionHandle, ConnectError> {
        let options: WalletLinkOptions = params.options_as("WalletLink")?;
        if params.supported_chains.first() != Some(&1) {
            return Err(ConnectError::config(
                "The WalletLink connector requires chainId to be 1.",
            ));
        }
        let url = options.url.unwrap_or_default();
        if !super::is_http_url(&url) {
            return Err(ConnectError::config(
                "The WalletLink connector requires url to be an HTTP URL.",
            ));
        }
        Ok(SessionHandle {
            connector_id: self.id().to_owned(),
            chain_ids: vec![1],
            settings: json!({
                "url": url,
                "appName": options.app_name,
                "appLogoUrl": options.app_logo_url,
            }),
            provider: None,
        })
    }
}
