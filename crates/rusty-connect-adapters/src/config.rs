use serde_json::{json, Map, Value};

use rusty_connect_core::ConnectorOverride;

#[derive(Debug, Clone)]
pub struct ConnectConfig {
    pub rpc_url: Option<String>,
    /// Raw chain id as configured; normalize before use.
    pub chain_id: String,
    pub supported_chain_ids: Vec<String>,
    pub connector: String,
    pub poll_interval_ms: u64,
    pub request_timeout_ms: u64,
    pub walletconnect_bridge_url: Option<String>,
    pub fortmatic_api_key: Option<String>,
    pub portis_dapp_id: Option<String>,
    pub account: Option<String>,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            chain_id: "1".to_owned(),
            supported_chain_ids: vec!["1".to_owned()],
            connector: "provided".to_owned(),
            poll_interval_ms: 4_000,
            request_timeout_ms: 15_000,
            walletconnect_bridge_url: None,
            fortmatic_api_key: None,
            portis_dapp_id: None,
            account: None,
        }
    }
}

impl ConnectConfig {
    /// Reads `RUSTY_CONNECT_*` variables; anything unset or unparsable keeps its default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(&format!("RUSTY_CONNECT_{key}"))
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();
        let chain_id = get("CHAIN_ID").unwrap_or(defaults.chain_id);
        let supported_chain_ids = get("SUPPORTED_CHAIN_IDS")
            .map(|raw| {
                raw.split(',')
                    .map(|id| id.trim().to_owned())
                    .filter(|id| !id.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| vec![chain_id.clone()]);
        Self {
            rpc_url: get("RPC_URL"),
            chain_id,
            supported_chain_ids,
            connector: get("CONNECTOR").unwrap_or(defaults.connector),
            poll_interval_ms: get("POLL_INTERVAL_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.poll_interval_ms),
            request_timeout_ms: get("REQUEST_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_ms),
            walletconnect_bridge_url: get("WALLETCONNECT_BRIDGE_URL"),
            fortmatic_api_key: get("FORTMATIC_API_KEY"),
            portis_dapp_id: get("PORTIS_DAPP_ID"),
            account: get("ACCOUNT"),
        }
    }

    /// Backend specific settings as configuration-only registry overrides.
    pub fn connector_overrides(&self) -> Vec<(String, ConnectorOverride)> {
        let mut overrides = Vec::new();

        let mut walletconnect = Map::new();
        if let Some(url) = &self.rpc_url {
            walletconnect.insert("rpcUrl".to_owned(), json!(url));
        }
        if let Some(bridge) = &self.walletconnect_bridge_url {
            walletconnect.insert("bridge".to_owned(), json!(bridge));
        }
        if !walletconnect.is_empty() {
            walletconnect.insert("pollingInterval".to_owned(), json!(self.poll_interval_ms));
            overrides.push((
                "walletconnect".to_owned(),
                ConnectorOverride::Config(Value::Object(walletconnect)),
            ));
        }
        if let Some(key) = &self.fortmatic_api_key {
            overrides.push((
                "fortmatic".to_owned(),
                ConnectorOverride::Config(json!({ "apiKey": key })),
            ));
        }
        if let Some(id) = &self.portis_dapp_id {
            overrides.push((
                "portis".to_owned(),
                ConnectorOverride::Config(json!({ "dAppId": id })),
            ));
        }
        overrides
    }
}
