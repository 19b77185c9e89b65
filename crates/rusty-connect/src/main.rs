//! rusty-connect: resolve a wallet connector and watch live chain values through it.

use std::time::Duration;

use alloy::primitives::Address;
use eyre::WrapErr;

use rusty_connect_adapters::{
    balance_poller, block_poller, get_connectors, optional_connectors, ConnectConfig, HttpProvider,
};
use rusty_connect_core::{
    account_is_contract, ensure_supported_chain, ethereum_request, normalize_chain_id,
    normalize_json_chain_id, ConnectError, ConnectorParams, ConnectorRegistry,
};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting rusty-connect");

    let config = ConnectConfig::from_env();
    let chain_id = normalize_chain_id(config.chain_id.as_str())?;
    let supported = config
        .supported_chain_ids
        .iter()
        .map(|id| normalize_chain_id(id.as_str()))
        .collect::<Result<Vec<_>, _>>()?;
    ensure_supported_chain(chain_id, &supported)?;

    let provider = HttpProvider::with_config(&config)?.into_provider();

    let mut overrides = optional_connectors();
    overrides.extend(config.connector_overrides());
    let registry = ConnectorRegistry::new(get_connectors(overrides));
    let (connector, connector_config) = registry.resolve(&config.connector).await?;
    let params = ConnectorParams::new(supported.clone())
        .with_config(connector_config.as_ref())
        .with_provider(provider.clone());
    let session = connector.web3_connector(&params)?;
    tracing::info!(
        connector = %session.connector_id,
        settings = %session.settings,
        "connector ready"
    );

    let remote = ethereum_request(&provider, "eth_chainId", Vec::new())
        .await
        .wrap_err("failed to query eth_chainId")?;
    let remote_chain = normalize_json_chain_id(&remote)?;
    if remote_chain != chain_id {
        return Err(ConnectError::ChainUnsupported {
            chain_id: Some(remote_chain),
            supported,
        }
        .into());
    }

    let interval = Duration::from_millis(config.poll_interval_ms);
    let blocks = block_poller(interval, |block| tracing::info!(%block, "block number"));
    let mut controllers = vec![blocks.start(provider.clone())];

    if let Some(raw) = &config.account {
        let account: Address = raw
            .parse()
            .wrap_err_with(|| format!("invalid RUSTY_CONNECT_ACCOUNT: {raw}"))?;
        let is_contract = account_is_contract(&provider, account).await;
        tracing::info!(%account, is_contract, "watching account");
        let balances = balance_poller(interval, |account, balance| {
            tracing::info!(%account, %balance, "balance");
        });
        controllers.push(balances.start((provider.clone(), account)));
    }

    tokio::signal::ctrl_c()
        .await
        .wrap_err("failed to listen for ctrl-c")?;
    tracing::info!("Shutting down");

    for controller in &controllers {
        controller.stop();
    }
    for controller in controllers {
        if let Err(err) = controller.finished().await {
            tracing::warn!(error = %err, "poller ended with an error");
        }
    }
    Ok(())
}
