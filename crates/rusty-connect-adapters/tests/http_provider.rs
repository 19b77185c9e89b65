mod common;

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Address;
use serde_json::json;
use tokio::sync::mpsc;

use rusty_connect_adapters::{block_poller, HttpProvider};
use rusty_connect_core::{
    account_balance, account_is_contract, block_number, ethereum_request, normalize_json_chain_id,
    ConnectError, PollTask, Poller, Provider,
};

use common::{spawn_flaky_node, spawn_mock_node, CallLog};

fn provider(calls: &CallLog, max_requests: usize) -> Provider {
    let url = spawn_mock_node(Arc::clone(calls), max_requests);
    HttpProvider::new(url, Duration::from_secs(5))
        .expect("http provider")
        .into_provider()
}

#[tokio::test]
async fn block_number_goes_through_the_shim() {
    let calls: CallLog = Arc::default();
    let provider = provider(&calls, 4);

    let value = block_number(&provider).await.expect("block number");
    assert_eq!(value, json!("0x10"));

    let chain = ethereum_request(&provider, "eth_chainId", vec![])
        .await
        .expect("chain id");
    assert_eq!(normalize_json_chain_id(&chain).expect("normalize"), 137);

    let calls = calls.lock().expect("calls");
    assert_eq!(calls[0]["method"], "eth_blockNumber");
    assert_eq!(calls[0]["params"], json!([]));
    assert_eq!(calls[0]["jsonrpc"], "2.0");
    assert_ne!(calls[0]["id"], calls[1]["id"]);
}

#[tokio::test]
async fn envelope_errors_surface_their_message() {
    let calls: CallLog = Arc::default();
    let provider = provider(&calls, 2);

    let err = ethereum_request(&provider, "eth_fail", vec![])
        .await
        .expect_err("envelope error");
    assert!(matches!(err, ConnectError::Rpc(ref m) if m == "execution reverted"));
}

#[tokio::test]
async fn http_failures_are_provider_errors() {
    let calls: CallLog = Arc::default();
    let provider = provider(&calls, 2);

    let err = ethereum_request(&provider, "eth_down", vec![])
        .await
        .expect_err("status error");
    let raw = err.provider_error().expect("raw provider error");
    assert!(raw.message.contains("503"));
    assert!(raw.code.is_none());
}

#[tokio::test]
async fn balance_and_contract_detection() {
    let calls: CallLog = Arc::default();
    let provider = provider(&calls, 4);
    let wallet: Address = "0x1000000000000000000000000000000000000001"
        .parse()
        .expect("wallet");
    let contract: Address = "0x000000000000000000000000000000000000CAFE"
        .parse()
        .expect("contract");

    let balance = account_balance(&provider, wallet).await.expect("balance");
    assert_eq!(balance, json!("0xde0b6b3a7640000"));
    assert!(!account_is_contract(&provider, wallet).await);
    assert!(account_is_contract(&provider, contract).await);
}

#[tokio::test]
async fn unreachable_node_is_not_a_contract() {
    let provider = HttpProvider::new("http://127.0.0.1:9", Duration::from_millis(500))
        .expect("http provider")
        .into_provider();
    let account: Address = "0x000000000000000000000000000000000000CAFE"
        .parse()
        .expect("account");
    assert!(!account_is_contract(&provider, account).await);
}

#[tokio::test]
async fn polling_block_number_over_http() {
    let calls: CallLog = Arc::default();
    let provider = provider(&calls, 16);

    let poller = Poller::new(
        |(provider, tx): (Provider, mpsc::UnboundedSender<String>)| {
            PollTask::new(
                move || {
                    let provider = provider.clone();
                    async move { block_number(&provider).await }
                },
                move |value: serde_json::Value| {
                    let _ = tx.send(value.as_str().unwrap_or_default().to_owned());
                },
            )
        },
        Duration::from_millis(10),
    );

    let (tx, mut rx) = mpsc::unbounded_channel();
    let controller = poller.start((provider, tx));
    let mut seen = Vec::new();
    while seen.len() < 3 {
        seen.push(rx.recv().await.expect("poll result"));
    }
    controller.stop();
    controller.finished().await.expect("clean stop");

    assert_eq!(seen, vec!["0x10", "0x11", "0x12"]);
    assert!(controller_stopped_cleanly(&calls));
}

fn controller_stopped_cleanly(calls: &CallLog) -> bool {
    // Exactly one request may have been in flight when stop() ran.
    let n = calls.lock().expect("calls").len();
    (3..=4).contains(&n)
}

#[tokio::test]
async fn block_watch_survives_a_failed_request() {
    let calls: CallLog = Arc::default();
    let url = spawn_flaky_node(Arc::clone(&calls), 16, &[1]);
    let provider = HttpProvider::new(url, Duration::from_secs(5))
        .expect("http provider")
        .into_provider();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let poller = block_poller(Duration::from_millis(10), move |block| {
        let _ = tx.send(block.as_str().unwrap_or_default().to_owned());
    });
    let controller = poller.start(provider);

    let mut seen = Vec::new();
    while seen.len() < 3 {
        seen.push(rx.recv().await.expect("block after the 500"));
    }
    controller.stop();
    controller.finished().await.expect("the 500 does not end the loop");

    // The second request hit the 500; polling carried on with the next block.
    assert_eq!(seen, vec!["0x10", "0x11", "0x12"]);
    assert!(calls.lock().expect("calls").len() >= 4);
}
