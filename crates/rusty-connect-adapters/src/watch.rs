//! Pollers for live chain values.
//!
//! A failed request is logged and skipped so the loop keeps its schedule; a node that
//! blips once must not end the watch.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Address;
use serde_json::Value;

use rusty_connect_core::{account_balance, block_number, ConnectError, PollTask, Poller, Provider};

/// A poller whose failed requests arrive as `None` and are never delivered.
pub type WatchPoller<P> = Poller<P, Option<Value>, ConnectError>;

/// Polls `eth_blockNumber`, handing every answer to `on_block`.
pub fn block_poller<F>(interval: Duration, on_block: F) -> WatchPoller<Provider>
where
    F: Fn(Value) + Send + Sync + 'static,
{
    let on_block = Arc::new(on_block);
    Poller::new(
        move |provider: Provider| {
            let on_block = Arc::clone(&on_block);
            PollTask::new(
                move || {
                    let provider = provider.clone();
                    async move {
                        Ok::<_, ConnectError>(skip_failure(
                            "eth_blockNumber",
                            block_number(&provider).await,
                        ))
                    }
                },
                move |block: Option<Value>| {
                    if let Some(block) = block {
                        on_block(block);
                    }
                },
            )
        },
        interval,
    )
}

/// Polls `eth_getBalance` for an account, handing every answer to `on_balance`.
pub fn balance_poller<F>(interval: Duration, on_balance: F) -> WatchPoller<(Provider, Address)>
where
    F: Fn(Address, Value) + Send + Sync + 'static,
{
    let on_balance = Arc::new(on_balance);
    Poller::new(
        move |(provider, account): (Provider, Address)| {
            let on_balance = Arc::clone(&on_balance);
            PollTask::new(
                move || {
                    let provider = provider.clone();
                    async move {
                        Ok::<_, ConnectError>(skip_failure(
                            "eth_getBalance",
                            account_balance(&provider, account).await,
                        ))
                    }
                },
                move |balance: Option<Value>| {
                    if let Some(balance) = balance {
                        on_balance(account, balance);
                    }
                },
            )
        },
        interval,
    )
}

fn skip_failure(method: &str, outcome: Result<Value, ConnectError>) -> Option<Value> {
    match outcome {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(method, error = %err, "poll request failed; retrying next interval");
            None
        }
    }
}
