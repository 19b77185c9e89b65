//! One request/response contract over every provider calling convention.

use alloy::primitives::Address;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::errors::ConnectError;
use crate::provider::{JsonRpcPayload, Provider, ProviderError, RequestArguments};

/// Issues `method` with `params` through whichever convention `provider` speaks and
/// unwraps the answer with [`rpc_result`]. `Value::Null` stands for "no value".
///
/// No retries and no timeout: both belong to the caller or the provider itself.
pub async fn ethereum_request(
    provider: &Provider,
    method: &str,
    params: Vec<String>,
) -> Result<Value, ConnectError> {
    tracing::trace!(method, style = provider.style(), "provider request");
    let raw = match provider {
        Provider::RequestStyle(p) => {
            p.request(RequestArguments {
                method: method.to_owned(),
                params,
            })
            .await?
        }
        Provider::CallbackStyle(p) => {
            let payload = JsonRpcPayload {
                method: method.to_owned(),
                params,
                from: p.selected_address(),
                jsonrpc: "2.0".to_owned(),
                id: 0,
            };
            let (tx, rx) = oneshot::channel();
            p.send_async(
                payload,
                Box::new(move |outcome| {
                    let _ = tx.send(outcome);
                }),
            );
            rx.await.map_err(|_| {
                ProviderError::from_message("sendAsync callback dropped without a response")
            })??
        }
        Provider::PositionalStyle(p) => p.send(method, params).await?,
    };
    rpc_result(raw)
}

/// Some providers wrap answers in a JSON-RPC envelope, some don't. An envelope is any
/// object carrying a `jsonrpc` key; its `error` wins over its `result`.
pub fn rpc_result(response: Value) -> Result<Value, ConnectError> {
    let Value::Object(mut envelope) = response else {
        return Ok(truthy_or_null(response));
    };
    if !envelope.contains_key("jsonrpc") {
        return Ok(truthy_or_null(Value::Object(envelope)));
    }
    if let Some(error) = envelope.get("error").filter(|e| is_truthy(e)) {
        return Err(ConnectError::Rpc(error_message(error)));
    }
    Ok(envelope
        .remove("result")
        .map(truthy_or_null)
        .unwrap_or(Value::Null))
}

/// `true` unless `eth_getCode` comes back as `"0x"`. Any failure counts as "not a
/// contract", which also covers networks that are merely unreachable.
pub async fn account_is_contract(provider: &Provider, account: Address) -> bool {
    match ethereum_request(provider, "eth_getCode", vec![account.to_string()]).await {
        Ok(code) => code.as_str() != Some("0x"),
        Err(err) => {
            tracing::debug!(%account, error = %err, "eth_getCode failed; assuming not a contract");
            false
        }
    }
}

pub async fn account_balance(provider: &Provider, account: Address) -> Result<Value, ConnectError> {
    ethereum_request(
        provider,
        "eth_getBalance",
        vec![account.to_string(), "latest".to_owned()],
    )
    .await
}

pub async fn block_number(provider: &Provider) -> Result<Value, ConnectError> {
    ethereum_request(provider, "eth_blockNumber", Vec::new()).await
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn truthy_or_null(value: Value) -> Value {
    if is_truthy(&value) {
        value
    } else {
        Value::Null
    }
}

fn error_message(error: &Value) -> String {
    match error {
        Value::String(s) => s.clone(),
        Value::Object(obj) => match obj.get("message").and_then(Value::as_str) {
            Some(message) => message.to_owned(),
            None => error.to_string(),
        },
        other => other.to_string(),
    }
}
