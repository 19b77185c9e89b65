#![allow(dead_code)]

use std::io::Read;
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::{json, Value};
use tiny_http::{Response, Server, StatusCode};

/// Bodies of every JSON-RPC request the mock node received.
pub type CallLog = Arc<Mutex<Vec<Value>>>;

/// A JSON-RPC node answering a handful of methods. The block number advances on
/// every `eth_blockNumber` call.
pub fn spawn_mock_node(calls: CallLog, max_requests: usize) -> String {
    spawn_flaky_node(calls, max_requests, &[])
}

/// Like [`spawn_mock_node`], but the `eth_blockNumber` calls whose zero-based positions
/// are listed in `failing_block_calls` get a bare HTTP 500 instead.
pub fn spawn_flaky_node(calls: CallLog, max_requests: usize, failing_block_calls: &[usize]) -> String {
    let failing = failing_block_calls.to_vec();
    let server = Server::http("127.0.0.1:0").expect("start server");
    let addr = format!("http://{}", server.server_addr());

    thread::spawn(move || {
        let mut block = 0x10u64;
        let mut block_calls = 0usize;
        for _ in 0..max_requests {
            let mut req = match server.recv() {
                Ok(r) => r,
                Err(_) => break,
            };
            let mut body = String::new();
            if req.as_reader().read_to_string(&mut body).is_err() {
                continue;
            }
            let payload: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
            if let Ok(mut g) = calls.lock() {
                g.push(payload.clone());
            }
            let id = payload.get("id").cloned().unwrap_or(Value::Null);

            let (code, answer) = match payload.get("method").and_then(Value::as_str) {
                Some("eth_blockNumber") if failing.contains(&block_calls) => {
                    block_calls += 1;
                    (500, json!({"error": "internal error"}))
                }
                Some("eth_blockNumber") => {
                    block_calls += 1;
                    let n = block;
                    block += 1;
                    (200, json!({"jsonrpc": "2.0", "id": id, "result": format!("0x{n:x}")}))
                }
                Some("eth_chainId") => (200, json!({"jsonrpc": "2.0", "id": id, "result": "0x89"})),
                Some("eth_getBalance") => (
                    200,
                    json!({"jsonrpc": "2.0", "id": id, "result": "0xde0b6b3a7640000"}),
                ),
                Some("eth_getCode") => {
                    let code = if payload["params"][0]
                        .as_str()
                        .unwrap_or_default()
                        .to_ascii_lowercase()
                        .ends_with("cafe")
                    {
                        "0x6080604052"
                    } else {
                        "0x"
                    };
                    (200, json!({"jsonrpc": "2.0", "id": id, "result": code}))
                }
                Some("eth_fail") => (
                    200,
                    json!({"jsonrpc": "2.0", "id": id, "error": {"code": -32000, "message": "execution reverted"}}),
                ),
                Some("eth_down") => (503, json!({"error": "maintenance"})),
                _ => (
                    200,
                    json!({"jsonrpc": "2.0", "id": id, "error": {"code": -32601, "message": "method not found"}}),
                ),
            };

            let response =
                Response::from_string(answer.to_string()).with_status_code(StatusCode(code));
            let _ = req.respond(response);
        }
    });

    addr
}
