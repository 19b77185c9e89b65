//! Chain id normalization.
//!
//! Wallets report chain ids as decimal strings, `0x`-prefixed hex strings or plain
//! numbers. Everything funnels through [`normalize_chain_id`] so that the same logical
//! chain always compares equal.

use serde_json::Value;

use crate::errors::ConnectError;

const KNOWN_CHAINS: &[(u64, &str)] = &[
    (1, "Mainnet"),
    (2, "Expanse"),
    (3, "Ropsten"),
    (4, "Rinkeby"),
    (5, "Goerli"),
    (8, "Ubiq"),
    (42, "Kovan"),
    (100, "xDai"),
    (137, "Polygon"),
    // Conventional id for local dev chains (ganache, hardhat, ...).
    (1337, "Local"),
    (5777, "Ganache"),
];

/// Best-effort human readable network name.
pub fn network_name(chain_id: u64) -> &'static str {
    KNOWN_CHAINS
        .iter()
        .find(|(id, _)| *id == chain_id)
        .map(|(_, name)| *name)
        .unwrap_or("Unknown")
}

/// A chain id exactly as a wallet handed it over.
#[derive(Debug, Clone, PartialEq)]
pub enum ChainIdInput {
    Text(String),
    Integer(i128),
    Float(f64),
}

impl From<&str> for ChainIdInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ChainIdInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<u64> for ChainIdInput {
    fn from(value: u64) -> Self {
        Self::Integer(value.into())
    }
}

impl From<i64> for ChainIdInput {
    fn from(value: i64) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u32> for ChainIdInput {
    fn from(value: u32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<i32> for ChainIdInput {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for ChainIdInput {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl TryFrom<&Value> for ChainIdInput {
    type Error = ConnectError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(Self::Text(s.clone())),
            Value::Number(n) => {
                if let Some(v) = n.as_u64() {
                    Ok(Self::Integer(v.into()))
                } else if let Some(v) = n.as_i64() {
                    Ok(Self::Integer(v.into()))
                } else {
                    Ok(Self::Float(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            other => Err(ConnectError::InvalidChainId(other.to_string())),
        }
    }
}

// 2^64; `u64::MAX as f64` rounds up to this same value.
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

pub fn normalize_chain_id(chain_id: impl Into<ChainIdInput>) -> Result<u64, ConnectError> {
    match chain_id.into() {
        ChainIdInput::Text(raw) => normalize_text(&raw),
        ChainIdInput::Integer(n) => {
            u64::try_from(n).map_err(|_| ConnectError::InvalidChainId(n.to_string()))
        }
        ChainIdInput::Float(f) => {
            if !f.is_finite() || f.fract() != 0.0 || f < 0.0 || f >= U64_LIMIT {
                return Err(ConnectError::InvalidChainId(f.to_string()));
            }
            Ok(f as u64)
        }
    }
}

/// Fails with `ChainUnsupported` unless `chain_id` is one of `supported`.
pub fn ensure_supported_chain(chain_id: u64, supported: &[u64]) -> Result<(), ConnectError> {
    if supported.contains(&chain_id) {
        return Ok(());
    }
    Err(ConnectError::ChainUnsupported {
        chain_id: Some(chain_id),
        supported: supported.to_vec(),
    })
}

/// Normalizes a chain id carried in a JSON-RPC response (e.g. `eth_chainId`).
pub fn normalize_json_chain_id(value: &Value) -> Result<u64, ConnectError> {
    normalize_chain_id(ChainIdInput::try_from(value)?)
}

fn normalize_text(raw: &str) -> Result<u64, ConnectError> {
    // MetaMask Mobile 0.2.13 reports hex chain ids as "Ox..." instead of "0x...".
    let corrected = match raw.strip_prefix("Ox") {
        Some(rest) => format!("0x{rest}"),
        None => raw.to_owned(),
    };
    let radix = if corrected.trim().starts_with("0x") {
        16
    } else {
        10
    };
    parse_int_prefix(&corrected, radix)
        .ok_or_else(|| ConnectError::InvalidChainId(corrected.clone()))
}

/// Parses the longest run of valid digits after optional whitespace, sign and (for
/// radix 16) `0x` prefix. Trailing garbage is ignored; no digits at all is a failure.
fn parse_int_prefix(input: &str, radix: u32) -> Option<u64> {
    let mut rest = input.trim_start();
    let negative = match rest.as_bytes().first() {
        Some(b'-') => {
            rest = &rest[1..];
            true
        }
        Some(b'+') => {
            rest = &rest[1..];
            false
        }
        _ => false,
    };
    if radix == 16 {
        if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
            rest = hex;
        }
    }
    let digits_len = rest
        .char_indices()
        .find(|(_, c)| !c.is_digit(radix))
        .map(|(idx, _)| idx)
        .unwrap_or(rest.len());
    if digits_len == 0 {
        return None;
    }
    let value = u64::from_str_radix(&rest[..digits_len], radix).ok()?;
    if negative && value != 0 {
        return None;
    }
    Some(value)
}
