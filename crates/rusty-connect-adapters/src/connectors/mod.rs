//! Built-in connector adapters.
//!
//! Each adapter only maps the caller's parameters onto the constructor arguments of
//! its wallet backend, validates the configuration it needs, and optionally
//! classifies activation failures.

pub mod fortmatic;
pub mod frame;
pub mod injected;
pub mod portis;
pub mod provided;
pub mod torus;
pub mod walletconnect;
pub mod walletlink;

use rusty_connect_core::{
    connector_init, ConnectError, ConnectorInit, ConnectorOverride, ConnectorTable, ProviderError,
};

/// The identifiers every registry starts with.
pub fn builtins() -> Vec<(String, ConnectorInit)> {
    vec![
        ("frame".to_owned(), connector_init(frame::init)),
        ("injected".to_owned(), connector_init(injected::init)),
        ("portis".to_owned(), connector_init(portis::init)),
        ("provided".to_owned(), connector_init(provided::init)),
        ("walletconnect".to_owned(), connector_init(walletconnect::init)),
    ]
}

/// Adapters that are not seeded but can be added through initializer overrides.
pub fn optional_connectors() -> Vec<(String, ConnectorOverride)> {
    vec![
        (
            "fortmatic".to_owned(),
            ConnectorOverride::Init(connector_init(fortmatic::init)),
        ),
        ("torus".to_owned(), ConnectorOverride::Init(connector_init(torus::init))),
        (
            "walletlink".to_owned(),
            ConnectorOverride::Init(connector_init(walletlink::init)),
        ),
    ]
}

/// Built-in table with `overrides` applied in order.
pub fn get_connectors<O>(overrides: O) -> ConnectorTable
where
    O: IntoIterator<Item = (String, ConnectorOverride)>,
{
    rusty_connect_core::get_connectors(builtins(), overrides)
}

fn rejected_by_user(err: &ProviderError) -> Option<ConnectError> {
    err.is_user_rejection()
        .then_some(ConnectError::ConnectionRejected)
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
