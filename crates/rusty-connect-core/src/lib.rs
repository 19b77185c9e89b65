pub mod chain;
pub mod connector;
pub mod errors;
pub mod poll;
pub mod provider;
pub mod registry;
pub mod rpc;

pub use chain::{
    ensure_supported_chain, network_name, normalize_chain_id, normalize_json_chain_id, ChainIdInput,
};
pub use connector::{classify_activation_error, Connector, ConnectorParams, SessionHandle};
pub use errors::ConnectError;
pub use poll::{BoxFuture, PollController, PollTask, Poller};
pub use provider::{
    CallbackProvider, JsonRpcPayload, PositionalProvider, Provider, ProviderCapabilities,
    ProviderError, RequestArguments, RequestProvider, SendAsyncCallback, USER_REJECTED_REQUEST,
};
pub use registry::{
    connector_init, get_connectors, ConnectorEntry, ConnectorInit, ConnectorOverride,
    ConnectorRegistry, ConnectorTable,
};
pub use rpc::{account_balance, account_is_contract, block_number, ethereum_request, rpc_result};
