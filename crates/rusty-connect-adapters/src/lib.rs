pub mod config;
pub mod connectors;
pub mod http;
pub mod watch;

pub use config::ConnectConfig;
pub use connectors::{builtins, get_connectors, optional_connectors};
pub use http::HttpProvider;
pub use watch::{balance_poller, block_poller, WatchPoller};
