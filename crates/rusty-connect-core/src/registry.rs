//! Connector registry.
//!
//! Phase one is a plain table of `identifier -> (initializer, configuration)` built
//! from the built-in seed plus caller overrides. Phase two, [`ConnectorRegistry`],
//! resolves initializers on first use and keeps the resolved connectors around.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use crate::connector::Connector;
use crate::errors::ConnectError;
use crate::poll::BoxFuture;

/// Lazily produces a connector; invoking it may do real loading work.
pub type ConnectorInit =
    Arc<dyn Fn() -> BoxFuture<Result<Arc<dyn Connector>, ConnectError>> + Send + Sync>;

/// Wraps an async function as a [`ConnectorInit`].
pub fn connector_init<F, Fut>(init: F) -> ConnectorInit
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = Result<Arc<dyn Connector>, ConnectError>> + Send + 'static,
{
    Arc::new(move || -> BoxFuture<Result<Arc<dyn Connector>, ConnectError>> {
        Box::pin(init())
    })
}

/// A caller override: either a whole new initializer or configuration for a known one.
#[derive(Clone)]
pub enum ConnectorOverride {
    Init(ConnectorInit),
    Config(Value),
}

impl fmt::Debug for ConnectorOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(_) => f.write_str("Init(..)"),
            Self::Config(config) => f.debug_tuple("Config").field(config).finish(),
        }
    }
}

#[derive(Clone)]
pub struct ConnectorEntry {
    pub init: ConnectorInit,
    pub config: Option<Value>,
}

impl fmt::Debug for ConnectorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectorEntry")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

pub type ConnectorTable = BTreeMap<String, ConnectorEntry>;

/// Builds the final table from a built-in seed and overrides applied in order.
///
/// An initializer override replaces the entry wholesale, dropping any configuration;
/// it is also the only way to add a new identifier. A configuration override only
/// attaches to an identifier already present and is silently dropped otherwise.
pub fn get_connectors<B, O>(builtins: B, overrides: O) -> ConnectorTable
where
    B: IntoIterator<Item = (String, ConnectorInit)>,
    O: IntoIterator<Item = (String, ConnectorOverride)>,
{
    let mut table: ConnectorTable = builtins
        .into_iter()
        .map(|(id, init)| (id, ConnectorEntry { init, config: None }))
        .collect();

    for (id, value) in overrides {
        match value {
            ConnectorOverride::Init(init) => {
                table.insert(id, ConnectorEntry { init, config: None });
            }
            ConnectorOverride::Config(config) => match table.get_mut(&id) {
                Some(entry) => entry.config = Some(config),
                None => tracing::debug!(connector = %id, "ignoring config for unknown connector"),
            },
        }
    }
    table
}

/// Resolved connectors, stored once and addressed by index.
#[derive(Default)]
struct ResolvedArena {
    connectors: Vec<Arc<dyn Connector>>,
    index: HashMap<String, usize>,
}

pub struct ConnectorRegistry {
    table: ConnectorTable,
    resolved: Mutex<ResolvedArena>,
}

impl ConnectorRegistry {
    pub fn new(table: ConnectorTable) -> Self {
        Self {
            table,
            resolved: Mutex::new(ResolvedArena::default()),
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.table.contains_key(id)
    }

    pub fn config(&self, id: &str) -> Option<&Value> {
        self.table.get(id).and_then(|entry| entry.config.as_ref())
    }

    /// Resolves `id` into its connector and configuration. The initializer runs on
    /// first use only; a failed initialization is not cached.
    pub async fn resolve(
        &self,
        id: &str,
    ) -> Result<(Arc<dyn Connector>, Option<Value>), ConnectError> {
        let entry = self
            .table
            .get(id)
            .ok_or_else(|| ConnectError::ConnectorUnsupported(id.to_owned()))?;

        if let Some(connector) = self.cached(id)? {
            tracing::trace!(connector = id, "connector already resolved");
            return Ok((connector, entry.config.clone()));
        }

        tracing::debug!(connector = id, "initializing connector");
        let connector = (entry.init)().await?;

        let mut arena = self.arena()?;
        // Two concurrent first uses may both initialize; the first to land wins.
        let existing = arena.index.get(id).copied();
        let connector = match existing {
            Some(slot) => Arc::clone(&arena.connectors[slot]),
            None => {
                let slot = arena.connectors.len();
                arena.connectors.push(Arc::clone(&connector));
                arena.index.insert(id.to_owned(), slot);
                connector
            }
        };
        Ok((connector, entry.config.clone()))
    }

    fn arena(&self) -> Result<MutexGuard<'_, ResolvedArena>, ConnectError> {
        self.resolved
            .lock()
            .map_err(|_| ConnectError::LockPoisoned("connector registry"))
    }

    fn cached(&self, id: &str) -> Result<Option<Arc<dyn Connector>>, ConnectError> {
        let arena = self.arena()?;
        Ok(arena
            .index
            .get(id)
            .map(|&slot| Arc::clone(&arena.connectors[slot])))
    }
}

impl fmt::Debug for ConnectorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectorRegistry")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

impl From<ConnectorTable> for ConnectorRegistry {
    fn from(table: ConnectorTable) -> Self {
        Self::new(table)
    }
}
