//! Immutable command table, built once at startup.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use playhub_core::result::AppResult;

use crate::connection::Connection;

use super::handler::{CommandHandler, FnHandler};

/// Command fired when a connection that still owns its user's session is
/// closed by the peer.
pub const OFFLINE_COMMAND: &str = "offline";

/// Command name to handler table.
///
/// Built through [`CommandRegistryBuilder`] and never mutated afterwards, so
/// lookups need no synchronisation.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    handlers: Arc<HashMap<String, Arc<dyn CommandHandler>>>,
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.names())
            .finish()
    }
}

impl CommandRegistry {
    /// Starts building a registry.
    pub fn builder() -> CommandRegistryBuilder {
        CommandRegistryBuilder::default()
    }

    /// An empty registry.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Finds the handler for `command`.
    pub fn lookup(&self, command: &str) -> Option<Arc<dyn CommandHandler>> {
        self.handlers.get(command).cloned()
    }

    /// Whether `command` has a handler.
    pub fn contains(&self, command: &str) -> bool {
        self.handlers.contains_key(command)
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no command is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Collects handlers before the registry is frozen.
#[derive(Default)]
pub struct CommandRegistryBuilder {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl CommandRegistryBuilder {
    /// Binds `handler` to `command`. A second binding for the same name
    /// replaces the first.
    pub fn register(mut self, command: impl Into<String>, handler: impl CommandHandler) -> Self {
        let command = command.into();
        if self
            .handlers
            .insert(command.clone(), Arc::new(handler))
            .is_some()
        {
            warn!(command = %command, "Command handler replaced");
        }
        self
    }

    /// Binds an async closure to `command`.
    pub fn register_fn<F, Fut>(self, command: impl Into<String>, f: F) -> Self
    where
        F: Fn(Arc<Connection>, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AppResult<()>> + Send + 'static,
    {
        self.register(command, FnHandler::new(f))
    }

    /// Freezes the table.
    pub fn build(self) -> CommandRegistry {
        debug!(commands = self.handlers.len(), "Command registry built");
        CommandRegistry {
            handlers: Arc::new(self.handlers),
        }
    }
}
