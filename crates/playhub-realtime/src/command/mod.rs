//! Command dispatch: maps an inbound envelope's command name to a handler.

pub mod handler;
pub mod registry;

pub use handler::{CommandHandler, FnHandler};
pub use registry::{CommandRegistry, CommandRegistryBuilder, OFFLINE_COMMAND};
