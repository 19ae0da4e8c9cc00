// Core layer - configuration
pub mod core;

// Application command registration and routing
pub mod commands;

// Gateway connection lifecycle
pub mod lifecycle;

pub use crate::core::{Config, InitApplicationCommands};

pub use commands::{
    ApplicationCommands, CommandDescriptor, CommandExecute, CommandInvocation,
    CommandSynchronizer, Registry,
};
pub use lifecycle::Connection;
