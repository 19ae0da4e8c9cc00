//! # Command System
//!
//! Application command (/) registration and interaction routing.
//!
//! - **Version**: 3.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 3.0.0: Declarative descriptors compiled into groups and sub groups
//! - 2.1.0: Add modular handler infrastructure (handler trait, registry)
//! - 1.0.0: Initial command structure

pub mod descriptor;
pub mod handler;
pub mod key;
pub mod options;
pub mod registry;
pub mod router;
pub mod sync;

pub use descriptor::{
    CommandDescriptor, CommandKind, CommandOption, DescriptorError, OptionChoice, OptionKind,
};
pub use handler::CommandExecute;
pub use key::{CommandInvocation, CompositeKey, ABSENT_SUB_GROUP};
pub use options::{get_bool_option, get_integer_option, get_string_option, leaf_options};
pub use registry::{CommandDefinition, Registry};
pub use router::ApplicationCommands;
pub use sync::{CommandSynchronizer, CommandsApi, RegistrationScope};
