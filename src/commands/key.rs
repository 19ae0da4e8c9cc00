//! Composite dispatch keys
//!
//! Both the compiler and the router build keys through [`CompositeKey`], so
//! the string shape is defined in exactly one place. A grouped command with
//! no sub group keeps the literal `undefined` segment; commands registered
//! remotely under that shape depend on it.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use serenity::model::application::command::CommandOptionType;
use serenity::model::application::interaction::application_command::{
    ApplicationCommandInteraction, CommandDataOption,
};
use std::fmt;

/// Placeholder segment used when a grouped command has no sub group
pub const ABSENT_SUB_GROUP: &str = "undefined";

/// Key identifying one dispatch target
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CompositeKey {
    /// Ungrouped command: `name`
    Bare(String),
    /// Grouped command: `group-subGroup-name`, or `group-undefined-name`
    Grouped {
        group: String,
        sub_group: Option<String>,
        name: String,
    },
}

impl CompositeKey {
    pub fn bare(name: &str) -> Self {
        CompositeKey::Bare(name.to_string())
    }

    pub fn grouped(group: &str, sub_group: Option<&str>, name: &str) -> Self {
        CompositeKey::Grouped {
            group: group.to_string(),
            sub_group: sub_group.map(str::to_string),
            name: name.to_string(),
        }
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompositeKey::Bare(name) => f.write_str(name),
            CompositeKey::Grouped {
                group,
                sub_group,
                name,
            } => write!(
                f,
                "{group}-{}-{name}",
                sub_group.as_deref().unwrap_or(ABSENT_SUB_GROUP)
            ),
        }
    }
}

/// Names an inbound command interaction reports
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandInvocation {
    pub command_name: String,
    pub sub_command_group: Option<String>,
    pub sub_command: Option<String>,
}

impl CommandInvocation {
    pub fn new(command_name: impl Into<String>) -> Self {
        Self {
            command_name: command_name.into(),
            ..Default::default()
        }
    }

    pub fn with_sub_command_group(mut self, group: impl Into<String>) -> Self {
        self.sub_command_group = Some(group.into());
        self
    }

    pub fn with_sub_command(mut self, sub_command: impl Into<String>) -> Self {
        self.sub_command = Some(sub_command.into());
        self
    }

    /// Extract the command path from a serenity interaction
    pub fn from_interaction(command: &ApplicationCommandInteraction) -> Self {
        Self::from_options(&command.data.name, &command.data.options)
    }

    /// Extract the command path from a command name and its top-level options
    ///
    /// A sub-command group is always the first option and wraps exactly one
    /// sub-command.
    pub fn from_options(command_name: &str, options: &[CommandDataOption]) -> Self {
        let mut invocation = Self::new(command_name);

        match options.first() {
            Some(opt) if opt.kind == CommandOptionType::SubCommandGroup => {
                invocation.sub_command_group = Some(opt.name.clone());
                invocation.sub_command = opt
                    .options
                    .first()
                    .filter(|sub| sub.kind == CommandOptionType::SubCommand)
                    .map(|sub| sub.name.clone());
            }
            Some(opt) if opt.kind == CommandOptionType::SubCommand => {
                invocation.sub_command = Some(opt.name.clone());
            }
            _ => {}
        }

        invocation
    }

    /// Rebuild the key the compiler stored this command under
    ///
    /// Without a sub-command the interaction targets a bare command; a
    /// reported group without a sub-command is ignored.
    pub fn key(&self) -> CompositeKey {
        match &self.sub_command {
            Some(sub_command) => CompositeKey::grouped(
                &self.command_name,
                self.sub_command_group.as_deref(),
                sub_command,
            ),
            None => CompositeKey::bare(&self.command_name),
        }
    }
}
