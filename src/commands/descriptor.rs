//! # Command Descriptors
//!
//! Flat, declarative description of every application command the bot owns.
//! Descriptors are the only input of the tree compiler.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Validation of names against the remote naming rules
//! - 1.0.0: Initial release

use serde::ser::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use super::handler::CommandExecute;
use super::key::CompositeKey;

/// Description used for chat-input commands that declare none
pub const EMPTY_DESCRIPTION: &str = "Empty description";

/// Remote limit on command, group and option names
pub const MAX_NAME_LENGTH: usize = 32;

/// Application command type as understood by the registration API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CommandKind {
    ChatInput = 1,
    User = 2,
    Message = 3,
}

impl Serialize for CommandKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// Option type codes of the registration API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OptionKind {
    SubCommand = 1,
    SubCommandGroup = 2,
    String = 3,
    Integer = 4,
    Boolean = 5,
    User = 6,
    Channel = 7,
    Role = 8,
    Mentionable = 9,
    Number = 10,
    Attachment = 11,
}

impl Serialize for OptionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// A fixed choice offered for a value option
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct OptionChoice {
    pub name: String,
    pub value: serde_json::Value,
}

/// An option node: either a value parameter declared by a command, or a
/// sub-command / sub-command group synthesized by the compiler
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CommandOption {
    #[serde(rename = "type")]
    pub kind: OptionKind,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<OptionChoice>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOption>,
}

impl CommandOption {
    pub fn new(kind: OptionKind, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            description: description.into(),
            required: false,
            choices: Vec::new(),
            options: Vec::new(),
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn choice(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.choices.push(OptionChoice {
            name: name.into(),
            value: value.into(),
        });
        self
    }
}

/// Why a descriptor was left out of a compiled registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("command name is empty")]
    EmptyName,
    #[error("'{name}': name exceeds {} characters", MAX_NAME_LENGTH)]
    NameTooLong { name: String },
    #[error("'{name}': chat input names must be lowercase letters, digits, '-' or '_'")]
    InvalidName { name: String },
    #[error("'{name}': sub group '{sub_group}' is set without a group")]
    SubGroupWithoutGroup { name: String, sub_group: String },
    #[error("'{name}': only chat input commands can be grouped")]
    GroupedContextMenu { name: String },
    #[error("'{name}': also used as a group, so it can only be a plain slash command without options")]
    GroupNameConflict { name: String },
}

/// One declared application command and the handler behind it
#[derive(Clone)]
pub struct CommandDescriptor {
    pub name: String,
    pub kind: CommandKind,
    pub description: Option<String>,
    pub options: Vec<CommandOption>,
    pub group: Option<String>,
    pub sub_group: Option<String>,
    pub execute: Arc<dyn CommandExecute>,
}

impl CommandDescriptor {
    pub fn new(
        kind: CommandKind,
        name: impl Into<String>,
        execute: Arc<dyn CommandExecute>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
            options: Vec::new(),
            group: None,
            sub_group: None,
            execute,
        }
    }

    /// Slash command
    pub fn slash(name: impl Into<String>, execute: Arc<dyn CommandExecute>) -> Self {
        Self::new(CommandKind::ChatInput, name, execute)
    }

    /// User context menu entry
    pub fn user(name: impl Into<String>, execute: Arc<dyn CommandExecute>) -> Self {
        Self::new(CommandKind::User, name, execute)
    }

    /// Message context menu entry
    pub fn message(name: impl Into<String>, execute: Arc<dyn CommandExecute>) -> Self {
        Self::new(CommandKind::Message, name, execute)
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn option(mut self, option: CommandOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn sub_group(mut self, sub_group: impl Into<String>) -> Self {
        self.sub_group = Some(sub_group.into());
        self
    }

    /// Key this descriptor is dispatched under
    pub fn key(&self) -> CompositeKey {
        match &self.group {
            Some(group) => CompositeKey::grouped(group, self.sub_group.as_deref(), &self.name),
            None => CompositeKey::bare(&self.name),
        }
    }

    /// Description as sent to the registration API
    ///
    /// Context menu commands must not carry one.
    pub fn resolved_description(&self) -> String {
        match self.kind {
            CommandKind::ChatInput => self
                .description
                .clone()
                .unwrap_or_else(|| EMPTY_DESCRIPTION.to_string()),
            CommandKind::User | CommandKind::Message => String::new(),
        }
    }

    /// Check the descriptor before it is compiled
    pub fn validate(&self) -> Result<(), DescriptorError> {
        if self.name.trim().is_empty() {
            return Err(DescriptorError::EmptyName);
        }

        if let (None, Some(sub_group)) = (&self.group, &self.sub_group) {
            return Err(DescriptorError::SubGroupWithoutGroup {
                name: self.name.clone(),
                sub_group: sub_group.clone(),
            });
        }

        if self.kind != CommandKind::ChatInput {
            if self.group.is_some() {
                return Err(DescriptorError::GroupedContextMenu {
                    name: self.name.clone(),
                });
            }
            return check_length(&self.name);
        }

        let names = std::iter::once(&self.name)
            .chain(self.group.as_ref())
            .chain(self.sub_group.as_ref());
        for name in names {
            check_length(name)?;
            if !is_chat_input_name(name) {
                return Err(DescriptorError::InvalidName { name: name.clone() });
            }
        }

        Ok(())
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("description", &self.description)
            .field("options", &self.options)
            .field("group", &self.group)
            .field("sub_group", &self.sub_group)
            .finish_non_exhaustive()
    }
}

fn check_length(name: &str) -> Result<(), DescriptorError> {
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(DescriptorError::NameTooLong {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn is_chat_input_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| {
                (c.is_alphabetic() && !c.is_uppercase()) || c.is_numeric() || c == '-' || c == '_'
            })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
    use serenity::prelude::Context;

    pub(crate) struct NoopHandler;

    #[async_trait]
    impl CommandExecute for NoopHandler {
        async fn execute(
            &self,
            _serenity_ctx: &Context,
            _command: &ApplicationCommandInteraction,
        ) -> Result<()> {
            Ok(())
        }
    }

    pub(crate) fn noop() -> Arc<dyn CommandExecute> {
        Arc::new(NoopHandler)
    }

    #[test]
    fn test_slash_description_defaults() {
        let cmd = CommandDescriptor::slash("ping", noop());
        assert_eq!(cmd.resolved_description(), EMPTY_DESCRIPTION);

        let cmd = cmd.description("Check latency");
        assert_eq!(cmd.resolved_description(), "Check latency");
    }

    #[test]
    fn test_context_menu_description_is_forced_empty() {
        let cmd = CommandDescriptor::user("Inspect User", noop()).description("ignored");
        assert_eq!(cmd.resolved_description(), "");
    }

    #[test]
    fn test_key_shapes() {
        assert_eq!(CommandDescriptor::slash("ping", noop()).key().to_string(), "ping");
        assert_eq!(
            CommandDescriptor::slash("add", noop()).group("math").key().to_string(),
            "math-undefined-add"
        );
        assert_eq!(
            CommandDescriptor::slash("list", noop())
                .group("todo")
                .sub_group("items")
                .key()
                .to_string(),
            "todo-items-list"
        );
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let cmd = CommandDescriptor::slash("  ", noop());
        assert_eq!(cmd.validate(), Err(DescriptorError::EmptyName));
    }

    #[test]
    fn test_validate_rejects_sub_group_without_group() {
        let cmd = CommandDescriptor::slash("list", noop()).sub_group("items");
        assert!(matches!(
            cmd.validate(),
            Err(DescriptorError::SubGroupWithoutGroup { .. })
        ));
    }

    #[test]
    fn test_validate_chat_input_names() {
        assert!(CommandDescriptor::slash("set_user", noop()).validate().is_ok());
        assert!(CommandDescriptor::slash("Ping", noop()).validate().is_err());
        assert!(CommandDescriptor::slash("add", noop())
            .group("my math")
            .validate()
            .is_err());
        assert!(matches!(
            CommandDescriptor::slash("a".repeat(33), noop()).validate(),
            Err(DescriptorError::NameTooLong { .. })
        ));
    }

    #[test]
    fn test_validate_caseless_scripts_and_digits() {
        for name in ["設定", "पिंग", "ไทย", "٣", "ping-2"] {
            assert!(
                CommandDescriptor::slash(name, noop()).validate().is_ok(),
                "name: {name}"
            );
        }
        assert!(CommandDescriptor::slash("Ünicode", noop()).validate().is_err());
    }

    #[test]
    fn test_validate_context_menu() {
        assert!(CommandDescriptor::message("Analyze Message", noop())
            .validate()
            .is_ok());
        assert!(matches!(
            CommandDescriptor::message("Analyze Message", noop())
                .group("tools")
                .validate(),
            Err(DescriptorError::GroupedContextMenu { .. })
        ));
    }

    #[test]
    fn test_option_serializes_wire_shape() {
        let option = CommandOption::new(OptionKind::Integer, "a", "First operand")
            .required(true)
            .choice("one", 1);
        let json = serde_json::to_value(&option).unwrap();

        assert_eq!(json["type"], 4);
        assert_eq!(json["required"], true);
        assert_eq!(json["choices"][0]["value"], 1);
        assert!(json.get("options").is_none());
    }
}
