//! Compiled command registry
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Compile flat descriptors into a nested definition tree plus a dispatch table
//! - 1.0.0: Initial implementation for handler dispatch

use log::{debug, info, warn};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use super::descriptor::{
    CommandDescriptor, CommandKind, CommandOption, DescriptorError, OptionKind,
    EMPTY_DESCRIPTION,
};
use super::key::CompositeKey;

/// Top-level entry of the bulk registration payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandDefinition {
    #[serde(rename = "type")]
    pub kind: CommandKind,
    pub name: String,
    pub description: String,
    pub options: Vec<CommandOption>,
}

impl CommandDefinition {
    fn from_descriptor(descriptor: &CommandDescriptor) -> Self {
        Self {
            kind: descriptor.kind,
            name: descriptor.name.clone(),
            description: descriptor.resolved_description(),
            options: descriptor.options.clone(),
        }
    }

    fn group(group: &str) -> Self {
        Self {
            kind: CommandKind::ChatInput,
            name: group.to_string(),
            description: format!("{group} commands"),
            options: Vec::new(),
        }
    }
}

fn sub_command(descriptor: &CommandDescriptor) -> CommandOption {
    CommandOption {
        kind: OptionKind::SubCommand,
        name: descriptor.name.clone(),
        description: descriptor
            .description
            .clone()
            .unwrap_or_else(|| EMPTY_DESCRIPTION.to_string()),
        required: false,
        choices: Vec::new(),
        options: descriptor.options.clone(),
    }
}

fn sub_command_group(sub_group: &str, options: Vec<CommandOption>) -> CommandOption {
    CommandOption {
        kind: OptionKind::SubCommandGroup,
        name: sub_group.to_string(),
        description: format!("{sub_group} sub commands"),
        required: false,
        choices: Vec::new(),
        options,
    }
}

/// Grouped descriptors sharing one (group, sub group) pair
struct Bucket {
    group: String,
    sub_group: Option<String>,
    members: Vec<CommandDescriptor>,
}

/// Definitions to register and descriptors to dispatch, built from one
/// descriptor list
///
/// A registry is never edited after compilation; re-registration builds a
/// new one.
#[derive(Debug, Default)]
pub struct Registry {
    definitions: Vec<CommandDefinition>,
    dispatch: HashMap<String, CommandDescriptor>,
    rejected: Vec<DescriptorError>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile descriptors into a registry
    ///
    /// Invalid descriptors are logged, recorded in [`Registry::rejected`] and
    /// skipped. Duplicate names within the same scope are last-write-wins.
    ///
    /// An ungrouped slash command named like a group only supplies that
    /// group's description: Discord cannot invoke it bare, so it gets no
    /// dispatch entry. One that declares options (or is a context menu) is
    /// rejected, since the remote side refuses options mixed with
    /// sub-commands.
    pub fn compile(descriptors: &[CommandDescriptor]) -> Self {
        info!("Started refreshing application (/) commands.");

        let group_names: HashSet<&str> = descriptors
            .iter()
            .filter(|d| d.validate().is_ok())
            .filter_map(|d| d.group.as_deref())
            .collect();

        let mut definitions: Vec<CommandDefinition> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut buckets: Vec<Bucket> = Vec::new();
        let mut bucket_positions: HashMap<(String, Option<String>), usize> = HashMap::new();
        let mut dispatch = HashMap::new();
        let mut rejected = Vec::new();

        for descriptor in descriptors {
            if let Err(e) = descriptor.validate() {
                warn!("Skipping application command: {e}");
                rejected.push(e);
                continue;
            }

            let names_group = descriptor.group.is_none()
                && group_names.contains(descriptor.name.as_str());
            if names_group
                && (descriptor.kind != CommandKind::ChatInput || !descriptor.options.is_empty())
            {
                let e = DescriptorError::GroupNameConflict {
                    name: descriptor.name.clone(),
                };
                warn!("Skipping application command: {e}");
                rejected.push(e);
                continue;
            }

            match &descriptor.group {
                None => {
                    let definition = CommandDefinition::from_descriptor(descriptor);
                    match positions.get(&descriptor.name) {
                        Some(&pos) => definitions[pos] = definition,
                        None => {
                            positions.insert(descriptor.name.clone(), definitions.len());
                            definitions.push(definition);
                        }
                    }
                    if names_group {
                        debug!(
                            "'{}' describes a command group, not dispatched bare",
                            descriptor.name
                        );
                        continue;
                    }
                }
                Some(group) => {
                    let bucket_key = (group.clone(), descriptor.sub_group.clone());
                    let pos = *bucket_positions.entry(bucket_key).or_insert_with(|| {
                        buckets.push(Bucket {
                            group: group.clone(),
                            sub_group: descriptor.sub_group.clone(),
                            members: Vec::new(),
                        });
                        buckets.len() - 1
                    });

                    let members = &mut buckets[pos].members;
                    match members.iter_mut().find(|m| m.name == descriptor.name) {
                        Some(existing) => *existing = descriptor.clone(),
                        None => members.push(descriptor.clone()),
                    }
                }
            }

            dispatch.insert(descriptor.key().to_string(), descriptor.clone());
        }

        for bucket in buckets {
            let options: Vec<CommandOption> = bucket.members.iter().map(sub_command).collect();

            let pos = *positions.entry(bucket.group.clone()).or_insert_with(|| {
                definitions.push(CommandDefinition::group(&bucket.group));
                definitions.len() - 1
            });
            let parent = &mut definitions[pos];

            match &bucket.sub_group {
                Some(sub_group) => parent.options.push(sub_command_group(sub_group, options)),
                None => parent.options.extend(options),
            }
        }

        info!(
            "Successfully reloaded application (/) commands ({} top-level, {} handlers, {} rejected).",
            definitions.len(),
            dispatch.len(),
            rejected.len()
        );

        Self {
            definitions,
            dispatch,
            rejected,
        }
    }

    /// Definitions in first-declaration order, ready for bulk registration
    pub fn definitions(&self) -> &[CommandDefinition] {
        &self.definitions
    }

    /// Top-level definition by command name
    pub fn definition(&self, name: &str) -> Option<&CommandDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    /// Descriptor registered under a key
    ///
    /// Returns None if no descriptor matches.
    pub fn get(&self, key: &CompositeKey) -> Option<&CommandDescriptor> {
        self.dispatch.get(&key.to_string())
    }

    /// Check if a key is registered
    pub fn contains(&self, key: &CompositeKey) -> bool {
        self.dispatch.contains_key(&key.to_string())
    }

    /// Number of dispatch targets
    pub fn len(&self) -> usize {
        self.dispatch.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.dispatch.is_empty()
    }

    /// All dispatch keys, in string form
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.dispatch.keys().map(String::as_str)
    }

    /// Descriptors skipped during compilation
    pub fn rejected(&self) -> &[DescriptorError] {
        &self.rejected
    }
}
