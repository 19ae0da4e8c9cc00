//! # Interaction Router
//!
//! Owns the published [`Registry`] and routes command interactions to the
//! descriptor that declared them.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Registry is swapped atomically on re-registration
//! - 1.0.0: Initial release

use anyhow::Result;
use log::{debug, info};
use parking_lot::RwLock;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::future::Future;
use std::sync::Arc;
use uuid::Uuid;

use super::descriptor::CommandDescriptor;
use super::key::CommandInvocation;
use super::registry::{CommandDefinition, Registry};

/// Application command service shared by the event handler
///
/// Readers always see a complete registry: a new one is compiled off to the
/// side and published with a single pointer swap.
#[derive(Default)]
pub struct ApplicationCommands {
    registry: RwLock<Arc<Registry>>,
}

impl ApplicationCommands {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile descriptors and replace the current registry with the result
    pub fn register(&self, descriptors: &[CommandDescriptor]) -> Arc<Registry> {
        let registry = Arc::new(Registry::compile(descriptors));
        *self.registry.write() = Arc::clone(&registry);
        registry
    }

    /// Currently published registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.read().clone()
    }

    /// Definitions to push to the registration endpoint
    pub fn application_commands(&self) -> Vec<CommandDefinition> {
        self.registry().definitions().to_vec()
    }

    /// Find the descriptor an invocation targets
    ///
    /// Unknown commands resolve to None; they may belong to another process.
    pub fn resolve(&self, invocation: &CommandInvocation) -> Option<CommandDescriptor> {
        self.registry().get(&invocation.key()).cloned()
    }

    /// Route a command interaction to its handler
    ///
    /// Returns `Ok(false)` when nothing matched. Handler errors are returned
    /// as-is.
    pub async fn dispatch(
        &self,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<bool> {
        let request_id = Uuid::new_v4();
        let invocation = CommandInvocation::from_interaction(command);
        let key = invocation.key();

        info!(
            "[{request_id}] 📥 Command interaction | Key: {key} | User: {} | Guild: {}",
            command.user.id,
            command
                .guild_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "DM".to_string())
        );

        let handled = self
            .route(&invocation, |descriptor| async move {
                debug!("[{request_id}] 🎯 Dispatching to '{}'", descriptor.name);
                descriptor.execute.execute(serenity_ctx, command).await
            })
            .await?;

        if handled {
            debug!("[{request_id}] ✅ Handler for '{key}' completed");
        } else {
            debug!("[{request_id}] No handler registered for '{key}', ignoring");
        }

        Ok(handled)
    }

    /// Resolve an invocation and hand the descriptor to `run`
    ///
    /// `run` is only called on a hit; its error is returned unchanged.
    pub async fn route<F, Fut>(&self, invocation: &CommandInvocation, run: F) -> Result<bool>
    where
        F: FnOnce(CommandDescriptor) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        match self.resolve(invocation) {
            Some(descriptor) => {
                run(descriptor).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
