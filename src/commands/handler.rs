//! Command handler trait
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: One handler per declared command, dispatched by composite key
//! - 1.0.0: Initial implementation for modular command handling

use anyhow::Result;
use async_trait::async_trait;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;

/// Trait implemented by the function behind a declared command
///
/// The router resolves an interaction to exactly one descriptor and calls
/// its handler. Errors are returned to the caller untouched.
///
/// # Example
///
/// ```ignore
/// pub struct PingHandler;
///
/// #[async_trait]
/// impl CommandExecute for PingHandler {
///     async fn execute(
///         &self,
///         serenity_ctx: &Context,
///         command: &ApplicationCommandInteraction,
///     ) -> Result<()> {
///         // Reply with pong
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait CommandExecute: Send + Sync {
    /// Handle the interaction that triggered this command
    ///
    /// # Arguments
    ///
    /// * `serenity_ctx` - Serenity context for Discord API calls
    /// * `command` - The application command interaction to handle
    async fn execute(
        &self,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Handlers are stored as trait objects inside descriptors
    fn _assert_object_safe(_: &dyn CommandExecute) {}
}
