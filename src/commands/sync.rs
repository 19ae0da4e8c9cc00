//! # Registration Synchronizer
//!
//! Pushes the compiled command tree to Discord once the gateway is ready.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Bulk overwrite from the compiled registry, once per process
//! - 1.0.0: Global and guild registration helpers

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{info, warn};
use serenity::http::Http;
use serenity::model::id::GuildId;
use std::sync::atomic::{AtomicBool, Ordering};

use super::registry::CommandDefinition;
use crate::core::InitApplicationCommands;

/// Target of a bulk overwrite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationScope {
    Global,
    Guild(GuildId),
}

impl RegistrationScope {
    /// Scope selected by configuration, None when registration is disabled
    pub fn from_config(mode: InitApplicationCommands) -> Option<Self> {
        match mode {
            InitApplicationCommands::Disabled => None,
            InitApplicationCommands::Global => Some(RegistrationScope::Global),
            InitApplicationCommands::Guild(guild_id) => Some(RegistrationScope::Guild(guild_id)),
        }
    }
}

/// Remote application command endpoint
#[async_trait]
pub trait CommandsApi: Send + Sync {
    /// Application id if the client already knows it
    fn known_application_id(&self) -> Option<u64>;

    /// Fetch the current application and remember its id
    async fn fetch_application_id(&self) -> Result<u64>;

    /// Replace every command in `scope` with `commands`
    ///
    /// Returns how many commands the remote side now holds.
    async fn overwrite_commands(
        &self,
        scope: RegistrationScope,
        commands: &serde_json::Value,
    ) -> Result<usize>;
}

#[async_trait]
impl CommandsApi for Http {
    fn known_application_id(&self) -> Option<u64> {
        self.application_id()
    }

    async fn fetch_application_id(&self) -> Result<u64> {
        let info = self.get_current_application_info().await?;
        self.set_application_id(info.id.0);
        Ok(info.id.0)
    }

    async fn overwrite_commands(
        &self,
        scope: RegistrationScope,
        commands: &serde_json::Value,
    ) -> Result<usize> {
        let registered = match scope {
            RegistrationScope::Global => self.create_global_application_commands(commands).await?,
            RegistrationScope::Guild(guild_id) => {
                self.create_guild_application_commands(guild_id.0, commands)
                    .await?
            }
        };
        Ok(registered.len())
    }
}

/// Runs the bulk overwrite on the first ready event
pub struct CommandSynchronizer {
    scope: Option<RegistrationScope>,
    attempted: AtomicBool,
}

impl CommandSynchronizer {
    pub fn new(mode: InitApplicationCommands) -> Self {
        Self {
            scope: RegistrationScope::from_config(mode),
            attempted: AtomicBool::new(false),
        }
    }

    pub fn scope(&self) -> Option<RegistrationScope> {
        self.scope
    }

    /// Handle a ready signal
    ///
    /// Returns `Ok(true)` when commands were pushed, `Ok(false)` when
    /// registration is disabled or already ran. Failures are not retried.
    pub async fn on_ready<A>(&self, api: &A, commands: &[CommandDefinition]) -> Result<bool>
    where
        A: CommandsApi + ?Sized,
    {
        let Some(scope) = self.scope else {
            return Ok(false);
        };

        if self.attempted.swap(true, Ordering::SeqCst) {
            info!("Application commands already synchronized for this process, skipping");
            return Ok(false);
        }

        if api.known_application_id().is_none() {
            let application_id = api.fetch_application_id().await?;
            info!("Resolved application id {application_id}");
        }

        self.sync(api, scope, commands).await?;
        Ok(true)
    }

    /// Overwrite the remote command set for `scope`
    pub async fn sync<A>(
        &self,
        api: &A,
        scope: RegistrationScope,
        commands: &[CommandDefinition],
    ) -> Result<()>
    where
        A: CommandsApi + ?Sized,
    {
        let payload = serde_json::to_value(commands)?;

        match scope {
            RegistrationScope::Global => {
                info!("🌍 Started refreshing application commands globally.")
            }
            RegistrationScope::Guild(guild_id) => {
                info!("🔧 Started refreshing application commands for guild {guild_id}.")
            }
        }

        let registered = api.overwrite_commands(scope, &payload).await.map_err(|e| {
            anyhow!("Failed to register application commands ({scope:?}): {e}")
        })?;

        if registered != commands.len() {
            warn!(
                "Discord reports {registered} commands after overwrite, expected {}",
                commands.len()
            );
        }

        info!("✅ Successfully reloaded application commands ({registered} commands).");
        Ok(())
    }
}
