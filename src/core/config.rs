//! # Configuration
//!
//! Environment-driven configuration for the bot process.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: `INIT_APPLICATION_COMMANDS` accepts a guild id for scoped registration
//! - 1.0.0: Initial release with token and log level

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serenity::model::id::GuildId;
use std::env;
use std::str::FromStr;

/// Where (and whether) application commands are pushed on startup
///
/// Mirrors the `boolean | string` setting: `false` disables registration,
/// `true` registers globally and a guild id registers for that guild only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "RawInitApplicationCommands")]
pub enum InitApplicationCommands {
    #[default]
    Disabled,
    Global,
    Guild(GuildId),
}

impl InitApplicationCommands {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, InitApplicationCommands::Disabled)
    }
}

impl FromStr for InitApplicationCommands {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "" | "false" | "0" | "off" | "no" => Ok(InitApplicationCommands::Disabled),
            "true" | "1" | "on" | "yes" | "global" => Ok(InitApplicationCommands::Global),
            other => other
                .parse::<u64>()
                .map(|id| InitApplicationCommands::Guild(GuildId(id)))
                .map_err(|_| {
                    anyhow!("INIT_APPLICATION_COMMANDS must be true, false or a guild id, got '{other}'")
                }),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInitApplicationCommands {
    Flag(bool),
    Guild(String),
}

impl TryFrom<RawInitApplicationCommands> for InitApplicationCommands {
    type Error = anyhow::Error;

    fn try_from(raw: RawInitApplicationCommands) -> Result<Self> {
        match raw {
            RawInitApplicationCommands::Flag(true) => Ok(InitApplicationCommands::Global),
            RawInitApplicationCommands::Flag(false) => Ok(InitApplicationCommands::Disabled),
            RawInitApplicationCommands::Guild(id) => id
                .parse::<u64>()
                .map(|id| InitApplicationCommands::Guild(GuildId(id)))
                .map_err(|_| anyhow!("invalid guild id '{id}'")),
        }
    }
}

/// Bot configuration loaded from the environment (and `.env` via dotenvy)
#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub init_application_commands: InitApplicationCommands,
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// `DISCORD_TOKEN` is required. `INIT_APPLICATION_COMMANDS` defaults to
    /// disabled and `LOG_LEVEL` to `info`.
    pub fn from_env() -> Result<Self> {
        let discord_token = env::var("DISCORD_TOKEN")
            .context("DISCORD_TOKEN must be set in the environment")?;

        let init_application_commands = match env::var("INIT_APPLICATION_COMMANDS") {
            Ok(value) => value.parse()?,
            Err(_) => InitApplicationCommands::Disabled,
        };

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self::new(discord_token, init_application_commands, log_level)
    }

    /// Build a configuration from explicit values
    pub fn new(
        discord_token: impl Into<String>,
        init_application_commands: InitApplicationCommands,
        log_level: impl Into<String>,
    ) -> Result<Self> {
        let discord_token = discord_token.into().trim().to_string();
        if discord_token.is_empty() {
            return Err(anyhow!("DISCORD_TOKEN must not be empty"));
        }

        Ok(Self {
            discord_token,
            init_application_commands,
            log_level: log_level.into(),
        })
    }
}
