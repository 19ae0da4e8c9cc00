//! # Connection Lifecycle
//!
//! Login on bootstrap, disconnect on shutdown. Reconnects and backoff are
//! left to serenity.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::{anyhow, Result};
use log::{error, info};
use serenity::client::bridge::gateway::ShardManager;
use serenity::prelude::{Client, EventHandler, GatewayIntents, Mutex};
use std::future::Future;
use std::sync::Arc;

/// Credentials and intents for the persistent gateway connection
#[derive(Debug, Clone)]
pub struct Connection {
    token: String,
    intents: GatewayIntents,
}

impl Connection {
    pub fn new(token: impl Into<String>, intents: GatewayIntents) -> Self {
        Self {
            token: token.into(),
            intents,
        }
    }

    pub fn intents(&self) -> GatewayIntents {
        self.intents
    }

    /// Build the client that logs in with the configured token
    ///
    /// Readiness arrives later through the handler's `ready` event.
    pub async fn bootstrap<H>(&self, handler: H) -> Result<Client>
    where
        H: EventHandler + 'static,
    {
        if self.token.trim().is_empty() {
            return Err(anyhow!("Cannot log in without a token"));
        }

        Client::builder(&self.token, self.intents)
            .event_handler(handler)
            .await
            .map_err(|e| {
                error!("Failed to create Discord client: {e}");
                anyhow!("Client creation failed: {}", e)
            })
    }
}

/// Run the gateway until `shutdown` resolves, then disconnect
///
/// The shutdown future may yield a reason, which is only logged.
pub async fn run_until_shutdown<F>(mut client: Client, shutdown: F) -> Result<()>
where
    F: Future<Output = Option<String>> + Send + 'static,
{
    let shard_manager = Arc::clone(&client.shard_manager);
    tokio::spawn(async move {
        let reason = shutdown.await;
        disconnect(&shard_manager, reason.as_deref()).await;
    });

    info!("Establishing WebSocket connection to Discord gateway...");
    client.start().await.map_err(|why| {
        error!("Gateway connection failed: {why:?}");
        anyhow!("Failed to establish gateway connection: {}", why)
    })
}

/// Disconnect every shard
///
/// Best effort: in-flight handlers are not awaited.
pub async fn disconnect(shard_manager: &Arc<Mutex<ShardManager>>, reason: Option<&str>) {
    match reason {
        Some(reason) => info!("🛑 Shutting down ({reason}), disconnecting from gateway"),
        None => info!("🛑 Shutting down, disconnecting from gateway"),
    }
    shard_manager.lock().await.shutdown_all().await;
}
