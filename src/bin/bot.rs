use anyhow::Result;
use dotenvy::dotenv;
use log::{debug, error, info};
use serenity::async_trait;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::{Interaction, InteractionResponseType};
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use std::sync::Arc;

use slashgate::commands::{
    get_bool_option, get_integer_option, leaf_options, ApplicationCommands, CommandDescriptor,
    CommandExecute, CommandOption, CommandSynchronizer, OptionKind,
};
use slashgate::lifecycle::{run_until_shutdown, Connection};
use slashgate::Config;

struct Handler {
    commands: Arc<ApplicationCommands>,
    synchronizer: CommandSynchronizer,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());

        if self.synchronizer.scope().is_none() {
            info!("Application command registration disabled (INIT_APPLICATION_COMMANDS=false)");
            return;
        }

        let definitions = self.commands.application_commands();
        if let Err(e) = self
            .synchronizer
            .on_ready(&*ctx.http, &definitions)
            .await
        {
            error!("❌ {e}");
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::ApplicationCommand(command) => {
                if let Err(e) = self.commands.dispatch(&ctx, &command).await {
                    error!(
                        "Error handling application command '{}': {}",
                        command.data.name, e
                    );

                    let _ = command
                        .create_interaction_response(&ctx.http, |response| {
                            response
                                .kind(InteractionResponseType::ChannelMessageWithSource)
                                .interaction_response_data(|message| {
                                    message.content(
                                        "❌ Sorry, I encountered an error processing your command.",
                                    )
                                })
                        })
                        .await;
                }
            }
            other => debug!("Ignoring non-command interaction: {:?}", other.kind()),
        }
    }
}

async fn reply(ctx: &Context, command: &ApplicationCommandInteraction, content: String) -> Result<()> {
    command
        .create_interaction_response(&ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| message.content(content))
        })
        .await?;
    Ok(())
}

/// Handler for /ping
struct PingHandler;

#[async_trait]
impl CommandExecute for PingHandler {
    async fn execute(&self, ctx: &Context, command: &ApplicationCommandInteraction) -> Result<()> {
        reply(ctx, command, "Pong!".to_string()).await
    }
}

#[derive(Clone, Copy)]
enum MathOp {
    Add,
    Sub,
}

/// Handler for /math add and /math sub
struct MathHandler(MathOp);

#[async_trait]
impl CommandExecute for MathHandler {
    async fn execute(&self, ctx: &Context, command: &ApplicationCommandInteraction) -> Result<()> {
        let options = leaf_options(&command.data.options);
        let a = get_integer_option(options, "a").unwrap_or(0);
        let b = get_integer_option(options, "b").unwrap_or(0);

        let content = match self.0 {
            MathOp::Add => format!("{a} + {b} = {}", a.saturating_add(b)),
            MathOp::Sub => format!("{a} - {b} = {}", a.saturating_sub(b)),
        };
        reply(ctx, command, content).await
    }
}

/// Handler for /todo items list
struct TodoListHandler;

#[async_trait]
impl CommandExecute for TodoListHandler {
    async fn execute(&self, ctx: &Context, command: &ApplicationCommandInteraction) -> Result<()> {
        let done = get_bool_option(leaf_options(&command.data.options), "done").unwrap_or(false);
        let content = if done {
            "No finished items yet.".to_string()
        } else {
            "Your todo list is empty.".to_string()
        };
        reply(ctx, command, content).await
    }
}

/// Handler for the "Inspect User" context menu
struct InspectUserHandler;

#[async_trait]
impl CommandExecute for InspectUserHandler {
    async fn execute(&self, ctx: &Context, command: &ApplicationCommandInteraction) -> Result<()> {
        let content = match command.data.target_id {
            Some(target) => format!("Inspecting <@{}>", target.0),
            None => "No user selected.".to_string(),
        };
        reply(ctx, command, content).await
    }
}

fn operand(name: &str, description: &str) -> CommandOption {
    CommandOption::new(OptionKind::Integer, name, description).required(true)
}

fn declared_commands() -> Vec<CommandDescriptor> {
    vec![
        CommandDescriptor::slash("ping", Arc::new(PingHandler)).description("Test bot responsiveness"),
        CommandDescriptor::slash("add", Arc::new(MathHandler(MathOp::Add)))
            .group("math")
            .description("Add two numbers")
            .option(operand("a", "First number"))
            .option(operand("b", "Second number")),
        CommandDescriptor::slash("sub", Arc::new(MathHandler(MathOp::Sub)))
            .group("math")
            .description("Subtract two numbers")
            .option(operand("a", "First number"))
            .option(operand("b", "Second number")),
        CommandDescriptor::slash("list", Arc::new(TodoListHandler))
            .group("todo")
            .sub_group("items")
            .description("List todo items")
            .option(CommandOption::new(OptionKind::Boolean, "done", "Only finished items")),
        CommandDescriptor::user("Inspect User", Arc::new(InspectUserHandler)),
    ]
}

async fn shutdown_signal() -> Option<String> {
    match tokio::signal::ctrl_c().await {
        Ok(()) => Some("SIGINT".to_string()),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {e}");
            std::future::pending::<()>().await;
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting slashgate bot...");

    let commands = Arc::new(ApplicationCommands::new());
    let registry = commands.register(&declared_commands());
    for rejected in registry.rejected() {
        error!("Command not registered: {rejected}");
    }

    let handler = Handler {
        commands,
        synchronizer: CommandSynchronizer::new(config.init_application_commands),
    };

    let connection = Connection::new(&config.discord_token, GatewayIntents::GUILDS);
    let client = connection.bootstrap(handler).await?;

    info!("Bot configured successfully. Connecting to Discord gateway...");
    run_until_shutdown(client, shutdown_signal()).await
}
