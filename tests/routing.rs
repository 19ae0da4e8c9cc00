use anyhow::Result;
use async_trait::async_trait;
use serenity::model::application::interaction::application_command::{
    ApplicationCommandInteraction, CommandDataOption,
};
use serenity::prelude::Context;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use slashgate::commands::{
    ApplicationCommands, CommandDescriptor, CommandExecute, CommandInvocation,
    CommandSynchronizer, CommandsApi, OptionKind, RegistrationScope,
};
use slashgate::InitApplicationCommands;

struct Noop;

#[async_trait]
impl CommandExecute for Noop {
    async fn execute(&self, _ctx: &Context, _command: &ApplicationCommandInteraction) -> Result<()> {
        Ok(())
    }
}

#[derive(Default)]
struct CountingApi {
    overwrites: AtomicUsize,
}

#[async_trait]
impl CommandsApi for CountingApi {
    fn known_application_id(&self) -> Option<u64> {
        Some(1)
    }

    async fn fetch_application_id(&self) -> Result<u64> {
        Ok(1)
    }

    async fn overwrite_commands(
        &self,
        _scope: RegistrationScope,
        commands: &serde_json::Value,
    ) -> Result<usize> {
        self.overwrites.fetch_add(1, Ordering::SeqCst);
        Ok(commands.as_array().map(Vec::len).unwrap_or(0))
    }
}

fn handler() -> Arc<dyn CommandExecute> {
    Arc::new(Noop)
}

#[test]
fn scenario_a_single_command() {
    let ping = CommandDescriptor::slash("ping", handler());
    let commands = ApplicationCommands::new();
    commands.register(&[ping.clone()]);

    let definitions = commands.application_commands();
    assert_eq!(definitions.len(), 1);
    assert_eq!(definitions[0].name, "ping");

    let resolved = commands.resolve(&CommandInvocation::new("ping")).unwrap();
    assert!(Arc::ptr_eq(&resolved.execute, &ping.execute));
}

#[test]
fn scenario_b_group_without_sub_group() {
    let add = CommandDescriptor::slash("add", handler()).group("math");
    let sub = CommandDescriptor::slash("sub", handler()).group("math");
    let commands = ApplicationCommands::new();
    let registry = commands.register(&[add.clone(), sub]);

    let math = registry.definition("math").unwrap();
    let names: Vec<&str> = math.options.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["add", "sub"]);
    assert!(math.options.iter().all(|o| o.kind == OptionKind::SubCommand));

    let invocation = CommandInvocation::new("math").with_sub_command("add");
    assert_eq!(invocation.key().to_string(), "math-undefined-add");
    let resolved = commands.resolve(&invocation).unwrap();
    assert!(Arc::ptr_eq(&resolved.execute, &add.execute));
}

#[test]
fn scenario_c_group_with_sub_group() {
    let list = CommandDescriptor::slash("list", handler())
        .group("todo")
        .sub_group("items");
    let commands = ApplicationCommands::new();
    commands.register(&[list.clone()]);

    let json = serde_json::to_value(commands.application_commands()).unwrap();
    assert_eq!(json[0]["name"], "todo");
    assert_eq!(json[0]["options"][0]["type"], 2);
    assert_eq!(json[0]["options"][0]["name"], "items");
    assert_eq!(json[0]["options"][0]["options"][0]["type"], 1);
    assert_eq!(json[0]["options"][0]["options"][0]["name"], "list");

    let invocation = CommandInvocation::new("todo")
        .with_sub_command_group("items")
        .with_sub_command("list");
    assert_eq!(invocation.key().to_string(), "todo-items-list");
    let resolved = commands.resolve(&invocation).unwrap();
    assert!(Arc::ptr_eq(&resolved.execute, &list.execute));
}

#[tokio::test]
async fn scenario_d_registration_disabled() {
    let commands = ApplicationCommands::new();
    commands.register(&[CommandDescriptor::slash("ping", handler())]);

    let api = CountingApi::default();
    let synchronizer = CommandSynchronizer::new(InitApplicationCommands::Disabled);
    for _ in 0..3 {
        let pushed = synchronizer
            .on_ready(&api, &commands.application_commands())
            .await
            .unwrap();
        assert!(!pushed);
    }
    assert_eq!(api.overwrites.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn ready_pushes_compiled_tree() {
    let commands = ApplicationCommands::new();
    commands.register(&[
        CommandDescriptor::slash("ping", handler()),
        CommandDescriptor::slash("add", handler()).group("math"),
        CommandDescriptor::message("Quote", handler()),
    ]);

    let api = CountingApi::default();
    let synchronizer = CommandSynchronizer::new(InitApplicationCommands::Global);
    assert!(synchronizer
        .on_ready(&api, &commands.application_commands())
        .await
        .unwrap());
    assert_eq!(api.overwrites.load(Ordering::SeqCst), 1);
}

#[test]
fn unknown_commands_are_tolerated() {
    let commands = ApplicationCommands::new();
    commands.register(&[CommandDescriptor::slash("ping", handler())]);

    assert!(commands.resolve(&CommandInvocation::new("stale")).is_none());
    assert!(commands
        .resolve(&CommandInvocation::new("ping").with_sub_command("extra"))
        .is_none());
}

#[test]
fn interaction_payloads_resolve_to_declared_commands() {
    let add = CommandDescriptor::slash("add", handler()).group("math");
    let list = CommandDescriptor::slash("list", handler())
        .group("todo")
        .sub_group("items");
    let ping = CommandDescriptor::slash("ping", handler());
    let commands = ApplicationCommands::new();
    commands.register(&[add.clone(), list.clone(), ping.clone()]);

    let cases = [
        ("math", serde_json::json!([{ "type": 1, "name": "add", "options": [] }]), &add),
        (
            "todo",
            serde_json::json!([{
                "type": 2,
                "name": "items",
                "options": [{ "type": 1, "name": "list", "options": [] }]
            }]),
            &list,
        ),
        ("ping", serde_json::json!([]), &ping),
    ];

    for (name, payload, expected) in cases {
        let options: Vec<CommandDataOption> = serde_json::from_value(payload).unwrap();
        let invocation = CommandInvocation::from_options(name, &options);
        let resolved = commands.resolve(&invocation).unwrap();
        assert!(Arc::ptr_eq(&resolved.execute, &expected.execute), "command: {name}");
    }
}
