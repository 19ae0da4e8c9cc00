//! Option value helpers for handlers
//!
//! Grouped commands receive their values nested under the sub-command (and
//! sub-command group) option; [`leaf_options`] strips that nesting.

use serenity::model::application::command::CommandOptionType;
use serenity::model::application::interaction::application_command::CommandDataOption;

/// Value options of the invoked leaf command
pub fn leaf_options(options: &[CommandDataOption]) -> &[CommandDataOption] {
    match options.first() {
        Some(opt)
            if opt.kind == CommandOptionType::SubCommandGroup
                || opt.kind == CommandOptionType::SubCommand =>
        {
            leaf_options(&opt.options)
        }
        _ => options,
    }
}

/// Utility function to get string option from slash command
pub fn get_string_option(options: &[CommandDataOption], name: &str) -> Option<String> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

/// Utility function to get integer option from slash command
pub fn get_integer_option(options: &[CommandDataOption], name: &str) -> Option<i64> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_i64())
}

/// Utility function to get boolean option from slash command
pub fn get_bool_option(options: &[CommandDataOption], name: &str) -> Option<bool> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_bool())
}
