// File: budbot-core/src/services/discord/slashcommands/setalert.rs

use twilight_model::application::command::CommandType;
use twilight_model::application::interaction::application_command::CommandData;
use twilight_util::builder::command::{CommandBuilder, IntegerBuilder, StringBuilder};

use budbot_common::error::Error;
use super::{integer_option, string_option};

/// `/setalert server_name:<text> threshold:<int>`
pub fn create_setalert_command() -> CommandBuilder {
    CommandBuilder::new(
        "setalert",
        "Set an alert when a server has a certain amount of players",
        CommandType::ChatInput,
    )
        .dm_permission(true)
        .option(
            StringBuilder::new("server_name", "Part of the server name to watch for")
                .required(true),
        )
        .option(
            IntegerBuilder::new("threshold", "Alert when at least this many players are online")
                .required(true)
                .min_value(0),
        )
}

pub(super) fn parse_options(data: &CommandData) -> Result<(String, i64), Error> {
    let keyword = string_option(data, "server_name")
        .ok_or_else(|| Error::InvalidInput("server_name is required".into()))?;
    let threshold = integer_option(data, "threshold")
        .ok_or_else(|| Error::InvalidInput("threshold is required".into()))?;
    Ok((keyword, threshold))
}
