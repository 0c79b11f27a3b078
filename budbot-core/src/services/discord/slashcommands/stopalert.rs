// File: budbot-core/src/services/discord/slashcommands/stopalert.rs

use twilight_model::application::command::CommandType;
use twilight_util::builder::command::CommandBuilder;

/// `/stopalert` removes every alert the caller has set.
pub fn create_stopalert_command() -> CommandBuilder {
    CommandBuilder::new("stopalert", "Stop receiving alerts", CommandType::ChatInput)
        .dm_permission(true)
}
