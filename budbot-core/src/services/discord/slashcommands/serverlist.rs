// File: budbot-core/src/services/discord/slashcommands/serverlist.rs

use std::sync::Arc;
use twilight_http::Client as HttpClient;
use twilight_model::{
    application::command::CommandType,
    http::interaction::{InteractionResponse, InteractionResponseType},
    id::marker::{ApplicationMarker, InteractionMarker},
    id::Id,
};
use twilight_util::builder::command::CommandBuilder;

use budbot_common::error::Error;
use crate::services::monitor_service::ServerMonitor;

pub fn create_serverlist_command(top_n: usize) -> CommandBuilder {
    CommandBuilder::new(
        "serverlist",
        format!("Fetches the top {top_n} most populated servers"),
        CommandType::ChatInput,
    )
        .dm_permission(true)
}

/// The listing fetch can outlast the interaction deadline, so acknowledge first
/// and fill the reply in afterwards.
pub async fn handle_serverlist_interaction(
    http: &Arc<HttpClient>,
    monitor: &Arc<ServerMonitor>,
    top_n: usize,
    application_id: Id<ApplicationMarker>,
    interaction_id: Id<InteractionMarker>,
    interaction_token: &str,
) -> Result<(), Error> {
    let client = http.interaction(application_id);

    client
        .create_response(
            interaction_id,
            interaction_token,
            &InteractionResponse {
                kind: InteractionResponseType::DeferredChannelMessageWithSource,
                data: None,
            },
        )
        .await
        .map_err(|e| Error::Platform(format!("Error deferring `/serverlist`: {e}")))?;

    let text = monitor.list_top(top_n).await;

    client
        .update_response(interaction_token)
        .content(Some(text.as_str()))
        .await
        .map_err(|e| Error::Platform(format!("Error responding to `/serverlist`: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_follows_configured_count() {
        let command = create_serverlist_command(8).build();
        assert_eq!(command.name, "serverlist");
        assert_eq!(command.description, "Fetches the top 8 most populated servers");
    }
}
