// File: budbot-core/src/services/discord/slashcommands/mod.rs

pub mod setalert;
pub mod stopalert;
pub mod serverlist;

use std::sync::Arc;
use tracing::{debug, error, warn};
use twilight_http::Client as HttpClient;
use twilight_model::{
    application::interaction::{
        application_command::{CommandData, CommandOptionValue},
        InteractionData,
    },
    channel::message::MessageFlags,
    gateway::payload::incoming::InteractionCreate,
    http::interaction::{InteractionResponse, InteractionResponseData, InteractionResponseType},
    id::marker::{ApplicationMarker, InteractionMarker},
    id::Id,
};

use budbot_common::error::Error;
use crate::services::monitor_service::ServerMonitor;

pub const GENERIC_FAILURE: &str = "There was an error executing the command.";

pub async fn register_global_slash_commands(
    http: &Arc<HttpClient>,
    application_id: Id<ApplicationMarker>,
    top_n: usize,
) -> Result<(), Error> {
    let commands = &[
        setalert::create_setalert_command().build(),
        stopalert::create_stopalert_command().build(),
        serverlist::create_serverlist_command(top_n).build(),
    ];

    http.interaction(application_id)
        .set_global_commands(commands)
        .await
        .map_err(|e| Error::Platform(format!("Failed to register global slash commands: {e}")))?;

    Ok(())
}

/// Dispatch slash commands from an `InteractionCreate`.
pub async fn handle_interaction_create(
    http: Arc<HttpClient>,
    monitor: Arc<ServerMonitor>,
    top_n: usize,
    event: &InteractionCreate,
) -> Result<(), Error> {
    let interaction = &event.0;
    let application_id = interaction.application_id;
    let interaction_id = interaction.id;
    let interaction_token = interaction.token.as_str();

    let Some(InteractionData::ApplicationCommand(cmd_data)) = &interaction.data else {
        return Ok(());
    };
    let Some(user_id) = interaction.author_id() else {
        warn!("Interaction {} has no invoking user; ignoring", interaction_id);
        return Ok(());
    };
    let subscriber_id = user_id.to_string();
    debug!("/{} from {}", cmd_data.name, subscriber_id);

    match cmd_data.name.as_str() {
        "setalert" => {
            let result = match setalert::parse_options(cmd_data) {
                Ok((keyword, threshold)) => monitor.set_alert(&subscriber_id, &keyword, threshold).await,
                Err(e) => Err(e),
            };
            let (text, ephemeral) = reply_for(result);
            respond(&http, application_id, interaction_id, interaction_token, &text, ephemeral).await
        }
        "stopalert" => {
            let (text, ephemeral) = reply_for(monitor.stop_alert(&subscriber_id).await);
            respond(&http, application_id, interaction_id, interaction_token, &text, ephemeral).await
        }
        "serverlist" => {
            serverlist::handle_serverlist_interaction(
                &http,
                &monitor,
                top_n,
                application_id,
                interaction_id,
                interaction_token,
            )
            .await
        }
        other => {
            respond(
                &http,
                application_id,
                interaction_id,
                interaction_token,
                &format!("Unrecognized command: {other}"),
                true,
            )
            .await
        }
    }
}

/// Maps a command result to the reply text and whether only the caller should see it.
pub fn reply_for(result: Result<String, Error>) -> (String, bool) {
    match result {
        Ok(text) => (text, false),
        Err(Error::InvalidInput(msg)) => (format!("Invalid input: {msg}"), true),
        Err(e) => {
            error!("Slash command failed: {}", e);
            (GENERIC_FAILURE.to_string(), true)
        }
    }
}

pub(crate) async fn respond(
    http: &Arc<HttpClient>,
    application_id: Id<ApplicationMarker>,
    interaction_id: Id<InteractionMarker>,
    interaction_token: &str,
    content: &str,
    ephemeral: bool,
) -> Result<(), Error> {
    http.interaction(application_id)
        .create_response(
            interaction_id,
            interaction_token,
            &InteractionResponse {
                kind: InteractionResponseType::ChannelMessageWithSource,
                data: Some(InteractionResponseData {
                    content: Some(content.to_string()),
                    flags: ephemeral.then_some(MessageFlags::EPHEMERAL),
                    ..Default::default()
                }),
            },
        )
        .await
        .map_err(|e| Error::Platform(format!("Error responding to interaction: {e}")))?;

    Ok(())
}

pub(crate) fn string_option(data: &CommandData, name: &str) -> Option<String> {
    data.options.iter().find(|o| o.name == name).and_then(|o| match &o.value {
        CommandOptionValue::String(s) => Some(s.clone()),
        _ => None,
    })
}

pub(crate) fn integer_option(data: &CommandData, name: &str) -> Option<i64> {
    data.options.iter().find(|o| o.name == name).and_then(|o| match o.value {
        CommandOptionValue::Integer(i) => Some(i),
        _ => None,
    })
}
