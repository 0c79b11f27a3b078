use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use twilight_gateway::{
    self as gateway,
    CloseFrame,
    Config,
    Event,
    EventTypeFlags,
    Intents,
    MessageSender,
    Shard,
    StreamExt,
};
use twilight_http::Client as HttpClient;
use twilight_model::gateway::payload::incoming::{MessageCreate, Ready as ReadyPayload};
use twilight_model::id::marker::ChannelMarker;
use twilight_model::id::Id;

use crate::Error;
use crate::platforms::ConnectionStatus;
use crate::services::discord::slashcommands::{handle_interaction_create, register_global_slash_commands};
use crate::services::message_service::TriggerResponder;
use crate::services::monitor_service::ServerMonitor;

/// Everything a shard needs to answer events on its own.
struct ShardContext {
    http: Arc<HttpClient>,
    monitor: Arc<ServerMonitor>,
    responder: TriggerResponder,
    top_n: usize,
}

/// Reads gateway events for one shard until it is closed:
///   - `Ready` registers the slash commands for the application
///   - `InteractionCreate` runs the command on its own task, so a slow listing
///     fetch never holds up the shard
///   - `MessageCreate` answers the trigger word
async fn shard_runner(mut shard: Shard, ctx: Arc<ShardContext>) {
    let shard_id = shard.id().number();
    info!("(ShardRunner) Shard {shard_id} started. Listening for events.");

    while let Some(item) = shard.next_event(EventTypeFlags::all()).await {
        let event = match item {
            Ok(event) => event,
            Err(err) => {
                error!("Shard {shard_id} => error receiving event: {err:?}");
                continue;
            }
        };

        match event {
            Event::Ready(ready) => {
                let data: &ReadyPayload = &ready;
                info!(
                    "Shard {shard_id} => READY as {} (ID={})",
                    data.user.name, data.user.id
                );
                if let Err(e) = register_global_slash_commands(&ctx.http, data.application.id, ctx.top_n).await {
                    error!("Shard {shard_id} => {e}");
                }
            }
            Event::InteractionCreate(interaction) => {
                let ctx = ctx.clone();
                tokio::spawn(async move {
                    if let Err(e) = handle_interaction_create(
                        ctx.http.clone(),
                        ctx.monitor.clone(),
                        ctx.top_n,
                        &interaction,
                    )
                    .await
                    {
                        error!("Slash command handling failed: {e}");
                    }
                });
            }
            Event::MessageCreate(msg_create) => {
                let msg: &MessageCreate = &msg_create;
                if msg.author.bot {
                    trace!("Ignoring bot message from {}", msg.author.name);
                    continue;
                }
                if let Some(reply) = ctx.responder.reply_for(&msg.content) {
                    debug!("Trigger word from {} in {}", msg.author.id, msg.channel_id);
                    if let Err(e) = send_to_channel(&ctx.http, msg.channel_id, reply).await {
                        warn!("Failed to answer trigger word: {e}");
                    }
                }
            }
            other => {
                trace!("Shard {shard_id} => unhandled event: {:?}", other.kind());
            }
        }
    }

    warn!("(ShardRunner) Shard {shard_id} event loop ended.");
}

async fn send_to_channel(http: &HttpClient, channel_id: Id<ChannelMarker>, message: &str) -> Result<(), Error> {
    http.create_message(channel_id)
        .content(message)
        .await
        .map_err(|e| Error::Platform(format!("Error sending Discord message: {e:?}")))?;
    Ok(())
}

/// Gateway connection for the bot account. Inbound side only; alerts go out
/// through `DiscordDmSink`, which shares the same HTTP client.
pub struct DiscordPlatform {
    pub token: String,
    pub connection_status: ConnectionStatus,

    pub shard_tasks: Vec<JoinHandle<()>>,
    pub shard_senders: Vec<MessageSender>,

    pub http: Arc<HttpClient>,
    monitor: Arc<ServerMonitor>,
    responder: TriggerResponder,
    top_n: usize,
}

impl DiscordPlatform {
    pub fn new(
        token: String,
        http: Arc<HttpClient>,
        monitor: Arc<ServerMonitor>,
        responder: TriggerResponder,
        top_n: usize,
    ) -> Self {
        Self {
            token,
            connection_status: ConnectionStatus::Disconnected,
            shard_tasks: Vec::new(),
            shard_senders: Vec::new(),
            http,
            monitor,
            responder,
            top_n,
        }
    }

    pub async fn connect(&mut self) -> Result<(), Error> {
        if self.token.is_empty() {
            return Err(Error::Platform("Discord token is empty".into()));
        }
        if matches!(self.connection_status, ConnectionStatus::Connected) {
            info!("(DiscordPlatform) Already connected => skipping");
            return Ok(());
        }

        let config = Config::new(
            self.token.clone(),
            Intents::GUILDS | Intents::GUILD_MESSAGES | Intents::DIRECT_MESSAGES | Intents::MESSAGE_CONTENT,
        );

        let shards = gateway::create_recommended(&self.http, config, |_, b| b.build())
            .await
            .map_err(|e| Error::Platform(format!("create_recommended error: {e}")))?;

        let ctx = Arc::new(ShardContext {
            http: self.http.clone(),
            monitor: self.monitor.clone(),
            responder: self.responder.clone(),
            top_n: self.top_n,
        });

        for shard in shards {
            self.shard_senders.push(shard.sender());
            let ctx_for_shard = ctx.clone();
            let handle = tokio::spawn(async move {
                shard_runner(shard, ctx_for_shard).await;
            });
            self.shard_tasks.push(handle);
        }

        info!("(DiscordPlatform) Connected with {} shard(s)", self.shard_tasks.len());
        self.connection_status = ConnectionStatus::Connected;
        Ok(())
    }

    pub async fn disconnect(&mut self) -> Result<(), Error> {
        self.connection_status = ConnectionStatus::Disconnected;

        // Gracefully close shards
        for sender in &self.shard_senders {
            let _ = sender.close(CloseFrame::NORMAL);
        }
        for task in &mut self.shard_tasks {
            let _ = task.await;
        }

        self.shard_senders.clear();
        self.shard_tasks.clear();
        Ok(())
    }
}
