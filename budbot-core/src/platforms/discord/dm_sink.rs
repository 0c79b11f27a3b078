// budbot-core/src/platforms/discord/dm_sink.rs

use std::sync::Arc;
use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, warn};
use twilight_http::Client as HttpClient;
use twilight_model::id::marker::{ChannelMarker, UserMarker};
use twilight_model::id::Id;

use budbot_common::traits::monitor_traits::NotificationSink;
use crate::Error;

/// Delivers alerts as direct messages.
///
/// DM channel ids are cached per user. A failed send evicts the cached channel,
/// so the next alert re-resolves it instead of reusing a dead one.
pub struct DiscordDmSink {
    http: Arc<HttpClient>,
    dm_channels: DashMap<Id<UserMarker>, Id<ChannelMarker>>,
}

impl DiscordDmSink {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self {
            http,
            dm_channels: DashMap::new(),
        }
    }

    async fn dm_channel(&self, user_id: Id<UserMarker>) -> Result<Id<ChannelMarker>, Error> {
        if let Some(channel_id) = self.dm_channels.get(&user_id) {
            return Ok(*channel_id);
        }

        let channel = self.http
            .create_private_channel(user_id)
            .await
            .map_err(|e| Error::Dispatch(format!("opening DM with {user_id}: {e}")))?
            .model()
            .await
            .map_err(|e| Error::Dispatch(format!("reading DM channel for {user_id}: {e}")))?;

        debug!("Resolved DM channel {} for user {}", channel.id, user_id);
        self.dm_channels.insert(user_id, channel.id);
        Ok(channel.id)
    }
}

pub(crate) fn parse_user_id(subscriber_id: &str) -> Result<Id<UserMarker>, Error> {
    subscriber_id
        .parse::<u64>()
        .ok()
        .and_then(Id::new_checked)
        .ok_or_else(|| Error::Dispatch(format!("invalid Discord user id: {subscriber_id}")))
}

#[async_trait]
impl NotificationSink for DiscordDmSink {
    async fn notify(&self, subscriber_id: &str, message: &str) -> Result<(), Error> {
        let user_id = parse_user_id(subscriber_id)?;
        let channel_id = self.dm_channel(user_id).await?;

        if let Err(e) = self.http.create_message(channel_id).content(message).await {
            warn!("DM to {} failed; forgetting channel {}", user_id, channel_id);
            self.dm_channels.remove(&user_id);
            return Err(Error::Dispatch(format!("sending DM to {user_id}: {e}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_id() {
        assert_eq!(parse_user_id("80351110224678912").unwrap().get(), 80351110224678912);
        assert!(matches!(parse_user_id("0"), Err(Error::Dispatch(_))));
        assert!(matches!(parse_user_id("not-a-user"), Err(Error::Dispatch(_))));
    }
}
