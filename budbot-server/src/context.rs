//! budbot-server/src/context.rs
//!
//! Builds the server context: the monitor, its collaborators, and the Discord gateway.

use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use twilight_http::Client as DiscordHttp;

use budbot_core::alerting::AlertDeduper;
use budbot_core::listing::{HtmlListingExtractor, HttpListingSource, ListingMarkers};
use budbot_core::platforms::discord::{DiscordDmSink, DiscordPlatform};
use budbot_core::repositories::{JsonFilePreferenceRepository, RuleStore};
use budbot_core::services::TriggerResponder;
use budbot_core::{DefaultHttpClient, Error, MonitorConfig, ServerMonitor};

use crate::Args;

pub struct ServerContext {
    pub config: MonitorConfig,
    pub monitor: Arc<ServerMonitor>,
    pub discord: DiscordPlatform,
}

impl ServerContext {
    pub async fn new(args: &Args) -> Result<Self, Error> {
        let config = args.monitor_config();
        let token = args.discord_token()?;

        // 1) Rules survive restarts; a corrupt file stops startup here.
        let repo = Arc::new(JsonFilePreferenceRepository::new(config.preferences_path.clone()));
        let rules = Arc::new(RuleStore::load(repo).await?);

        // 2) Listing fetch + extraction
        let http = Arc::new(DefaultHttpClient::new(config.request_timeout)?);
        let source = Arc::new(HttpListingSource::new(http, config.listing_url.clone()));
        let extractor = Arc::new(HtmlListingExtractor::new(ListingMarkers::default())?);

        // 3) Alerts leave through Discord DMs
        let discord_http = Arc::new(
            DiscordHttp::builder()
                .token(token.clone())
                .timeout(Duration::from_secs(30))
                .build(),
        );
        let sink = Arc::new(DiscordDmSink::new(discord_http.clone()));

        let monitor = Arc::new(ServerMonitor::new(
            source,
            extractor,
            rules,
            AlertDeduper::new(config.alert_cooldown),
            sink,
        ));

        let discord = DiscordPlatform::new(
            token,
            discord_http,
            monitor.clone(),
            TriggerResponder::new(&config.trigger_word, &config.trigger_reply),
            config.top_n,
        );

        info!("Server context ready (listing={}, every {:?})", config.listing_url, config.poll_interval);
        Ok(Self {
            config,
            monitor,
            discord,
        })
    }
}
