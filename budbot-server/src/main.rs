use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use budbot_core::config::{
    DEFAULT_ALERT_COOLDOWN_SECS, DEFAULT_LISTING_URL, DEFAULT_PREFERENCES_PATH, DEFAULT_TOP_N,
};
use budbot_core::tasks::spawn_server_watch_task;
use budbot_core::{Error, MonitorConfig};

mod context;
use context::ServerContext;

#[derive(Parser, Debug, Clone)]
#[command(name = "budbot")]
#[command(author, version, about = "BudBot - game server population alerts for Discord")]
pub struct Args {
    /// Server listing page to watch
    #[arg(long, default_value = DEFAULT_LISTING_URL)]
    listing_url: String,

    /// Where subscriber alerts are stored
    #[arg(long, default_value = DEFAULT_PREFERENCES_PATH)]
    preferences: PathBuf,

    /// Minutes between listing checks
    #[arg(long, default_value_t = 30)]
    poll_minutes: u64,

    /// Seconds before the same server can alert the same user again
    #[arg(long, default_value_t = DEFAULT_ALERT_COOLDOWN_SECS)]
    cooldown_secs: i64,

    /// How many servers `/serverlist` shows
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    top_n: usize,

    /// Discord bot token (falls back to DISCORD_TOKEN)
    #[arg(long)]
    token: Option<String>,
}

impl Args {
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            listing_url: self.listing_url.clone(),
            poll_interval: Duration::from_secs(self.poll_minutes.max(1) * 60),
            alert_cooldown: budbot_core::config::cooldown_from_secs(self.cooldown_secs),
            top_n: self.top_n,
            preferences_path: self.preferences.clone(),
            ..MonitorConfig::default()
        }
    }

    pub fn discord_token(&self) -> Result<String, Error> {
        self.token
            .clone()
            .or_else(|| std::env::var("DISCORD_TOKEN").ok())
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| Error::InvalidInput("no Discord token (use --token or DISCORD_TOKEN)".into()))
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("budbot=info,budbot_core=info,budbot_server=info"));
    let sub = fmt().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(sub) {
        eprintln!("Failed to set global subscriber: {e}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();
    let args = Args::parse();
    info!("BudBot starting. listing={}", args.listing_url);

    if let Err(e) = run_server(args).await {
        error!("Server error: {:?}", e);
        return Err(e.into());
    }
    info!("Main finished. Goodbye!");
    Ok(())
}

async fn run_server(args: Args) -> Result<(), Error> {
    let mut ctx = ServerContext::new(&args).await?;

    ctx.discord.connect().await?;
    info!("Bud Bot Online");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let watch_handle = spawn_server_watch_task(
        ctx.monitor.clone(),
        ctx.config.poll_interval,
        shutdown_rx,
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for Ctrl-C ({e}); shutting down");
    }
    info!("Shutdown requested");

    let _ = shutdown_tx.send(true);
    ctx.discord.disconnect().await?;
    if let Err(e) = watch_handle.await {
        error!("Server watch task ended abnormally: {e}");
    }
    Ok(())
}
