// src/config.rs

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_LISTING_URL: &str = "https://servers.moviebattles.org";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_ALERT_COOLDOWN_SECS: i64 = 1800;
pub const DEFAULT_TOP_N: usize = 5;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_PREFERENCES_PATH: &str = "preferences.json";

/// Runtime knobs for the monitor. The binary fills this from CLI args.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub listing_url: String,
    pub poll_interval: Duration,
    /// Minimum gap between two alerts for the same (subscriber, server). Compared with `>`.
    pub alert_cooldown: chrono::Duration,
    pub top_n: usize,
    pub request_timeout: Duration,
    pub preferences_path: PathBuf,
    pub trigger_word: String,
    pub trigger_reply: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            alert_cooldown: chrono::Duration::seconds(DEFAULT_ALERT_COOLDOWN_SECS),
            top_n: DEFAULT_TOP_N,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            preferences_path: PathBuf::from(DEFAULT_PREFERENCES_PATH),
            trigger_word: "bud".to_string(),
            trigger_reply: "huh".to_string(),
        }
    }
}

/// Negative values are treated as zero.
pub fn cooldown_from_secs(secs: i64) -> chrono::Duration {
    chrono::Duration::seconds(secs.max(0))
}
