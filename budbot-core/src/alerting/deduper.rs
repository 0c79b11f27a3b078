// budbot-core/src/alerting/deduper.rs

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

/// Remembers when each (subscriber, server name) pair was last alerted.
///
/// In-memory only; a restart forgets everything and alerts may repeat once.
pub struct AlertDeduper {
    cooldown: Duration,
    last_notified: DashMap<(String, String), DateTime<Utc>>,
}

impl AlertDeduper {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_notified: DashMap::new(),
        }
    }

    /// True if the pair was never alerted, or strictly more than `cooldown` has passed.
    pub fn should_notify(&self, subscriber_id: &str, server_name: &str, now: DateTime<Utc>) -> bool {
        match self.last_notified.get(&key(subscriber_id, server_name)) {
            Some(last) => now - *last > self.cooldown,
            None => true,
        }
    }

    /// Call only after the notification was actually delivered.
    pub fn mark_notified(&self, subscriber_id: &str, server_name: &str, now: DateTime<Utc>) {
        self.last_notified.insert(key(subscriber_id, server_name), now);
    }

    /// Drops entries that no longer suppress anything.
    pub fn prune(&self, now: DateTime<Utc>) {
        let cooldown = self.cooldown;
        self.last_notified.retain(|_, last| now - *last <= cooldown);
    }

    pub fn len(&self) -> usize {
        self.last_notified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_notified.is_empty()
    }
}

fn key(subscriber_id: &str, server_name: &str) -> (String, String) {
    (subscriber_id.to_string(), server_name.to_string())
}
