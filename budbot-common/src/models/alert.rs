use crate::models::{ServerRecord, WatchRule};

/// A record that satisfied one of a subscriber's rules during a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMatch {
    pub record: ServerRecord,
    pub rule: WatchRule,
}

impl AlertMatch {
    /// Message body sent to the subscriber.
    pub fn message(&self) -> String {
        format!(
            "{} is well populated with {} players!",
            self.record.name, self.record.current_players
        )
    }
}
