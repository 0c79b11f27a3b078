use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

/// Opaque, stable platform user id (a Discord snowflake rendered as a string).
pub type SubscriberId = String;

/// keyword => threshold for a single subscriber.
pub type SubscriberRules = BTreeMap<String, u32>;

/// The full persisted mapping: subscriber => (keyword => threshold).
pub type RuleMap = BTreeMap<SubscriberId, SubscriberRules>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchRule {
    pub keyword: String,
    pub threshold: u32,
}

impl WatchRule {
    pub fn new(keyword: impl Into<String>, threshold: u32) -> Self {
        Self {
            keyword: keyword.into(),
            threshold,
        }
    }

    /// Expands a subscriber's keyword map into rules, in keyword order.
    pub fn from_map(rules: &SubscriberRules) -> Vec<WatchRule> {
        rules
            .iter()
            .map(|(keyword, threshold)| WatchRule::new(keyword.clone(), *threshold))
            .collect()
    }
}
