// budbot-core/src/repositories/rule_store.rs

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use budbot_common::models::{RuleMap, SubscriberRules};
use budbot_common::traits::repository_traits::PreferenceRepository;
use crate::Error;

/// In-memory subscriber rules, kept in lockstep with a `PreferenceRepository`.
///
/// Every mutation saves the complete candidate mapping first and only swaps it
/// in once the save succeeded, so memory never gets ahead of the durable copy.
/// The lock is held across the save, which serializes writers.
pub struct RuleStore {
    rules: Mutex<RuleMap>,
    repo: Arc<dyn PreferenceRepository>,
}

impl RuleStore {
    /// Loads the current mapping from `repo`.
    pub async fn load(repo: Arc<dyn PreferenceRepository>) -> Result<Self, Error> {
        let rules = repo.load().await?;
        info!("RuleStore: loaded alerts for {} subscribers", rules.len());
        Ok(Self {
            rules: Mutex::new(rules),
            repo,
        })
    }

    /// Cloned view of every subscriber's rules.
    pub async fn get_all(&self) -> RuleMap {
        self.rules.lock().await.clone()
    }

    /// Subscribers with at least one rule. Used once per cycle so every subscriber
    /// is matched against the same view.
    pub async fn snapshot(&self) -> RuleMap {
        let guard = self.rules.lock().await;
        guard
            .iter()
            .filter(|(_, rules)| !rules.is_empty())
            .map(|(id, rules)| (id.clone(), rules.clone()))
            .collect()
    }

    pub async fn rules_for(&self, subscriber_id: &str) -> SubscriberRules {
        self.rules
            .lock()
            .await
            .get(subscriber_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Adds the rule, or overwrites the threshold if the keyword is already watched.
    pub async fn set_rule(&self, subscriber_id: &str, keyword: &str, threshold: u32) -> Result<(), Error> {
        if keyword.trim().is_empty() {
            return Err(Error::InvalidInput("keyword must not be blank".into()));
        }

        let mut guard = self.rules.lock().await;
        let mut candidate = guard.clone();
        candidate
            .entry(subscriber_id.to_string())
            .or_default()
            .insert(keyword.to_string(), threshold);

        self.persist(&candidate).await?;
        *guard = candidate;
        info!("RuleStore: {} watches '{}' at {} players", subscriber_id, keyword, threshold);
        Ok(())
    }

    /// Drops every rule for the subscriber. Returns `false` (and writes nothing) if there were none.
    pub async fn remove_all_rules(&self, subscriber_id: &str) -> Result<bool, Error> {
        let mut guard = self.rules.lock().await;
        if !guard.contains_key(subscriber_id) {
            return Ok(false);
        }

        let mut candidate = guard.clone();
        candidate.remove(subscriber_id);

        self.persist(&candidate).await?;
        *guard = candidate;
        info!("RuleStore: removed all alerts for {}", subscriber_id);
        Ok(true)
    }

    async fn persist(&self, candidate: &RuleMap) -> Result<(), Error> {
        self.repo.save(candidate).await.map_err(|e| {
            warn!("RuleStore: save failed, keeping previous rules: {}", e);
            match e {
                Error::Persistence(msg) => Error::Persistence(msg),
                other => Error::Persistence(other.to_string()),
            }
        })
    }
}
