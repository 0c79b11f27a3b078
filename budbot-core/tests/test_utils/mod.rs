// File: budbot-core/tests/test_utils/mod.rs
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use chrono::Duration;

use budbot_common::models::RuleMap;
use budbot_common::traits::monitor_traits::{ListingSource, NotificationSink};
use budbot_common::traits::repository_traits::PreferenceRepository;
use budbot_core::alerting::AlertDeduper;
use budbot_core::listing::{HtmlListingExtractor, ListingMarkers};
use budbot_core::repositories::RuleStore;
use budbot_core::{Error, ServerMonitor};

/// Listing source whose next response the test controls.
pub struct ScriptedSource {
    body: Mutex<Result<String, String>>,
    pub fetches: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(body: String) -> Self {
        Self {
            body: Mutex::new(Ok(body)),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn set_body(&self, body: String) {
        *self.body.lock().unwrap() = Ok(body);
    }

    pub fn set_failure(&self, reason: &str) {
        *self.body.lock().unwrap() = Err(reason.to_string());
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ListingSource for ScriptedSource {
    async fn fetch(&self) -> Result<String, Error> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.body.lock().unwrap().clone().map_err(Error::Transport)
    }
}

/// Records every delivered message; subscribers marked unreachable get a dispatch error.
#[derive(Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<(String, String)>>,
    unreachable: Mutex<HashSet<String>>,
}

impl RecordingSink {
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, subscriber_id: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|(id, _)| id == subscriber_id)
            .map(|(_, msg)| msg)
            .collect()
    }

    pub fn set_unreachable(&self, subscriber_id: &str, unreachable: bool) {
        let mut set = self.unreachable.lock().unwrap();
        if unreachable {
            set.insert(subscriber_id.to_string());
        } else {
            set.remove(subscriber_id);
        }
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn notify(&self, subscriber_id: &str, message: &str) -> Result<(), Error> {
        if self.unreachable.lock().unwrap().contains(subscriber_id) {
            return Err(Error::Dispatch(format!("{subscriber_id} is unreachable")));
        }
        self.sent
            .lock()
            .unwrap()
            .push((subscriber_id.to_string(), message.to_string()));
        Ok(())
    }
}

/// Sink whose deliveries hang: for `delay` when set, forever otherwise.
pub struct StallingSink {
    delay: Option<std::time::Duration>,
    started: AtomicUsize,
    sent: Mutex<Vec<(String, String)>>,
}

impl StallingSink {
    pub fn new(delay: Option<std::time::Duration>) -> Self {
        Self {
            delay,
            started: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Deliveries that have begun, finished or not.
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn sent_to(&self, subscriber_id: &str) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| id == subscriber_id)
            .map(|(_, msg)| msg.clone())
            .collect()
    }
}

#[async_trait]
impl NotificationSink for StallingSink {
    async fn notify(&self, subscriber_id: &str, message: &str) -> Result<(), Error> {
        self.started.fetch_add(1, Ordering::SeqCst);
        match self.delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => std::future::pending::<()>().await,
        }
        self.sent
            .lock()
            .unwrap()
            .push((subscriber_id.to_string(), message.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryPreferenceRepository {
    pub saved: Mutex<RuleMap>,
}

#[async_trait]
impl PreferenceRepository for MemoryPreferenceRepository {
    async fn load(&self) -> Result<RuleMap, Error> {
        Ok(self.saved.lock().unwrap().clone())
    }

    async fn save(&self, rules: &RuleMap) -> Result<(), Error> {
        *self.saved.lock().unwrap() = rules.clone();
        Ok(())
    }
}

/// Builds a listing page in the same shape as the live server list.
pub fn listing_html(rows: &[(&str, &str, &str)]) -> String {
    let body: String = rows
        .iter()
        .map(|(name, map, players)| {
            format!(
                "<tr class=\"serverlistrow\">\
                 <td><img src=\"us.png\"></td><td>{name}</td><td>1.2.3.4:29070</td>\
                 <td>Open</td><td>MB2</td><td>{map}</td><td>{players}</td></tr>\n"
            )
        })
        .collect();
    format!(
        "<html><body><table id=\"servers\">\
         <tr><th></th><th>Name</th><th>Address</th><th>Mode</th><th>Game</th><th>Map</th><th>Players</th></tr>\n\
         {body}</table></body></html>"
    )
}

/// Monitor wired with the real HTML extractor, an in-memory rule file and a 1800s cooldown.
pub async fn build_monitor<S: NotificationSink + 'static>(
    source: Arc<ScriptedSource>,
    sink: Arc<S>,
) -> Arc<ServerMonitor> {
    let repo = Arc::new(MemoryPreferenceRepository::default());
    let rules = Arc::new(RuleStore::load(repo).await.expect("memory repo never fails"));
    Arc::new(ServerMonitor::new(
        source,
        Arc::new(HtmlListingExtractor::new(ListingMarkers::default()).expect("default markers are valid")),
        rules,
        AlertDeduper::new(Duration::seconds(1800)),
        sink,
    ))
}
