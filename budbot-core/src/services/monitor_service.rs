// budbot-core/src/services/monitor_service.rs

use std::sync::Arc;
use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use budbot_common::models::{ServerRecord, WatchRule};
use budbot_common::traits::monitor_traits::{ListingSource, NotificationSink, RecordExtractor};
use crate::alerting::{match_rules, AlertDeduper};
use crate::repositories::RuleStore;
use crate::Error;

pub const FETCH_FAILED_MESSAGE: &str = "Failed to retrieve server data.";

/// How a cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The listing could not be fetched; nothing was evaluated.
    FetchFailed(String),
    Completed,
}

/// Counters for one fetch => extract => match => notify pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub outcome: CycleOutcome,
    pub records: usize,
    pub subscribers: usize,
    pub matches: usize,
    pub notified: usize,
    pub suppressed: usize,
    pub failed: usize,
}

impl CycleReport {
    fn new(outcome: CycleOutcome) -> Self {
        Self {
            outcome,
            records: 0,
            subscribers: 0,
            matches: 0,
            notified: 0,
            suppressed: 0,
            failed: 0,
        }
    }
}

/// Owns the monitoring collaborators and serves both entry points:
/// the periodic cycle and the chat commands.
pub struct ServerMonitor {
    source: Arc<dyn ListingSource>,
    extractor: Arc<dyn RecordExtractor>,
    rules: Arc<RuleStore>,
    deduper: AlertDeduper,
    sink: Arc<dyn NotificationSink>,
}

impl ServerMonitor {
    pub fn new(
        source: Arc<dyn ListingSource>,
        extractor: Arc<dyn RecordExtractor>,
        rules: Arc<RuleStore>,
        deduper: AlertDeduper,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            source,
            extractor,
            rules,
            deduper,
            sink,
        }
    }

    pub fn deduper(&self) -> &AlertDeduper {
        &self.deduper
    }

    /// Runs one full cycle against a single fetch of the listing.
    ///
    /// Never fails: a fetch error skips the cycle, a dispatch error only affects
    /// the subscriber it happened for. A pair is marked notified right after its
    /// dispatch succeeds, with no await in between.
    pub async fn run_cycle(&self, now: DateTime<Utc>) -> CycleReport {
        debug!("Server watch cycle starting");

        let raw = match self.source.fetch().await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Server watch: listing fetch failed, skipping cycle: {}", e);
                return CycleReport::new(CycleOutcome::FetchFailed(e.to_string()));
            }
        };

        let records = self.extractor.extract(&raw);
        let subscribers = self.rules.snapshot().await;
        self.deduper.prune(now);

        let mut report = CycleReport::new(CycleOutcome::Completed);
        report.records = records.len();
        report.subscribers = subscribers.len();

        for (subscriber_id, keyword_map) in &subscribers {
            let rules = WatchRule::from_map(keyword_map);
            for hit in match_rules(&rules, &records) {
                report.matches += 1;

                if !self.deduper.should_notify(subscriber_id, &hit.record.name, now) {
                    report.suppressed += 1;
                    continue;
                }

                match self.sink.notify(subscriber_id, &hit.message()).await {
                    Ok(()) => {
                        self.deduper.mark_notified(subscriber_id, &hit.record.name, now);
                        report.notified += 1;
                        info!(
                            "Alerted {} about '{}' ({} players, keyword '{}')",
                            subscriber_id, hit.record.name, hit.record.current_players, hit.rule.keyword
                        );
                    }
                    Err(e) => {
                        report.failed += 1;
                        if e.is_recoverable() {
                            warn!("Could not alert {}; retrying next cycle: {}", subscriber_id, e);
                        } else {
                            error!("Could not alert {}: {}", subscriber_id, e);
                        }
                        break;
                    }
                }
            }
        }

        info!(
            "Server watch cycle done: records={} subscribers={} matches={} notified={} suppressed={} failed={}",
            report.records, report.subscribers, report.matches, report.notified, report.suppressed, report.failed
        );
        report
    }

    // ------------------------------------------------------------------
    // Command surface
    // ------------------------------------------------------------------

    /// `/setalert`: returns the acknowledgment text, or an error if the rule was not stored.
    pub async fn set_alert(&self, subscriber_id: &str, keyword: &str, threshold: i64) -> Result<String, Error> {
        let threshold = u32::try_from(threshold)
            .map_err(|_| Error::InvalidInput(format!("threshold must be between 0 and {}", u32::MAX)))?;
        let keyword = keyword.trim();
        self.rules.set_rule(subscriber_id, keyword, threshold).await?;
        Ok(format!("Alert set for {keyword} at population threshold {threshold}."))
    }

    /// `/stopalert`
    pub async fn stop_alert(&self, subscriber_id: &str) -> Result<String, Error> {
        if self.rules.remove_all_rules(subscriber_id).await? {
            Ok("Your alerts have been stopped.".to_string())
        } else {
            Ok("You have no active alerts.".to_string())
        }
    }

    /// Fresh fetch, first `n` records in listing order.
    pub async fn top_servers(&self, n: usize) -> Result<Vec<ServerRecord>, Error> {
        let raw = self.source.fetch().await?;
        let mut records = self.extractor.extract(&raw);
        records.truncate(n);
        Ok(records)
    }

    /// `/serverlist`: formatted top `n`, or an explicit failure message. Never a stale list.
    pub async fn list_top(&self, n: usize) -> String {
        match self.top_servers(n).await {
            Ok(records) => format_top_list(n, &records),
            Err(e) => {
                warn!("Server list request failed: {}", e);
                FETCH_FAILED_MESSAGE.to_string()
            }
        }
    }
}

pub fn format_top_list(n: usize, records: &[ServerRecord]) -> String {
    let mut out = format!("Top {n} Most Populated Servers:");
    if records.is_empty() {
        out.push_str("\n(no servers listed)");
    }
    for (idx, rec) in records.iter().enumerate() {
        out.push_str(&format!(
            "\n{}) {}    {}    {}",
            idx + 1,
            rec.name,
            rec.map,
            rec.players_display()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use budbot_common::models::RuleMap;
    use budbot_common::traits::repository_traits::PreferenceRepository;
    use chrono::{Duration, TimeZone};
    use mockall::mock;

    mock! {
        pub Sink {}

        #[async_trait]
        impl NotificationSink for Sink {
            async fn notify(&self, subscriber_id: &str, message: &str) -> Result<(), Error>;
        }
    }

    struct FixedSource(Result<Vec<ServerRecord>, String>);

    #[async_trait]
    impl ListingSource for FixedSource {
        async fn fetch(&self) -> Result<String, Error> {
            self.0
                .as_ref()
                .map(|_| String::new())
                .map_err(|e| Error::Transport(e.clone()))
        }
    }

    /// Ignores the raw text and hands back the records the source was built with.
    struct PassThrough(Vec<ServerRecord>);

    impl RecordExtractor for PassThrough {
        fn extract(&self, _raw: &str) -> Vec<ServerRecord> {
            self.0.clone()
        }
    }

    struct NullRepo;

    #[async_trait]
    impl PreferenceRepository for NullRepo {
        async fn load(&self) -> Result<RuleMap, Error> {
            Ok(RuleMap::new())
        }
        async fn save(&self, _rules: &RuleMap) -> Result<(), Error> {
            Ok(())
        }
    }

    fn rec(name: &str, players: u32) -> ServerRecord {
        ServerRecord {
            name: name.into(),
            map: "mb2_duel".into(),
            current_players: players,
            capacity: Some(32),
        }
    }

    async fn monitor(records: Result<Vec<ServerRecord>, String>, sink: MockSink) -> ServerMonitor {
        let extracted = records.clone().unwrap_or_default();
        let rules = Arc::new(RuleStore::load(Arc::new(NullRepo)).await.unwrap());
        ServerMonitor::new(
            Arc::new(FixedSource(records)),
            Arc::new(PassThrough(extracted)),
            rules,
            AlertDeduper::new(Duration::seconds(1800)),
            Arc::new(sink),
        )
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_several_rules_on_one_server_send_one_alert() {
        let mut sink = MockSink::new();
        sink.expect_notify()
            .withf(|id, msg| id == "u1" && msg == "EU Duel Arena is well populated with 12 players!")
            .times(1)
            .returning(|_, _| Ok(()));

        let monitor = monitor(Ok(vec![rec("EU Duel Arena", 12)]), sink).await;
        monitor.set_alert("u1", "Duel", 10).await.unwrap();
        monitor.set_alert("u1", "EU", 1).await.unwrap();

        let report = monitor.run_cycle(t0()).await;
        assert_eq!(report.matches, 2);
        assert_eq!(report.notified, 1);
        assert_eq!(report.suppressed, 1);
    }

    #[tokio::test]
    async fn test_failed_dispatch_is_retried_next_cycle() {
        let mut sink = MockSink::new();
        let mut seq = mockall::Sequence::new();
        sink.expect_notify()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(Error::Dispatch("dm closed".into())));
        sink.expect_notify()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        let monitor = monitor(Ok(vec![rec("EU Duel Arena", 12)]), sink).await;
        monitor.set_alert("u1", "Duel", 10).await.unwrap();

        let first = monitor.run_cycle(t0()).await;
        assert_eq!(first.failed, 1);
        assert!(monitor.deduper().is_empty());

        let second = monitor.run_cycle(t0() + Duration::seconds(60)).await;
        assert_eq!(second.notified, 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_cycle() {
        let mut sink = MockSink::new();
        sink.expect_notify().never();

        let monitor = monitor(Err("503".into()), sink).await;
        monitor.set_alert("u1", "Duel", 0).await.unwrap();

        let report = monitor.run_cycle(t0()).await;
        assert!(matches!(report.outcome, CycleOutcome::FetchFailed(_)));
        assert_eq!(report.notified, 0);
    }

    #[tokio::test]
    async fn test_negative_threshold_rejected() {
        let monitor = monitor(Ok(vec![]), MockSink::new()).await;
        let err = monitor.set_alert("u1", "Duel", -1).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_set_and_stop_acknowledgments() {
        let monitor = monitor(Ok(vec![]), MockSink::new()).await;
        assert_eq!(
            monitor.set_alert("u1", " Duel ", 10).await.unwrap(),
            "Alert set for Duel at population threshold 10."
        );
        assert_eq!(monitor.stop_alert("u1").await.unwrap(), "Your alerts have been stopped.");
        assert_eq!(monitor.stop_alert("u1").await.unwrap(), "You have no active alerts.");
    }

    #[tokio::test]
    async fn test_list_top_failure_message() {
        let monitor = monitor(Err("timeout".into()), MockSink::new()).await;
        assert_eq!(monitor.list_top(5).await, FETCH_FAILED_MESSAGE);
    }

    #[test]
    fn test_format_top_list() {
        let mut second = rec("US Open", 3);
        second.capacity = None;
        let text = format_top_list(5, &[rec("EU Duel Arena", 12), second]);
        assert_eq!(
            text,
            "Top 5 Most Populated Servers:\n1) EU Duel Arena    mb2_duel    12/32\n2) US Open    mb2_duel    3"
        );
    }
}
