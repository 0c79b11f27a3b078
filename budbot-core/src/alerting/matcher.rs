// budbot-core/src/alerting/matcher.rs

use budbot_common::models::{AlertMatch, ServerRecord, WatchRule};

/// True when `keyword` appears in `record.name` (ignoring case) and the server
/// has at least `threshold` players.
pub fn rule_matches(rule: &WatchRule, record: &ServerRecord) -> bool {
    record.current_players >= rule.threshold
        && record.name.to_lowercase().contains(&rule.keyword.to_lowercase())
}

/// Every (record, rule) pair that matches, rule-major then in listing order.
///
/// A record that satisfies several rules shows up once per rule; collapsing
/// those is the deduper's job.
pub fn match_rules(rules: &[WatchRule], records: &[ServerRecord]) -> Vec<AlertMatch> {
    rules
        .iter()
        .flat_map(|rule| {
            records
                .iter()
                .filter(move |record| rule_matches(rule, record))
                .map(move |record| AlertMatch {
                    record: record.clone(),
                    rule: rule.clone(),
                })
        })
        .collect()
}
