// File: budbot-common/src/models/mod.rs
pub mod server;
pub mod watch_rule;
pub mod alert;

pub use server::ServerRecord;
pub use watch_rule::{RuleMap, SubscriberId, SubscriberRules, WatchRule};
pub use alert::AlertMatch;
