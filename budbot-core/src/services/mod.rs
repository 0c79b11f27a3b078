
// File: src/services/mod.rs

pub mod monitor_service;
pub mod message_service;
pub mod discord;

pub use monitor_service::{CycleOutcome, CycleReport, ServerMonitor};
pub use message_service::TriggerResponder;
