// src/lib.rs

pub mod config;
pub mod http;
pub mod listing;
pub mod repositories;
pub mod alerting;
pub mod services;
pub mod platforms;
pub mod tasks;

pub use budbot_common::error::Error;
pub use config::MonitorConfig;
pub use http::{DefaultHttpClient, HttpClient};
pub use services::monitor_service::ServerMonitor;
