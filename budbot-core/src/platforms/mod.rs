// budbot-core/src/platforms/mod.rs

pub mod discord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}
