use serde::{Deserialize, Serialize};

/// One row of the remote server listing, rebuilt on every fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerRecord {
    pub name: String,
    pub map: String,
    pub current_players: u32,
    /// `None` when the listing did not show a usable capacity.
    pub capacity: Option<u32>,
}

impl ServerRecord {
    /// Player count as shown to users: `12/32`, or just `12` without a capacity.
    pub fn players_display(&self) -> String {
        match self.capacity {
            Some(cap) => format!("{}/{}", self.current_players, cap),
            None => self.current_players.to_string(),
        }
    }
}
