pub mod runtime;
pub mod dm_sink;

pub use runtime::DiscordPlatform;
pub use dm_sink::DiscordDmSink;
