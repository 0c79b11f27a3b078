// budbot-core/src/tasks/mod.rs
pub mod server_watch;

pub use server_watch::spawn_server_watch_task;
