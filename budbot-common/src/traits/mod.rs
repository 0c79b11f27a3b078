pub mod monitor_traits;
pub mod repository_traits;
