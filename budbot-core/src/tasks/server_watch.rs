// budbot-core/src/tasks/server_watch.rs

use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::services::monitor_service::{CycleOutcome, ServerMonitor};

/// Spawns the background task that runs a monitor cycle every `period`.
///
/// The first cycle starts immediately. Cycles never overlap: a tick that comes
/// due while a cycle is still running is skipped. The loop ends when `shutdown`
/// is set to `true` (or its sender is dropped); an in-flight cycle is abandoned
/// at its next await point.
pub fn spawn_server_watch_task(
    monitor: Arc<ServerMonitor>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Server watch task started (every {:?})", period);
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = shutdown_requested(&mut shutdown) => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                biased;
                _ = shutdown_requested(&mut shutdown) => {
                    info!("Server watch: shutdown requested mid-cycle; abandoning it");
                    break;
                }
                report = monitor.run_cycle(Utc::now()) => {
                    if let CycleOutcome::FetchFailed(reason) = &report.outcome {
                        warn!("Server watch: no data this cycle ({})", reason);
                    } else {
                        debug!("Server watch: {:?}", report);
                    }
                }
            }
        }

        info!("Server watch task stopped");
    })
}

/// Resolves once the flag reads `true`. Updates that leave it `false` are ignored.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    // A dropped sender can never flip the flag, so it counts as shutdown too.
    let _ = shutdown.wait_for(|stop| *stop).await;
}
