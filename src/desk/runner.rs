//! The desk event loop.

use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};

use super::ArchivesRoom;
use super::controller::DeskAction;

/// Drives the desk until every action sender is dropped.
///
/// Refreshes every queue straight away and then once per poll interval, and
/// handles actions from `actions` in between. Each refresh or action runs to
/// completion before the next event is taken, so a slow server delays the
/// next tick rather than overlapping it.
///
/// Returns the desk so callers can inspect its final state.
pub async fn run(
    mut room: ArchivesRoom,
    mut actions: mpsc::Receiver<DeskAction>,
) -> ArchivesRoom {
    let mut ticker = time::interval(room.settings().poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let report = room.refresh_all_queues().await;
                if !report.is_complete() {
                    tracing::debug!(failed = ?report.failed, "scheduled refresh incomplete");
                }
            }
            received = actions.recv() => {
                let Some(action) = received else {
                    tracing::debug!("action channel closed; stopping desk");
                    break;
                };
                if let Err(error) = room.dispatch(action).await {
                    tracing::debug!(%error, "desk action ended with an error");
                }
            }
        }
    }

    room
}
