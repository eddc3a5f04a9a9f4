//! Background refresh of the cluster snapshot.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::AppState;

/// Refresh the session's snapshot every `every` until the task is aborted.
///
/// A failed refresh is logged and the previous snapshot stays in place.
pub fn spawn(state: AppState, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let mut session = state.session.lock().await;
            match session.refresh().await {
                Ok(snapshot) => debug!("poll: {} node(s)", snapshot.nodes().len()),
                Err(e) => warn!("poll failed: {}", e),
            }
        }
    })
}
