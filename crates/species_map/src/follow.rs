use std::sync::Arc;

use shared::domain::OccurrenceRecord;
use tokio::sync::watch;
use tracing::debug;

use crate::{
    map::{MapHandle, MapSynchronizer},
    selection::SelectionState,
};

/// Re-syncs `handle` each time the published records change, one sync at a
/// time. Returns the handle once the controller is gone.
pub async fn follow_selection(
    synchronizer: Arc<MapSynchronizer>,
    mut handle: MapHandle,
    mut snapshots: watch::Receiver<SelectionState>,
) -> MapHandle {
    let mut synced: Option<Vec<OccurrenceRecord>> = None;
    loop {
        let records = snapshots.borrow_and_update().records.clone();
        if synced.as_ref() != Some(&records) {
            synchronizer.sync(&mut handle, &records);
            synced = Some(records);
        }
        if snapshots.changed().await.is_err() {
            debug!(surface = %handle.surface(), "selection closed, map follower stopping");
            return handle;
        }
    }
}

#[cfg(test)]
#[path = "tests/follow_tests.rs"]
mod tests;
