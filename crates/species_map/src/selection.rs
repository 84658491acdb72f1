//! Species selection state and the race-free fetch lifecycle behind it.

use std::sync::Arc;

use shared::{
    domain::{OccurrenceRecord, SpeciesName},
    error::FetchFailure,
};
use tokio::{
    sync::{watch, Mutex},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::api::{MissingOccurrenceApi, OccurrenceApi};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Snapshot published by [`SelectionController`].
///
/// `records` is only non-empty while `status` is `Ready`, and `failure` is only
/// set while `status` is `Failed`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    pub selected: Option<SpeciesName>,
    pub records: Vec<OccurrenceRecord>,
    pub status: SelectionStatus,
    pub failure: Option<FetchFailure>,
}

impl SelectionState {
    fn loading(species: SpeciesName) -> Self {
        Self {
            selected: Some(species),
            status: SelectionStatus::Loading,
            ..Self::default()
        }
    }

    fn ready(species: SpeciesName, records: Vec<OccurrenceRecord>) -> Self {
        Self {
            selected: Some(species),
            records,
            status: SelectionStatus::Ready,
            failure: None,
        }
    }

    fn failed(species: SpeciesName, failure: FetchFailure) -> Self {
        Self {
            selected: Some(species),
            records: Vec::new(),
            status: SelectionStatus::Failed,
            failure: Some(failure),
        }
    }

    pub fn mappable_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_mappable()).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Selection was emptied; no fetch was issued.
    Cleared,
    /// The fetch result was written to the state with this status.
    Committed(SelectionStatus),
    /// A later selection took over before the fetch resolved.
    Superseded,
}

struct SelectionInner {
    token: u64,
}

pub struct SelectionController {
    api: Arc<dyn OccurrenceApi>,
    inner: Mutex<SelectionInner>,
    snapshots: watch::Sender<SelectionState>,
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new(Arc::new(MissingOccurrenceApi))
    }
}

impl SelectionController {
    pub fn new(api: Arc<dyn OccurrenceApi>) -> Self {
        let (snapshots, _) = watch::channel(SelectionState::default());
        Self {
            api,
            inner: Mutex::new(SelectionInner { token: 0 }),
            snapshots,
        }
    }

    /// Selects `species` and loads its records. Only the latest selection is
    /// ever committed; results of earlier in-flight fetches are dropped.
    pub async fn select_species(&self, species: Option<SpeciesName>) -> SelectionOutcome {
        let Some(species) = species.filter(|name| !name.is_blank()) else {
            self.clear().await;
            return SelectionOutcome::Cleared;
        };

        let token = {
            let mut inner = self.inner.lock().await;
            inner.token += 1;
            self.snapshots.send_replace(SelectionState::loading(species.clone()));
            inner.token
        };
        debug!(species = %species, token, "selection loading");

        let fetched = self.api.occurrences(&species).await;

        let inner = self.inner.lock().await;
        if inner.token != token {
            debug!(
                species = %species,
                token,
                current = inner.token,
                "discarding superseded occurrence fetch"
            );
            return SelectionOutcome::Superseded;
        }

        let state = match fetched {
            Ok(records) => {
                info!(species = %species, records = records.len(), "occurrence records loaded");
                SelectionState::ready(species, records)
            }
            Err(err) => {
                warn!(species = %species, error = %err, "occurrence fetch failed");
                SelectionState::failed(species, err.into())
            }
        };
        let status = state.status;
        self.snapshots.send_replace(state);
        SelectionOutcome::Committed(status)
    }

    /// Runs [`Self::select_species`] on the tokio runtime.
    pub fn spawn_select(
        self: &Arc<Self>,
        species: Option<SpeciesName>,
    ) -> JoinHandle<SelectionOutcome> {
        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.select_species(species).await })
    }

    /// Back to `Idle`. Fetches still in flight are discarded when they land.
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        inner.token += 1;
        self.snapshots.send_replace(SelectionState::default());
        debug!(token = inner.token, "selection cleared");
    }

    pub fn state(&self) -> SelectionState {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SelectionState> {
        self.snapshots.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/selection_tests.rs"]
mod tests;
