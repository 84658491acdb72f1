use shared::domain::SpeciesName;
use tracing::{error, info};

use crate::api::OccurrenceApi;

pub const SELECTOR_LOADING: &str = "Loading names...";
pub const SELECTOR_PROMPT: &str = "-- Select a Species --";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogStatus {
    Loading,
    Ready,
    Failed,
}

/// Species names offered by the selector, in server order.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesCatalog {
    names: Vec<SpeciesName>,
    status: CatalogStatus,
}

impl SpeciesCatalog {
    /// Catalog shown before the first load completes.
    pub fn pending() -> Self {
        Self {
            names: Vec::new(),
            status: CatalogStatus::Loading,
        }
    }

    pub async fn load(api: &dyn OccurrenceApi) -> Self {
        match api.species_names().await {
            Ok(names) => {
                info!(count = names.len(), "species catalog loaded");
                Self {
                    names,
                    status: CatalogStatus::Ready,
                }
            }
            Err(err) => {
                error!(error = %err, "failed to load species catalog");
                Self {
                    names: Vec::new(),
                    status: CatalogStatus::Failed,
                }
            }
        }
    }

    pub fn names(&self) -> &[SpeciesName] {
        &self.names
    }

    pub fn status(&self) -> CatalogStatus {
        self.status
    }

    pub fn contains(&self, name: &SpeciesName) -> bool {
        self.names.contains(name)
    }

    /// Label of the empty selector option.
    pub fn placeholder(&self) -> &'static str {
        match self.status {
            CatalogStatus::Loading => SELECTOR_LOADING,
            CatalogStatus::Ready | CatalogStatus::Failed => SELECTOR_PROMPT,
        }
    }
}
