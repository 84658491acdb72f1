//! "Latest sighting" panel content derived from the selection state.

use shared::domain::{OccurrenceRecord, SpeciesName};

use crate::{
    display::{event_date_or_na, quantity_or_na, text_or_na},
    selection::{SelectionState, SelectionStatus},
};

pub const DETAILS_PLACEHOLDER: &str =
    "Select a species to see its details and locations on the map.";
pub const DETAILS_LOADING: &str = "Loading details...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SightingDetails {
    pub country: String,
    pub locality: String,
    pub date: String,
    pub quantity: String,
    pub basis_of_record: String,
}

impl SightingDetails {
    pub fn from_record(record: &OccurrenceRecord, date_format: &str) -> Self {
        Self {
            country: text_or_na(record.country.as_deref()),
            locality: text_or_na(record.locality.as_deref()),
            date: event_date_or_na(record.event_date, date_format),
            quantity: quantity_or_na(record.organism_quantity),
            basis_of_record: text_or_na(record.basis_of_record.as_deref()),
        }
    }

    /// Label/value pairs in display order.
    pub fn rows(&self) -> [(&'static str, &str); 5] {
        [
            ("Country", self.country.as_str()),
            ("Locality", self.locality.as_str()),
            ("Date", self.date.as_str()),
            ("Quantity", self.quantity.as_str()),
            ("Basis of Record", self.basis_of_record.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailsView {
    Placeholder,
    Loading,
    Failed { species: SpeciesName, reason: String },
    Latest(SightingDetails),
}

impl DetailsView {
    /// Records arrive newest first, so the first one is the latest sighting.
    pub fn from_state(state: &SelectionState, date_format: &str) -> Self {
        match state.status {
            SelectionStatus::Idle => Self::Placeholder,
            SelectionStatus::Loading => Self::Loading,
            SelectionStatus::Failed => Self::Failed {
                species: state.selected.clone().unwrap_or_default(),
                reason: state
                    .failure
                    .as_ref()
                    .map(|failure| failure.message.clone())
                    .unwrap_or_default(),
            },
            SelectionStatus::Ready => state
                .records
                .first()
                .map(|record| Self::Latest(SightingDetails::from_record(record, date_format)))
                .unwrap_or(Self::Placeholder),
        }
    }

    /// Single-line text for every variant except `Latest`.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Placeholder => Some(DETAILS_PLACEHOLDER.to_string()),
            Self::Loading => Some(DETAILS_LOADING.to_string()),
            Self::Failed { species, reason } if reason.is_empty() => {
                Some(format!("Could not load sightings for {species}."))
            }
            Self::Failed { species, reason } => {
                Some(format!("Could not load sightings for {species}: {reason}"))
            }
            Self::Latest(_) => None,
        }
    }
}
