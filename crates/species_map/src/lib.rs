//! Species occurrence browsing core.
//!
//! [`SelectionController`] turns a species choice into a record set, and
//! [`MapSynchronizer`] projects that set onto a map through a
//! [`map::MapRenderer`]. [`follow_selection`] wires the two together.

pub mod api;
pub mod catalog;
pub mod config;
pub mod details;
pub mod display;
pub mod error;
mod follow;
pub mod map;
pub mod selection;
pub mod telemetry;

pub use api::{HttpOccurrenceApi, MissingOccurrenceApi, OccurrenceApi};
pub use catalog::{CatalogStatus, SpeciesCatalog};
pub use config::{load_settings, Settings};
pub use details::{DetailsView, SightingDetails};
pub use error::FetchError;
pub use follow::follow_selection;
pub use map::{MapHandle, MapSettings, MapSynchronizer, SyncSummary};
pub use selection::{SelectionController, SelectionOutcome, SelectionState, SelectionStatus};
