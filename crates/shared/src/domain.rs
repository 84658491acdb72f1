use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::protocol::{lenient_event_date, lenient_f64, lenient_text};

/// Catalog key of a species. Only compared for equality and sent as a query value.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SpeciesName(pub String);

impl SpeciesName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Blank names mean "no selection".
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for SpeciesName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SpeciesName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SpeciesName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite and inside the geographic range.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// One observed sighting as served by the occurrence endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccurrenceRecord {
    pub scientific_name: SpeciesName,
    #[serde(default, deserialize_with = "lenient_text")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub locality: Option<String>,
    #[serde(default, deserialize_with = "lenient_event_date")]
    pub event_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub organism_quantity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub basis_of_record: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub decimal_latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub decimal_longitude: Option<f64>,
}

impl OccurrenceRecord {
    pub fn new(scientific_name: impl Into<SpeciesName>) -> Self {
        Self {
            scientific_name: scientific_name.into(),
            country: None,
            locality: None,
            event_date: None,
            organism_quantity: None,
            basis_of_record: None,
            decimal_latitude: None,
            decimal_longitude: None,
        }
    }

    pub fn with_coordinates(mut self, lat: f64, lng: f64) -> Self {
        self.decimal_latitude = Some(lat);
        self.decimal_longitude = Some(lng);
        self
    }

    /// Marker position, present only for mappable records.
    pub fn position(&self) -> Option<LatLng> {
        let point = LatLng::new(self.decimal_latitude?, self.decimal_longitude?);
        point.is_valid().then_some(point)
    }

    pub fn is_mappable(&self) -> bool {
        self.position().is_some()
    }
}
