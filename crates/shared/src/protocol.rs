use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::domain::OccurrenceRecord;

/// Body of the occurrence query endpoint. Only `results` is consumed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OccurrenceResults {
    #[serde(default, deserialize_with = "lenient_records")]
    pub results: Option<Vec<OccurrenceRecord>>,
}

impl OccurrenceResults {
    pub fn into_records(self) -> Vec<OccurrenceRecord> {
        self.results.unwrap_or_default()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseRecord {
    Record(OccurrenceRecord),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseText {
    Text(String),
    Other(IgnoredAny),
}

/// Keeps every element that decodes as a record. Elements that do not, such as
/// ones without a `scientific_name`, are dropped one by one.
fn lenient_records<'de, D>(deserializer: D) -> Result<Option<Vec<OccurrenceRecord>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(loose) = Option::<Vec<LooseRecord>>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let total = loose.len();
    let records: Vec<OccurrenceRecord> = loose
        .into_iter()
        .filter_map(|entry| match entry {
            LooseRecord::Record(record) => Some(record),
            LooseRecord::Other(_) => None,
        })
        .collect();
    if records.len() < total {
        warn!(
            dropped = total - records.len(),
            kept = records.len(),
            "dropping malformed occurrence records"
        );
    }
    Ok(Some(records))
}

/// Accepts a JSON number or a numeric string; anything else decodes as `None`.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<LooseNumber>::deserialize(deserializer)? {
        Some(LooseNumber::Number(value)) => Some(value),
        Some(LooseNumber::Text(raw)) => raw.trim().parse::<f64>().ok(),
        Some(LooseNumber::Other(_)) | None => None,
    };
    Ok(value.filter(|v| v.is_finite()))
}

/// Strings pass through; any other JSON value decodes as `None`.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<LooseText>::deserialize(deserializer)? {
        Some(LooseText::Text(raw)) => Some(raw),
        Some(LooseText::Other(_)) | None => None,
    })
}

pub(crate) fn lenient_event_date<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<LooseText>::deserialize(deserializer)? {
        Some(LooseText::Text(raw)) => parse_event_date(&raw),
        Some(LooseText::Other(_)) | None => None,
    })
}

/// Parses the timestamp shapes the backend emits. Dates without a time are midnight.
pub fn parse_event_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_local());
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
    ] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
