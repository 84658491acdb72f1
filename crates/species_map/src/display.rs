//! Text shown for optional record fields.

use std::fmt::Write as _;

use chrono::{
    format::{Item, StrftimeItems},
    NaiveDateTime,
};

pub const NOT_AVAILABLE: &str = "N/A";

/// en-US style `M/D/YYYY`.
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

pub fn text_or_na(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn quantity_or_na(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |quantity| quantity.to_string())
}

pub fn event_date_or_na(value: Option<NaiveDateTime>, format: &str) -> String {
    let Some(timestamp) = value else {
        return NOT_AVAILABLE.to_string();
    };
    let mut rendered = String::new();
    match write!(rendered, "{}", timestamp.date().format(format)) {
        Ok(()) => rendered,
        Err(_) => NOT_AVAILABLE.to_string(),
    }
}

pub fn is_valid_date_format(format: &str) -> bool {
    !format.is_empty() && StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}
