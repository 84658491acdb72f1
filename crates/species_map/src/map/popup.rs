use shared::domain::OccurrenceRecord;

use crate::display::{event_date_or_na, text_or_na};

/// Popup bound to a marker: species in bold, then locality and date lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerPopup {
    pub title: String,
    pub locality: String,
    pub date: String,
}

impl MarkerPopup {
    pub fn for_record(record: &OccurrenceRecord, date_format: &str) -> Self {
        Self {
            title: record.scientific_name.to_string(),
            locality: text_or_na(record.locality.as_deref()),
            date: event_date_or_na(record.event_date, date_format),
        }
    }

    pub fn to_html(&self) -> String {
        format!(
            "<b>{}</b><br>Locality: {}<br>Date: {}",
            escape_html(&self.title),
            escape_html(&self.locality),
            escape_html(&self.date)
        )
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
