use chrono::{DateTime, NaiveDate};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::io::Read;

pub(crate) fn parse_rows<R: Read, T: DeserializeOwned>(reader: R) -> Result<Vec<T>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    csv_reader.deserialize().collect()
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductRow {
    pub(crate) product_id: String,
    pub(crate) brand: String,
    pub(crate) name: String,
    pub(crate) category: String,
    #[serde(default)]
    pub(crate) aliases: Option<String>,
}

impl ProductRow {
    pub(crate) fn alias_list(&self) -> Vec<String> {
        self.aliases.as_deref().map_or_else(Vec::new, split_aliases)
    }
}

fn split_aliases(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|alias| !alias.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthorityRow {
    pub(crate) product_id: String,
    #[serde(default)]
    pub(crate) has_record: u8,
    #[serde(default)]
    pub(crate) has_cert: u8,
    #[serde(default)]
    pub(crate) penalty_count: u32,
    #[serde(default)]
    pub(crate) notice_url: Option<String>,
    #[serde(default)]
    pub(crate) last_notice_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewRow {
    pub(crate) product_id: String,
    #[serde(default)]
    pub(crate) review_date: Option<String>,
    pub(crate) rating: f64,
    #[serde(default)]
    pub(crate) reviewer_reputation: Option<f64>,
    #[serde(default)]
    pub(crate) evidence_url: Option<String>,
}

/// Lenient date parsing: plain dates or RFC 3339 timestamps, anything else
/// is treated as unknown.
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    None
}
