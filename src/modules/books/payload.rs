//! Wire shapes returned by the OpenLibrary search endpoint.
//!
//! Every field of a search doc is optional upstream, so [`RawRecord`] exposes
//! one accessor per display field that applies that field's fallback.
//! A field of the wrong type is treated as absent so one odd doc cannot
//! sink the whole response.

use serde::{de::DeserializeOwned, Deserialize, Deserializer};

pub const NOT_AVAILABLE: &str = "N/A";
pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
pub const DEFAULT_LANGUAGE: &str = "eng";

pub const MAX_SUBJECTS: usize = 5;
pub const MAX_LANGUAGES: usize = 3;

const LIST_SEPARATOR: &str = ", ";

/// Top-level body of `search.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchPayload {
    #[serde(default)]
    pub docs: Option<Vec<RawRecord>>,
    #[serde(default, rename = "numFound")]
    pub num_found: Option<u64>,
}

impl SearchPayload {
    pub fn docs(&self) -> &[RawRecord] {
        self.docs.as_deref().unwrap_or_default()
    }

    pub fn total_found(&self) -> u64 {
        self.num_found.unwrap_or(0)
    }
}

/// One search doc, exactly as OpenLibrary sends it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    #[serde(deserialize_with = "lenient")]
    pub key: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub author_name: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient")]
    pub first_publish_year: Option<i32>,
    #[serde(deserialize_with = "lenient")]
    pub isbn: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient")]
    pub subject: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient")]
    pub cover_i: Option<i64>,
    #[serde(deserialize_with = "lenient")]
    pub language: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient")]
    pub edition_count: Option<u64>,
    #[serde(deserialize_with = "lenient")]
    pub publish_year: Option<Vec<i32>>,
}

/// Any JSON value is accepted; one that does not fit `T` becomes `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// `Some` only for a present, non-empty list.
fn non_empty<T>(list: &Option<Vec<T>>) -> Option<&[T]> {
    list.as_deref().filter(|items| !items.is_empty())
}

fn join_first(items: &[String], max: usize) -> String {
    items
        .iter()
        .take(max)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

impl RawRecord {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNKNOWN_TITLE)
    }

    pub fn authors(&self) -> String {
        non_empty(&self.author_name)
            .map(|names| names.join(LIST_SEPARATOR))
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
    }

    pub fn year(&self) -> String {
        self.first_publish_year
            .map(|year| year.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    /// First ISBN only.
    pub fn isbn(&self) -> &str {
        non_empty(&self.isbn)
            .and_then(|isbns| isbns.first())
            .map(String::as_str)
            .unwrap_or(NOT_AVAILABLE)
    }

    pub fn subjects(&self) -> String {
        non_empty(&self.subject)
            .map(|subjects| join_first(subjects, MAX_SUBJECTS))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    pub fn edition_count(&self) -> String {
        self.edition_count
            .map(|count| count.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    /// `earliest-latest` across every edition, a single year when they all
    /// agree, otherwise the first-publish year.
    pub fn publish_years(&self) -> String {
        let Some(years) = non_empty(&self.publish_year) else {
            return self.year();
        };

        let mut sorted = years.to_vec();
        sorted.sort_unstable();

        match (sorted.first(), sorted.last()) {
            (Some(earliest), Some(latest)) if earliest != latest => {
                format!("{}-{}", earliest, latest)
            }
            (Some(only), _) => only.to_string(),
            _ => self.year(),
        }
    }

    pub fn languages(&self) -> String {
        non_empty(&self.language)
            .map(|languages| join_first(languages, MAX_LANGUAGES))
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
    }

    /// OpenLibrary uses non-positive ids for "no cover".
    pub fn cover_id(&self) -> Option<i64> {
        self.cover_i.filter(|id| *id > 0)
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref().filter(|key| !key.is_empty())
    }
}
