use booksearch_kernel::settings::OpenLibrarySettings;

use super::{
    models::{DisplayBook, SearchResults},
    payload::{RawRecord, SearchPayload},
};

/// Builds cover and record URLs from ids found in search docs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBuilder {
    cover_base: String,
    site_base: String,
}

impl LinkBuilder {
    pub fn new(cover_base: impl Into<String>, site_base: impl Into<String>) -> Self {
        let trim = |base: String| base.trim_end_matches('/').to_string();
        Self {
            cover_base: trim(cover_base.into()),
            site_base: trim(site_base.into()),
        }
    }

    /// Medium-size cover image.
    pub fn cover_url(&self, cover_id: i64) -> String {
        format!("{}/{}-M.jpg", self.cover_base, cover_id)
    }

    /// Keys already carry their leading slash, e.g. `/works/OL27448W`.
    pub fn record_url(&self, key: &str) -> String {
        format!("{}{}", self.site_base, key)
    }
}

impl From<&OpenLibrarySettings> for LinkBuilder {
    fn from(settings: &OpenLibrarySettings) -> Self {
        Self::new(&settings.cover_base_url, &settings.site_base_url)
    }
}

impl Default for LinkBuilder {
    fn default() -> Self {
        Self::from(&OpenLibrarySettings::default())
    }
}

impl DisplayBook {
    pub fn from_record(record: &RawRecord, links: &LinkBuilder) -> Self {
        Self {
            title: record.title().to_string(),
            authors: record.authors(),
            year: record.year(),
            isbn: record.isbn().to_string(),
            subjects: record.subjects(),
            edition_count: record.edition_count(),
            publish_years: record.publish_years(),
            languages: record.languages(),
            cover_url: record.cover_id().map(|id| links.cover_url(id)),
            source_url: record.key().map(|key| links.record_url(key)),
        }
    }
}

/// Reshape a search payload for display, keeping upstream doc order.
pub fn normalize(payload: &SearchPayload, links: &LinkBuilder) -> SearchResults {
    SearchResults {
        books: payload
            .docs()
            .iter()
            .map(|record| DisplayBook::from_record(record, links))
            .collect(),
        total_found: payload.total_found(),
    }
}
