use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

/// Default number of results when the caller does not pick one.
pub const DEFAULT_RESULT_LIMIT: u32 = 10;

/// Which OpenLibrary search parameter the query text is sent as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    #[default]
    Title,
    Author,
    Subject,
}

impl SearchType {
    pub const ALL: [SearchType; 3] = [SearchType::Title, SearchType::Author, SearchType::Subject];

    /// Query parameter name understood by the search endpoint.
    pub const fn as_str(self) -> &'static str {
        match self {
            SearchType::Title => "title",
            SearchType::Author => "author",
            SearchType::Subject => "subject",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported search type '{0}'; expected title, author or subject")]
pub struct UnknownSearchType(pub String);

impl FromStr for SearchType {
    type Err = UnknownSearchType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        SearchType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lowered)
            .ok_or_else(|| UnknownSearchType(s.to_string()))
    }
}

/// Unvalidated search input as submitted by a form or query string.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SearchForm {
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 200,
        message = "Search query must be between 1 and 200 characters"
    ))]
    pub search_query: String,
    #[serde(default)]
    pub search_type: Option<String>,
    /// Kept as text so a blank or non-numeric limit is reported as a field
    /// error instead of failing deserialization.
    #[serde(default)]
    pub result_limit: Option<String>,
}

const LIMIT_REQUIRED: &str = "Please specify number of results";
const LIMIT_OUT_OF_RANGE: &str = "Please choose between 1 and 20 results";
const MAX_RESULT_LIMIT: u32 = 20;

/// An omitted limit means [`DEFAULT_RESULT_LIMIT`]; a blank one is an error.
fn parse_result_limit(raw: Option<&str>) -> Result<u32, FieldError> {
    let Some(raw) = raw.map(str::trim) else {
        return Ok(DEFAULT_RESULT_LIMIT);
    };
    if raw.is_empty() {
        return Err(FieldError::new("result_limit", LIMIT_REQUIRED));
    }

    raw.parse::<u32>()
        .ok()
        .filter(|limit| (1..=MAX_RESULT_LIMIT).contains(limit))
        .ok_or_else(|| FieldError::new("result_limit", LIMIT_OUT_OF_RANGE))
}

impl SearchForm {
    pub fn new(search_query: impl Into<String>, search_type: SearchType, result_limit: u32) -> Self {
        Self {
            search_query: search_query.into(),
            search_type: Some(search_type.as_str().to_string()),
            result_limit: Some(result_limit.to_string()),
        }
    }

    /// Validate the form and turn it into a [`SearchRequest`].
    ///
    /// The query is trimmed first, so whitespace-only input counts as empty.
    /// A missing or blank search type means [`SearchType::Title`].
    pub fn into_request(mut self) -> Result<SearchRequest, InvalidSearch> {
        self.search_query = self.search_query.trim().to_string();

        let mut details = match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => FieldError::from_validation(&errors),
        };

        let limit = match parse_result_limit(self.result_limit.as_deref()) {
            Ok(limit) => Some(limit),
            Err(e) => {
                details.push(e);
                None
            }
        };

        let search_type = match self
            .search_type
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
        {
            None => Some(SearchType::default()),
            Some(raw) => match raw.parse::<SearchType>() {
                Ok(kind) => Some(kind),
                Err(e) => {
                    details.push(FieldError::new("search_type", e.to_string()));
                    None
                }
            },
        };

        match (search_type, limit) {
            (Some(search_type), Some(limit)) if details.is_empty() => Ok(SearchRequest {
                query: self.search_query,
                search_type,
                limit,
            }),
            _ => {
                details.sort_by(|a, b| a.field.cmp(&b.field));
                Err(InvalidSearch { details })
            }
        }
    }
}

/// A validated search. Only obtainable through [`SearchForm::into_request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    query: String,
    search_type: SearchType,
    limit: u32,
}

impl SearchRequest {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn search_type(&self) -> SearchType {
        self.search_type
    }

    /// Result cap, always within 1..=20.
    pub fn limit(&self) -> u32 {
        self.limit
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub error: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            error: error.into(),
        }
    }

    fn from_validation(errors: &ValidationErrors) -> Vec<Self> {
        errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    FieldError::new(field.to_string(), message)
                })
            })
            .collect()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid search: {}", describe(.details))]
pub struct InvalidSearch {
    pub details: Vec<FieldError>,
}

fn describe(details: &[FieldError]) -> String {
    details
        .iter()
        .map(|d| format!("{}: {}", d.field, d.error))
        .collect::<Vec<_>>()
        .join("; ")
}

/// A search result shaped for display. Every field has a fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayBook {
    pub title: String,
    pub authors: String,
    pub year: String,
    pub isbn: String,
    pub subjects: String,
    pub edition_count: String,
    pub publish_years: String,
    pub languages: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

/// Normalized books plus the upstream hit count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    pub books: Vec<DisplayBook>,
    pub total_found: u64,
}

/// JSON body returned by the search endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub search_query: String,
    pub search_type: SearchType,
    pub result_limit: u32,
    pub total_found: u64,
    pub books: Vec<DisplayBook>,
}

impl SearchResponse {
    pub fn new(request: &SearchRequest, results: SearchResults) -> Self {
        Self {
            search_query: request.query().to_string(),
            search_type: request.search_type(),
            result_limit: request.limit(),
            total_found: results.total_found,
            books: results.books,
        }
    }
}
