use std::sync::Arc;

use booksearch_kernel::settings::OpenLibrarySettings;

use super::{
    client::{ClientConfig, FetchError, OpenLibraryClient, SearchClient},
    models::{SearchRequest, SearchResults},
    normalize::{normalize, LinkBuilder},
    query::build_params,
};

/// Runs one search end to end: build parameters, fetch, normalize.
///
/// Holds no per-request state; clones share the underlying client.
#[derive(Clone)]
pub struct BookSearch {
    client: Arc<dyn SearchClient>,
    links: LinkBuilder,
}

impl BookSearch {
    pub fn new(client: Arc<dyn SearchClient>, links: LinkBuilder) -> Self {
        Self { client, links }
    }

    /// Wire up the OpenLibrary client and link bases from settings.
    pub fn from_settings(settings: &OpenLibrarySettings) -> anyhow::Result<Self> {
        let client = OpenLibraryClient::new(ClientConfig::from(settings))?;
        Ok(Self::new(Arc::new(client), LinkBuilder::from(settings)))
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResults, FetchError> {
        let params = build_params(request);

        tracing::info!(
            query = request.query(),
            search_type = %request.search_type(),
            limit = request.limit(),
            "searching books"
        );

        let payload = match self.client.fetch(&params).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, code = e.code(), "book search failed");
                return Err(e);
            }
        };

        let results = normalize(&payload, &self.links);

        tracing::info!(
            returned = results.books.len(),
            total_found = results.total_found,
            "book search complete"
        );

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::{
        models::{SearchForm, SearchType},
        payload::SearchPayload,
        query::SearchParams,
    };
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays one canned outcome and records the parameters it was called with.
    struct CannedClient {
        outcome: Result<SearchPayload, FetchError>,
        calls: Mutex<Vec<SearchParams>>,
    }

    impl CannedClient {
        fn new(outcome: Result<SearchPayload, FetchError>) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl SearchClient for CannedClient {
        async fn fetch(&self, params: &SearchParams) -> Result<SearchPayload, FetchError> {
            self.calls.lock().unwrap().push(params.clone());
            self.outcome.clone()
        }
    }

    fn request() -> SearchRequest {
        SearchForm::new("Earthsea", SearchType::Title, 2)
            .into_request()
            .unwrap()
    }

    #[tokio::test]
    async fn timeout_yields_no_books_and_timeout_message() {
        let client = CannedClient::new(Err(FetchError::Timeout));
        let search = BookSearch::new(client.clone(), LinkBuilder::default());

        let err = search.search(&request()).await.unwrap_err();

        assert_eq!(err, FetchError::Timeout);
        assert_eq!(err.to_string(), "Request timed out. Please try again.");
        assert_eq!(client.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn successful_fetch_is_normalized() {
        let payload: SearchPayload = serde_json::from_value(serde_json::json!({
            "numFound": 42,
            "docs": [{ "title": "A Wizard of Earthsea", "cover_i": 12 }]
        }))
        .unwrap();
        let client = CannedClient::new(Ok(payload));
        let search = BookSearch::new(client.clone(), LinkBuilder::default());

        let results = search.search(&request()).await.unwrap();

        assert_eq!(results.total_found, 42);
        assert_eq!(results.books.len(), 1);
        assert_eq!(
            results.books[0].cover_url.as_deref(),
            Some("https://covers.openlibrary.org/b/id/12-M.jpg")
        );

        let calls = client.calls.lock().unwrap();
        assert_eq!(calls[0].get("title"), Some("Earthsea"));
        assert_eq!(calls[0].get("limit"), Some("2"));
    }

    #[test]
    fn from_settings_builds_a_client() {
        assert!(BookSearch::from_settings(&OpenLibrarySettings::default()).is_ok());
    }
}
