use super::models::SearchRequest;

/// Fields requested from the search endpoint, in the order OpenLibrary documents them.
pub const RESULT_FIELDS: &str = "key,title,author_name,first_publish_year,isbn,subject,cover_i,language,edition_count,publish_year";

/// Query parameters for one search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pairs: Vec<(&'static str, String)>,
}

impl SearchParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn as_pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }
}

/// Map a validated request onto search parameters: the result cap, the
/// fixed field list and exactly one of `title`, `author` or `subject`.
pub fn build_params(request: &SearchRequest) -> SearchParams {
    SearchParams {
        pairs: vec![
            ("limit", request.limit().to_string()),
            ("fields", RESULT_FIELDS.to_string()),
            (request.search_type().as_str(), request.query().to_string()),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::models::{SearchForm, SearchType};

    fn request(query: &str, search_type: SearchType, limit: u32) -> SearchRequest {
        SearchForm::new(query, search_type, limit)
            .into_request()
            .unwrap()
    }

    #[test]
    fn author_search_sets_only_author_term() {
        let params = build_params(&request("Ursula K. Le Guin", SearchType::Author, 10));

        assert_eq!(params.get("author"), Some("Ursula K. Le Guin"));
        assert!(!params.contains("title"));
        assert!(!params.contains("subject"));
    }

    #[test]
    fn every_search_type_sets_exactly_one_term() {
        for kind in SearchType::ALL {
            let params = build_params(&request("dragons", kind, 3));
            let terms: Vec<_> = SearchType::ALL
                .iter()
                .filter(|other| params.contains(other.as_str()))
                .collect();

            assert_eq!(terms, vec![&kind]);
        }
    }

    #[test]
    fn limit_and_fields_are_always_present() {
        let params = build_params(&request("dragons", SearchType::Subject, 7));

        assert_eq!(params.get("limit"), Some("7"));
        assert_eq!(params.get("fields"), Some(RESULT_FIELDS));
        assert_eq!(params.as_pairs().len(), 3);
    }
}
