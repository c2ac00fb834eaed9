use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Query, State,
    },
    routing::get,
    Form, Json, Router,
};
use booksearch_http::error::AppError;

use super::{
    client::FetchError,
    models::{InvalidSearch, SearchForm, SearchResponse},
    service::BookSearch,
};

/// Routes mounted under `/api/books`.
pub fn router(search: BookSearch) -> Router {
    Router::new()
        .route("/search", get(search_from_query).post(search_from_form))
        .route("/health", get(health_check))
        .with_state(search)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn search_from_query(
    State(search): State<BookSearch>,
    query: Result<Query<SearchForm>, QueryRejection>,
) -> Result<Json<SearchResponse>, AppError> {
    let Query(form) = query.map_err(|e| AppError::bad_request(e.body_text()))?;
    run_search(&search, form).await
}

async fn search_from_form(
    State(search): State<BookSearch>,
    form: Result<Form<SearchForm>, FormRejection>,
) -> Result<Json<SearchResponse>, AppError> {
    let Form(form) = form.map_err(|e| AppError::bad_request(e.body_text()))?;
    run_search(&search, form).await
}

async fn run_search(search: &BookSearch, form: SearchForm) -> Result<Json<SearchResponse>, AppError> {
    let request = form.into_request()?;
    let results = search.search(&request).await?;
    Ok(Json(SearchResponse::new(&request, results)))
}

impl From<InvalidSearch> for AppError {
    fn from(err: InvalidSearch) -> Self {
        let details = err
            .details
            .iter()
            .map(|d| serde_json::json!({ "field": d.field, "error": d.error }))
            .collect();
        AppError::validation(details, "Invalid search request")
    }
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Timeout => AppError::gateway_timeout(err.code(), err.to_string()),
            FetchError::Transport(_) | FetchError::Parse(_) => {
                AppError::bad_gateway(err.code(), err.to_string())
            }
        }
    }
}
