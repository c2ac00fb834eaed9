//! Book search over the OpenLibrary API.
//!
//! A request flows one way: [`query`] builds parameters, [`client`] fetches
//! the payload, [`normalize`] reshapes it into [`models::DisplayBook`]s.

pub mod client;
pub mod models;
pub mod normalize;
pub mod payload;
pub mod query;
pub mod routes;
pub mod service;

use async_trait::async_trait;
use axum::Router;
use booksearch_kernel::{settings::OpenLibrarySettings, InitCtx, Module};
use serde_json::json;

use service::BookSearch;

/// Books module: mounts the search endpoints
pub struct BooksModule {
    search: BookSearch,
}

impl BooksModule {
    pub fn new(search: BookSearch) -> Self {
        Self { search }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            search_url = %ctx.settings.openlibrary.search_url,
            timeout_secs = ctx.settings.openlibrary.timeout_secs,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.search.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let search_parameters = json!([
            {
                "name": "search_query",
                "in": "query",
                "required": true,
                "description": "Text to search for (1-200 characters)",
                "schema": { "type": "string", "minLength": 1, "maxLength": 200 }
            },
            {
                "name": "search_type",
                "in": "query",
                "required": false,
                "description": "Which field the query matches",
                "schema": { "type": "string", "enum": ["title", "author", "subject"], "default": "title" }
            },
            {
                "name": "result_limit",
                "in": "query",
                "required": false,
                "description": "Maximum number of books returned",
                "schema": { "type": "integer", "minimum": 1, "maximum": 20, "default": 10 }
            }
        ]);
        let error_response = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };
        let search_responses = json!({
            "200": {
                "description": "Normalized search results",
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/SearchResponse" }
                    }
                }
            },
            "400": error_response("Malformed query string or form body"),
            "422": error_response("Validation error"),
            "502": error_response("OpenLibrary failed or returned an unreadable body"),
            "504": error_response("OpenLibrary did not answer in time")
        });

        Some(json!({
            "paths": {
                "/search": {
                    "get": {
                        "summary": "Search books",
                        "tags": ["Books"],
                        "parameters": search_parameters,
                        "responses": search_responses
                    },
                    "post": {
                        "summary": "Search books from a submitted form",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/x-www-form-urlencoded": {
                                    "schema": { "$ref": "#/components/schemas/SearchForm" }
                                }
                            }
                        },
                        "responses": search_responses
                    }
                },
                "/health": {
                    "get": {
                        "summary": "Books health check",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "OK",
                                "content": {
                                    "text/plain": { "schema": { "type": "string" } }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "SearchForm": {
                        "type": "object",
                        "properties": {
                            "search_query": { "type": "string" },
                            "search_type": { "type": "string", "enum": ["title", "author", "subject"] },
                            "result_limit": { "type": "integer" }
                        },
                        "required": ["search_query"]
                    },
                    "SearchResponse": {
                        "type": "object",
                        "properties": {
                            "search_query": { "type": "string" },
                            "search_type": { "type": "string" },
                            "result_limit": { "type": "integer" },
                            "total_found": {
                                "type": "integer",
                                "description": "Upstream hit count, independent of how many books are returned"
                            },
                            "books": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/DisplayBook" }
                            }
                        },
                        "required": ["search_query", "search_type", "result_limit", "total_found", "books"]
                    },
                    "DisplayBook": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "authors": { "type": "string" },
                            "year": { "type": "string" },
                            "isbn": { "type": "string" },
                            "subjects": { "type": "string", "description": "First five subjects" },
                            "edition_count": { "type": "string" },
                            "publish_years": { "type": "string", "description": "earliest-latest or a single year" },
                            "languages": { "type": "string", "description": "First three languages" },
                            "cover_url": { "type": "string" },
                            "source_url": { "type": "string" }
                        },
                        "required": [
                            "title", "authors", "year", "isbn", "subjects",
                            "edition_count", "publish_years", "languages"
                        ]
                    }
                }
            }
        }))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create the books module wired to OpenLibrary
pub fn create_module(settings: &OpenLibrarySettings) -> anyhow::Result<std::sync::Arc<dyn Module>> {
    let search = BookSearch::from_settings(settings)?;
    Ok(std::sync::Arc::new(BooksModule::new(search)))
}
