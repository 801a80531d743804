pub mod filters;
pub mod handlers;
pub mod models;

use async_trait::async_trait;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use bookshelf_db::Store;
use bookshelf_kernel::{InitCtx, Module};
use serde_json::json;

use crate::openapi::{
    empty_response, error_response, id_param, json_body, json_response, page_schema, query_param,
    schema_ref, token_security, write_errors,
};
use handlers::BooksState;

/// Book catalogue: list with filter/search/ordering, detail and token-protected writes
pub struct BooksModule {
    state: BooksState,
}

impl BooksModule {
    pub fn new(store: Store, page_size: usize) -> Self {
        Self {
            state: BooksState { store, page_size },
        }
    }
}

fn list_parameters() -> Vec<serde_json::Value> {
    vec![
        query_param("publication_year", "integer", "Exact publication year"),
        query_param("publication_year__gt", "integer", "Published after"),
        query_param("publication_year__gte", "integer", "Published in or after"),
        query_param("publication_year__lt", "integer", "Published before"),
        query_param("publication_year__lte", "integer", "Published in or before"),
        query_param("title", "string", "Title contains (case-insensitive)"),
        query_param("title__exact", "string", "Exact title"),
        query_param("title__startswith", "string", "Title prefix (case-insensitive)"),
        query_param("author__name", "string", "Author name contains (case-insensitive)"),
        query_param("author__name__exact", "string", "Exact author name"),
        query_param("search", "string", "Text in title or author name"),
        query_param(
            "ordering",
            "string",
            "Comma-separated keys from id, title, publication_year, author__name; prefix '-' for descending",
        ),
        query_param("page", "integer", "1-based page number or 'last'"),
    ]
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
            page_size = self.state.page_size,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(handlers::list_books))
            .route("/health", get(handlers::health_check))
            .route("/create", post(handlers::create_book))
            .route("/{id}", get(handlers::get_book))
            .route(
                "/update/{id}",
                put(handlers::replace_book).patch(handlers::patch_book),
            )
            .route("/delete/{id}", delete(handlers::delete_book))
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "parameters": list_parameters(),
                        "responses": {
                            "200": json_response("Page of books", page_schema("Book")),
                            "404": error_response("Invalid page"),
                            "422": error_response("Invalid filter value or ordering key")
                        }
                    }
                },
                "/health": {
                    "get": {
                        "summary": "Books health check",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "OK",
                                "content": { "text/plain": { "schema": { "type": "string" } } }
                            }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "parameters": [id_param()],
                        "responses": {
                            "200": json_response("Book", schema_ref("Book")),
                            "404": error_response("Book not found")
                        }
                    }
                },
                "/create": {
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "security": token_security(),
                        "requestBody": json_body("BookInput"),
                        "responses": write_responses("201", json_response("Created book", schema_ref("Book")))
                    }
                },
                "/update/{id}": {
                    "put": {
                        "summary": "Replace a book",
                        "tags": ["Books"],
                        "security": token_security(),
                        "parameters": [id_param()],
                        "requestBody": json_body("BookInput"),
                        "responses": write_responses("200", json_response("Updated book", schema_ref("Book")))
                    },
                    "patch": {
                        "summary": "Partially update a book",
                        "tags": ["Books"],
                        "security": token_security(),
                        "parameters": [id_param()],
                        "requestBody": json_body("BookInput"),
                        "responses": write_responses("200", json_response("Updated book", schema_ref("Book")))
                    }
                },
                "/delete/{id}": {
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "security": token_security(),
                        "parameters": [id_param()],
                        "responses": write_responses("204", empty_response("Deleted"))
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "description": "Unique identifier for the book" },
                            "title": { "type": "string", "description": "Title of the book" },
                            "publication_year": {
                                "type": "integer",
                                "description": "Year of publication, not later than the current year"
                            },
                            "author": { "type": "integer", "description": "Id of the book's author" }
                        },
                        "required": ["id", "title", "publication_year", "author"]
                    },
                    "BookInput": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string", "maxLength": models::TITLE_MAX_CHARS },
                            "publication_year": { "type": "integer" },
                            "author": { "type": "integer" }
                        },
                        "required": ["title", "publication_year", "author"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Success response plus the shared write errors and a 404 for missing books
fn write_responses(status: &str, success: serde_json::Value) -> serde_json::Value {
    let mut responses = write_errors();
    responses[status] = success;
    responses["404"] = error_response("Book not found");
    responses
}

/// Create a new instance of the books module
pub fn create_module(store: Store, page_size: usize) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(store, page_size))
}
