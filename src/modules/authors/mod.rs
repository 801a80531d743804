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
use handlers::AuthorsState;

/// Authors with their nested books; deleting an author removes its books
pub struct AuthorsModule {
    state: AuthorsState,
}

impl AuthorsModule {
    pub fn new(store: Store, page_size: usize) -> Self {
        Self {
            state: AuthorsState { store, page_size },
        }
    }
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        "authors"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "authors module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(handlers::list_authors))
            .route("/health", get(handlers::health_check))
            .route("/create", post(handlers::create_author))
            .route("/{id}", get(handlers::get_author))
            .route(
                "/update/{id}",
                put(handlers::replace_author).patch(handlers::patch_author),
            )
            .route("/delete/{id}", delete(handlers::delete_author))
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let mut create_responses = write_errors();
        create_responses["201"] = json_response("Created author", schema_ref("Author"));

        let mut update_responses = write_errors();
        update_responses["200"] = json_response("Updated author", schema_ref("Author"));
        update_responses["404"] = error_response("Author not found");

        let mut delete_responses = write_errors();
        delete_responses["204"] = empty_response("Deleted together with the author's books");
        delete_responses["404"] = error_response("Author not found");

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List authors",
                        "tags": ["Authors"],
                        "parameters": [
                            query_param("search", "string", "Text in the author name"),
                            query_param("ordering", "string", "id or name, prefix '-' for descending"),
                            query_param("page", "integer", "1-based page number or 'last'")
                        ],
                        "responses": {
                            "200": json_response("Page of authors", page_schema("Author")),
                            "404": error_response("Invalid page"),
                            "422": error_response("Invalid ordering key")
                        }
                    }
                },
                "/health": {
                    "get": {
                        "summary": "Authors health check",
                        "tags": ["Authors"],
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
                        "summary": "Get an author with their books",
                        "tags": ["Authors"],
                        "parameters": [id_param()],
                        "responses": {
                            "200": json_response("Author", schema_ref("Author")),
                            "404": error_response("Author not found")
                        }
                    }
                },
                "/create": {
                    "post": {
                        "summary": "Create an author, optionally with books",
                        "tags": ["Authors"],
                        "security": token_security(),
                        "requestBody": json_body("AuthorInput"),
                        "responses": create_responses
                    }
                },
                "/update/{id}": {
                    "put": {
                        "summary": "Rename an author",
                        "tags": ["Authors"],
                        "security": token_security(),
                        "parameters": [id_param()],
                        "requestBody": json_body("AuthorInput"),
                        "responses": update_responses.clone()
                    },
                    "patch": {
                        "summary": "Partially update an author",
                        "tags": ["Authors"],
                        "security": token_security(),
                        "parameters": [id_param()],
                        "requestBody": json_body("AuthorInput"),
                        "responses": update_responses
                    }
                },
                "/delete/{id}": {
                    "delete": {
                        "summary": "Delete an author and their books",
                        "tags": ["Authors"],
                        "security": token_security(),
                        "parameters": [id_param()],
                        "responses": delete_responses
                    }
                }
            },
            "components": {
                "schemas": {
                    "Author": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "name": { "type": "string" },
                            "books": { "type": "array", "items": schema_ref("Book") }
                        },
                        "required": ["id", "name", "books"]
                    },
                    "AuthorInput": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string", "maxLength": models::NAME_MAX_CHARS },
                            "books": {
                                "type": "array",
                                "description": "Only read on create",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "title": { "type": "string" },
                                        "publication_year": { "type": "integer" }
                                    },
                                    "required": ["title", "publication_year"]
                                }
                            }
                        },
                        "required": ["name"]
                    }
                }
            }
        }))
    }
}

/// Create a new instance of the authors module
pub fn create_module(store: Store, page_size: usize) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(AuthorsModule::new(store, page_size))
}
