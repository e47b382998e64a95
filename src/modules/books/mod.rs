pub mod error;
pub mod mapper;
pub mod models;
pub mod repository;
pub mod routes;
pub mod service;
pub mod validation;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;
use shelf_kernel::{InitCtx, Module};

use repository::BookRepository;
use service::{BookService, DefaultBookService};

/// Books module: CRUD over the book catalogue
pub struct BooksModule {
    service: Arc<dyn BookService>,
}

impl BooksModule {
    pub fn new(service: Arc<dyn BookService>) -> Self {
        Self { service }
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
            backend = ?ctx.settings.database.backend,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Option<Router> {
        Some(routes::router(Arc::clone(&self.service)))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
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

fn error_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn json_response(description: &str, schema: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": format!("#/components/schemas/{schema}") }
            }
        }
    })
}

fn json_body(schema: &str) -> serde_json::Value {
    json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "$ref": format!("#/components/schemas/{schema}") }
            }
        }
    })
}

fn id_parameter() -> serde_json::Value {
    json!([{
        "name": "id",
        "in": "path",
        "required": true,
        "description": "Book identifier",
        "schema": { "type": "string" }
    }])
}

fn openapi_fragment() -> serde_json::Value {
    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List books",
                    "operationId": "list-books",
                    "tags": ["Books"],
                    "responses": {
                        "200": json_response("All books with a total count", "BookListResponse"),
                        "500": error_response("Internal server error")
                    }
                },
                "post": {
                    "summary": "Create a book",
                    "operationId": "create-book",
                    "tags": ["Books"],
                    "requestBody": json_body("CreateBookRequest"),
                    "responses": {
                        "201": json_response("Book created", "MutationResponse"),
                        "400": error_response("Invalid request"),
                        "500": error_response("Internal server error")
                    }
                },
                "put": {
                    "summary": "Replace an existing book",
                    "operationId": "update-book",
                    "tags": ["Books"],
                    "requestBody": json_body("UpdateBookRequest"),
                    "responses": {
                        "200": json_response("Book updated", "MutationResponse"),
                        "400": error_response("Invalid request"),
                        "404": error_response("Book not found"),
                        "500": error_response("Internal server error")
                    }
                }
            },
            "/{id}": {
                "get": {
                    "summary": "Get a book by identifier",
                    "operationId": "get-book-by-id",
                    "tags": ["Books"],
                    "parameters": id_parameter(),
                    "responses": {
                        "200": json_response("The book", "BookResponse"),
                        "404": error_response("Book not found"),
                        "500": error_response("Internal server error")
                    }
                },
                "delete": {
                    "summary": "Delete a book by identifier",
                    "operationId": "delete-book-by-id",
                    "tags": ["Books"],
                    "parameters": id_parameter(),
                    "responses": {
                        "200": json_response("Book deleted", "MutationResponse"),
                        "404": error_response("Book not found"),
                        "500": error_response("Internal server error")
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
            }
        },
        "components": {
            "schemas": {
                "BookResponse": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string", "description": "Unique identifier for the book" },
                        "title": { "type": "string", "description": "Title of the book" },
                        "author": { "type": "string", "description": "Author of the book" },
                        "quantity": { "type": "integer", "format": "int64", "minimum": 0 },
                        "created_at": { "type": "string", "format": "date-time" },
                        "updated_at": { "type": "string", "format": "date-time" }
                    },
                    "required": ["id", "title", "author", "quantity", "created_at", "updated_at"]
                },
                "BookListResponse": {
                    "type": "object",
                    "properties": {
                        "total_item_count": { "type": "integer" },
                        "data": {
                            "type": "array",
                            "items": { "$ref": "#/components/schemas/BookResponse" }
                        }
                    },
                    "required": ["total_item_count", "data"]
                },
                "CreateBookRequest": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string", "minLength": 1, "maxLength": 100 },
                        "author": { "type": "string", "minLength": 1, "maxLength": 100 },
                        "quantity": { "type": "integer", "format": "int64", "minimum": 0 }
                    },
                    "required": ["title", "author", "quantity"]
                },
                "UpdateBookRequest": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string", "minLength": 1 },
                        "title": { "type": "string", "minLength": 1, "maxLength": 100 },
                        "author": { "type": "string", "minLength": 1, "maxLength": 100 },
                        "quantity": { "type": "integer", "format": "int64", "minimum": 0 }
                    },
                    "required": ["id", "title", "author", "quantity"]
                },
                "MutationResponse": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "success": { "type": "boolean" }
                    },
                    "required": ["id", "success"]
                }
            }
        }
    })
}

/// Wire the books pipeline over the given repository
pub fn create_module(repository: Arc<dyn BookRepository>) -> Arc<dyn Module> {
    let service: Arc<dyn BookService> = Arc::new(DefaultBookService::new(repository));
    Arc::new(BooksModule::new(service))
}

#[cfg(test)]
mod tests {
    use super::*;
    use repository::InMemoryBookRepository;

    #[test]
    fn openapi_fragment_covers_every_operation() {
        let fragment = openapi_fragment();
        let paths = &fragment["paths"];

        for (path, method) in [
            ("/", "get"),
            ("/", "post"),
            ("/", "put"),
            ("/{id}", "get"),
            ("/{id}", "delete"),
        ] {
            assert!(paths[path][method].is_object(), "missing {method} {path}");
        }
        assert!(fragment["components"]["schemas"]["BookResponse"].is_object());
    }

    #[test]
    fn module_is_named_books() {
        let module = create_module(Arc::new(InMemoryBookRepository::new()));
        assert_eq!(module.name(), "books");
    }
}
