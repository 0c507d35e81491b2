pub mod models;
pub mod routes;

use async_trait::async_trait;
use axum::{routing::get, Router};
use catalog_kernel::{Db, InitCtx, Migration, Module};

/// Books module: JSON CRUD for the library catalogue, mounted under
/// `/api/v1`.
pub struct BooksModule;

impl BooksModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    fn prefix(&self) -> &'static str {
        "/api/v1"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router<Db> {
        Router::new()
            .route(
                "/books",
                get(routes::list_books).post(routes::create_book),
            )
            .route(
                "/books/{id}",
                get(routes::get_book)
                    .put(routes::update_book)
                    .delete(routes::delete_book),
            )
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/books": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "All books",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/BookResponse" }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/BookPayload" }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Book created",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/BookResponse" }
                                    }
                                }
                            },
                            "400": {
                                "description": "Missing fields or malformed publication date",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/books/{id}": {
                    "get": {
                        "summary": "Get a book by id",
                        "tags": ["Books"],
                        "parameters": [{
                            "name": "id",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "integer" }
                        }],
                        "responses": {
                            "200": { "description": "Book found" },
                            "400": { "description": "Non-integer id" },
                            "404": { "description": "No book for the given id" }
                        }
                    },
                    "put": {
                        "summary": "Update a book in place",
                        "tags": ["Books"],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/BookPayload" }
                                }
                            }
                        },
                        "responses": {
                            "200": { "description": "Book updated" },
                            "400": { "description": "Invalid id or body" },
                            "404": { "description": "No book for the given id" }
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "responses": {
                            "204": { "description": "Book deleted" },
                            "400": { "description": "Non-integer id" },
                            "404": { "description": "No book for the given id" }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "genre": { "type": "string" },
                            "description": { "type": "string" },
                            "publication_date": { "type": "string", "format": "date" },
                            "availability_status": { "type": "string" },
                            "edition": { "type": "string" },
                            "summary": { "type": "string" },
                            "created_at": { "type": "string" },
                            "updated_at": { "type": "string" }
                        },
                        "required": [
                            "id", "title", "author", "genre", "description",
                            "publication_date", "availability_status", "edition",
                            "summary", "created_at", "updated_at"
                        ]
                    },
                    "BookPayload": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "genre": { "type": "string" },
                            "description": { "type": "string" },
                            "publication_date": { "type": "string", "format": "date" },
                            "availability_status": { "type": "string" },
                            "edition": { "type": "string" },
                            "summary": { "type": "string" }
                        },
                        "required": [
                            "title", "author", "genre", "description",
                            "publication_date", "availability_status", "edition", "summary"
                        ]
                    },
                    "BookResponse": {
                        "type": "object",
                        "properties": {
                            "status": { "type": "string" },
                            "message": { "type": "string" },
                            "http_code": { "type": "integer" },
                            "data": {
                                "type": "object",
                                "properties": {
                                    "books": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE IF NOT EXISTS books (
                    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
                    title               TEXT NOT NULL,
                    author              TEXT NOT NULL,
                    genre               TEXT NOT NULL,
                    description         TEXT NOT NULL,
                    publication_date    TEXT NOT NULL,
                    availability_status TEXT NOT NULL,
                    edition             TEXT NOT NULL,
                    summary             TEXT NOT NULL,
                    created_at          TEXT NOT NULL
                        DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now')),
                    updated_at          TEXT NOT NULL
                        DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
                );
                "#,
        }]
    }
}

/// Create a new instance of the books module.
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new())
}
