pub mod models;
pub mod routes;

use async_trait::async_trait;
use axum::{routing::get, Router};
use catalog_kernel::{Db, InitCtx, Migration, Module};

/// Products module: name-keyed CRUD at the root path with an id-keyed
/// companion under `/id/{id}`.
pub struct ProductsModule;

impl ProductsModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for ProductsModule {
    fn name(&self) -> &'static str {
        "products"
    }

    fn prefix(&self) -> &'static str {
        "/"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "products module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router<Db> {
        Router::new()
            .route(
                "/",
                get(routes::get_products)
                    .post(routes::create_product)
                    .put(routes::rename_product)
                    .delete(routes::delete_product),
            )
            .route(
                "/id/{id}",
                get(routes::get_product_by_id)
                    .put(routes::rename_product_by_id)
                    .delete(routes::delete_product_by_id),
            )
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List products, or look one up by name",
                        "tags": ["Products"],
                        "parameters": [{
                            "name": "name",
                            "in": "query",
                            "required": false,
                            "schema": { "type": "string" }
                        }],
                        "responses": {
                            "200": {
                                "description": "Matching products",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ProductResponse" }
                                    }
                                }
                            },
                            "404": {
                                "description": "Named product does not exist",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Create a product",
                        "tags": ["Products"],
                        "requestBody": {
                            "content": {
                                "application/x-www-form-urlencoded": {
                                    "schema": {
                                        "type": "object",
                                        "properties": { "name": { "type": "string" } },
                                        "required": ["name"]
                                    }
                                }
                            }
                        },
                        "responses": {
                            "201": { "description": "Product created" },
                            "400": { "description": "Missing name" },
                            "409": { "description": "Name already exists" }
                        }
                    },
                    "put": {
                        "summary": "Rename the product identified by the query name",
                        "tags": ["Products"],
                        "parameters": [{
                            "name": "name",
                            "in": "query",
                            "required": true,
                            "schema": { "type": "string" }
                        }],
                        "responses": {
                            "200": { "description": "Product renamed" },
                            "404": { "description": "Target does not exist" },
                            "409": { "description": "New name already taken" }
                        }
                    },
                    "delete": {
                        "summary": "Delete the product identified by the query name",
                        "tags": ["Products"],
                        "parameters": [{
                            "name": "name",
                            "in": "query",
                            "required": true,
                            "schema": { "type": "string" }
                        }],
                        "responses": {
                            "204": { "description": "Product deleted" },
                            "404": { "description": "Product does not exist" }
                        }
                    }
                },
                "/id/{id}": {
                    "get": {
                        "summary": "Get a product by id",
                        "tags": ["Products"],
                        "parameters": [{
                            "name": "id",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "integer" }
                        }],
                        "responses": {
                            "200": { "description": "Product found" },
                            "404": { "description": "Id does not exist" }
                        }
                    },
                    "put": {
                        "summary": "Rename a product by id",
                        "tags": ["Products"],
                        "responses": {
                            "200": { "description": "Product renamed" },
                            "404": { "description": "Id does not exist" },
                            "409": { "description": "New name already taken" }
                        }
                    },
                    "delete": {
                        "summary": "Delete a product by id",
                        "tags": ["Products"],
                        "responses": {
                            "204": { "description": "Product deleted" },
                            "404": { "description": "Id does not exist" }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Product": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "name": { "type": "string", "description": "Stored lower-cased; unique" }
                        },
                        "required": ["id", "name"]
                    },
                    "ProductResponse": {
                        "type": "object",
                        "properties": {
                            "status": { "type": "string" },
                            "message": { "type": "string" },
                            "http_code": { "type": "integer" },
                            "data": {
                                "type": "object",
                                "properties": {
                                    "products": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/Product" }
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
                CREATE TABLE IF NOT EXISTS products (
                    id   INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL UNIQUE
                );
                "#,
        }]
    }
}

/// Create a new instance of the products module.
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(ProductsModule::new())
}
