//! Router builder for the catalog HTTP server.

use axum::{extract::Request, http::HeaderValue, routing::get, Json, Router};
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestId, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use uuid::{Timestamp, Uuid};

use catalog_kernel::{Db, ModuleRegistry};

/// Builder for constructing the main HTTP router. Routes are collected as
/// `Router<Db>`; the database handle is applied once in [`Self::build`].
pub struct RouterBuilder {
    router: Router<Db>,
}

impl RouterBuilder {
    /// Create a new router builder.
    pub fn new() -> Self {
        Self {
            router: Router::new(),
        }
    }

    /// Add a route to the router.
    pub fn route(mut self, path: &str, route: axum::routing::MethodRouter<Db>) -> Self {
        self.router = self.router.route(path, route);
        self
    }

    /// Mount a module's router under its prefix. A `"/"` prefix merges the
    /// routes at the root instead of nesting (axum rejects nesting at `/`).
    pub fn mount_module(mut self, prefix: &str, module_router: Router<Db>) -> Self {
        self.router = if prefix == "/" {
            self.router.merge(module_router)
        } else {
            self.router.nest(prefix, module_router)
        };
        self
    }

    /// Add tracing middleware.
    pub fn with_tracing(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
        );
        self
    }

    /// Add CORS middleware.
    pub fn with_cors(mut self) -> Self {
        self.router = self.router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
        self
    }

    /// Add request ID middleware (uuid-v7 per request).
    pub fn with_request_id(mut self) -> Self {
        self.router = self
            .router
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));
        self
    }

    /// Add timeout middleware.
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.router = self
            .router
            .layer(TimeoutLayer::new(Duration::from_millis(timeout_ms)));
        self
    }

    /// Add OpenAPI documentation by collecting fragments from all modules.
    pub fn with_openapi(mut self, registry: &ModuleRegistry) -> Self {
        // Base spec shared by every deployment.
        let mut openapi_spec = serde_json::json!({
            "openapi": "3.0.0",
            "info": {
                "title": "Catalog API",
                "version": "1.0.0",
                "description": "Products and books CRUD API"
            },
            "paths": {},
            "components": {
                "schemas": {}
            }
        });

        // Error envelope schema shared by all endpoints.
        openapi_spec["components"]["schemas"]["ErrorResponse"] = serde_json::json!({
            "type": "object",
            "properties": {
                "status": { "type": "string", "enum": ["error"] },
                "message": { "type": "string" },
                "http_code": { "type": "integer" },
                "error": {
                    "type": "object",
                    "properties": {
                        "details": { "type": "string" }
                    }
                }
            },
            "required": ["status", "message", "http_code"]
        });

        openapi_spec["paths"]["/healthz"] = serde_json::json!({
            "get": {
                "summary": "Health check",
                "responses": {
                    "200": {
                        "description": "OK",
                        "content": {
                            "text/plain": {
                                "schema": { "type": "string" }
                            }
                        }
                    }
                }
            }
        });

        for module in registry.modules() {
            let Some(module_spec) = module.openapi() else {
                continue;
            };

            if let Some(paths) = module_spec.get("paths").and_then(|p| p.as_object()) {
                for (path, path_item) in paths {
                    let prefix = module.prefix();
                    let mounted_path = if prefix == "/" {
                        path.clone()
                    } else {
                        format!("{}{}", prefix, path)
                    };
                    openapi_spec["paths"][mounted_path] = path_item.clone();
                }
            }

            if let Some(schemas) = module_spec
                .get("components")
                .and_then(|c| c.get("schemas"))
                .and_then(|s| s.as_object())
            {
                for (schema_name, schema_def) in schemas {
                    openapi_spec["components"]["schemas"][schema_name] = schema_def.clone();
                }
            }
        }

        // Deserialize the merged JSON into a proper utoipa object so
        // SwaggerUI can serve it.
        let openapi_obj: utoipa::openapi::OpenApi = serde_json::from_value(openapi_spec.clone())
            .unwrap_or_else(|_| {
                utoipa::openapi::OpenApiBuilder::new()
                    .info(
                        utoipa::openapi::InfoBuilder::new()
                            .title("Catalog API")
                            .version("1.0.0")
                            .build(),
                    )
                    .build()
            });

        self.router = self.router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi_obj),
        );

        // Raw JSON spec for external consumers.
        self.router = self.router.route(
            "/docs/openapi.json",
            get(move || async move { Json(openapi_spec) }),
        );

        self
    }

    /// Build the final router by applying the shared database handle.
    pub fn build(self, db: Db) -> Router {
        self.router.with_state(db)
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Request ID generator: time-ordered uuid-v7 values.
#[derive(Clone)]
struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let timestamp = Timestamp::now(uuid::NoContext);
        let request_id = Uuid::new_v7(timestamp)
            .to_string()
            .parse::<HeaderValue>()
            .ok()?;
        Some(RequestId::new(request_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> Db {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool")
    }

    #[tokio::test]
    async fn router_builds_with_root_and_nested_mounts() {
        let pool = memory_pool().await;
        let root_routes = Router::new().route("/", get(|| async { "root" }));
        let nested_routes = Router::new().route("/books", get(|| async { "books" }));

        let _router = RouterBuilder::new()
            .mount_module("/", root_routes)
            .mount_module("/api/v1", nested_routes)
            .build(pool);
    }

    #[tokio::test]
    async fn middleware_chain_builds() {
        let pool = memory_pool().await;
        let _router = RouterBuilder::new()
            .with_tracing()
            .with_cors()
            .with_request_id()
            .with_timeout(5000)
            .route("/healthz", get(|| async { "ok" }))
            .build(pool);
    }

    #[test]
    fn request_ids_are_unique() {
        let mut maker = MakeRequestUuid;
        let req = Request::builder().body(()).expect("request");
        let a = maker.make_request_id(&req).expect("id");
        let b = maker.make_request_id(&req).expect("id");
        assert_ne!(a.header_value(), b.header_value());
    }
}
