//! HTTP server facade for the catalog service: axum bootstrap, response
//! envelope, error handling, and OpenAPI support.

use anyhow::Context;
use axum::{routing::get, Router};

use catalog_kernel::{Db, ModuleRegistry};

pub mod error;
pub mod response;
pub mod router;

use router::RouterBuilder;

/// Start the HTTP server with the given module registry.
pub async fn start_server(
    registry: &ModuleRegistry,
    settings: &catalog_kernel::settings::Settings,
    db: Db,
) -> anyhow::Result<()> {
    let app = build_router(registry, settings, db).context("failed to build HTTP router")?;

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", settings.server.host, settings.server.port))
            .await
            .context("failed to bind to address")?;

    tracing::info!(
        "HTTP server listening on http://{}:{}",
        settings.server.host,
        settings.server.port
    );

    axum::serve(listener, app)
        .await
        .context("HTTP server failed")?;

    Ok(())
}

/// Build the main HTTP router with all module routes mounted.
pub fn build_router(
    registry: &ModuleRegistry,
    settings: &catalog_kernel::settings::Settings,
    db: Db,
) -> anyhow::Result<Router> {
    let mut router_builder = RouterBuilder::new()
        .with_tracing()
        .with_cors()
        .with_request_id()
        .with_timeout(settings.server.request_timeout_ms)
        .route("/healthz", get(health_check));

    for module in registry.modules() {
        tracing::info!(
            module = module.name(),
            prefix = module.prefix(),
            "mounting module routes"
        );
        router_builder = router_builder.mount_module(module.prefix(), module.routes());
    }

    router_builder = router_builder.with_openapi(registry);

    Ok(router_builder.build(db))
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}
