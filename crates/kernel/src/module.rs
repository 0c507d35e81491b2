use async_trait::async_trait;
use axum::Router;

/// Shared database handle threaded through routers as axum state.
pub type Db = sqlx::SqlitePool;

/// Context provided to modules during initialization.
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
    pub db: &'a Db,
}

/// Migration definition for modules.
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

/// Core trait that every catalog module implements.
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name for this module.
    fn name(&self) -> &'static str;

    /// Path the module's router is mounted under. `"/"` mounts at the root.
    fn prefix(&self) -> &'static str {
        "/"
    }

    /// Initialize the module with the provided context.
    /// Called during application startup before migrations.
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Return the axum router for this module's routes.
    /// The database handle is applied as state when the server is built.
    fn routes(&self) -> Router<Db> {
        Router::new()
    }

    /// Return an OpenAPI specification fragment for this module as JSON.
    /// Fragments are merged with other modules' specs; paths are prefixed
    /// with [`Module::prefix`].
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Return migrations contributed by this module.
    /// Migrations are executed in the order returned.
    fn migrations(&self) -> Vec<Migration> {
        vec![]
    }
}
