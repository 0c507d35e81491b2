//! SQLite connection pool factory and migration runner.

use std::str::FromStr;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::Row;

use catalog_kernel::settings::DatabaseSettings;
use catalog_kernel::{Db, ModuleRegistry};

/// Open a connection pool against the configured SQLite database,
/// creating the file when it does not exist yet.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<Db> {
    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", settings.path))
        .with_context(|| format!("invalid database path '{}'", settings.path))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(options)
        .await
        .with_context(|| format!("failed to open database '{}'", settings.path))?;

    tracing::info!(target: "catalog-db", path = %settings.path, "database pool ready");
    Ok(pool)
}

/// Execute every module migration that has not run yet, in registration
/// order. Applied migration ids are recorded in `_migrations`.
pub async fn run_migrations(pool: &Db, registry: &ModuleRegistry) -> anyhow::Result<()> {
    sqlx::raw_sql("CREATE TABLE IF NOT EXISTS _migrations (id TEXT PRIMARY KEY)")
        .execute(pool)
        .await
        .context("failed to create migration bookkeeping table")?;

    for module in registry.modules() {
        for migration in module.migrations() {
            let id = format!("{}::{}", module.name(), migration.id);

            let applied = sqlx::query("SELECT id FROM _migrations WHERE id = ?")
                .bind(&id)
                .fetch_optional(pool)
                .await
                .with_context(|| format!("failed to check migration '{}'", id))?;
            if applied.is_some() {
                continue;
            }

            tracing::info!(target: "catalog-db", migration = %id, "applying migration");

            sqlx::raw_sql(migration.up)
                .execute(pool)
                .await
                .with_context(|| format!("failed to apply migration '{}'", id))?;
            sqlx::query("INSERT INTO _migrations (id) VALUES (?)")
                .bind(&id)
                .execute(pool)
                .await
                .with_context(|| format!("failed to record migration '{}'", id))?;
        }
    }

    Ok(())
}

/// Count applied migrations. Exposed for startup logging and tests.
pub async fn applied_migrations(pool: &Db) -> anyhow::Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS n FROM _migrations")
        .fetch_one(pool)
        .await
        .context("failed to count applied migrations")?;
    Ok(row.get("n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use catalog_kernel::{InitCtx, Migration, Module};
    use std::sync::Arc;

    struct WidgetsModule;

    #[async_trait]
    impl Module for WidgetsModule {
        fn name(&self) -> &'static str {
            "widgets"
        }

        fn migrations(&self) -> Vec<Migration> {
            vec![Migration {
                id: "001_init",
                up: "CREATE TABLE widgets (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT)",
            }]
        }
    }

    async fn memory_pool() -> Db {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool")
    }

    #[tokio::test]
    async fn migrations_run_once() {
        let pool = memory_pool().await;
        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(WidgetsModule));

        run_migrations(&pool, &registry).await.expect("first run");
        // A second run must skip the already-applied migration.
        run_migrations(&pool, &registry).await.expect("second run");

        assert_eq!(applied_migrations(&pool).await.expect("count"), 1);
        sqlx::query("INSERT INTO widgets (name) VALUES ('w')")
            .execute(&pool)
            .await
            .expect("table exists");
    }

    #[tokio::test]
    async fn init_ctx_exposes_pool() {
        let pool = memory_pool().await;
        let settings = catalog_kernel::settings::Settings::default();
        let ctx = InitCtx {
            settings: &settings,
            db: &pool,
        };
        let registry = ModuleRegistry::new();
        registry.init_all(&ctx).await.expect("init");
    }
}
