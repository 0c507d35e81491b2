mod modules;
mod utils;

use anyhow::Context;
use catalog_kernel::settings::Settings;
use catalog_kernel::{InitCtx, ModuleRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load catalog settings")?;
    catalog_telemetry::init(&settings.telemetry);

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.path,
        "catalog-app bootstrap starting"
    );

    let pool = catalog_db::connect(&settings.database).await?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry);

    let ctx = InitCtx {
        settings: &settings,
        db: &pool,
    };
    registry.init_all(&ctx).await?;

    catalog_db::run_migrations(&pool, &registry)
        .await
        .context("failed to run database migrations")?;

    tracing::info!("catalog-app bootstrap complete");

    catalog_http::start_server(&registry, &settings, pool).await
}
