use anyhow::Context;
use bookshelf_app::modules;
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        "bookshelf bootstrap starting"
    );

    let pool = bookshelf_db::new_pool(&settings.database.url, settings.database.max_connections)
        .await
        .context("failed to open database")?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry);

    let ctx = InitCtx {
        settings: &settings,
        db: &pool,
    };

    registry.init_all(&ctx).await?;

    let applied = bookshelf_db::migrate::run(&pool, &registry.collect_migrations()).await?;
    tracing::info!(applied, "migrations complete");

    registry.start_all(&ctx).await?;
    tracing::info!("bookshelf bootstrap complete");

    registry.stop_all().await?;
    pool.close().await;
    Ok(())
}
