use anyhow::Context;

use crate::Pool;

const CREATE_SCHEMA_MIGRATIONS: &str = r#"
    CREATE TABLE IF NOT EXISTS schema_migrations (
        version    TEXT PRIMARY KEY NOT NULL,
        applied_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    )"#;

/// Schema change contributed by a module
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

/// Version key recorded in `schema_migrations` for a module's migration
pub fn version(module: &str, migration: &Migration) -> String {
    format!("{module}/{}", migration.id)
}

/// Apply every migration not yet recorded, each in its own transaction.
///
/// Returns the number of migrations applied by this call.
pub async fn run(pool: &Pool, migrations: &[(String, Migration)]) -> anyhow::Result<usize> {
    let applied = applied(pool).await?;
    let mut count = 0;

    for (module, migration) in migrations {
        let version = version(module, migration);
        if applied.contains(&version) {
            tracing::debug!(target: "bookshelf-db", %version, "migration already applied");
            continue;
        }

        tracing::info!(target: "bookshelf-db", %version, "applying migration");

        let mut tx = pool
            .begin()
            .await
            .context("failed to open migration transaction")?;
        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("migration '{version}' failed"))?;
        sqlx::query("INSERT INTO schema_migrations (version) VALUES (?)")
            .bind(&version)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("failed to record migration '{version}'"))?;
        tx.commit()
            .await
            .with_context(|| format!("failed to commit migration '{version}'"))?;

        count += 1;
    }

    Ok(count)
}

/// Versions already applied, in lexical order
pub async fn applied(pool: &Pool) -> anyhow::Result<Vec<String>> {
    sqlx::query(CREATE_SCHEMA_MIGRATIONS)
        .execute(pool)
        .await
        .context("failed to create schema_migrations table")?;

    sqlx::query_scalar::<_, String>("SELECT version FROM schema_migrations ORDER BY version")
        .fetch_all(pool)
        .await
        .context("failed to read applied migrations")
}
