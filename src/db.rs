use std::{str::FromStr, sync::Arc};

use sqlx::{
    postgres::PgPoolOptions,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracing::info;

use crate::config::Config;
use crate::store::{PgScoreStore, ScoreStore, SqliteScoreStore};

static POSTGRES_MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("migrations/postgres");
static SQLITE_MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("migrations/sqlite");

/// Connects the store selected by `DATABASE_URL` and applies migrations if enabled.
pub async fn init_store(config: &Config) -> anyhow::Result<Arc<dyn ScoreStore>> {
    if config.uses_sqlite() {
        info!("Connecting to SQLite...");
        let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;
        if config.migrate_on_startup {
            SQLITE_MIGRATOR.run(&pool).await?;
            info!("SQLite migrations applied");
        }
        Ok(Arc::new(SqliteScoreStore::new(pool)))
    } else {
        info!("Connecting to PostgreSQL...");
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await?;
        if config.migrate_on_startup {
            POSTGRES_MIGRATOR.run(&pool).await?;
            info!("PostgreSQL migrations applied");
        }
        Ok(Arc::new(PgScoreStore::new(pool)))
    }
}

/// A migrated single-connection in-memory SQLite store.
#[cfg(test)]
pub async fn memory_store() -> anyhow::Result<SqliteScoreStore> {
    let pool = memory_pool().await?;
    SQLITE_MIGRATOR.run(&pool).await?;
    Ok(SqliteScoreStore::new(pool))
}

/// An in-memory SQLite store whose schema was never created.
#[cfg(test)]
pub async fn unmigrated_memory_store() -> anyhow::Result<SqliteScoreStore> {
    Ok(SqliteScoreStore::new(memory_pool().await?))
}

#[cfg(test)]
async fn memory_pool() -> anyhow::Result<sqlx::SqlitePool> {
    // every in-memory connection is its own database, so the pool must hold exactly one
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    Ok(pool)
}

#[cfg(test)]
pub async fn migrate_postgres(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    POSTGRES_MIGRATOR.run(pool).await?;
    Ok(())
}
