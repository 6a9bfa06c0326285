use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::config::Config;

/// Owner of the process-wide connection pool.
pub struct Database;

impl Database {
    /// Creates the shared Postgres pool and applies pending migrations.
    ///
    /// Called once during startup; the returned pool is handed to
    /// `AppState` and cloned into the repositories from there.
    pub async fn connect(config: &Config) -> Result<PgPool, anyhow::Error> {
        let pool = create_pool(&config.database_url, config.db_max_connections).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Database migrations applied");

        Ok(pool)
    }
}

/// Create a Postgres connection pool for `database_url`.
///
/// Returns a `sqlx::PgPool` or an error if the pool cannot be created.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}
