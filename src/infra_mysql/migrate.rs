use anyhow::anyhow;
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;
use tracing::info;

pub async fn connect(dsn: &str, max_connections: u32) -> anyhow::Result<MySqlPool> {
    let pool = MySqlPoolOptions::new()
        .max_connections(max_connections)
        .connect(dsn)
        .await
        .map_err(|e| anyhow!("connect mysql: {e}"))?;
    Ok(pool)
}

/// Applies the embedded schema migrations that have not run yet.
pub async fn run_migrations(pool: &MySqlPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| anyhow!("run migrations: {e}"))?;
    info!("schema migrations applied");
    Ok(())
}
