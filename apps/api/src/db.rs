use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{ConnectOptions, Connection, Executor, MySqlPool};
use tracing::info;

use crate::config::DbConfig;

const MAX_CONNECTIONS: u32 = 10;

/// Requests wait for a free connection rather than fail; this only bounds a wedged server.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(600);

pub const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS sensor_data (
    id INT AUTO_INCREMENT PRIMARY KEY,
    mq2 VARCHAR(255),
    mq135 VARCHAR(255),
    lm35dz VARCHAR(255),
    dm436 VARCHAR(255),
    relay VARCHAR(255),
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)
"#;

/// Ensures the database and the `sensor_data` table exist, then returns the
/// pool shared by the request handlers. Safe to run against an initialized server.
pub async fn bootstrap(config: &DbConfig) -> Result<MySqlPool> {
    ensure_database(config).await.with_context(|| {
        format!(
            "Failed to ensure database '{}' on {}:{}",
            config.database, config.host, config.port
        )
    })?;

    let pool = create_pool(config).await?;

    sqlx::query(CREATE_TABLE_SQL)
        .execute(&pool)
        .await
        .context("Failed to ensure table 'sensor_data'")?;

    info!("Database '{}' and table ready", config.database);
    Ok(pool)
}

/// Creates and returns a MySQL connection pool bound to the configured database.
pub async fn create_pool(config: &DbConfig) -> Result<MySqlPool> {
    info!("Connecting to MySQL at {}:{}...", config.host, config.port);

    let pool = MySqlPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_with(server_options(config).database(&config.database))
        .await
        .context("Failed to create MySQL connection pool")?;

    info!("MySQL connection pool established");
    Ok(pool)
}

async fn ensure_database(config: &DbConfig) -> Result<()> {
    let mut conn = server_options(config).connect().await?;

    // Simple-query protocol: DDL with an identifier cannot be parameterized.
    let statement = create_database_sql(&config.database);
    (&mut conn).execute(statement.as_str()).await?;

    conn.close().await?;
    Ok(())
}

fn server_options(config: &DbConfig) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
}

fn create_database_sql(name: &str) -> String {
    format!(
        "CREATE DATABASE IF NOT EXISTS `{}`",
        name.replace('`', "``")
    )
}
