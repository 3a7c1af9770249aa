//! Postgres connection pool management

use pmrag_config::PostgresConnection;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

use crate::error::{PostgresError, PostgresResult};

/// Open a pool for `connection`, checking it with `SELECT 1`
pub async fn connect(connection: &PostgresConnection, max_connections: u32) -> PostgresResult<PgPool> {
    info!(
        host = %connection.host,
        port = connection.port,
        database = %connection.database,
        "Connecting to Postgres"
    );

    let options = PgConnectOptions::new()
        .host(&connection.host)
        .port(connection.port)
        .database(&connection.database)
        .username(&connection.user)
        .password(&connection.password);

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(30))
        .connect_with(options)
        .await
        .map_err(|e| PostgresError::Connection(e.to_string()))?;

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .map_err(|e| PostgresError::Connection(e.to_string()))?;

    info!("Postgres connection established");
    Ok(pool)
}
