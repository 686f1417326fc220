use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::errors::ServiceError;

pub type DbPool = DatabaseConnection;

/// Open a connection pool against the configured database.
pub async fn establish_connection(cfg: &AppConfig) -> Result<DbPool, ServiceError> {
    let mut options = ConnectOptions::new(cfg.database_url.clone());
    options
        .max_connections(cfg.db_max_connections)
        .min_connections(cfg.db_min_connections)
        .connect_timeout(Duration::from_secs(cfg.db_connect_timeout_secs))
        .sqlx_logging(false);

    let pool = Database::connect(options).await.map_err(|e| {
        error!("Failed to connect to database: {}", e);
        ServiceError::DatabaseError(e)
    })?;

    Ok(pool)
}

/// Open a pool from a bare URL with defaults suitable for tests.
pub async fn connect(database_url: &str) -> Result<DbPool, ServiceError> {
    let mut options = ConnectOptions::new(database_url.to_string());
    options.max_connections(1).sqlx_logging(false);
    Ok(Database::connect(options).await?)
}

/// Run the embedded migrator to bring the schema up to date.
pub async fn run_migrations(pool: &DbPool) -> Result<(), ServiceError> {
    info!("Running database migrations");
    let start = std::time::Instant::now();

    let result = crate::migrator::Migrator::up(pool, None)
        .await
        .map_err(ServiceError::DatabaseError);

    let elapsed = start.elapsed();
    match &result {
        Ok(_) => info!("Database migrations completed in {:?}", elapsed),
        Err(e) => error!("Database migrations failed after {:?}: {}", elapsed, e),
    }

    result
}

/// Liveness check used by the health endpoint.
pub async fn check_connection(pool: &DbPool) -> Result<(), ServiceError> {
    pool.ping().await.map_err(ServiceError::DatabaseError)
}
