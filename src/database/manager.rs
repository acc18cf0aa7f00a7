use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the credential and listing stores
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate {0}")]
    Duplicate(&'static str),

    #[error("Version mismatch: expected {expected}, found {actual}")]
    VersionMismatch { expected: i64, actual: i64 },

    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Build the process-wide Postgres pool. Called once at startup; the pool is
/// closed again through `Store::close` on shutdown.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    let raw_url = config
        .url
        .as_deref()
        .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
    let url = parse_database_url(raw_url)?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
        .connect(url.as_str())
        .await
        .map_err(|e| DatabaseError::Unavailable(e.to_string()))?;

    info!(
        "Created database pool for {}{} (max {} connections)",
        url.host_str().unwrap_or("localhost"),
        url.path(),
        config.max_connections
    );
    Ok(pool)
}

fn parse_database_url(raw: &str) -> Result<url::Url, DatabaseError> {
    let url = url::Url::parse(raw).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
    match url.scheme() {
        "postgres" | "postgresql" => Ok(url),
        _ => Err(DatabaseError::InvalidDatabaseUrl),
    }
}

/// Map unique and foreign-key violations onto store errors.
pub(crate) fn map_constraint_violation(err: sqlx::Error) -> DatabaseError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            Some("23505") => {
                let field = match db_err.constraint() {
                    Some(name) if name.contains("email") => "email",
                    _ => "username",
                };
                return DatabaseError::Duplicate(field);
            }
            Some("23503") => return DatabaseError::NotFound("User not found".to_string()),
            _ => {}
        }
    }
    DatabaseError::Sqlx(err)
}
