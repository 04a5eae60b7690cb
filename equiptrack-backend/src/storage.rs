use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sea_orm::{ConnectionTrait, DatabaseConnection, SqlxSqliteConnector};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::ConnectOptions;
use sqlx::SqlitePool;
use tracing::debug;

use crate::migration::{Migrator, MigratorTrait};

// Open the configured database
pub async fn new(db_path: &Path) -> Result<DatabaseConnection, DBError> {
    start_db(Some(db_path)).await
}

/// Open a database connection, create the schema, and hand back a pool.
/// `None` opens an in-memory database.
pub async fn start_db(db_path: Option<&Path>) -> Result<DatabaseConnection, DBError> {
    let db_path = match db_path {
        Some(path) => path.display().to_string(),
        None => ":memory:".to_string(),
    };
    let db_url = format!("sqlite://{}?mode=rwc", db_path);
    debug!("Opening Database: {db_url}");

    let options = SqliteConnectOptions::from_str(&db_url)?
        .log_statements(log::LevelFilter::Trace)
        .log_slow_statements(log::LevelFilter::Warn, Duration::from_millis(500));

    let pool = SqlitePool::connect_with(options).await?;
    let conn = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);

    // Enable foreign key constraints
    conn.execute_unprepared("PRAGMA foreign_keys = ON").await?;

    Migrator::up(&conn, None).await?;

    Ok(conn)
}

#[derive(Debug)]
pub enum DBError {
    SqlxError(sqlx::Error),
    DbErr(sea_orm::DbErr),
    IoError(std::io::Error),
}

impl From<sqlx::Error> for DBError {
    fn from(err: sqlx::Error) -> Self {
        DBError::SqlxError(err)
    }
}

impl From<sea_orm::DbErr> for DBError {
    fn from(err: sea_orm::DbErr) -> Self {
        DBError::DbErr(err)
    }
}

impl From<std::io::Error> for DBError {
    fn from(err: std::io::Error) -> Self {
        DBError::IoError(err)
    }
}
