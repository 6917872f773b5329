mod conversion;
mod submission_repository;
mod visibility_repository;

pub use conversion::{DBConvertible, DBToConversionError};
pub use submission_repository::{SqlSubmission, SubmissionRepository, SubmitError};
pub use visibility_repository::VisibilityRepository;

use std::str::FromStr;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use tracing::info;

#[tracing::instrument(skip(url))]
pub async fn setup_database(url: &str) -> anyhow::Result<SqlitePool> {
    info!("Connecting to SQLite database at {url}");
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    info!("Running migrations");
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Done!");
    Ok(pool)
}

/// A fresh in-memory database with migrations applied.
#[cfg(test)]
pub async fn memory_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:").expect("Valid URL");
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("In-memory database should open");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Migrations should apply");
    pool
}
