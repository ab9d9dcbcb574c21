//! Database operations for the directory `PostgreSQL` store.
//!
//! ## Tables
//!
//! - `companies` - Billing companies, one row per company, scoped by `user_id`
//!
//! # Migrations
//!
//! Migrations are stored in `crates/directory/migrations/` and run via:
//! ```bash
//! cargo run -p facturo-cli -- migrate
//! ```

pub mod companies;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::PgPoolOptions;

use crate::config::DatabaseConfig;

pub use companies::PgCompanyStore;

/// Embedded directory migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Create a `PostgreSQL` connection pool from the configured limits.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(1)
        .acquire_timeout(config.acquire_timeout)
        .connect(config.url.expose_secret())
        .await
}

/// Apply every pending migration.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the history is inconsistent.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}
