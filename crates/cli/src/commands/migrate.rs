//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! facturo migrate
//! ```
//!
//! # Environment Variables
//!
//! - `FACTURO_DATABASE_URL` - `PostgreSQL` connection string
//!
//! # Migration Files
//!
//! Directory migrations: `crates/directory/migrations/`

use tracing::info;

use facturo_directory::DirectoryConfig;
use facturo_directory::db;

use super::CommandError;

/// Run directory database migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails,
/// or a migration cannot be applied.
pub async fn run(config: &DirectoryConfig) -> Result<(), CommandError> {
    let database = config.require_database()?;

    info!("Connecting to directory database...");
    let pool = db::create_pool(database).await?;

    info!("Running directory migrations...");
    db::run_migrations(&pool).await?;

    info!("Directory migrations complete!");
    Ok(())
}
