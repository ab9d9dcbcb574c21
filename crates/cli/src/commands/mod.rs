//! CLI subcommands.

pub mod company;
pub mod migrate;
pub mod regions;

use facturo_directory::{ConfigError, DirectoryError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration is missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// No user given for a company command.
    #[error("No user given: pass --user or set FACTURO_USER_ID")]
    MissingUser,

    /// `company profile` without an id, and no default company.
    #[error("No default company; pass a company id")]
    NoDefaultCompany,

    /// The directory refused or failed the operation.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// Output could not be encoded.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}
