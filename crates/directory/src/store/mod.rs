//! Persistence boundary for company records.
//!
//! Stores speak snake_case rows ([`CompanyRow`] in, [`CompanyWrite`] out) and
//! know nothing about validation. The one rule they must honour is default
//! exclusivity: writing a row with `is_default = true`, or calling
//! [`CompanyStore::set_default_company`], clears the flag on every other
//! company of the same user in the same unit of work.

pub mod memory;
pub mod row;

use async_trait::async_trait;
use thiserror::Error;

use facturo_core::{CompanyId, UserId};

pub use memory::InMemoryCompanyStore;
pub use row::{CompanyRow, CompanyWrite};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Any other backend failure, described by the backend.
    #[error("{0}")]
    Backend(String),
}

/// CRUD over the companies table, always scoped to one user.
#[async_trait]
pub trait CompanyStore: Send + Sync {
    /// All companies of `user_id`, in the store's natural order.
    async fn list_companies(&self, user_id: UserId) -> Result<Vec<CompanyRow>, StoreError>;

    /// One company, or `None` if it does not exist or belongs to someone else.
    async fn get_company(
        &self,
        user_id: UserId,
        id: CompanyId,
    ) -> Result<Option<CompanyRow>, StoreError>;

    /// Insert a company. A default row demotes the user's other companies atomically.
    async fn insert_company(
        &self,
        user_id: UserId,
        company: &CompanyWrite,
    ) -> Result<CompanyRow, StoreError>;

    /// Overwrite a company. A default row demotes the user's other companies atomically.
    ///
    /// Returns `None` if the company does not exist or belongs to someone else.
    async fn update_company(
        &self,
        user_id: UserId,
        id: CompanyId,
        company: &CompanyWrite,
    ) -> Result<Option<CompanyRow>, StoreError>;

    /// Delete a company. Returns `false` if nothing was deleted.
    async fn delete_company(&self, user_id: UserId, id: CompanyId) -> Result<bool, StoreError>;

    /// Make `id` the user's only default company.
    ///
    /// Returns `None` (and changes nothing) if the company is unknown.
    async fn set_default_company(
        &self,
        user_id: UserId,
        id: CompanyId,
    ) -> Result<Option<CompanyRow>, StoreError>;
}
