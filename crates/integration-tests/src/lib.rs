//! Integration tests for Facturo.
//!
//! # Running Tests
//!
//! ```bash
//! # In-memory scenarios
//! cargo test -p facturo-integration-tests
//!
//! # PostgreSQL scenarios (ignored by default)
//! FACTURO_TEST_DATABASE_URL=postgres://localhost/facturo_test \
//!     cargo test -p facturo-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `directory_*` - Service rules against the in-memory store
//! - `picker_flow` / `settings_flow` - View-model flows
//! - `postgres_store` - The same rules against a real database

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use facturo_core::UserId;
use facturo_directory::config::DatabaseConfig;
use facturo_directory::db::{self, PgCompanyStore};
use facturo_directory::{CompanyDirectory, InMemoryCompanyStore, SessionIdentity};

/// A directory over a fresh in-memory store, signed in as a new user.
pub struct TestContext {
    pub user: UserId,
    pub store: Arc<InMemoryCompanyStore>,
    pub identity: Arc<SessionIdentity>,
    pub directory: CompanyDirectory,
}

impl TestContext {
    #[must_use]
    pub fn new() -> Self {
        let user = UserId::random();
        let store = Arc::new(InMemoryCompanyStore::new());
        let identity = Arc::new(SessionIdentity::new());
        identity.sign_in(user);
        let directory = CompanyDirectory::new(store.clone(), identity.clone());
        Self {
            user,
            store,
            identity,
            directory,
        }
    }

    /// A second directory on the same store for another signed-in user.
    #[must_use]
    pub fn other_user(&self) -> CompanyDirectory {
        let identity = Arc::new(SessionIdentity::new());
        identity.sign_in(UserId::random());
        CompanyDirectory::new(self.store.clone(), identity)
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Connect to `FACTURO_TEST_DATABASE_URL`, migrate, and return a directory
/// for a fresh user. `None` when the variable is unset.
///
/// # Panics
///
/// Panics if the database is unreachable or migrations fail.
#[allow(clippy::expect_used)]
pub async fn postgres_directory() -> Option<(CompanyDirectory, PgCompanyStore)> {
    let url = std::env::var("FACTURO_TEST_DATABASE_URL").ok()?;
    let config = DatabaseConfig {
        url: SecretString::from(url),
        max_connections: 2,
        acquire_timeout: Duration::from_secs(5),
    };
    let pool = db::create_pool(&config)
        .await
        .expect("Failed to connect to test database");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let store = PgCompanyStore::new(pool);
    let identity = Arc::new(SessionIdentity::new());
    identity.sign_in(UserId::random());
    let directory = CompanyDirectory::new(Arc::new(store.clone()), identity);
    Some((directory, store))
}
