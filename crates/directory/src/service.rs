//! Company directory service.
//!
//! The single place where companies are created, changed and removed. Every
//! operation is scoped to the user returned by the [`IdentityProvider`] and
//! fails with [`DirectoryError::Unauthenticated`] before touching the store
//! when there is none.
//!
//! # Default company
//!
//! A user with at least one company has exactly one default. The first company
//! is always created as default, and any write that makes a company default
//! demotes the others in the same store operation. Deleting the default does
//! not promote another company; callers pick the next one with
//! [`CompanyDirectory::set_default`].

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use facturo_core::{Company, CompanyDraft, CompanyId, CompanyPatch, UserId};

use crate::auth::IdentityProvider;
use crate::error::DirectoryError;
use crate::store::{CompanyRow, CompanyStore, CompanyWrite};

/// Directory of the current user's companies.
///
/// Cheap to clone; clones share the store and identity provider.
#[derive(Clone)]
pub struct CompanyDirectory {
    store: Arc<dyn CompanyStore>,
    identity: Arc<dyn IdentityProvider>,
}

impl std::fmt::Debug for CompanyDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompanyDirectory")
            .field("user", &self.identity.current_user())
            .finish_non_exhaustive()
    }
}

fn into_company(row: CompanyRow) -> Result<Company, DirectoryError> {
    Ok(Company::try_from(row)?)
}

fn validate_name(name: &str) -> Result<(), DirectoryError> {
    if name.trim().is_empty() {
        warn!("Rejected company without a name");
        return Err(DirectoryError::validation(
            "name",
            "Company name is required",
        ));
    }
    Ok(())
}

impl CompanyDirectory {
    #[must_use]
    pub fn new(store: Arc<dyn CompanyStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { store, identity }
    }

    /// The signed-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<UserId> {
        self.identity.current_user()
    }

    fn require_user(&self) -> Result<UserId, DirectoryError> {
        self.current_user().ok_or_else(|| {
            warn!("Directory used without a signed-in user");
            DirectoryError::Unauthenticated
        })
    }

    /// All companies of the current user, in store order.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` without a user, `Store` if the backend fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Company>, DirectoryError> {
        let user_id = self.require_user()?;
        let rows = self.store.list_companies(user_id).await?;
        debug!(%user_id, count = rows.len(), "Listed companies");
        rows.into_iter().map(into_company).collect()
    }

    /// One company of the current user.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the company does not exist or belongs to someone else.
    #[instrument(skip(self))]
    pub async fn get(&self, id: CompanyId) -> Result<Company, DirectoryError> {
        let user_id = self.require_user()?;
        let row = self
            .store
            .get_company(user_id, id)
            .await?
            .ok_or(DirectoryError::NotFound(id))?;
        debug!(%user_id, company_id = %id, "Fetched company");
        into_company(row)
    }

    /// The current user's default company, if one is flagged.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` without a user, `Store` if the backend fails.
    #[instrument(skip(self))]
    pub async fn default_company(&self) -> Result<Option<Company>, DirectoryError> {
        let companies = self.list().await?;
        Ok(companies.into_iter().find(|c| c.is_default))
    }

    /// Create a company for the current user.
    ///
    /// The user's first company is made default whatever the draft asks for.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a blank name (nothing is written),
    /// `Store` if the backend fails.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create(&self, mut draft: CompanyDraft) -> Result<Company, DirectoryError> {
        let user_id = self.require_user()?;
        validate_name(&draft.name)?;

        if !draft.is_default && self.store.list_companies(user_id).await?.is_empty() {
            debug!(%user_id, "First company, making it the default");
            draft.is_default = true;
        }

        let row = self
            .store
            .insert_company(user_id, &CompanyWrite::from(&draft))
            .await?;
        info!(%user_id, company_id = %row.id, is_default = draft.is_default, "Created company");
        into_company(row)
    }

    /// Apply a partial update to a company of the current user.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the patch blanks the name (nothing is written),
    /// `NotFound` for an unknown or foreign company, `Store` if the backend fails.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: CompanyId, patch: CompanyPatch) -> Result<Company, DirectoryError> {
        let user_id = self.require_user()?;
        if let Some(name) = &patch.name {
            validate_name(name)?;
        }

        let current = self
            .store
            .get_company(user_id, id)
            .await?
            .ok_or(DirectoryError::NotFound(id))?;
        let mut draft = into_company(current)?.to_draft();
        patch.apply(&mut draft);

        let row = self
            .store
            .update_company(user_id, id, &CompanyWrite::from(&draft))
            .await?
            .ok_or(DirectoryError::NotFound(id))?;
        info!(%user_id, company_id = %id, is_default = draft.is_default, "Updated company");
        into_company(row)
    }

    /// Delete a company of the current user.
    ///
    /// Deleting the default leaves the user without one.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown or foreign company, `Store` if the backend fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: CompanyId) -> Result<(), DirectoryError> {
        let user_id = self.require_user()?;
        if !self.store.delete_company(user_id, id).await? {
            warn!(%user_id, company_id = %id, "Delete of unknown company");
            return Err(DirectoryError::NotFound(id));
        }
        info!(%user_id, company_id = %id, "Deleted company");
        Ok(())
    }

    /// Make a company the current user's only default.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown or foreign company, `Store` if the backend fails.
    #[instrument(skip(self))]
    pub async fn set_default(&self, id: CompanyId) -> Result<Company, DirectoryError> {
        let user_id = self.require_user()?;
        let row = self
            .store
            .set_default_company(user_id, id)
            .await?
            .ok_or_else(|| {
                warn!(%user_id, company_id = %id, "Set default on unknown company");
                DirectoryError::NotFound(id)
            })?;
        info!(%user_id, company_id = %id, "Set default company");
        into_company(row)
    }
}
