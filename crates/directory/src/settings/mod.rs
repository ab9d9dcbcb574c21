//! Company settings screen.
//!
//! Holds the full list of the user's companies next to one edit form. The
//! local list is kept in step with the directory from the values each
//! operation returns; it is only re-fetched by [`CompanySettings::load`].
//!
//! Validation problems are reported inline through
//! [`CompanySettings::field_error`]. Backend failures go to a dismissible
//! banner ([`CompanySettings::error`]) and leave the local state as it was.

mod form;

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use facturo_core::{Company, CompanyId, CompanyPatch};

use crate::config::DirectoryConfig;
use crate::error::DirectoryError;
use crate::service::CompanyDirectory;

pub use form::CompanyForm;

/// What the form is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Hidden,
    Creating,
    Editing(CompanyId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldError {
    field: &'static str,
    message: String,
}

/// Settings screen state.
#[derive(Debug)]
pub struct CompanySettings {
    directory: CompanyDirectory,
    notice_delay: Duration,
    companies: Vec<Company>,
    loading: bool,
    mode: FormMode,
    form: CompanyForm,
    saving: bool,
    pending_delete: Option<CompanyId>,
    deleting_id: Option<CompanyId>,
    error: Option<String>,
    field_error: Option<FieldError>,
    success_until: Option<Instant>,
}

impl CompanySettings {
    #[must_use]
    pub fn new(directory: CompanyDirectory, config: &DirectoryConfig) -> Self {
        Self::with_notice_delay(directory, config.success_notice)
    }

    #[must_use]
    pub fn with_notice_delay(directory: CompanyDirectory, notice_delay: Duration) -> Self {
        Self {
            directory,
            notice_delay,
            companies: Vec::new(),
            loading: false,
            mode: FormMode::Hidden,
            form: CompanyForm::default(),
            saving: false,
            pending_delete: None,
            deleting_id: None,
            error: None,
            field_error: None,
            success_until: None,
        }
    }

    #[must_use]
    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    #[must_use]
    pub const fn mode(&self) -> FormMode {
        self.mode
    }

    #[must_use]
    pub const fn form(&self) -> &CompanyForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut CompanyForm {
        &mut self.form
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn is_saving(&self) -> bool {
        self.saving
    }

    /// Row whose deletion is in flight. Only that row is disabled.
    #[must_use]
    pub const fn deleting_id(&self) -> Option<CompanyId> {
        self.deleting_id
    }

    /// Row awaiting delete confirmation.
    #[must_use]
    pub const fn pending_delete(&self) -> Option<CompanyId> {
        self.pending_delete
    }

    /// Banner message.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Inline message for `field`, if it failed validation.
    #[must_use]
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_error
            .as_ref()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    #[must_use]
    pub fn success_visible_at(&self, now: Instant) -> bool {
        self.success_until.is_some_and(|until| now < until)
    }

    #[must_use]
    pub fn success_visible(&self) -> bool {
        self.success_visible_at(Instant::now())
    }

    fn fail(&mut self, err: DirectoryError) -> DirectoryError {
        match &err {
            DirectoryError::Validation { field, message } => {
                self.field_error = Some(FieldError {
                    field: *field,
                    message: message.clone(),
                });
            }
            other => {
                warn!(error = %other, "Settings operation failed");
                self.error = Some(other.to_string());
            }
        }
        err
    }

    fn reset_form(&mut self) {
        self.mode = FormMode::Hidden;
        self.form = CompanyForm::default();
        self.field_error = None;
    }

    /// Fetch the list. Failures go to the banner.
    ///
    /// # Errors
    ///
    /// Returns the directory error.
    pub async fn load(&mut self) -> Result<(), DirectoryError> {
        self.loading = true;
        self.error = None;
        let result = self.directory.list().await;
        self.loading = false;
        match result {
            Ok(companies) => {
                debug!(count = companies.len(), "Settings loaded companies");
                self.companies = companies;
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Load a listed company into the form, discarding unsaved edits.
    ///
    /// Returns `false` if the company is not in the list.
    pub fn edit(&mut self, id: CompanyId) -> bool {
        let Some(company) = self.companies.iter().find(|c| c.id == id) else {
            return false;
        };
        self.form = CompanyForm::from_company(company);
        self.mode = FormMode::Editing(id);
        self.field_error = None;
        true
    }

    /// Open an empty form for a new company.
    pub fn start_new(&mut self) {
        self.reset_form();
        self.mode = FormMode::Creating;
    }

    pub fn cancel(&mut self) {
        self.reset_form();
    }

    /// Save the form, creating or updating depending on the mode.
    ///
    /// On success the list is updated locally, the form is cleared and the
    /// success notice shows until `now` plus the configured delay.
    ///
    /// # Errors
    ///
    /// Returns `Validation` without calling the directory when the form is
    /// invalid, or whatever the directory returns.
    pub async fn submit(&mut self, now: Instant) -> Result<Company, DirectoryError> {
        if self.saving {
            return Err(DirectoryError::validation("form", "A save is already in progress"));
        }
        self.field_error = None;
        let draft = match self.form.to_draft() {
            Ok(draft) => draft,
            Err(err) => return Err(self.fail(err)),
        };
        let requested_default = draft.is_default;

        self.saving = true;
        self.error = None;
        let result = match self.mode {
            FormMode::Editing(id) => {
                self.directory
                    .update(id, CompanyPatch::replace_with(draft))
                    .await
            }
            FormMode::Hidden | FormMode::Creating => self.directory.create(draft).await,
        };
        self.saving = false;

        let company = match result {
            Ok(company) => company,
            Err(err) => return Err(self.fail(err)),
        };

        if let FormMode::Editing(id) = self.mode {
            for entry in &mut self.companies {
                if entry.id == id {
                    *entry = company.clone();
                } else if requested_default {
                    entry.is_default = false;
                }
            }
        } else {
            if company.is_default {
                for entry in &mut self.companies {
                    entry.is_default = false;
                }
            }
            self.companies.push(company.clone());
        }

        self.reset_form();
        self.success_until = Some(now + self.notice_delay);
        Ok(company)
    }

    /// Ask for confirmation before deleting `id`.
    pub fn request_delete(&mut self, id: CompanyId) {
        if self.deleting_id.is_none() {
            self.pending_delete = Some(id);
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Delete the company awaiting confirmation.
    ///
    /// Returns `Ok(None)` when nothing was awaiting confirmation.
    ///
    /// # Errors
    ///
    /// Returns the directory error; the entry is kept.
    pub async fn confirm_delete(&mut self) -> Result<Option<CompanyId>, DirectoryError> {
        let Some(id) = self.pending_delete.take() else {
            return Ok(None);
        };

        self.deleting_id = Some(id);
        let result = self.directory.delete(id).await;
        self.deleting_id = None;

        if let Err(err) = result {
            return Err(self.fail(err));
        }
        self.companies.retain(|c| c.id != id);
        if self.mode == FormMode::Editing(id) {
            self.reset_form();
        }
        Ok(Some(id))
    }

    /// Make `id` the default straight from the list.
    ///
    /// # Errors
    ///
    /// Returns the directory error; the list is left as it was.
    pub async fn set_default(&mut self, id: CompanyId) -> Result<Company, DirectoryError> {
        let company = match self.directory.set_default(id).await {
            Ok(company) => company,
            Err(err) => return Err(self.fail(err)),
        };
        for entry in &mut self.companies {
            entry.is_default = entry.id == id;
        }
        Ok(company)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use facturo_core::{CompanyDraft, FiscalRegion, UserId};

    use super::*;
    use crate::auth::StaticIdentity;
    use crate::store::InMemoryCompanyStore;

    fn settings() -> (CompanySettings, CompanyDirectory, Arc<InMemoryCompanyStore>) {
        let store = Arc::new(InMemoryCompanyStore::new());
        let directory = CompanyDirectory::new(
            store.clone(),
            Arc::new(StaticIdentity::user(UserId::random())),
        );
        let settings = CompanySettings::new(directory.clone(), &DirectoryConfig::default());
        (settings, directory, store)
    }

    fn defaults(settings: &CompanySettings) -> Vec<&str> {
        settings
            .companies()
            .iter()
            .filter(|c| c.is_default)
            .map(|c| c.name.as_str())
            .collect()
    }

    #[tokio::test]
    async fn test_create_shows_notice_for_configured_delay() {
        let (mut settings, _, _) = settings();
        settings.load().await.unwrap();
        settings.start_new();
        settings.form_mut().name = "Acme".to_owned();

        let now = Instant::now();
        let acme = settings.submit(now).await.unwrap();
        assert!(acme.is_default);
        assert_eq!(settings.mode(), FormMode::Hidden);
        assert_eq!(settings.form(), &CompanyForm::default());
        assert!(settings.success_visible_at(now + Duration::from_millis(2999)));
        assert!(!settings.success_visible_at(now + Duration::from_secs(3)));
    }

    #[tokio::test]
    async fn test_create_default_demotes_locally() {
        let (mut settings, directory, _) = settings();
        directory.create(CompanyDraft::named("Acme")).await.unwrap();
        settings.load().await.unwrap();

        settings.start_new();
        settings.form_mut().name = "Beta".to_owned();
        settings.form_mut().is_default = true;
        settings.submit(Instant::now()).await.unwrap();

        assert_eq!(defaults(&settings), ["Beta"]);
        assert_eq!(settings.companies().last().unwrap().name, "Beta");
    }

    #[tokio::test]
    async fn test_edit_update_replaces_entry() {
        let (mut settings, directory, _) = settings();
        let acme = directory.create(CompanyDraft::named("Acme")).await.unwrap();
        let beta = directory.create(CompanyDraft::named("Beta")).await.unwrap();
        settings.load().await.unwrap();

        assert!(settings.edit(beta.id));
        settings.form_mut().phone = "0102030405".to_owned();
        settings.form_mut().is_default = true;
        settings.submit(Instant::now()).await.unwrap();

        assert_eq!(defaults(&settings), ["Beta"]);
        let stored = directory.get(beta.id).await.unwrap();
        assert_eq!(stored.phone.as_deref(), Some("0102030405"));
        assert!(!directory.get(acme.id).await.unwrap().is_default);
    }

    #[tokio::test]
    async fn test_blank_name_is_inline_and_skips_directory() {
        let (mut settings, _, store) = settings();
        settings.start_new();
        let calls = store.calls();

        assert!(settings.submit(Instant::now()).await.is_err());
        assert!(settings.field_error("name").is_some());
        assert_eq!(settings.error(), None);
        assert_eq!(store.calls(), calls);
        assert_eq!(settings.mode(), FormMode::Creating);
    }

    #[tokio::test]
    async fn test_region_values_survive_until_submit() {
        let (mut settings, directory, _) = settings();
        settings.start_new();
        let form = settings.form_mut();
        form.name = "Acme".to_owned();
        form.set_fiscal_region(FiscalRegion::Eu);
        form.siret = "12345678900012".to_owned();
        form.set_fiscal_region(FiscalRegion::None);
        let company = settings.submit(Instant::now()).await.unwrap();

        assert_eq!(company.fiscal.siret(), None);
        let stored = directory.get(company.id).await.unwrap();
        assert_eq!(stored.fiscal_region(), FiscalRegion::None);
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let (mut settings, directory, store) = settings();
        let acme = directory.create(CompanyDraft::named("Acme")).await.unwrap();
        settings.load().await.unwrap();
        settings.edit(acme.id);

        settings.request_delete(acme.id);
        settings.cancel_delete();
        let calls = store.calls();
        assert_eq!(settings.confirm_delete().await.unwrap(), None);
        assert_eq!(store.calls(), calls);

        settings.request_delete(acme.id);
        assert_eq!(settings.confirm_delete().await.unwrap(), Some(acme.id));
        assert!(settings.companies().is_empty());
        assert_eq!(settings.mode(), FormMode::Hidden);
        assert_eq!(settings.deleting_id(), None);
    }

    #[tokio::test]
    async fn test_failure_goes_to_banner_and_keeps_state() {
        let (mut settings, directory, store) = settings();
        let acme = directory.create(CompanyDraft::named("Acme")).await.unwrap();
        settings.load().await.unwrap();

        store.fail_next("connection refused").await;
        settings.request_delete(acme.id);
        assert!(settings.confirm_delete().await.is_err());
        assert_eq!(settings.error(), Some("connection refused"));
        assert_eq!(settings.companies().len(), 1);

        settings.dismiss_error();
        assert_eq!(settings.error(), None);
    }

    #[tokio::test]
    async fn test_set_default_from_list() {
        let (mut settings, directory, _) = settings();
        directory.create(CompanyDraft::named("Acme")).await.unwrap();
        let beta = directory.create(CompanyDraft::named("Beta")).await.unwrap();
        settings.load().await.unwrap();

        settings.set_default(beta.id).await.unwrap();
        assert_eq!(defaults(&settings), ["Beta"]);

        let missing = CompanyId::random();
        let err = settings.set_default(missing).await.unwrap_err();
        assert_eq!(err, DirectoryError::NotFound(missing));
        assert!(settings.error().is_some());
        assert_eq!(defaults(&settings), ["Beta"]);
    }
}
