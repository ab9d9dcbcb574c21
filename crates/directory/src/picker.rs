//! Compact company picker.
//!
//! A dropdown over the directory: search the loaded companies, pick one to
//! fill a document form, or create one inline from a reduced set of fields.
//!
//! ```text
//! Closed --open--> Open(Listing) --start_creating--> Open(Creating)
//!    ^                 |   ^                             |
//!    |                 |   +-------cancel_creating-------+
//!    +--select/close---+-------submit_new/click_outside--+
//! ```

use tracing::{debug, warn};

use facturo_core::{BillingProfile, Company, CompanyDraft, CompanyId, FiscalInfo, non_blank};

use crate::error::DirectoryError;
use crate::service::CompanyDirectory;

/// What the dropdown currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickerMode {
    #[default]
    Closed,
    Listing,
    Creating,
}

/// Inline creation form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCompanyForm {
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
    pub siret: String,
}

impl NewCompanyForm {
    /// Build the draft sent to the directory. A SIRET makes the company `EU`.
    #[must_use]
    pub fn to_draft(&self) -> CompanyDraft {
        let fiscal = non_blank(Some(self.siret.clone())).map_or(FiscalInfo::None, |siret| {
            FiscalInfo::Eu {
                siret: Some(siret),
                vat_number: None,
            }
        });
        CompanyDraft {
            email: non_blank(Some(self.email.clone())),
            address: non_blank(Some(self.address.clone())),
            phone: non_blank(Some(self.phone.clone())),
            fiscal,
            ..CompanyDraft::named(self.name.clone())
        }
    }
}

/// Companies matching `query` by name, email or SIRET, case-insensitively.
///
/// A blank query matches everything. Order is preserved.
#[must_use]
pub fn filter_companies<'a>(companies: &'a [Company], query: &str) -> Vec<&'a Company> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return companies.iter().collect();
    }
    let hit = |value: Option<&str>| value.is_some_and(|v| v.to_lowercase().contains(&query));
    companies
        .iter()
        .filter(|c| hit(Some(c.name.as_str())) || hit(c.email.as_deref()) || hit(c.fiscal.siret()))
        .collect()
}

/// Picker state for one session of the current user.
#[derive(Debug)]
pub struct CompanyPicker {
    directory: CompanyDirectory,
    mode: PickerMode,
    companies: Vec<Company>,
    loaded: bool,
    loading: bool,
    query: String,
    form: NewCompanyForm,
    saving: bool,
    error: Option<String>,
    selected: Option<CompanyId>,
}

impl CompanyPicker {
    #[must_use]
    pub fn new(directory: CompanyDirectory) -> Self {
        Self {
            directory,
            mode: PickerMode::Closed,
            companies: Vec::new(),
            loaded: false,
            loading: false,
            query: String::new(),
            form: NewCompanyForm::default(),
            saving: false,
            error: None,
            selected: None,
        }
    }

    /// Whether the picker should be shown at all.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.directory.current_user().is_some()
    }

    #[must_use]
    pub const fn mode(&self) -> PickerMode {
        self.mode
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.mode != PickerMode::Closed
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn is_saving(&self) -> bool {
        self.saving
    }

    /// Last load or creation failure, for display.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The company last picked in this session.
    #[must_use]
    pub const fn selected(&self) -> Option<CompanyId> {
        self.selected
    }

    /// The loaded list, unfiltered.
    #[must_use]
    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The loaded list filtered by the current query.
    #[must_use]
    pub fn visible(&self) -> Vec<&Company> {
        filter_companies(&self.companies, &self.query)
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Open the dropdown. Returns `true` if the list still has to be loaded.
    ///
    /// Split from [`load`](Self::load) so a caller can render the loading state
    /// before awaiting.
    pub fn begin_open(&mut self) -> bool {
        if !self.is_available() {
            return false;
        }
        self.mode = PickerMode::Listing;
        if self.loaded || self.loading {
            return false;
        }
        self.loading = true;
        true
    }

    /// Fetch the list. On failure the list stays empty and the next open retries.
    ///
    /// # Errors
    ///
    /// Returns the directory error, which is also kept in [`error`](Self::error).
    pub async fn load(&mut self) -> Result<(), DirectoryError> {
        self.loading = true;
        let result = self.directory.list().await;
        self.loading = false;
        match result {
            Ok(companies) => {
                debug!(count = companies.len(), "Picker loaded companies");
                self.companies = companies;
                self.loaded = true;
                self.error = None;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Picker failed to load companies");
                self.companies.clear();
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Open the dropdown, loading the list on first use.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` without a user, or the load failure.
    pub async fn open(&mut self) -> Result<(), DirectoryError> {
        if !self.is_available() {
            return Err(DirectoryError::Unauthenticated);
        }
        if self.begin_open() {
            self.load().await?;
        }
        Ok(())
    }

    /// Close the dropdown, discarding any creation in progress.
    pub fn close(&mut self) {
        self.mode = PickerMode::Closed;
        self.form = NewCompanyForm::default();
    }

    /// Open if closed, close if open.
    ///
    /// # Errors
    ///
    /// Same as [`open`](Self::open).
    pub async fn toggle(&mut self) -> Result<(), DirectoryError> {
        if self.is_open() {
            self.close();
            Ok(())
        } else {
            self.open().await
        }
    }

    pub fn click_outside(&mut self) {
        if self.is_open() {
            self.close();
        }
    }

    /// Pick a loaded company. Closes the dropdown and clears the search.
    pub fn select(&mut self, id: CompanyId) -> Option<BillingProfile> {
        let profile = self
            .companies
            .iter()
            .find(|c| c.id == id)
            .map(Company::billing_profile)?;
        self.selected = Some(id);
        self.query.clear();
        self.close();
        Some(profile)
    }

    pub fn start_creating(&mut self) {
        if self.mode == PickerMode::Listing {
            self.mode = PickerMode::Creating;
        }
    }

    pub fn cancel_creating(&mut self) {
        if self.mode == PickerMode::Creating {
            self.mode = PickerMode::Listing;
            self.form = NewCompanyForm::default();
        }
    }

    #[must_use]
    pub const fn form(&self) -> &NewCompanyForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut NewCompanyForm {
        &mut self.form
    }

    /// Create the company from the inline form and select it.
    ///
    /// On failure the picker is left as it was and the message is kept.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a blank name without calling the directory,
    /// or whatever the directory returns.
    pub async fn submit_new(&mut self) -> Result<BillingProfile, DirectoryError> {
        if !self.is_available() {
            return Err(DirectoryError::Unauthenticated);
        }
        if self.saving {
            return Err(DirectoryError::validation("form", "A save is already in progress"));
        }
        if self.form.name.trim().is_empty() {
            return Err(DirectoryError::validation("name", "Company name is required"));
        }

        self.saving = true;
        let result = self.directory.create(self.form.to_draft()).await;
        self.saving = false;

        match result {
            Ok(company) => {
                let profile = company.billing_profile();
                self.selected = Some(company.id);
                self.companies.insert(0, company);
                self.error = None;
                self.query.clear();
                self.close();
                Ok(profile)
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }
}
