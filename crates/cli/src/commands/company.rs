//! Company management commands.
//!
//! # Usage
//!
//! ```bash
//! facturo --user <USER_ID> company list
//! facturo --user <USER_ID> company create "Acme SARL" --email contact@acme.fr --default
//! facturo --user <USER_ID> company update <ID> --phone "" --currency USD
//! facturo --user <USER_ID> company set-default <ID>
//! facturo --user <USER_ID> company delete <ID>
//! facturo --user <USER_ID> company profile [<ID>]
//! ```
//!
//! On `update`, an empty value clears an optional field.
//!
//! # Environment Variables
//!
//! - `FACTURO_DATABASE_URL` - `PostgreSQL` connection string
//! - `FACTURO_USER_ID` - Default for `--user`

use std::sync::Arc;

use clap::{Args, Subcommand};
use tracing::info;

use facturo_core::{
    Company, CompanyDraft, CompanyId, CompanyPatch, Currency, DocumentPrefix, FiscalField,
    FiscalInfo, FiscalRegion, PaymentMethod, UserId, non_blank,
};
use facturo_directory::db::{self, PgCompanyStore};
use facturo_directory::{CompanyDirectory, DirectoryConfig, StaticIdentity};

use super::CommandError;

#[derive(Subcommand)]
pub enum CompanyAction {
    /// List companies, default marked with `*`
    List,
    /// Create a company
    Create {
        /// Display name
        name: String,

        #[command(flatten)]
        fields: CompanyFields,

        /// Make it the default company
        #[arg(long)]
        default: bool,
    },
    /// Update a company
    Update {
        id: CompanyId,

        /// New display name
        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        fields: CompanyFields,

        /// Make it the default company
        #[arg(long)]
        default: bool,
    },
    /// Make a company the default
    SetDefault { id: CompanyId },
    /// Delete a company
    Delete { id: CompanyId },
    /// Print the billing profile JSON of a company (default company if omitted)
    Profile { id: Option<CompanyId> },
}

/// Optional company fields shared by `create` and `update`.
#[derive(Args, Debug, Default)]
pub struct CompanyFields {
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    logo_url: Option<String>,
    /// Fiscal region code (NONE, MG, EU)
    #[arg(long)]
    region: Option<FiscalRegion>,
    #[arg(long)]
    siret: Option<String>,
    #[arg(long)]
    vat_number: Option<String>,
    #[arg(long)]
    nif: Option<String>,
    #[arg(long)]
    stat: Option<String>,
    #[arg(long)]
    iban: Option<String>,
    #[arg(long)]
    bic: Option<String>,
    /// Currency code (EUR, USD, GBP, CAD, CHF, MGA)
    #[arg(long)]
    currency: Option<Currency>,
    /// Payment method code or label (e.g. `bank_transfer`)
    #[arg(long)]
    payment_method: Option<PaymentMethod>,
    #[arg(long)]
    invoice_prefix: Option<DocumentPrefix>,
    #[arg(long)]
    quote_prefix: Option<DocumentPrefix>,
    #[arg(long)]
    notes: Option<String>,
}

impl CompanyFields {
    fn fiscal_arg(&self, field: FiscalField) -> Option<&String> {
        match field {
            FiscalField::Siret => self.siret.as_ref(),
            FiscalField::VatNumber => self.vat_number.as_ref(),
            FiscalField::Nif => self.nif.as_ref(),
            FiscalField::Stat => self.stat.as_ref(),
        }
    }

    fn touches_fiscal(&self) -> bool {
        self.region.is_some()
            || self.siret.is_some()
            || self.vat_number.is_some()
            || self.nif.is_some()
            || self.stat.is_some()
    }

    /// Fiscal info built from the flags, falling back to `current` per field.
    ///
    /// Without `--region`, the region is inferred from the identifiers given.
    fn fiscal(&self, current: &FiscalInfo) -> FiscalInfo {
        let region = self.region.unwrap_or_else(|| {
            if self.siret.is_some() || self.vat_number.is_some() {
                FiscalRegion::Eu
            } else if self.nif.is_some() || self.stat.is_some() {
                FiscalRegion::Mg
            } else {
                current.region()
            }
        });
        FiscalInfo::from_fields(region, |field| {
            self.fiscal_arg(field)
                .cloned()
                .or_else(|| current.get(field).map(str::to_owned))
        })
    }

    fn into_draft(self, name: String, is_default: bool) -> CompanyDraft {
        let fiscal = self.fiscal(&FiscalInfo::None);
        let defaults = CompanyDraft::default();
        CompanyDraft {
            name,
            email: non_blank(self.email),
            address: non_blank(self.address),
            phone: non_blank(self.phone),
            logo_url: non_blank(self.logo_url),
            fiscal,
            iban: non_blank(self.iban),
            bic: non_blank(self.bic),
            default_currency: self.currency.unwrap_or(defaults.default_currency),
            default_payment_method: self
                .payment_method
                .unwrap_or(defaults.default_payment_method),
            invoice_prefix: self.invoice_prefix.unwrap_or(defaults.invoice_prefix),
            quote_prefix: self.quote_prefix.unwrap_or(defaults.quote_prefix),
            notes: non_blank(self.notes),
            is_default,
        }
    }

    #[allow(clippy::option_option)]
    fn into_patch(self, current: &Company, name: Option<String>, is_default: bool) -> CompanyPatch {
        let fiscal = self
            .touches_fiscal()
            .then(|| self.fiscal(&current.fiscal));
        let clearable = |value: Option<String>| value.map(|v| non_blank(Some(v)));
        CompanyPatch {
            name,
            email: clearable(self.email),
            address: clearable(self.address),
            phone: clearable(self.phone),
            logo_url: clearable(self.logo_url),
            fiscal,
            iban: clearable(self.iban),
            bic: clearable(self.bic),
            default_currency: self.currency,
            default_payment_method: self.payment_method,
            invoice_prefix: self.invoice_prefix,
            quote_prefix: self.quote_prefix,
            notes: clearable(self.notes),
            is_default: is_default.then_some(true),
        }
    }
}

/// A company command together with the user it acts for.
pub struct CompanyArgs {
    pub user: Option<UserId>,
    pub action: CompanyAction,
}

async fn connect(config: &DirectoryConfig, user: UserId) -> Result<CompanyDirectory, CommandError> {
    let pool = db::create_pool(config.require_database()?).await?;
    Ok(CompanyDirectory::new(
        Arc::new(PgCompanyStore::new(pool)),
        Arc::new(StaticIdentity::user(user)),
    ))
}

/// Run a company command against the configured database.
///
/// # Errors
///
/// Returns an error if no user is given, the database is unreachable, or the
/// directory rejects the operation.
pub async fn run(config: &DirectoryConfig, args: CompanyArgs) -> Result<(), CommandError> {
    let user = args.user.ok_or(CommandError::MissingUser)?;
    let directory = connect(config, user).await?;
    execute(&directory, args.action).await
}

/// Run a company command against an already built directory.
///
/// # Errors
///
/// Returns the directory error, or an output encoding error.
#[allow(clippy::print_stdout)]
pub async fn execute(directory: &CompanyDirectory, action: CompanyAction) -> Result<(), CommandError> {
    match action {
        CompanyAction::List => {
            for company in directory.list().await? {
                println!("{}", summary(&company));
            }
        }
        CompanyAction::Create {
            name,
            fields,
            default,
        } => {
            let company = directory.create(fields.into_draft(name, default)).await?;
            info!(company_id = %company.id, "Company created");
            println!("{}", summary(&company));
        }
        CompanyAction::Update {
            id,
            name,
            fields,
            default,
        } => {
            let current = directory.get(id).await?;
            let patch = fields.into_patch(&current, name, default);
            let company = directory.update(id, patch).await?;
            info!(company_id = %company.id, "Company updated");
            println!("{}", summary(&company));
        }
        CompanyAction::SetDefault { id } => {
            let company = directory.set_default(id).await?;
            println!("{}", summary(&company));
        }
        CompanyAction::Delete { id } => {
            directory.delete(id).await?;
            info!(company_id = %id, "Company deleted");
            if directory.default_company().await?.is_none() && !directory.list().await?.is_empty() {
                tracing::warn!("No default company left; pick one with `company set-default`");
            }
        }
        CompanyAction::Profile { id } => {
            let company = match id {
                Some(id) => directory.get(id).await?,
                None => directory
                    .default_company()
                    .await?
                    .ok_or(CommandError::NoDefaultCompany)?,
            };
            println!("{}", serde_json::to_string_pretty(&company.billing_profile())?);
        }
    }
    Ok(())
}

fn summary(company: &Company) -> String {
    format!(
        "{} {} {} [{}]",
        if company.is_default { '*' } else { ' ' },
        company.id,
        company.name,
        company.fiscal_region().code()
    )
}
