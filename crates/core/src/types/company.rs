//! The company entity and its creation/update payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    CompanyId, Currency, DocumentPrefix, FiscalInfo, FiscalRegion, PaymentMethod, UserId,
};

/// A billing entity owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: CompanyId,
    pub user_id: UserId,
    pub name: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub logo_url: Option<String>,
    #[serde(flatten)]
    pub fiscal: FiscalInfo,
    pub iban: Option<String>,
    pub bic: Option<String>,
    pub default_currency: Currency,
    pub default_payment_method: PaymentMethod,
    pub invoice_prefix: DocumentPrefix,
    pub quote_prefix: DocumentPrefix,
    pub notes: Option<String>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    #[must_use]
    pub const fn fiscal_region(&self) -> FiscalRegion {
        self.fiscal.region()
    }

    /// Editable fields of this company, as a draft.
    #[must_use]
    pub fn to_draft(&self) -> CompanyDraft {
        CompanyDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
            phone: self.phone.clone(),
            logo_url: self.logo_url.clone(),
            fiscal: self.fiscal.clone(),
            iban: self.iban.clone(),
            bic: self.bic.clone(),
            default_currency: self.default_currency,
            default_payment_method: self.default_payment_method,
            invoice_prefix: self.invoice_prefix.clone(),
            quote_prefix: self.quote_prefix.clone(),
            notes: self.notes.clone(),
            is_default: self.is_default,
        }
    }

    /// Flattened projection consumed by document-creation forms.
    #[must_use]
    pub fn billing_profile(&self) -> BillingProfile {
        BillingProfile::from(self)
    }
}

/// Fields supplied when creating a company.
///
/// `is_default` is a request: the directory forces it for a user's first company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyDraft {
    pub name: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub logo_url: Option<String>,
    pub fiscal: FiscalInfo,
    pub iban: Option<String>,
    pub bic: Option<String>,
    pub default_currency: Currency,
    pub default_payment_method: PaymentMethod,
    pub invoice_prefix: DocumentPrefix,
    pub quote_prefix: DocumentPrefix,
    pub notes: Option<String>,
    pub is_default: bool,
}

impl CompanyDraft {
    /// A draft with only a name and every other field at its default.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Default for CompanyDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: None,
            address: None,
            phone: None,
            logo_url: None,
            fiscal: FiscalInfo::None,
            iban: None,
            bic: None,
            default_currency: Currency::default(),
            default_payment_method: PaymentMethod::default(),
            invoice_prefix: DocumentPrefix::invoice_default(),
            quote_prefix: DocumentPrefix::quote_default(),
            notes: None,
            is_default: false,
        }
    }
}

/// Partial update of a company.
///
/// `None` leaves a field untouched. For optional fields `Some(None)` clears the
/// stored value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[allow(clippy::option_option)]
pub struct CompanyPatch {
    pub name: Option<String>,
    pub email: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub logo_url: Option<Option<String>>,
    pub fiscal: Option<FiscalInfo>,
    pub iban: Option<Option<String>>,
    pub bic: Option<Option<String>>,
    pub default_currency: Option<Currency>,
    pub default_payment_method: Option<PaymentMethod>,
    pub invoice_prefix: Option<DocumentPrefix>,
    pub quote_prefix: Option<DocumentPrefix>,
    pub notes: Option<Option<String>>,
    pub is_default: Option<bool>,
}

impl CompanyPatch {
    /// A patch that only marks the company as default.
    #[must_use]
    pub fn make_default() -> Self {
        Self {
            is_default: Some(true),
            ..Self::default()
        }
    }

    /// A patch replacing every editable field with the draft's values.
    #[must_use]
    pub fn replace_with(draft: CompanyDraft) -> Self {
        Self {
            name: Some(draft.name),
            email: Some(draft.email),
            address: Some(draft.address),
            phone: Some(draft.phone),
            logo_url: Some(draft.logo_url),
            fiscal: Some(draft.fiscal),
            iban: Some(draft.iban),
            bic: Some(draft.bic),
            default_currency: Some(draft.default_currency),
            default_payment_method: Some(draft.default_payment_method),
            invoice_prefix: Some(draft.invoice_prefix),
            quote_prefix: Some(draft.quote_prefix),
            notes: Some(draft.notes),
            is_default: Some(draft.is_default),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the patch to a draft of the current values.
    pub fn apply(self, target: &mut CompanyDraft) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        set(&mut target.name, self.name);
        set(&mut target.email, self.email);
        set(&mut target.address, self.address);
        set(&mut target.phone, self.phone);
        set(&mut target.logo_url, self.logo_url);
        set(&mut target.fiscal, self.fiscal);
        set(&mut target.iban, self.iban);
        set(&mut target.bic, self.bic);
        set(&mut target.default_currency, self.default_currency);
        set(&mut target.default_payment_method, self.default_payment_method);
        set(&mut target.invoice_prefix, self.invoice_prefix);
        set(&mut target.quote_prefix, self.quote_prefix);
        set(&mut target.notes, self.notes);
        set(&mut target.is_default, self.is_default);
    }
}

/// Company data as consumed by invoice and quote forms.
///
/// Every value is text; only `company_name` is guaranteed present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingProfile {
    pub company_name: String,
    pub company_email: Option<String>,
    pub company_address: Option<String>,
    pub company_phone: Option<String>,
    pub logo_url: Option<String>,
    pub currency: Option<String>,
    pub payment_method: Option<String>,
    pub invoice_prefix: Option<String>,
    pub quote_prefix: Option<String>,
    pub fiscal_region: Option<String>,
    pub siret: Option<String>,
    pub vat_number: Option<String>,
    pub nif: Option<String>,
    pub stat: Option<String>,
}

impl From<&Company> for BillingProfile {
    fn from(company: &Company) -> Self {
        let fiscal = &company.fiscal;
        Self {
            company_name: company.name.clone(),
            company_email: company.email.clone(),
            company_address: company.address.clone(),
            company_phone: company.phone.clone(),
            logo_url: company.logo_url.clone(),
            currency: Some(company.default_currency.code().to_owned()),
            payment_method: Some(company.default_payment_method.label().to_owned()),
            invoice_prefix: Some(company.invoice_prefix.to_string()),
            quote_prefix: Some(company.quote_prefix.to_string()),
            fiscal_region: Some(company.fiscal_region().code().to_owned()),
            siret: fiscal.siret().map(str::to_owned),
            vat_number: fiscal.vat_number().map(str::to_owned),
            nif: fiscal.nif().map(str::to_owned),
            stat: fiscal.stat().map(str::to_owned),
        }
    }
}
