//! Full company form used by the settings screen.
//!
//! Fiscal inputs for every region live side by side in the form. Switching
//! region only changes which of them are shown; the values stay until submit,
//! where only the selected region's identifiers are kept.

use facturo_core::{
    Company, CompanyDraft, Currency, DocumentPrefix, FieldDescriptor, FiscalField, FiscalInfo,
    FiscalRegion, PaymentMethod, fields_for, non_blank,
};

use crate::error::DirectoryError;

/// Editable state of one company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyForm {
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
    pub logo_url: String,
    pub fiscal_region: FiscalRegion,
    pub siret: String,
    pub vat_number: String,
    pub nif: String,
    pub stat: String,
    pub iban: String,
    pub bic: String,
    pub default_currency: Currency,
    pub default_payment_method: PaymentMethod,
    pub invoice_prefix: String,
    pub quote_prefix: String,
    pub notes: String,
    pub is_default: bool,
}

impl Default for CompanyForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            address: String::new(),
            phone: String::new(),
            logo_url: String::new(),
            fiscal_region: FiscalRegion::None,
            siret: String::new(),
            vat_number: String::new(),
            nif: String::new(),
            stat: String::new(),
            iban: String::new(),
            bic: String::new(),
            default_currency: Currency::default(),
            default_payment_method: PaymentMethod::ALL[0],
            invoice_prefix: DocumentPrefix::invoice_default().into_inner(),
            quote_prefix: DocumentPrefix::quote_default().into_inner(),
            notes: String::new(),
            is_default: false,
        }
    }
}

fn text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_owned()
}

impl CompanyForm {
    /// Load a stored company for editing.
    #[must_use]
    pub fn from_company(company: &Company) -> Self {
        let fiscal = &company.fiscal;
        Self {
            name: company.name.clone(),
            email: text(company.email.as_deref()),
            address: text(company.address.as_deref()),
            phone: text(company.phone.as_deref()),
            logo_url: text(company.logo_url.as_deref()),
            fiscal_region: fiscal.region(),
            siret: text(fiscal.siret()),
            vat_number: text(fiscal.vat_number()),
            nif: text(fiscal.nif()),
            stat: text(fiscal.stat()),
            iban: text(company.iban.as_deref()),
            bic: text(company.bic.as_deref()),
            default_currency: company.default_currency,
            default_payment_method: company.default_payment_method,
            invoice_prefix: company.invoice_prefix.to_string(),
            quote_prefix: company.quote_prefix.to_string(),
            notes: text(company.notes.as_deref()),
            is_default: company.is_default,
        }
    }

    /// Fiscal inputs to render for the selected region, in display order.
    #[must_use]
    pub fn visible_fiscal_fields(&self) -> &'static [FieldDescriptor] {
        fields_for(self.fiscal_region)
    }

    /// Change region. Values typed for other regions are kept.
    pub fn set_fiscal_region(&mut self, region: FiscalRegion) {
        self.fiscal_region = region;
    }

    #[must_use]
    pub fn fiscal_value(&self, field: FiscalField) -> &str {
        match field {
            FiscalField::Siret => &self.siret,
            FiscalField::VatNumber => &self.vat_number,
            FiscalField::Nif => &self.nif,
            FiscalField::Stat => &self.stat,
        }
    }

    pub fn set_fiscal_value(&mut self, field: FiscalField, value: impl Into<String>) {
        let slot = match field {
            FiscalField::Siret => &mut self.siret,
            FiscalField::VatNumber => &mut self.vat_number,
            FiscalField::Nif => &mut self.nif,
            FiscalField::Stat => &mut self.stat,
        };
        *slot = value.into();
    }

    /// Validate and convert to a draft.
    ///
    /// # Errors
    ///
    /// Returns `Validation` naming the first invalid field.
    pub fn to_draft(&self) -> Result<CompanyDraft, DirectoryError> {
        if self.name.trim().is_empty() {
            return Err(DirectoryError::validation(
                "name",
                "Company name is required",
            ));
        }
        let invoice_prefix = DocumentPrefix::parse(&self.invoice_prefix)
            .map_err(|e| DirectoryError::validation("invoicePrefix", e.to_string()))?;
        let quote_prefix = DocumentPrefix::parse(&self.quote_prefix)
            .map_err(|e| DirectoryError::validation("quotePrefix", e.to_string()))?;

        let field = |value: &str| non_blank(Some(value.to_owned()));
        Ok(CompanyDraft {
            name: self.name.clone(),
            email: field(&self.email),
            address: field(&self.address),
            phone: field(&self.phone),
            logo_url: field(&self.logo_url),
            fiscal: FiscalInfo::from_fields(self.fiscal_region, |f| {
                Some(self.fiscal_value(f).to_owned())
            }),
            iban: field(&self.iban),
            bic: field(&self.bic),
            default_currency: self.default_currency,
            default_payment_method: self.default_payment_method,
            invoice_prefix,
            quote_prefix,
            notes: field(&self.notes),
            is_default: self.is_default,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let form = CompanyForm::default();
        assert_eq!(form.fiscal_region, FiscalRegion::None);
        assert_eq!(form.default_currency, Currency::Eur);
        assert_eq!(form.default_payment_method, PaymentMethod::BankTransfer);
        assert_eq!(form.invoice_prefix, "INV");
        assert_eq!(form.quote_prefix, "DEV");
        assert!(!form.is_default);
        assert!(form.visible_fiscal_fields().is_empty());
    }

    #[test]
    fn test_region_switch_keeps_hidden_values() {
        let mut form = CompanyForm {
            name: "Acme".to_owned(),
            ..CompanyForm::default()
        };
        form.set_fiscal_region(FiscalRegion::Eu);
        form.set_fiscal_value(FiscalField::Siret, "12345678900012");
        form.set_fiscal_region(FiscalRegion::Mg);

        let keys: Vec<_> = form.visible_fiscal_fields().iter().map(FieldDescriptor::key).collect();
        assert_eq!(keys, ["nif", "stat"]);
        assert_eq!(form.fiscal_value(FiscalField::Siret), "12345678900012");

        // Hidden values are dropped on submit.
        let draft = form.to_draft().unwrap();
        assert_eq!(draft.fiscal, FiscalInfo::Mg { nif: None, stat: None });

        form.set_fiscal_region(FiscalRegion::Eu);
        let draft = form.to_draft().unwrap();
        assert_eq!(draft.fiscal.siret(), Some("12345678900012"));
    }

    #[test]
    fn test_blank_name_is_a_name_error() {
        let form = CompanyForm {
            name: " \t".to_owned(),
            ..CompanyForm::default()
        };
        assert_eq!(form.to_draft().unwrap_err().field(), Some("name"));
    }

    #[test]
    fn test_prefix_too_long() {
        let form = CompanyForm {
            name: "Acme".to_owned(),
            quote_prefix: "QUOTATION-2026".to_owned(),
            ..CompanyForm::default()
        };
        assert_eq!(form.to_draft().unwrap_err().field(), Some("quotePrefix"));
    }

    #[test]
    fn test_company_round_trips_through_form() {
        let now = chrono::Utc::now();
        let company = Company {
            id: facturo_core::CompanyId::random(),
            user_id: facturo_core::UserId::random(),
            name: "Tana Import".to_owned(),
            email: Some("contact@tana.mg".to_owned()),
            address: None,
            phone: None,
            logo_url: None,
            fiscal: FiscalInfo::Mg {
                nif: Some("4001234567".to_owned()),
                stat: None,
            },
            iban: None,
            bic: None,
            default_currency: Currency::Mga,
            default_payment_method: PaymentMethod::MobileMoney,
            invoice_prefix: DocumentPrefix::parse("FAC").unwrap(),
            quote_prefix: DocumentPrefix::quote_default(),
            notes: None,
            is_default: true,
            created_at: now,
            updated_at: now,
        };
        let form = CompanyForm::from_company(&company);
        assert_eq!(form.email, "contact@tana.mg");
        assert_eq!(form.to_draft().unwrap(), company.to_draft());
    }
}
