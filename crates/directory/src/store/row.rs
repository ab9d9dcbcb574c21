//! Storage rows and their mapping to the [`Company`] entity.
//!
//! Null or blank columns become absent fields. Billing defaults fall back to
//! their documented defaults when null, the way legacy rows were read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use facturo_core::{
    Company, CompanyDraft, CompanyId, Currency, DocumentPrefix, FiscalField, FiscalInfo,
    FiscalRegion, PaymentMethod, UserId, non_blank,
};

use super::StoreError;

/// A company as stored, with snake_case column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CompanyRow {
    pub id: CompanyId,
    pub user_id: UserId,
    pub name: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub logo_url: Option<String>,
    pub fiscal_region: Option<String>,
    pub siret: Option<String>,
    pub vat_number: Option<String>,
    pub nif: Option<String>,
    pub stat: Option<String>,
    pub iban: Option<String>,
    pub bic: Option<String>,
    pub default_currency: Option<String>,
    pub default_payment_method: Option<String>,
    pub invoice_prefix: Option<String>,
    pub quote_prefix: Option<String>,
    pub notes: Option<String>,
    pub is_default: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column values written on insert or update. Absent optionals are written as `NULL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyWrite {
    pub name: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub logo_url: Option<String>,
    pub fiscal_region: String,
    pub siret: Option<String>,
    pub vat_number: Option<String>,
    pub nif: Option<String>,
    pub stat: Option<String>,
    pub iban: Option<String>,
    pub bic: Option<String>,
    pub default_currency: String,
    pub default_payment_method: String,
    pub invoice_prefix: String,
    pub quote_prefix: String,
    pub notes: Option<String>,
    pub is_default: bool,
}

impl From<&CompanyDraft> for CompanyWrite {
    fn from(draft: &CompanyDraft) -> Self {
        let fiscal_value = |field| draft.fiscal.get(field).map(str::to_owned);
        Self {
            name: draft.name.clone(),
            email: non_blank(draft.email.clone()),
            address: non_blank(draft.address.clone()),
            phone: non_blank(draft.phone.clone()),
            logo_url: non_blank(draft.logo_url.clone()),
            fiscal_region: draft.fiscal.region().code().to_owned(),
            siret: fiscal_value(FiscalField::Siret),
            vat_number: fiscal_value(FiscalField::VatNumber),
            nif: fiscal_value(FiscalField::Nif),
            stat: fiscal_value(FiscalField::Stat),
            iban: non_blank(draft.iban.clone()),
            bic: non_blank(draft.bic.clone()),
            default_currency: draft.default_currency.code().to_owned(),
            default_payment_method: draft.default_payment_method.code().to_owned(),
            invoice_prefix: draft.invoice_prefix.to_string(),
            quote_prefix: draft.quote_prefix.to_string(),
            notes: non_blank(draft.notes.clone()),
            is_default: draft.is_default,
        }
    }
}

impl CompanyRow {
    /// Build the stored form of a freshly written company.
    #[must_use]
    pub fn from_write(
        id: CompanyId,
        user_id: UserId,
        write: &CompanyWrite,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            name: write.name.clone(),
            email: write.email.clone(),
            address: write.address.clone(),
            phone: write.phone.clone(),
            logo_url: write.logo_url.clone(),
            fiscal_region: Some(write.fiscal_region.clone()),
            siret: write.siret.clone(),
            vat_number: write.vat_number.clone(),
            nif: write.nif.clone(),
            stat: write.stat.clone(),
            iban: write.iban.clone(),
            bic: write.bic.clone(),
            default_currency: Some(write.default_currency.clone()),
            default_payment_method: Some(write.default_payment_method.clone()),
            invoice_prefix: Some(write.invoice_prefix.clone()),
            quote_prefix: Some(write.quote_prefix.clone()),
            notes: write.notes.clone(),
            is_default: Some(write.is_default),
            created_at,
            updated_at,
        }
    }
}

fn parse_or_default<T, E, P>(
    id: CompanyId,
    column: &str,
    value: Option<String>,
    parse: P,
) -> Result<T, StoreError>
where
    T: Default,
    E: std::fmt::Display,
    P: FnOnce(&str) -> Result<T, E>,
{
    match non_blank(value) {
        None => Ok(T::default()),
        Some(raw) => parse(&raw).map_err(|e| {
            StoreError::DataCorruption(format!("invalid {column} for company {id}: {e}"))
        }),
    }
}

fn parse_prefix(
    id: CompanyId,
    column: &str,
    value: Option<String>,
    fallback: fn() -> DocumentPrefix,
) -> Result<DocumentPrefix, StoreError> {
    match non_blank(value) {
        None => Ok(fallback()),
        Some(raw) => DocumentPrefix::parse(&raw).map_err(|e| {
            StoreError::DataCorruption(format!("invalid {column} for company {id}: {e}"))
        }),
    }
}

impl TryFrom<CompanyRow> for Company {
    type Error = StoreError;

    fn try_from(row: CompanyRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let region: FiscalRegion =
            parse_or_default(id, "fiscal_region", row.fiscal_region, str::parse)?;

        // Identifiers owned by another region are legacy leftovers and are dropped.
        let (siret, vat_number, nif, stat) = (row.siret, row.vat_number, row.nif, row.stat);
        let fiscal = FiscalInfo::from_fields(region, |field| match field {
            FiscalField::Siret => siret.clone(),
            FiscalField::VatNumber => vat_number.clone(),
            FiscalField::Nif => nif.clone(),
            FiscalField::Stat => stat.clone(),
        });

        Ok(Self {
            id,
            user_id: row.user_id,
            name: row.name,
            email: non_blank(row.email),
            address: non_blank(row.address),
            phone: non_blank(row.phone),
            logo_url: non_blank(row.logo_url),
            fiscal,
            iban: non_blank(row.iban),
            bic: non_blank(row.bic),
            default_currency: parse_or_default(
                id,
                "default_currency",
                row.default_currency,
                str::parse,
            )?,
            default_payment_method: parse_or_default(
                id,
                "default_payment_method",
                row.default_payment_method,
                str::parse,
            )?,
            invoice_prefix: parse_prefix(
                id,
                "invoice_prefix",
                row.invoice_prefix,
                DocumentPrefix::invoice_default,
            )?,
            quote_prefix: parse_prefix(
                id,
                "quote_prefix",
                row.quote_prefix,
                DocumentPrefix::quote_default,
            )?,
            notes: non_blank(row.notes),
            is_default: row.is_default.unwrap_or(false),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn bare_row() -> CompanyRow {
        let now = Utc::now();
        CompanyRow {
            id: CompanyId::random(),
            user_id: UserId::random(),
            name: "Legacy SARL".to_owned(),
            email: None,
            address: Some(String::new()),
            phone: None,
            logo_url: None,
            fiscal_region: None,
            siret: None,
            vat_number: None,
            nif: None,
            stat: None,
            iban: None,
            bic: None,
            default_currency: None,
            default_payment_method: None,
            invoice_prefix: None,
            quote_prefix: None,
            notes: None,
            is_default: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_null_columns_map_to_defaults() {
        let company = Company::try_from(bare_row()).unwrap();
        assert_eq!(company.address, None);
        assert_eq!(company.fiscal, FiscalInfo::None);
        assert_eq!(company.default_currency, Currency::Eur);
        assert_eq!(company.default_payment_method, PaymentMethod::BankTransfer);
        assert_eq!(company.invoice_prefix.as_str(), "INV");
        assert_eq!(company.quote_prefix.as_str(), "DEV");
        assert!(!company.is_default);
    }

    #[test]
    fn test_legacy_payment_label_is_accepted() {
        let row = CompanyRow {
            default_payment_method: Some("Carte Bancaire".to_owned()),
            ..bare_row()
        };
        let company = Company::try_from(row).unwrap();
        assert_eq!(company.default_payment_method, PaymentMethod::Card);
    }

    #[test]
    fn test_foreign_region_identifiers_are_dropped() {
        let row = CompanyRow {
            fiscal_region: Some("MG".to_owned()),
            siret: Some("12345678900012".to_owned()),
            nif: Some("4001234567".to_owned()),
            ..bare_row()
        };
        let company = Company::try_from(row).unwrap();
        assert_eq!(
            company.fiscal,
            FiscalInfo::Mg {
                nif: Some("4001234567".to_owned()),
                stat: None,
            }
        );
    }

    #[test]
    fn test_invalid_currency_is_data_corruption() {
        let row = CompanyRow {
            default_currency: Some("DOGE".to_owned()),
            ..bare_row()
        };
        let err = Company::try_from(row).unwrap_err();
        assert!(matches!(err, StoreError::DataCorruption(msg) if msg.contains("default_currency")));
    }

    #[test]
    fn test_write_from_draft_nulls_blank_optionals() {
        let draft = CompanyDraft {
            email: Some("  ".to_owned()),
            phone: Some("0102030405".to_owned()),
            fiscal: FiscalInfo::Eu {
                siret: Some("123".to_owned()),
                vat_number: None,
            },
            ..CompanyDraft::named("Acme")
        };
        let write = CompanyWrite::from(&draft);
        assert_eq!(write.email, None);
        assert_eq!(write.phone.as_deref(), Some("0102030405"));
        assert_eq!(write.fiscal_region, "EU");
        assert_eq!(write.siret.as_deref(), Some("123"));
        assert_eq!(write.nif, None);
        assert_eq!(write.default_payment_method, "bank_transfer");
    }

    #[test]
    fn test_row_uses_snake_case_columns() {
        let json = serde_json::to_value(bare_row()).unwrap();
        assert!(json.get("default_payment_method").is_some());
        assert!(json.get("is_default").unwrap().is_null());
        assert!(json.get("defaultPaymentMethod").is_none());
    }

    #[test]
    fn test_write_then_read_preserves_draft() {
        let draft = CompanyDraft {
            email: Some("a@x.com".to_owned()),
            fiscal: FiscalInfo::Mg {
                nif: Some("N1".to_owned()),
                stat: Some("S1".to_owned()),
            },
            default_currency: Currency::Mga,
            default_payment_method: PaymentMethod::MobileMoney,
            invoice_prefix: DocumentPrefix::parse("FAC").unwrap(),
            is_default: true,
            ..CompanyDraft::named("Tana Import")
        };
        let now = Utc::now();
        let row = CompanyRow::from_write(
            CompanyId::random(),
            UserId::random(),
            &CompanyWrite::from(&draft),
            now,
            now,
        );
        let company = Company::try_from(row).unwrap();
        assert_eq!(company.to_draft(), draft);
    }
}
