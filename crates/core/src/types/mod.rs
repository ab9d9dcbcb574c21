//! Core types for Facturo.
//!
//! This module provides type-safe wrappers for the company directory domain.

pub mod company;
pub mod currency;
pub mod fiscal;
pub mod id;
pub mod payment;
pub mod prefix;

pub use company::{BillingProfile, Company, CompanyDraft, CompanyPatch};
pub use currency::{Currency, UnknownCurrency};
pub use fiscal::{
    FieldDescriptor, FiscalField, FiscalInfo, FiscalRegion, RegionDescriptor,
    UnknownFiscalRegion, fields_for, regions,
};
pub use id::*;
pub use payment::{PaymentMethod, UnknownPaymentMethod};
pub use prefix::{DocumentPrefix, PrefixError};

/// Treat blank (empty or whitespace-only) optional text as absent.
#[must_use]
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
