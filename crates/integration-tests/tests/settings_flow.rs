//! Settings screen flows against a shared directory.
//!
//! Run with: cargo test -p facturo-integration-tests

#![allow(clippy::unwrap_used)]

use std::time::{Duration, Instant};

use facturo_core::{CompanyDraft, Currency, FiscalField, FiscalRegion, PaymentMethod};
use facturo_directory::{CompanyPicker, CompanySettings, FormMode};
use facturo_integration_tests::TestContext;

#[tokio::test]
async fn test_full_lifecycle() {
    let ctx = TestContext::new();
    let mut settings = CompanySettings::with_notice_delay(ctx.directory.clone(), Duration::from_secs(1));
    settings.load().await.unwrap();
    assert!(settings.companies().is_empty());

    // Create with Madagascar identifiers.
    settings.start_new();
    let form = settings.form_mut();
    form.name = "Tana Import".to_owned();
    form.set_fiscal_region(FiscalRegion::Mg);
    form.set_fiscal_value(FiscalField::Nif, "4001234567");
    form.default_currency = Currency::Mga;
    form.default_payment_method = PaymentMethod::MobileMoney;
    let now = Instant::now();
    let tana = settings.submit(now).await.unwrap();
    assert!(tana.is_default);
    assert!(settings.success_visible_at(now));
    assert!(!settings.success_visible_at(now + Duration::from_secs(1)));

    // Second company, then make it the default from the list.
    settings.start_new();
    settings.form_mut().name = "Acme".to_owned();
    let acme = settings.submit(Instant::now()).await.unwrap();
    assert!(!acme.is_default);
    settings.set_default(acme.id).await.unwrap();

    // Edit the first one; switching away discards unsaved edits.
    assert!(settings.edit(tana.id));
    settings.form_mut().phone = "+261 20 22 000 00".to_owned();
    assert!(settings.edit(acme.id));
    assert_eq!(settings.form().phone, "");
    assert!(settings.edit(tana.id));
    assert_eq!(settings.form().nif, "4001234567");
    settings.form_mut().notes = "Net 15".to_owned();
    settings.submit(Instant::now()).await.unwrap();

    let stored = ctx.directory.get(tana.id).await.unwrap();
    assert_eq!(stored.notes.as_deref(), Some("Net 15"));
    assert_eq!(stored.default_currency, Currency::Mga);
    assert!(!stored.is_default);

    // Delete the default; nothing is promoted.
    settings.request_delete(acme.id);
    assert_eq!(settings.pending_delete(), Some(acme.id));
    settings.confirm_delete().await.unwrap();
    assert_eq!(settings.companies().len(), 1);
    assert!(settings.companies().iter().all(|c| !c.is_default));
    assert!(ctx.directory.default_company().await.unwrap().is_none());
}

#[tokio::test]
async fn test_prefix_errors_are_inline() {
    let ctx = TestContext::new();
    let mut settings = CompanySettings::with_notice_delay(ctx.directory.clone(), Duration::from_secs(3));
    settings.start_new();
    settings.form_mut().name = "Acme".to_owned();
    settings.form_mut().invoice_prefix = "   ".to_owned();

    assert!(settings.submit(Instant::now()).await.is_err());
    assert!(settings.field_error("invoicePrefix").is_some());
    assert!(settings.field_error("name").is_none());
    assert_eq!(settings.error(), None);
    assert_eq!(ctx.store.calls(), 0);
}

#[tokio::test]
async fn test_update_failure_leaves_list_untouched() {
    let ctx = TestContext::new();
    let acme = ctx.directory.create(CompanyDraft::named("Acme")).await.unwrap();
    let mut settings = CompanySettings::with_notice_delay(ctx.directory.clone(), Duration::from_secs(3));
    settings.load().await.unwrap();

    settings.edit(acme.id);
    settings.form_mut().name = "Acme Renamed".to_owned();
    ctx.store.fail_next("could not serialize access").await;

    assert!(settings.submit(Instant::now()).await.is_err());
    assert_eq!(settings.error(), Some("could not serialize access"));
    assert_eq!(settings.companies()[0].name, "Acme");
    assert_eq!(settings.mode(), FormMode::Editing(acme.id));
    assert_eq!(settings.form().name, "Acme Renamed");
    assert!(!settings.success_visible());
}

#[tokio::test]
async fn test_picker_and_settings_share_the_directory() {
    let ctx = TestContext::new();
    let mut settings = CompanySettings::with_notice_delay(ctx.directory.clone(), Duration::from_secs(3));
    let mut picker = CompanyPicker::new(ctx.directory.clone());

    picker.open().await.unwrap();
    picker.start_creating();
    picker.form_mut().name = "Acme".to_owned();
    let created = picker.submit_new().await.unwrap();

    settings.load().await.unwrap();
    assert_eq!(settings.companies().len(), 1);
    assert_eq!(settings.companies()[0].name, created.company_name);
    assert!(settings.companies()[0].is_default);
}
