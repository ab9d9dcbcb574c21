//! Company picker flows against a shared directory.
//!
//! Run with: cargo test -p facturo-integration-tests

#![allow(clippy::unwrap_used)]

use facturo_core::{CompanyDraft, FiscalInfo};
use facturo_directory::{CompanyPicker, DirectoryError, PickerMode};
use facturo_integration_tests::TestContext;

#[tokio::test]
async fn test_search_and_pick() {
    let ctx = TestContext::new();
    for (name, email) in [("Acme Ltd", "a@x.com"), ("Beta Co", "b@y.com")] {
        let draft = CompanyDraft {
            email: Some(email.to_owned()),
            ..CompanyDraft::named(name)
        };
        ctx.directory.create(draft).await.unwrap();
    }

    let mut picker = CompanyPicker::new(ctx.directory.clone());
    assert!(picker.begin_open());
    assert!(picker.is_loading());
    picker.load().await.unwrap();
    assert!(!picker.is_loading());

    picker.set_query("BETA");
    let visible: Vec<_> = picker.visible().iter().map(|c| c.id).collect();
    assert_eq!(visible.len(), 1);

    let profile = picker.select(visible[0]).unwrap();
    assert_eq!(profile.company_name, "Beta Co");
    assert_eq!(profile.company_email.as_deref(), Some("b@y.com"));
    assert_eq!(profile.payment_method.as_deref(), Some("Virement Bancaire"));
    assert_eq!(picker.mode(), PickerMode::Closed);
    assert_eq!(picker.visible().len(), 2);
}

#[tokio::test]
async fn test_first_company_created_inline_becomes_default() {
    let ctx = TestContext::new();
    let mut picker = CompanyPicker::new(ctx.directory.clone());

    picker.toggle().await.unwrap();
    assert!(picker.companies().is_empty());
    picker.start_creating();
    assert_eq!(picker.mode(), PickerMode::Creating);

    let form = picker.form_mut();
    form.name = "Acme".to_owned();
    form.email = "contact@acme.fr".to_owned();
    form.siret = "12345678900012".to_owned();
    let profile = picker.submit_new().await.unwrap();

    assert_eq!(profile.fiscal_region.as_deref(), Some("EU"));
    let stored = ctx.directory.default_company().await.unwrap().unwrap();
    assert_eq!(stored.name, "Acme");
    assert_eq!(
        stored.fiscal,
        FiscalInfo::Eu {
            siret: Some("12345678900012".to_owned()),
            vat_number: None,
        }
    );
    assert_eq!(picker.selected(), Some(stored.id));
}

#[tokio::test]
async fn test_inline_creation_keeps_existing_default() {
    let ctx = TestContext::new();
    let acme = ctx.directory.create(CompanyDraft::named("Acme")).await.unwrap();
    let mut picker = CompanyPicker::new(ctx.directory.clone());

    picker.open().await.unwrap();
    picker.start_creating();
    picker.form_mut().name = "Beta".to_owned();
    picker.submit_new().await.unwrap();

    let names: Vec<_> = picker.companies().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Beta", "Acme"]);
    assert_eq!(ctx.directory.default_company().await.unwrap().unwrap().id, acme.id);
}

#[tokio::test]
async fn test_cancel_and_toggle_discard_the_form() {
    let ctx = TestContext::new();
    let mut picker = CompanyPicker::new(ctx.directory.clone());

    picker.open().await.unwrap();
    picker.start_creating();
    picker.form_mut().name = "Draft".to_owned();
    picker.cancel_creating();
    assert_eq!(picker.mode(), PickerMode::Listing);
    assert!(picker.form().name.is_empty());

    picker.start_creating();
    picker.form_mut().name = "Draft".to_owned();
    picker.toggle().await.unwrap();
    assert_eq!(picker.mode(), PickerMode::Closed);
    assert!(picker.form().name.is_empty());
    assert!(ctx.directory.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_picker_goes_dark_after_sign_out() {
    let ctx = TestContext::new();
    let mut picker = CompanyPicker::new(ctx.directory.clone());
    assert!(picker.is_available());

    ctx.identity.sign_out();
    assert!(!picker.is_available());
    assert_eq!(picker.open().await.unwrap_err(), DirectoryError::Unauthenticated);
    assert_eq!(picker.mode(), PickerMode::Closed);
}
