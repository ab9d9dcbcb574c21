//! Default-company rules of the directory.
//!
//! Run with: cargo test -p facturo-integration-tests

#![allow(clippy::unwrap_used)]

use facturo_core::{CompanyDraft, CompanyId, CompanyPatch};
use facturo_directory::{CompanyDirectory, DirectoryError};
use facturo_integration_tests::TestContext;

async fn default_names(directory: &CompanyDirectory) -> Vec<String> {
    directory
        .list()
        .await
        .unwrap()
        .into_iter()
        .filter(|c| c.is_default)
        .map(|c| c.name)
        .collect()
}

fn requesting_default(name: &str) -> CompanyDraft {
    CompanyDraft {
        is_default: true,
        ..CompanyDraft::named(name)
    }
}

#[tokio::test]
async fn test_create_default_moves_the_flag() {
    let ctx = TestContext::new();
    let dir = &ctx.directory;

    let acme = dir.create(CompanyDraft::named("Acme")).await.unwrap();
    assert!(acme.is_default);

    let beta = dir.create(requesting_default("Beta")).await.unwrap();
    assert!(beta.is_default);

    let companies = dir.list().await.unwrap();
    let flags: Vec<_> = companies.iter().map(|c| (c.name.as_str(), c.is_default)).collect();
    assert_eq!(flags, [("Acme", false), ("Beta", true)]);
}

#[tokio::test]
async fn test_set_default_leaves_exactly_one() {
    let ctx = TestContext::new();
    let dir = &ctx.directory;

    dir.create(CompanyDraft::named("Acme")).await.unwrap();
    let beta = dir.create(CompanyDraft::named("Beta")).await.unwrap();

    let updated = dir.set_default(beta.id).await.unwrap();
    assert!(updated.is_default);
    assert_eq!(default_names(dir).await, ["Beta"]);
}

#[tokio::test]
async fn test_first_company_is_default_even_when_not_requested() {
    let ctx = TestContext::new();
    let draft = CompanyDraft {
        is_default: false,
        ..CompanyDraft::named("Solo")
    };
    assert!(ctx.directory.create(draft).await.unwrap().is_default);
}

#[tokio::test]
async fn test_exclusivity_over_a_sequence_of_writes() {
    let ctx = TestContext::new();
    let dir = &ctx.directory;

    let mut ids = Vec::new();
    for (i, name) in ["A", "B", "C", "D"].into_iter().enumerate() {
        let draft = CompanyDraft {
            is_default: i % 2 == 1,
            ..CompanyDraft::named(name)
        };
        ids.push(dir.create(draft).await.unwrap().id);
        assert_eq!(default_names(dir).await.len(), 1);
    }

    dir.update(ids[0], CompanyPatch::make_default()).await.unwrap();
    assert_eq!(default_names(dir).await, ["A"]);

    dir.set_default(ids[2]).await.unwrap();
    assert_eq!(default_names(dir).await, ["C"]);

    let rename = CompanyPatch {
        name: Some("B2".to_owned()),
        is_default: Some(true),
        ..CompanyPatch::default()
    };
    dir.update(ids[1], rename).await.unwrap();
    assert_eq!(default_names(dir).await, ["B2"]);

    // A plain edit of another company keeps the default where it is.
    let note = CompanyPatch {
        notes: Some(Some("net 30".to_owned())),
        ..CompanyPatch::default()
    };
    dir.update(ids[3], note).await.unwrap();
    assert_eq!(default_names(dir).await, ["B2"]);
}

#[tokio::test]
async fn test_unsetting_the_default_is_honoured() {
    let ctx = TestContext::new();
    let dir = &ctx.directory;
    let acme = dir.create(CompanyDraft::named("Acme")).await.unwrap();

    let patch = CompanyPatch {
        is_default: Some(false),
        ..CompanyPatch::default()
    };
    assert!(!dir.update(acme.id, patch).await.unwrap().is_default);
    assert!(dir.default_company().await.unwrap().is_none());
}

#[tokio::test]
async fn test_deleting_the_default_does_not_promote() {
    let ctx = TestContext::new();
    let dir = &ctx.directory;
    let acme = dir.create(CompanyDraft::named("Acme")).await.unwrap();
    let beta = dir.create(CompanyDraft::named("Beta")).await.unwrap();

    dir.delete(acme.id).await.unwrap();

    let companies = dir.list().await.unwrap();
    assert_eq!(companies.len(), 1);
    assert_eq!(companies[0].id, beta.id);
    assert!(!companies[0].is_default);
    assert_eq!(
        dir.delete(acme.id).await.unwrap_err(),
        DirectoryError::NotFound(acme.id)
    );
}

#[tokio::test]
async fn test_users_do_not_see_each_other() {
    let ctx = TestContext::new();
    let acme = ctx.directory.create(CompanyDraft::named("Acme")).await.unwrap();

    let other = ctx.other_user();
    let bobco = other.create(CompanyDraft::named("Bobco")).await.unwrap();
    // Another user's first company is their own default.
    assert!(bobco.is_default);
    assert!(other.list().await.unwrap().iter().all(|c| c.id != acme.id));
    assert_eq!(
        other.set_default(acme.id).await.unwrap_err(),
        DirectoryError::NotFound(acme.id)
    );
    assert_eq!(default_names(&ctx.directory).await, ["Acme"]);
}

#[tokio::test]
async fn test_signing_out_disables_the_directory() {
    let ctx = TestContext::new();
    ctx.directory.create(CompanyDraft::named("Acme")).await.unwrap();
    ctx.identity.sign_out();
    let calls = ctx.store.calls();

    assert_eq!(
        ctx.directory.list().await.unwrap_err(),
        DirectoryError::Unauthenticated
    );
    assert_eq!(
        ctx.directory.set_default(CompanyId::random()).await.unwrap_err(),
        DirectoryError::Unauthenticated
    );
    assert_eq!(ctx.store.calls(), calls);

    ctx.identity.sign_in(ctx.user);
    assert_eq!(ctx.directory.list().await.unwrap().len(), 1);
}
