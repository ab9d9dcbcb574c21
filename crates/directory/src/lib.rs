//! Facturo Directory - the user's billing companies.
//!
//! This crate owns every change to a user's companies and the rule that a
//! user with companies has exactly one default.
//!
//! # Architecture
//!
//! - [`service::CompanyDirectory`] - CRUD and default selection, scoped to the current user
//! - [`store`] - Persistence boundary, with an in-memory store for tests and tooling
//! - [`db`] - `PostgreSQL` store, pool and migrations
//! - [`picker`] - Search-and-select dropdown with inline creation
//! - [`settings`] - Full create/edit/delete screen
//! - [`auth`] - Current-user providers
//!
//! Both view models are thin callers of the service plus local view state.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod picker;
pub mod service;
pub mod settings;
pub mod store;

pub use auth::{IdentityProvider, SessionIdentity, StaticIdentity};
pub use config::{ConfigError, DirectoryConfig, LogFormat};
pub use error::DirectoryError;
pub use picker::{CompanyPicker, NewCompanyForm, PickerMode, filter_companies};
pub use service::CompanyDirectory;
pub use settings::{CompanyForm, CompanySettings, FormMode};
pub use store::{CompanyStore, InMemoryCompanyStore, StoreError};
