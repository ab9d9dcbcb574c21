//! Facturo Core - Shared types library.
//!
//! This crate provides the types shared by every Facturo component:
//! - `directory` - Company directory service, stores and view models
//! - `cli` - Command-line tools for migrations and company management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, the company entity, fiscal registry, currencies,
//!   payment methods and document prefixes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
