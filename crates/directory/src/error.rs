//! Errors surfaced by directory operations.

use thiserror::Error;

use facturo_core::CompanyId;

use crate::store::StoreError;

/// Error returned by every [`CompanyDirectory`](crate::CompanyDirectory) operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// No user is signed in.
    #[error("not signed in")]
    Unauthenticated,

    /// A field failed validation. Nothing was written.
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// The company does not exist or belongs to another user.
    #[error("company not found: {0}")]
    NotFound(CompanyId),

    /// The backend failed. Carries its message verbatim.
    #[error("{0}")]
    Store(String),
}

impl DirectoryError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Field name for inline display, when this is a validation error.
    #[must_use]
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl From<StoreError> for DirectoryError {
    fn from(err: StoreError) -> Self {
        Self::Store(err.to_string())
    }
}
