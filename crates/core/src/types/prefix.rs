//! Document number prefix type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`DocumentPrefix`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PrefixError {
    /// The input string is empty or only whitespace.
    #[error("prefix cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("prefix must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// Prefix used by the document-numbering logic (e.g. `INV` in `INV-2026-0001`).
///
/// ## Constraints
///
/// - Length: 1-10 characters after trimming surrounding whitespace
///
/// ## Examples
///
/// ```
/// use facturo_core::DocumentPrefix;
///
/// assert_eq!(DocumentPrefix::parse(" FAC ").unwrap().as_str(), "FAC");
/// assert!(DocumentPrefix::parse("").is_err());
/// assert!(DocumentPrefix::parse("ABCDEFGHIJK").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentPrefix(String);

impl DocumentPrefix {
    /// Maximum length of a prefix, in characters.
    pub const MAX_LENGTH: usize = 10;

    /// Parse a `DocumentPrefix` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty or longer than
    /// [`Self::MAX_LENGTH`] characters.
    pub fn parse(s: &str) -> Result<Self, PrefixError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PrefixError::Empty);
        }

        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(PrefixError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Default prefix for invoices.
    #[must_use]
    pub fn invoice_default() -> Self {
        Self("INV".to_owned())
    }

    /// Default prefix for quotes.
    #[must_use]
    pub fn quote_default() -> Self {
        Self("DEV".to_owned())
    }

    /// Returns the prefix as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `DocumentPrefix` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DocumentPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for DocumentPrefix {
    type Err = PrefixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DocumentPrefix {
    type Error = PrefixError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DocumentPrefix> for String {
    fn from(prefix: DocumentPrefix) -> Self {
        prefix.0
    }
}

impl AsRef<str> for DocumentPrefix {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
