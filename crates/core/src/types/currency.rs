//! Billing currencies.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a currency code is not one of the supported ones.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported currency: {0}")]
pub struct UnknownCurrency(pub String);

/// Currency a company bills in by default.
///
/// Serialized as its ISO 4217 code (e.g. `"EUR"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Eur,
    Usd,
    Gbp,
    Cad,
    Chf,
    Mga,
}

impl Currency {
    /// All supported currencies, in display order.
    pub const ALL: [Self; 6] = [
        Self::Eur,
        Self::Usd,
        Self::Gbp,
        Self::Cad,
        Self::Chf,
        Self::Mga,
    ];

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Eur => "EUR",
            Self::Usd => "USD",
            Self::Gbp => "GBP",
            Self::Cad => "CAD",
            Self::Chf => "CHF",
            Self::Mga => "MGA",
        }
    }

    /// Symbol printed next to amounts.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eur => "\u{20ac}",
            Self::Usd | Self::Cad => "$",
            Self::Gbp => "\u{a3}",
            Self::Chf => "CHF",
            Self::Mga => "Ar",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Eur => "Euro",
            Self::Usd => "US Dollar",
            Self::Gbp => "British Pound",
            Self::Cad => "Canadian Dollar",
            Self::Chf => "Swiss Franc",
            Self::Mga => "Ariary Malgache",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| UnknownCurrency(s.to_owned()))
    }
}
