//! Payment methods offered on invoices and quotes.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a payment method is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported payment method: {0}")]
pub struct UnknownPaymentMethod(pub String);

/// Default payment method printed on a company's documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    BankTransfer,
    Card,
    Cheque,
    Paypal,
    Cash,
    MobileMoney,
}

impl PaymentMethod {
    /// All payment methods, in display order. The first one is the form default.
    pub const ALL: [Self; 6] = [
        Self::BankTransfer,
        Self::Card,
        Self::Cheque,
        Self::Paypal,
        Self::Cash,
        Self::MobileMoney,
    ];

    /// Stable storage code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::BankTransfer => "bank_transfer",
            Self::Card => "card",
            Self::Cheque => "cheque",
            Self::Paypal => "paypal",
            Self::Cash => "cash",
            Self::MobileMoney => "mobile_money",
        }
    }

    /// Label printed on documents.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BankTransfer => "Virement Bancaire",
            Self::Card => "Carte Bancaire",
            Self::Cheque => "Ch\u{e8}que",
            Self::Paypal => "PayPal",
            Self::Cash => "Esp\u{e8}ces",
            Self::MobileMoney => "mobile money",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    /// Accepts either the storage code or the document label.
    ///
    /// Older rows stored the label, so both spellings must keep parsing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.code() == value || m.label().eq_ignore_ascii_case(value))
            .ok_or_else(|| UnknownPaymentMethod(s.to_owned()))
    }
}
