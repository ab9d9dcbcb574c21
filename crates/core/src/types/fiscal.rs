//! Fiscal regions and the identifiers each one requires.
//!
//! The registry is static: every jurisdiction is described once by a
//! [`RegionDescriptor`] listing its fields in display order, and has a matching
//! [`FiscalInfo`] variant so a company can only carry the identifiers its
//! region owns.
//!
//! ```
//! use facturo_core::{FiscalField, FiscalRegion, fields_for};
//!
//! let keys: Vec<_> = fields_for(FiscalRegion::Eu).iter().map(|f| f.key()).collect();
//! assert_eq!(keys, ["siret", "vatNumber"]);
//! assert!(fields_for(FiscalRegion::None).is_empty());
//! assert_eq!(FiscalField::Nif.region(), FiscalRegion::Mg);
//! ```

use core::fmt;

use serde::{Deserialize, Serialize};

use super::non_blank;

/// Error returned when a region code is not registered.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown fiscal region: {0}")]
pub struct UnknownFiscalRegion(pub String);

/// Jurisdiction selecting which fiscal identifiers apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum FiscalRegion {
    /// Individual or unregistered activity: no fiscal identifiers.
    #[default]
    None,
    /// Madagascar.
    Mg,
    /// European Union (France).
    Eu,
}

impl FiscalRegion {
    /// Storage and wire code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Mg => "MG",
            Self::Eu => "EU",
        }
    }

    /// Registry entry for this region.
    #[must_use]
    pub fn descriptor(self) -> &'static RegionDescriptor {
        // REGIONS holds exactly one entry per variant, in declaration order.
        match self {
            Self::None => &REGIONS[0],
            Self::Mg => &REGIONS[1],
            Self::Eu => &REGIONS[2],
        }
    }
}

impl fmt::Display for FiscalRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for FiscalRegion {
    type Err = UnknownFiscalRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        REGIONS
            .iter()
            .map(|r| r.region)
            .find(|r| r.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| UnknownFiscalRegion(s.to_owned()))
    }
}

/// A fiscal identifier field. Each field is owned by exactly one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FiscalField {
    Siret,
    VatNumber,
    Nif,
    Stat,
}

impl FiscalField {
    /// Form / wire key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Siret => "siret",
            Self::VatNumber => "vatNumber",
            Self::Nif => "nif",
            Self::Stat => "stat",
        }
    }

    /// Region that owns this field.
    #[must_use]
    pub const fn region(self) -> FiscalRegion {
        match self {
            Self::Siret | Self::VatNumber => FiscalRegion::Eu,
            Self::Nif | Self::Stat => FiscalRegion::Mg,
        }
    }
}

/// Input field rendered for a fiscal region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub field: FiscalField,
    pub label: &'static str,
    pub placeholder: &'static str,
}

impl FieldDescriptor {
    /// Form / wire key of the described field.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.field.key()
    }
}

/// Static description of a fiscal region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegionDescriptor {
    pub region: FiscalRegion,
    pub name: &'static str,
    pub fields: &'static [FieldDescriptor],
}

static REGIONS: [RegionDescriptor; 3] = [
    RegionDescriptor {
        region: FiscalRegion::None,
        name: "Aucune (Particulier)",
        fields: &[],
    },
    RegionDescriptor {
        region: FiscalRegion::Mg,
        name: "Madagascar",
        fields: &[
            FieldDescriptor {
                field: FiscalField::Nif,
                label: "NIF",
                placeholder: "Num\u{e9}ro d'Identification Fiscale",
            },
            FieldDescriptor {
                field: FiscalField::Stat,
                label: "STAT",
                placeholder: "Num\u{e9}ro Statistique",
            },
        ],
    },
    RegionDescriptor {
        region: FiscalRegion::Eu,
        name: "Europe (France)",
        fields: &[
            FieldDescriptor {
                field: FiscalField::Siret,
                label: "SIRET",
                placeholder: "14 chiffres",
            },
            FieldDescriptor {
                field: FiscalField::VatNumber,
                label: "N\u{b0} TVA Intracom.",
                placeholder: "FR + 11 chiffres",
            },
        ],
    },
];

/// All registered regions, in display order.
#[must_use]
pub fn regions() -> &'static [RegionDescriptor] {
    &REGIONS
}

/// Ordered fields a region exposes. Empty for [`FiscalRegion::None`].
#[must_use]
pub fn fields_for(region: FiscalRegion) -> &'static [FieldDescriptor] {
    region.descriptor().fields
}

/// Fiscal identifiers of a company, shaped by its region.
///
/// Serialized with the region code as the `fiscalRegion` tag:
/// `{"fiscalRegion":"EU","siret":"123","vatNumber":null}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(
    tag = "fiscalRegion",
    rename_all = "UPPERCASE",
    rename_all_fields = "camelCase"
)]
pub enum FiscalInfo {
    #[default]
    None,
    Eu {
        siret: Option<String>,
        vat_number: Option<String>,
    },
    Mg {
        nif: Option<String>,
        stat: Option<String>,
    },
}

impl FiscalInfo {
    /// Build the variant for `region`, reading each of its fields from `lookup`.
    ///
    /// Fields owned by other regions are never queried. Blank values become `None`.
    pub fn from_fields<F>(region: FiscalRegion, mut lookup: F) -> Self
    where
        F: FnMut(FiscalField) -> Option<String>,
    {
        let mut read = |field| non_blank(lookup(field));
        match region {
            FiscalRegion::None => Self::None,
            FiscalRegion::Eu => Self::Eu {
                siret: read(FiscalField::Siret),
                vat_number: read(FiscalField::VatNumber),
            },
            FiscalRegion::Mg => Self::Mg {
                nif: read(FiscalField::Nif),
                stat: read(FiscalField::Stat),
            },
        }
    }

    /// Region tag of this variant.
    #[must_use]
    pub const fn region(&self) -> FiscalRegion {
        match self {
            Self::None => FiscalRegion::None,
            Self::Eu { .. } => FiscalRegion::Eu,
            Self::Mg { .. } => FiscalRegion::Mg,
        }
    }

    /// Value of `field`, or `None` when unset or owned by another region.
    #[must_use]
    pub fn get(&self, field: FiscalField) -> Option<&str> {
        let value = match (self, field) {
            (Self::Eu { siret, .. }, FiscalField::Siret) => siret,
            (Self::Eu { vat_number, .. }, FiscalField::VatNumber) => vat_number,
            (Self::Mg { nif, .. }, FiscalField::Nif) => nif,
            (Self::Mg { stat, .. }, FiscalField::Stat) => stat,
            _ => return None,
        };
        value.as_deref()
    }

    #[must_use]
    pub fn siret(&self) -> Option<&str> {
        self.get(FiscalField::Siret)
    }

    #[must_use]
    pub fn vat_number(&self) -> Option<&str> {
        self.get(FiscalField::VatNumber)
    }

    #[must_use]
    pub fn nif(&self) -> Option<&str> {
        self.get(FiscalField::Nif)
    }

    #[must_use]
    pub fn stat(&self) -> Option<&str> {
        self.get(FiscalField::Stat)
    }
}
