pub mod errors;
mod table_name;

pub use errors::{
    DatabaseResult, ParserResult, XsdirError, XsdirErrorCategory, XsdirResult,
};
pub use table_name::TableName;

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Isotope or element identifier encoded as `1000 * Z + A`.
///
/// An atomic mass number of zero denotes the element itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Zaid(u32);

impl Zaid {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn from_components(atomic_number: u32, atomic_mass_number: u32) -> Self {
        Self(atomic_number * 1000 + atomic_mass_number)
    }

    /// Parses the basic part of a table name (`"1001"` from `"1001.80c"`).
    /// Thermal names such as `"lwtr"` carry no ZAID.
    pub fn from_basic_name(basic_name: &str) -> Option<Self> {
        if basic_name.is_empty() || !basic_name.bytes().all(|byte| byte.is_ascii_digit()) {
            return None;
        }
        basic_name.parse::<u32>().ok().map(Self)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn atomic_number(self) -> u32 {
        self.0 / 1000
    }

    pub const fn atomic_mass_number(self) -> u32 {
        self.0 % 1000
    }

    pub const fn atom(self) -> Self {
        Self(self.atomic_number() * 1000)
    }

    pub const fn is_element(self) -> bool {
        self.atomic_mass_number() == 0
    }
}

impl Display for Zaid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Zaid {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl FromStr for Zaid {
    type Err = XsdirError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_basic_name(value.trim()).ok_or_else(|| {
            XsdirError::input_validation(
                "INPUT.ZAID",
                format!("'{}' is not a valid zaid", value),
            )
        })
    }
}

/// ACE layout family of a table, derived from its version number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Standard,
    Alternate,
}

impl FileType {
    pub const fn from_version(version: u32) -> Self {
        if version < 20 || (version >= 60 && version < 70) {
            Self::Standard
        } else {
            Self::Alternate
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Alternate => "alternate",
        }
    }
}

impl Display for FileType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

impl FromStr for FileType {
    type Err = XsdirError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "alternate" | "mcnp6" => Ok(Self::Alternate),
            other => Err(XsdirError::input_validation(
                "INPUT.FILE_TYPE",
                format!("unknown file type '{}' (expected standard or alternate)", other),
            )),
        }
    }
}

/// Supported table kinds, one per type key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Nuclear,
    ThermalNuclear,
    Photonuclear,
    Photoatomic,
    Electroatomic,
}

impl TableKind {
    pub const fn from_type_key(type_key: char) -> Option<Self> {
        match type_key {
            'c' => Some(Self::Nuclear),
            't' => Some(Self::ThermalNuclear),
            'u' => Some(Self::Photonuclear),
            'p' => Some(Self::Photoatomic),
            'e' => Some(Self::Electroatomic),
            _ => None,
        }
    }

    pub const fn type_key(self) -> char {
        match self {
            Self::Nuclear => 'c',
            Self::ThermalNuclear => 't',
            Self::Photonuclear => 'u',
            Self::Photoatomic => 'p',
            Self::Electroatomic => 'e',
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nuclear => "nuclear",
            Self::ThermalNuclear => "thermal nuclear",
            Self::Photonuclear => "photonuclear",
            Self::Photoatomic => "photoatomic",
            Self::Electroatomic => "electroatomic",
        }
    }
}

impl Display for TableKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}
