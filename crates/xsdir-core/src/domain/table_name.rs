use super::{FileType, ParserResult, TableKind, XsdirError, Zaid};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Decomposed table name of the form `{basic}.{version}{type_key}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableName {
    name: String,
    basic_name: String,
    version: u32,
    type_key: char,
}

impl TableName {
    pub fn parse(raw: &str) -> ParserResult<Self> {
        let dot = raw.rfind('.').ok_or_else(|| {
            XsdirError::format(
                "FORMAT.TABLE_NAME",
                format!("table name '{}' has no '.' separator", raw),
            )
        })?;
        let basic_name = &raw[..dot];
        let suffix = &raw[dot + 1..];

        let digit_count = suffix
            .find(|character: char| !character.is_ascii_digit())
            .unwrap_or(suffix.len());
        let (digits, key) = suffix.split_at(digit_count);

        let version = if digits.is_empty() {
            0
        } else {
            digits.parse::<u32>().map_err(|_| {
                XsdirError::format(
                    "FORMAT.TABLE_NAME",
                    format!("table name '{}' has an invalid version '{}'", raw, digits),
                )
            })?
        };

        let type_key = key.chars().next().ok_or_else(|| {
            XsdirError::format(
                "FORMAT.TABLE_NAME",
                format!("table name '{}' has no type key", raw),
            )
        })?;

        Ok(Self {
            name: raw.to_string(),
            basic_name: basic_name.to_string(),
            version,
            type_key,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn basic_name(&self) -> &str {
        &self.basic_name
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn major_version(&self) -> u32 {
        self.version / 10
    }

    pub fn type_key(&self) -> char {
        self.type_key
    }

    /// Continuous-energy neutron tables always use the standard layout; the
    /// other kinds follow the version ranges of [`FileType::from_version`].
    pub fn file_type(&self) -> FileType {
        match self.kind() {
            Some(TableKind::Nuclear) => FileType::Standard,
            _ => FileType::from_version(self.version),
        }
    }

    pub fn zaid(&self) -> Option<Zaid> {
        Zaid::from_basic_name(&self.basic_name)
    }

    /// Logical name shared by every temperature of a thermal table (`"lwtr.t"`).
    pub fn thermal_name(&self) -> String {
        format!("{}.t", self.basic_name)
    }

    /// Supported kind for this name, or `None` when the key is unknown or
    /// longer than one character.
    pub fn kind(&self) -> Option<TableKind> {
        let key_part = self.name[self.basic_name.len() + 1..]
            .trim_start_matches(|character: char| character.is_ascii_digit());
        if key_part.chars().count() != 1 {
            return None;
        }
        TableKind::from_type_key(self.type_key)
    }
}

impl Display for TableName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
