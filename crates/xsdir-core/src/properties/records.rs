use crate::common::constants::{NEUTRON_REST_MASS_AMU, temperature_in_kelvin};
use crate::domain::{FileType, ParserResult, TableKind, TableName, XsdirError, Zaid};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Location and naming shared by every ACE table record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AceTableLocation {
    table_name: TableName,
    file_path: PathBuf,
    file_start_line: usize,
    table_length: usize,
}

impl AceTableLocation {
    pub fn new(
        table_name: TableName,
        file_path: impl Into<PathBuf>,
        file_start_line: usize,
        table_length: usize,
    ) -> ParserResult<Self> {
        if file_start_line == 0 {
            return Err(XsdirError::format(
                "FORMAT.TABLE_START_LINE",
                format!("table {} has an invalid start line of 0", table_name),
            ));
        }
        Ok(Self {
            table_name,
            file_path: file_path.into(),
            file_start_line,
            table_length,
        })
    }

    pub fn table_name(&self) -> &TableName {
        &self.table_name
    }

    /// Path relative to the directory holding the xsdir file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn file_start_line(&self) -> usize {
        self.file_start_line
    }

    pub fn table_length(&self) -> usize {
        self.table_length
    }

    pub fn file_version(&self) -> u32 {
        self.table_name.version()
    }

    pub fn file_major_version(&self) -> u32 {
        self.table_name.major_version()
    }

    pub fn file_type(&self) -> FileType {
        self.table_name.file_type()
    }
}

impl Display for AceTableLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} v{}) {}:{}",
            self.table_name,
            self.file_type(),
            self.file_version(),
            self.file_path.display(),
            self.file_start_line
        )
    }
}

fn require_kind(table_name: &TableName, expected: &[TableKind]) -> ParserResult<TableKind> {
    match table_name.kind() {
        Some(kind) if expected.contains(&kind) => Ok(kind),
        _ => Err(XsdirError::format(
            "FORMAT.TABLE_TYPE",
            format!(
                "table {} cannot be stored as {} data",
                table_name,
                expected
                    .iter()
                    .map(|kind| kind.as_str())
                    .collect::<Vec<_>>()
                    .join("/")
            ),
        )),
    }
}

fn require_zaid(table_name: &TableName) -> ParserResult<Zaid> {
    table_name.zaid().ok_or_else(|| {
        XsdirError::format(
            "FORMAT.TABLE_ZAID",
            format!("table name {} does not start with a zaid", table_name),
        )
    })
}

fn require_non_negative(table_name: &TableName, field: &str, value: f64) -> ParserResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(XsdirError::format(
            "FORMAT.TABLE_VALUE",
            format!("table {} has an invalid {} ({})", table_name, field, value),
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NuclearDataProperties {
    location: AceTableLocation,
    zaid: Zaid,
    atomic_weight_ratio: f64,
    evaluation_temp_in_mev: f64,
}

impl NuclearDataProperties {
    pub fn new(
        location: AceTableLocation,
        atomic_weight_ratio: f64,
        evaluation_temp_in_mev: f64,
    ) -> ParserResult<Self> {
        let table_name = location.table_name();
        require_kind(table_name, &[TableKind::Nuclear])?;
        let zaid = require_zaid(table_name)?;
        let atomic_weight_ratio =
            require_non_negative(table_name, "atomic weight ratio", atomic_weight_ratio)?;
        let evaluation_temp_in_mev =
            require_non_negative(table_name, "evaluation temperature", evaluation_temp_in_mev)?;
        Ok(Self {
            location,
            zaid,
            atomic_weight_ratio,
            evaluation_temp_in_mev,
        })
    }

    pub fn location(&self) -> &AceTableLocation {
        &self.location
    }

    pub fn zaid(&self) -> Zaid {
        self.zaid
    }

    pub fn atomic_weight_ratio(&self) -> f64 {
        self.atomic_weight_ratio
    }

    pub fn evaluation_temp_in_mev(&self) -> f64 {
        self.evaluation_temp_in_mev
    }

    pub fn evaluation_temp_in_kelvin(&self) -> f64 {
        temperature_in_kelvin(self.evaluation_temp_in_mev)
    }
}

/// S(alpha,beta) record; one instance is shared by every ZAID it covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermalNuclearDataProperties {
    location: AceTableLocation,
    name: String,
    zaids: BTreeSet<Zaid>,
    evaluation_temp_in_mev: f64,
}

impl ThermalNuclearDataProperties {
    pub fn new(
        location: AceTableLocation,
        zaids: BTreeSet<Zaid>,
        evaluation_temp_in_mev: f64,
    ) -> ParserResult<Self> {
        let table_name = location.table_name();
        require_kind(table_name, &[TableKind::ThermalNuclear])?;
        if zaids.is_empty() {
            return Err(XsdirError::format(
                "FORMAT.THERMAL_ZAIDS",
                format!("thermal table {} does not cover any zaid", table_name),
            ));
        }
        let evaluation_temp_in_mev =
            require_non_negative(table_name, "evaluation temperature", evaluation_temp_in_mev)?;
        Ok(Self {
            name: table_name.thermal_name(),
            location,
            zaids,
            evaluation_temp_in_mev,
        })
    }

    pub fn location(&self) -> &AceTableLocation {
        &self.location
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn zaids(&self) -> &BTreeSet<Zaid> {
        &self.zaids
    }

    pub fn has_data_for_zaid(&self, zaid: Zaid) -> bool {
        self.zaids.contains(&zaid)
    }

    pub fn evaluation_temp_in_mev(&self) -> f64 {
        self.evaluation_temp_in_mev
    }

    pub fn evaluation_temp_in_kelvin(&self) -> f64 {
        temperature_in_kelvin(self.evaluation_temp_in_mev)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotonuclearDataProperties {
    location: AceTableLocation,
    zaid: Zaid,
    atomic_weight: f64,
}

impl PhotonuclearDataProperties {
    /// `atomic_weight_ratio` is converted to amu with the neutron rest mass.
    pub fn new(location: AceTableLocation, atomic_weight_ratio: f64) -> ParserResult<Self> {
        let table_name = location.table_name();
        require_kind(table_name, &[TableKind::Photonuclear])?;
        let zaid = require_zaid(table_name)?;
        let atomic_weight_ratio =
            require_non_negative(table_name, "atomic weight ratio", atomic_weight_ratio)?;
        Ok(Self {
            location,
            zaid,
            atomic_weight: atomic_weight_ratio * NEUTRON_REST_MASS_AMU,
        })
    }

    pub fn location(&self) -> &AceTableLocation {
        &self.location
    }

    pub fn zaid(&self) -> Zaid {
        self.zaid
    }

    pub fn atomic_weight(&self) -> f64 {
        self.atomic_weight
    }
}

/// Element level photon/electron table. Kept as one shape for both the
/// photoatomic and electroatomic records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomicDataProperties {
    location: AceTableLocation,
    zaid: Zaid,
    atomic_weight: f64,
}

pub type PhotoatomicDataProperties = AtomicDataProperties;
pub type ElectroatomicDataProperties = AtomicDataProperties;

impl AtomicDataProperties {
    pub fn new(location: AceTableLocation, atomic_weight_ratio: f64) -> ParserResult<Self> {
        let table_name = location.table_name();
        require_kind(
            table_name,
            &[TableKind::Photoatomic, TableKind::Electroatomic],
        )?;
        let zaid = require_zaid(table_name)?.atom();
        let atomic_weight_ratio =
            require_non_negative(table_name, "atomic weight ratio", atomic_weight_ratio)?;
        Ok(Self {
            location,
            zaid,
            atomic_weight: atomic_weight_ratio * NEUTRON_REST_MASS_AMU,
        })
    }

    pub fn location(&self) -> &AceTableLocation {
        &self.location
    }

    /// Element ZAID (atomic mass number zero).
    pub fn zaid(&self) -> Zaid {
        self.zaid
    }

    pub fn atomic_weight(&self) -> f64 {
        self.atomic_weight
    }
}
