use super::ThermalPropertiesId;
use super::index::{TemperatureIndex, VersionIndex};
use super::records::{NuclearDataProperties, PhotonuclearDataProperties};
use crate::common::constants::{NEUTRON_REST_MASS_AMU, temperature_in_kelvin};
use crate::domain::{DatabaseResult, FileType, XsdirError, Zaid};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use tracing::warn;

/// Major version recommended for alternate-format thermal tables.
const ALTERNATE_THERMAL_RECOMMENDED_MAJOR_VERSION: u32 = 2;

/// Isotope level properties: nuclear, thermal nuclear and photonuclear
/// tables. Thermal records are shared between nuclides, so only their
/// registry ids are stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NuclideProperties {
    zaid: Zaid,
    atomic_weight_ratio: f64,
    nuclear_data_properties: TemperatureIndex<NuclearDataProperties>,
    thermal_nuclear_data_properties: BTreeMap<String, TemperatureIndex<ThermalPropertiesId>>,
    photonuclear_data_properties: VersionIndex<PhotonuclearDataProperties>,
}

impl NuclideProperties {
    pub fn new(zaid: Zaid, atomic_weight_ratio: f64) -> Self {
        Self {
            zaid,
            atomic_weight_ratio,
            nuclear_data_properties: TemperatureIndex::default(),
            thermal_nuclear_data_properties: BTreeMap::new(),
            photonuclear_data_properties: VersionIndex::default(),
        }
    }

    pub fn zaid(&self) -> Zaid {
        self.zaid
    }

    pub fn atomic_weight_ratio(&self) -> f64 {
        self.atomic_weight_ratio
    }

    pub fn atomic_weight(&self) -> f64 {
        self.atomic_weight_ratio * NEUTRON_REST_MASS_AMU
    }

    pub fn is_empty(&self) -> bool {
        self.nuclear_data_properties.is_empty()
            && self
                .thermal_nuclear_data_properties
                .values()
                .all(TemperatureIndex::is_empty)
            && self.photonuclear_data_properties.is_empty()
    }

    pub fn nuclear_data_available(
        &self,
        file_type: FileType,
        major_version: Option<u32>,
        evaluation_temp_in_mev: Option<f64>,
    ) -> bool {
        self.nuclear_data_properties
            .available(file_type, major_version, evaluation_temp_in_mev)
    }

    pub fn nuclear_data_file_types(&self) -> BTreeSet<FileType> {
        self.nuclear_data_properties.file_types()
    }

    pub fn nuclear_data_file_versions(&self, file_type: FileType) -> BTreeSet<u32> {
        self.nuclear_data_properties.major_versions(file_type)
    }

    pub fn recommended_nuclear_data_file_version(&self, file_type: FileType) -> DatabaseResult<u32> {
        self.nuclear_data_properties
            .max_major_version(file_type, self.describe_kind("nuclear"))
    }

    pub fn nuclear_data_evaluation_temps_in_mev(
        &self,
        file_type: FileType,
        major_version: u32,
    ) -> DatabaseResult<Vec<f64>> {
        Ok(self
            .nuclear_data_properties
            .grid(file_type, major_version, self.describe_kind("nuclear"))?
            .temperatures_in_mev())
    }

    /// Evaluation temperatures in Kelvin.
    pub fn nuclear_data_evaluation_temps(
        &self,
        file_type: FileType,
        major_version: u32,
    ) -> DatabaseResult<Vec<f64>> {
        Ok(self
            .nuclear_data_evaluation_temps_in_mev(file_type, major_version)?
            .into_iter()
            .map(temperature_in_kelvin)
            .collect())
    }

    pub fn nuclear_data_properties(
        &self,
        file_type: FileType,
        major_version: u32,
        evaluation_temp_in_mev: f64,
        find_exact: bool,
    ) -> DatabaseResult<&NuclearDataProperties> {
        self.nuclear_data_properties.get(
            file_type,
            major_version,
            evaluation_temp_in_mev,
            find_exact,
            self.describe_kind("nuclear"),
        )
    }

    pub fn set_nuclear_data_properties(
        &mut self,
        properties: NuclearDataProperties,
    ) -> DatabaseResult<()> {
        self.check_owner(properties.zaid(), "nuclear")?;
        let location = properties.location();
        let file_type = location.file_type();
        let major_version = location.file_major_version();
        let description = format!(
            "nuclear data {} for zaid {}",
            location.table_name(),
            self.zaid
        );
        let evaluation_temp_in_mev = properties.evaluation_temp_in_mev();
        self.nuclear_data_properties.insert(
            file_type,
            major_version,
            evaluation_temp_in_mev,
            properties,
            description,
        )
    }

    pub fn has_thermal_nuclear_data(&self, name: &str) -> bool {
        self.thermal_nuclear_data_properties
            .get(name)
            .is_some_and(|index| !index.is_empty())
    }

    pub fn thermal_nuclear_data_available(
        &self,
        name: &str,
        file_type: FileType,
        major_version: Option<u32>,
        evaluation_temp_in_mev: Option<f64>,
    ) -> bool {
        self.thermal_nuclear_data_properties
            .get(name)
            .is_some_and(|index| index.available(file_type, major_version, evaluation_temp_in_mev))
    }

    pub fn thermal_nuclear_data_names(&self) -> BTreeSet<String> {
        self.thermal_nuclear_data_properties
            .iter()
            .filter(|(_, index)| !index.is_empty())
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn thermal_nuclear_data_file_types(&self, name: &str) -> BTreeSet<FileType> {
        self.thermal_nuclear_data_properties
            .get(name)
            .map(TemperatureIndex::file_types)
            .unwrap_or_default()
    }

    pub fn thermal_nuclear_data_file_versions(
        &self,
        name: &str,
        file_type: FileType,
    ) -> BTreeSet<u32> {
        self.thermal_nuclear_data_properties
            .get(name)
            .map(|index| index.major_versions(file_type))
            .unwrap_or_default()
    }

    /// Alternate-format thermal tables always recommend major version 2;
    /// other formats recommend the newest major version.
    pub fn recommended_thermal_nuclear_data_file_version(
        &self,
        name: &str,
        file_type: FileType,
    ) -> DatabaseResult<u32> {
        let index = self.thermal_index(name)?;
        let newest = index.max_major_version(file_type, self.describe_thermal(name))?;
        match file_type {
            FileType::Alternate => Ok(ALTERNATE_THERMAL_RECOMMENDED_MAJOR_VERSION),
            FileType::Standard => Ok(newest),
        }
    }

    pub fn thermal_nuclear_data_evaluation_temps_in_mev(
        &self,
        name: &str,
        file_type: FileType,
        major_version: u32,
    ) -> DatabaseResult<Vec<f64>> {
        Ok(self
            .thermal_index(name)?
            .grid(file_type, major_version, self.describe_thermal(name))?
            .temperatures_in_mev())
    }

    pub fn thermal_nuclear_data_evaluation_temps(
        &self,
        name: &str,
        file_type: FileType,
        major_version: u32,
    ) -> DatabaseResult<Vec<f64>> {
        Ok(self
            .thermal_nuclear_data_evaluation_temps_in_mev(name, file_type, major_version)?
            .into_iter()
            .map(temperature_in_kelvin)
            .collect())
    }

    /// Registry id of the matching thermal record; resolve it through the
    /// database.
    pub fn thermal_nuclear_data_id(
        &self,
        name: &str,
        file_type: FileType,
        major_version: u32,
        evaluation_temp_in_mev: f64,
        find_exact: bool,
    ) -> DatabaseResult<ThermalPropertiesId> {
        self.thermal_index(name)?
            .get(
                file_type,
                major_version,
                evaluation_temp_in_mev,
                find_exact,
                self.describe_thermal(name),
            )
            .copied()
    }

    pub(crate) fn add_thermal_nuclear_data_id(
        &mut self,
        name: &str,
        file_type: FileType,
        major_version: u32,
        evaluation_temp_in_mev: f64,
        id: ThermalPropertiesId,
    ) -> DatabaseResult<()> {
        let description = self.describe_thermal(name);
        self.thermal_nuclear_data_properties
            .entry(name.to_string())
            .or_default()
            .insert(file_type, major_version, evaluation_temp_in_mev, id, description)
    }

    pub(crate) fn thermal_nuclear_data_ids(&self) -> impl Iterator<Item = ThermalPropertiesId> + '_ {
        self.thermal_nuclear_data_properties
            .values()
            .flat_map(|index| index.values().copied())
    }

    pub fn photonuclear_data_available(&self, file_type: FileType, version: Option<u32>) -> bool {
        self.photonuclear_data_properties.available(file_type, version)
    }

    pub fn photonuclear_data_file_types(&self) -> BTreeSet<FileType> {
        self.photonuclear_data_properties.file_types()
    }

    pub fn photonuclear_data_file_versions(&self, file_type: FileType) -> BTreeSet<u32> {
        self.photonuclear_data_properties.versions(file_type)
    }

    pub fn recommended_photonuclear_data_file_version(
        &self,
        file_type: FileType,
    ) -> DatabaseResult<u32> {
        self.photonuclear_data_properties
            .max_version(file_type, self.describe_kind("photonuclear"))
    }

    pub fn photonuclear_data_properties(
        &self,
        file_type: FileType,
        version: u32,
    ) -> DatabaseResult<&PhotonuclearDataProperties> {
        self.photonuclear_data_properties
            .get(file_type, version, self.describe_kind("photonuclear"))
    }

    pub fn set_photonuclear_data_properties(
        &mut self,
        properties: PhotonuclearDataProperties,
    ) -> DatabaseResult<()> {
        self.check_owner(properties.zaid(), "photonuclear")?;
        let location = properties.location();
        let (file_type, version) = (location.file_type(), location.file_version());
        if let Some(replaced) = self
            .photonuclear_data_properties
            .insert(file_type, version, properties)
        {
            warn!(
                zaid = self.zaid.raw(),
                table = %replaced.location().table_name(),
                "replacing photonuclear data with the same file type and version"
            );
        }
        Ok(())
    }

    pub(crate) fn nuclear_records(&self) -> impl Iterator<Item = &NuclearDataProperties> {
        self.nuclear_data_properties.values()
    }

    pub(crate) fn photonuclear_records(&self) -> impl Iterator<Item = &PhotonuclearDataProperties> {
        self.photonuclear_data_properties.values()
    }

    fn thermal_index(&self, name: &str) -> DatabaseResult<&TemperatureIndex<ThermalPropertiesId>> {
        self.thermal_nuclear_data_properties.get(name).ok_or_else(|| {
            XsdirError::invalid_request(
                "DB.MISSING_THERMAL_NAME",
                format!("nuclide {} has no thermal nuclear data named '{}'", self.zaid, name),
            )
        })
    }

    fn describe_kind(&self, kind: &str) -> String {
        format!("{} data for nuclide {}", kind, self.zaid)
    }

    fn describe_thermal(&self, name: &str) -> String {
        format!("thermal nuclear data '{}' for nuclide {}", name, self.zaid)
    }

    fn check_owner(&self, record_zaid: Zaid, kind: &str) -> DatabaseResult<()> {
        if record_zaid == self.zaid {
            return Ok(());
        }
        Err(XsdirError::consistency(
            "DB.ZAID_MISMATCH",
            format!(
                "{} data for zaid {} cannot be stored in nuclide properties for zaid {}",
                kind, record_zaid, self.zaid
            ),
        ))
    }
}

impl Display for NuclideProperties {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Nuclide {} (Z={}, A={}, awr={})",
            self.zaid,
            self.zaid.atomic_number(),
            self.zaid.atomic_mass_number(),
            self.atomic_weight_ratio
        )?;
        for record in self.nuclear_records() {
            writeln!(
                f,
                "  nuclear       {} T={:.1}K",
                record.location(),
                record.evaluation_temp_in_kelvin()
            )?;
        }
        for name in self.thermal_nuclear_data_names() {
            writeln!(f, "  thermal       {}", name)?;
        }
        for record in self.photonuclear_records() {
            writeln!(f, "  photonuclear  {}", record.location())?;
        }
        Ok(())
    }
}
