use super::index::VersionIndex;
use super::records::{ElectroatomicDataProperties, PhotoatomicDataProperties};
use crate::common::constants::NEUTRON_REST_MASS_AMU;
use crate::domain::{DatabaseResult, FileType, XsdirError, Zaid};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use tracing::warn;

/// Element level properties: photoatomic and electroatomic tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomProperties {
    zaid: Zaid,
    atomic_weight_ratio: f64,
    photoatomic_data_properties: VersionIndex<PhotoatomicDataProperties>,
    electroatomic_data_properties: VersionIndex<ElectroatomicDataProperties>,
}

impl AtomProperties {
    /// Stub for the element of `zaid`.
    pub fn new(zaid: Zaid, atomic_weight_ratio: f64) -> Self {
        Self {
            zaid: zaid.atom(),
            atomic_weight_ratio,
            photoatomic_data_properties: VersionIndex::default(),
            electroatomic_data_properties: VersionIndex::default(),
        }
    }

    pub fn zaid(&self) -> Zaid {
        self.zaid
    }

    pub fn atomic_number(&self) -> u32 {
        self.zaid.atomic_number()
    }

    pub fn atomic_weight_ratio(&self) -> f64 {
        self.atomic_weight_ratio
    }

    pub(crate) fn set_atomic_weight_ratio(&mut self, atomic_weight_ratio: f64) {
        self.atomic_weight_ratio = atomic_weight_ratio;
    }

    pub fn atomic_weight(&self) -> f64 {
        self.atomic_weight_ratio * NEUTRON_REST_MASS_AMU
    }

    pub fn is_empty(&self) -> bool {
        self.photoatomic_data_properties.is_empty() && self.electroatomic_data_properties.is_empty()
    }

    pub fn photoatomic_data_available(&self, file_type: FileType, version: Option<u32>) -> bool {
        self.photoatomic_data_properties.available(file_type, version)
    }

    pub fn photoatomic_data_file_types(&self) -> BTreeSet<FileType> {
        self.photoatomic_data_properties.file_types()
    }

    pub fn photoatomic_data_file_versions(&self, file_type: FileType) -> BTreeSet<u32> {
        self.photoatomic_data_properties.versions(file_type)
    }

    pub fn recommended_photoatomic_data_file_version(
        &self,
        file_type: FileType,
    ) -> DatabaseResult<u32> {
        self.photoatomic_data_properties
            .max_version(file_type, self.describe_kind("photoatomic"))
    }

    pub fn photoatomic_data_properties(
        &self,
        file_type: FileType,
        version: u32,
    ) -> DatabaseResult<&PhotoatomicDataProperties> {
        self.photoatomic_data_properties
            .get(file_type, version, self.describe_kind("photoatomic"))
    }

    pub fn set_photoatomic_data_properties(
        &mut self,
        properties: PhotoatomicDataProperties,
    ) -> DatabaseResult<()> {
        self.check_owner(properties.zaid(), "photoatomic")?;
        let location = properties.location();
        let (file_type, version) = (location.file_type(), location.file_version());
        if let Some(replaced) =
            self.photoatomic_data_properties
                .insert(file_type, version, properties)
        {
            warn!(
                zaid = self.zaid.raw(),
                table = %replaced.location().table_name(),
                "replacing photoatomic data with the same file type and version"
            );
        }
        Ok(())
    }

    pub fn electroatomic_data_available(&self, file_type: FileType, version: Option<u32>) -> bool {
        self.electroatomic_data_properties.available(file_type, version)
    }

    pub fn electroatomic_data_file_types(&self) -> BTreeSet<FileType> {
        self.electroatomic_data_properties.file_types()
    }

    pub fn electroatomic_data_file_versions(&self, file_type: FileType) -> BTreeSet<u32> {
        self.electroatomic_data_properties.versions(file_type)
    }

    pub fn recommended_electroatomic_data_file_version(
        &self,
        file_type: FileType,
    ) -> DatabaseResult<u32> {
        self.electroatomic_data_properties
            .max_version(file_type, self.describe_kind("electroatomic"))
    }

    pub fn electroatomic_data_properties(
        &self,
        file_type: FileType,
        version: u32,
    ) -> DatabaseResult<&ElectroatomicDataProperties> {
        self.electroatomic_data_properties
            .get(file_type, version, self.describe_kind("electroatomic"))
    }

    pub fn set_electroatomic_data_properties(
        &mut self,
        properties: ElectroatomicDataProperties,
    ) -> DatabaseResult<()> {
        self.check_owner(properties.zaid(), "electroatomic")?;
        let location = properties.location();
        let (file_type, version) = (location.file_type(), location.file_version());
        if let Some(replaced) =
            self.electroatomic_data_properties
                .insert(file_type, version, properties)
        {
            warn!(
                zaid = self.zaid.raw(),
                table = %replaced.location().table_name(),
                "replacing electroatomic data with the same file type and version"
            );
        }
        Ok(())
    }

    pub(crate) fn photoatomic_records(&self) -> impl Iterator<Item = &PhotoatomicDataProperties> {
        self.photoatomic_data_properties.values()
    }

    pub(crate) fn electroatomic_records(
        &self,
    ) -> impl Iterator<Item = &ElectroatomicDataProperties> {
        self.electroatomic_data_properties.values()
    }

    fn describe_kind(&self, kind: &str) -> String {
        format!("{} data for atom {}", kind, self.zaid)
    }

    fn check_owner(&self, record_zaid: Zaid, kind: &str) -> DatabaseResult<()> {
        if record_zaid.atom() == self.zaid {
            return Ok(());
        }
        Err(XsdirError::consistency(
            "DB.ZAID_MISMATCH",
            format!(
                "{} data for zaid {} cannot be stored in atom properties for zaid {}",
                kind, record_zaid, self.zaid
            ),
        ))
    }
}

impl Display for AtomProperties {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Atom {} (Z={}, awr={})",
            self.zaid,
            self.atomic_number(),
            self.atomic_weight_ratio
        )?;
        for record in self.photoatomic_records() {
            writeln!(f, "  photoatomic   {}", record.location())?;
        }
        for record in self.electroatomic_records() {
            writeln!(f, "  electroatomic {}", record.location())?;
        }
        Ok(())
    }
}
