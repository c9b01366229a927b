use super::grid::TemperatureGrid;
use crate::domain::{DatabaseResult, FileType, XsdirError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

fn missing_file_type(description: impl Display, file_type: FileType) -> XsdirError {
    XsdirError::invalid_request(
        "DB.MISSING_FILE_TYPE",
        format!("{} has no {} data", description, file_type),
    )
}

fn missing_version(description: impl Display, file_type: FileType, version: u32) -> XsdirError {
    XsdirError::invalid_request(
        "DB.MISSING_VERSION",
        format!(
            "{} has no {} data with version {}",
            description, file_type, version
        ),
    )
}

/// Records indexed by file type and file version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionIndex<T> {
    entries: BTreeMap<FileType, BTreeMap<u32, T>>,
}

impl<T> Default for VersionIndex<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T> VersionIndex<T> {
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(BTreeMap::is_empty)
    }

    pub fn available(&self, file_type: FileType, version: Option<u32>) -> bool {
        match (self.entries.get(&file_type), version) {
            (Some(versions), Some(version)) => versions.contains_key(&version),
            (Some(versions), None) => !versions.is_empty(),
            (None, _) => false,
        }
    }

    pub fn file_types(&self) -> BTreeSet<FileType> {
        self.entries
            .iter()
            .filter(|(_, versions)| !versions.is_empty())
            .map(|(file_type, _)| *file_type)
            .collect()
    }

    pub fn versions(&self, file_type: FileType) -> BTreeSet<u32> {
        self.entries
            .get(&file_type)
            .map(|versions| versions.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn max_version(&self, file_type: FileType, description: impl Display) -> DatabaseResult<u32> {
        self.entries
            .get(&file_type)
            .and_then(|versions| versions.keys().next_back().copied())
            .ok_or_else(|| missing_file_type(description, file_type))
    }

    pub fn get(
        &self,
        file_type: FileType,
        version: u32,
        description: impl Display,
    ) -> DatabaseResult<&T> {
        let versions = self
            .entries
            .get(&file_type)
            .ok_or_else(|| missing_file_type(&description, file_type))?;
        versions
            .get(&version)
            .ok_or_else(|| missing_version(&description, file_type, version))
    }

    /// Stores `value`, returning the record it replaced.
    pub fn insert(&mut self, file_type: FileType, version: u32, value: T) -> Option<T> {
        self.entries
            .entry(file_type)
            .or_default()
            .insert(version, value)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.values().flat_map(BTreeMap::values)
    }
}

/// Records indexed by file type and major version, then by evaluation
/// temperature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureIndex<T> {
    entries: BTreeMap<FileType, BTreeMap<u32, TemperatureGrid<T>>>,
}

impl<T> Default for TemperatureIndex<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T> TemperatureIndex<T> {
    pub fn is_empty(&self) -> bool {
        self.entries
            .values()
            .flat_map(BTreeMap::values)
            .all(|grid| grid.is_empty())
    }

    /// True when data exists for the file type and, when given, the major
    /// version and evaluation temperature (matched within tolerance).
    pub fn available(
        &self,
        file_type: FileType,
        major_version: Option<u32>,
        evaluation_temp_in_mev: Option<f64>,
    ) -> bool {
        let Some(versions) = self.entries.get(&file_type) else {
            return false;
        };
        let Some(major_version) = major_version else {
            return versions.values().any(|grid| !grid.is_empty());
        };
        let Some(grid) = versions.get(&major_version) else {
            return false;
        };
        match evaluation_temp_in_mev {
            Some(evaluation_temp_in_mev) => grid.contains(evaluation_temp_in_mev),
            None => !grid.is_empty(),
        }
    }

    pub fn file_types(&self) -> BTreeSet<FileType> {
        self.entries
            .iter()
            .filter(|(_, versions)| versions.values().any(|grid| !grid.is_empty()))
            .map(|(file_type, _)| *file_type)
            .collect()
    }

    pub fn major_versions(&self, file_type: FileType) -> BTreeSet<u32> {
        self.entries
            .get(&file_type)
            .map(|versions| versions.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn max_major_version(
        &self,
        file_type: FileType,
        description: impl Display,
    ) -> DatabaseResult<u32> {
        self.entries
            .get(&file_type)
            .and_then(|versions| versions.keys().next_back().copied())
            .ok_or_else(|| missing_file_type(description, file_type))
    }

    pub fn grid(
        &self,
        file_type: FileType,
        major_version: u32,
        description: impl Display,
    ) -> DatabaseResult<&TemperatureGrid<T>> {
        let versions = self
            .entries
            .get(&file_type)
            .ok_or_else(|| missing_file_type(&description, file_type))?;
        versions
            .get(&major_version)
            .ok_or_else(|| missing_version(&description, file_type, major_version))
    }

    pub fn get(
        &self,
        file_type: FileType,
        major_version: u32,
        evaluation_temp_in_mev: f64,
        find_exact: bool,
        description: impl Display,
    ) -> DatabaseResult<&T> {
        self.grid(file_type, major_version, &description)?.find(
            evaluation_temp_in_mev,
            find_exact,
            format!("{} {} v{}", description, file_type, major_version),
        )
    }

    pub fn insert(
        &mut self,
        file_type: FileType,
        major_version: u32,
        evaluation_temp_in_mev: f64,
        value: T,
        description: impl Display,
    ) -> DatabaseResult<()> {
        self.entries
            .entry(file_type)
            .or_default()
            .entry(major_version)
            .or_default()
            .insert(evaluation_temp_in_mev, value, description)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries
            .values()
            .flat_map(BTreeMap::values)
            .flat_map(|grid| grid.values())
    }
}

#[cfg(test)]
mod tests {
    use super::{TemperatureIndex, VersionIndex};
    use crate::domain::{FileType, XsdirErrorCategory};
    use std::collections::BTreeSet;

    #[test]
    fn version_index_reports_versions_and_maximum() {
        let mut index = VersionIndex::default();
        assert!(index.is_empty());
        assert!(index.insert(FileType::Standard, 12, "12p").is_none());
        assert!(index.insert(FileType::Standard, 4, "04p").is_none());
        assert_eq!(index.insert(FileType::Standard, 12, "12p-new"), Some("12p"));

        assert!(index.available(FileType::Standard, None));
        assert!(index.available(FileType::Standard, Some(4)));
        assert!(!index.available(FileType::Standard, Some(84)));
        assert!(!index.available(FileType::Alternate, None));
        assert_eq!(index.file_types(), BTreeSet::from([FileType::Standard]));
        assert_eq!(index.versions(FileType::Standard), BTreeSet::from([4, 12]));
        assert_eq!(index.max_version(FileType::Standard, "atom 1000").expect("max"), 12);
        assert_eq!(*index.get(FileType::Standard, 12, "atom 1000").expect("get"), "12p-new");
    }

    #[test]
    fn version_index_lookup_errors_name_the_request() {
        let mut index = VersionIndex::default();
        index.insert(FileType::Standard, 12, ());

        let error = index
            .get(FileType::Alternate, 12, "photoatomic data for zaid 1000")
            .expect_err("missing file type should fail");
        assert_eq!(error.category(), XsdirErrorCategory::InvalidRequestError);
        assert_eq!(error.placeholder(), "DB.MISSING_FILE_TYPE");

        let error = index
            .get(FileType::Standard, 3, "photoatomic data for zaid 1000")
            .expect_err("missing version should fail");
        assert_eq!(error.placeholder(), "DB.MISSING_VERSION");
        assert!(error.message().contains("zaid 1000"));
    }

    #[test]
    fn temperature_index_buckets_by_major_version() {
        let mut index = TemperatureIndex::default();
        index
            .insert(FileType::Standard, 8, 2.5301e-8, "80c", "h1")
            .expect("insert should succeed");
        index
            .insert(FileType::Standard, 8, 5.1704e-8, "81c", "h1")
            .expect("insert should succeed");
        index
            .insert(FileType::Standard, 7, 2.5301e-8, "70c", "h1")
            .expect("same temperature in another bucket is allowed");

        assert!(index.available(FileType::Standard, None, None));
        assert!(index.available(FileType::Standard, Some(8), Some(5.1704e-8)));
        assert!(!index.available(FileType::Standard, Some(8), Some(1.0e-7)));
        assert!(!index.available(FileType::Standard, Some(6), None));
        assert_eq!(index.major_versions(FileType::Standard), BTreeSet::from([7, 8]));
        assert_eq!(index.max_major_version(FileType::Standard, "h1").expect("max"), 8);
        assert_eq!(
            *index
                .get(FileType::Standard, 8, 5.1704e-8, true, "h1")
                .expect("exact lookup"),
            "81c"
        );
        assert_eq!(index.values().count(), 3);

        let error = index
            .insert(FileType::Standard, 8, 2.5301e-8, "dup", "h1")
            .expect_err("duplicate temperature should fail");
        assert_eq!(error.placeholder(), "DB.DUPLICATE_TEMPERATURE");
    }
}
