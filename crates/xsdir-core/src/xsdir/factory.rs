//! Two-pass population of a [`ScatteringCenterPropertiesDatabase`] from an
//! xsdir file.

use super::parser::{
    TableEntry, construct_complete_table_file_path, extract_zaids_and_atomic_weight_ratios,
    is_table_type_supported,
};
use super::scanner::{EntryFilter, scan};
use crate::ace::ThermalZaidResolver;
use crate::common::constants::COMBINED_PHOTOATOMIC_VERSIONS;
use crate::domain::{TableKind, XsdirError, XsdirResult};
use crate::properties::{
    AceTableLocation, AtomicDataProperties, DUPLICATE_TEMPERATURE, NuclearDataProperties,
    PhotonuclearDataProperties, ScatteringCenterPropertiesDatabase, ThermalNuclearDataProperties,
};
use std::path::Path;
use tracing::{debug, info, warn};

pub(crate) struct PropertiesFactory<'a> {
    xsdir_path: &'a Path,
    thermal_resolver: &'a dyn ThermalZaidResolver,
    verbose: bool,
}

impl<'a> PropertiesFactory<'a> {
    pub(crate) fn new(
        xsdir_path: &'a Path,
        thermal_resolver: &'a dyn ThermalZaidResolver,
        verbose: bool,
    ) -> Self {
        Self {
            xsdir_path,
            thermal_resolver,
            verbose,
        }
    }

    pub(crate) fn export(&self, database: &mut ScatteringCenterPropertiesDatabase) -> XsdirResult<()> {
        self.initialize_properties(database)?;
        self.populate_properties(database)?;
        database.remove_empty_properties();
        info!(
            xsdir = %self.xsdir_path.display(),
            atoms = database.atom_zaids().len(),
            nuclides = database.nuclide_zaids().len(),
            thermal_tables = database.thermal_nuclear_data_records().len(),
            "exported xsdir data"
        );
        Ok(())
    }

    /// Creates atom and nuclide stubs for every atomic weight ratio pair.
    fn initialize_properties(
        &self,
        database: &mut ScatteringCenterPropertiesDatabase,
    ) -> XsdirResult<()> {
        let filter = EntryFilter::awr_entries();
        let mut processor = |entry_tokens: &[&str], _: &[u8]| -> XsdirResult<()> {
            for (zaid, atomic_weight_ratio) in extract_zaids_and_atomic_weight_ratios(entry_tokens)? {
                database.initialize_atom_properties(zaid, atomic_weight_ratio);
                database.initialize_nuclide_properties(zaid, atomic_weight_ratio);
            }
            Ok(())
        };
        scan(self.xsdir_path, &filter, &mut processor)
    }

    fn populate_properties(
        &self,
        database: &mut ScatteringCenterPropertiesDatabase,
    ) -> XsdirResult<()> {
        let filter = EntryFilter::table_entries(true)
            .with(is_supported_table)
            .log_rejections(self.verbose);
        let mut processor = |entry_tokens: &[&str], _: &[u8]| -> XsdirResult<()> {
            match self.add_table(database, entry_tokens) {
                Err(error) if error.placeholder() == DUPLICATE_TEMPERATURE => {
                    warn!(
                        table = entry_tokens.first().copied().unwrap_or_default(),
                        reason = error.message(),
                        "ignoring xsdir entry with duplicate evaluation temperature"
                    );
                    Ok(())
                }
                result => result,
            }
        };
        scan(self.xsdir_path, &filter, &mut processor)
    }

    fn add_table(
        &self,
        database: &mut ScatteringCenterPropertiesDatabase,
        entry_tokens: &[&str],
    ) -> XsdirResult<()> {
        let entry = TableEntry::from_tokens(entry_tokens)?;
        let complete_path = construct_complete_table_file_path(self.xsdir_path, &entry.relative_path);
        if !complete_path.is_file() {
            return Err(XsdirError::io_system(
                "IO.TABLE_FILE_MISSING",
                format!(
                    "table {} refers to missing file '{}'",
                    entry.table_name,
                    complete_path.display()
                ),
            ));
        }

        let Some(kind) = entry.table_name.kind() else {
            debug!(table = %entry.table_name, "skipping unsupported table type");
            return Ok(());
        };
        let location = AceTableLocation::new(
            entry.table_name.clone(),
            entry.relative_path.clone(),
            entry.file_start_line,
            entry.table_length,
        )?;

        match kind {
            TableKind::Nuclear => database.add_nuclear_data_properties(NuclearDataProperties::new(
                location,
                entry.atomic_weight_ratio,
                entry.evaluation_temp_in_mev,
            )?),
            TableKind::ThermalNuclear => {
                let zaids = self.thermal_resolver.resolve(
                    &complete_path,
                    entry.table_name.name(),
                    entry.file_start_line,
                )?;
                let properties =
                    ThermalNuclearDataProperties::new(location, zaids, entry.evaluation_temp_in_mev)?;
                let id = database.add_thermal_nuclear_data_properties(properties)?;
                debug!(table = %entry.table_name, id = %id, "registered thermal nuclear data");
                Ok(())
            }
            TableKind::Photonuclear => database.add_photonuclear_data_properties(
                PhotonuclearDataProperties::new(location, entry.atomic_weight_ratio)?,
            ),
            TableKind::Photoatomic => {
                let properties = AtomicDataProperties::new(location, entry.atomic_weight_ratio)?;
                if COMBINED_PHOTOATOMIC_VERSIONS.contains(&entry.table_name.version()) {
                    database.add_electroatomic_data_properties(properties.clone())?;
                }
                database.add_photoatomic_data_properties(properties)
            }
            TableKind::Electroatomic => database.add_electroatomic_data_properties(
                AtomicDataProperties::new(location, entry.atomic_weight_ratio)?,
            ),
        }
    }
}

/// Malformed table names count as unsupported.
fn is_supported_table(entry_tokens: &[&str]) -> XsdirResult<bool> {
    Ok(is_table_type_supported(entry_tokens).unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::PropertiesFactory;
    use crate::ace::ThermalZaidResolver;
    use crate::domain::{FileType, XsdirErrorCategory, XsdirResult, Zaid};
    use crate::properties::ScatteringCenterPropertiesDatabase;
    use std::collections::BTreeSet;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    struct FixedZaids(Vec<u32>);

    impl ThermalZaidResolver for FixedZaids {
        fn resolve(&self, _: &Path, _: &str, _: usize) -> XsdirResult<BTreeSet<Zaid>> {
            Ok(self.0.iter().copied().map(Zaid::new).collect())
        }
    }

    fn write_directory(temp: &TempDir, xsdir: &str, tables: &[&str]) -> std::path::PathBuf {
        for table in tables {
            fs::write(temp.path().join(table), "table\n").expect("table file should be written");
        }
        let path = temp.path().join("xsdir");
        fs::write(&path, xsdir).expect("xsdir should be written");
        path
    }

    #[test]
    fn thermal_tables_attach_to_resolved_nuclides() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = write_directory(
            &temp,
            concat!(
                "atomic weight ratios\n",
                " 1000 0.99931697 1001 0.99916733 1002 1.9968\n",
                "directory\n",
                " lwtr.20t 0.999167 tmccs 0 1 1 1000 0 0 2.5301E-08\n",
            ),
            &["tmccs"],
        );
        let resolver = FixedZaids(vec![1001, 1002]);
        let mut database = ScatteringCenterPropertiesDatabase::new();

        PropertiesFactory::new(&path, &resolver, false)
            .export(&mut database)
            .expect("export should succeed");

        assert_eq!(
            database.nuclide_zaids(),
            BTreeSet::from([Zaid::new(1001), Zaid::new(1002)])
        );
        assert!(database.atom_zaids().is_empty());
        let record = database
            .thermal_nuclear_data_properties(
                Zaid::new(1002),
                "lwtr.t",
                FileType::Alternate,
                2,
                2.5301e-8,
                true,
            )
            .expect("thermal data should resolve");
        assert_eq!(record.zaids().len(), 2);
    }

    #[test]
    fn missing_table_file_is_io_error_naming_path() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = write_directory(
            &temp,
            concat!(
                " 1000 0.99931697 1001 0.99916733\n",
                " 1001.80c 0.999167 h1.710nc 0 1 4 17969 0 0 2.5301E-08\n",
            ),
            &[],
        );
        let resolver = FixedZaids(Vec::new());
        let mut database = ScatteringCenterPropertiesDatabase::new();

        let error = PropertiesFactory::new(&path, &resolver, false)
            .export(&mut database)
            .expect_err("missing table file should fail");
        assert_eq!(error.category(), XsdirErrorCategory::IoSystemError);
        assert_eq!(error.placeholder(), "IO.TABLE_FILE_MISSING");
        assert!(error.message().contains("h1.710nc"));
    }

    #[test]
    fn odd_awr_entry_is_format_error() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = write_directory(&temp, " 1000 0.99931697 1001\n", &[]);
        let resolver = FixedZaids(Vec::new());
        let mut database = ScatteringCenterPropertiesDatabase::new();

        let error = PropertiesFactory::new(&path, &resolver, false)
            .export(&mut database)
            .expect_err("odd awr entry should fail");
        assert_eq!(error.category(), XsdirErrorCategory::FormatError);
        assert_eq!(error.placeholder(), "FORMAT.AWR_ENTRY");
    }
}
