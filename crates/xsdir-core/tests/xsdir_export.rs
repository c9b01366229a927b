use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use xsdir_core::serialization::{load_database, save_database};
use xsdir_core::{FileType, ScatteringCenterPropertiesDatabase, Xsdir, XsdirErrorCategory, Zaid};

const XSDIR: &str = concat!(
    "datapath=/opt/mcnp/xs\n",
    "atomic weight ratios\n",
    "   1000 0.99931697 1001 0.99916733 1002 1.99679968\n",
    "   2004 3.96821660 6000 11.8969\n",
    "   6012 11.8969\n",
    "directory\n",
    " 1001.80c 0.999167 h1.710nc 0 1 4 17969 0 0 2.5301E-08\n",
    " 1001.81c 0.999167 h1.711nc 0 2 1 17969 4096 512 5.1704E-08\n",
    " 1001.50d 0.999167 dre5 0 1 1 2000 0 0 0.0\n",
    " 1002.24u 1.996300 la150u 0 1 1 3686 0 0 0.0\n",
    " 1000.12p 0.999242 mcplib84 0 1 1 1898 0 0 0.0\n",
    " 6000.03e 11.896900 el03 0 1 1 2329 0 0 0.0\n",
    " grph.10t 11.896900 sab/grph 0 1 3 1000 0 0 2.5301E-08",
);

const GRAPHITE_TABLE: &str = concat!(
    "  grph.10t  11.896900  2.53010E-08 03/28/08\n",
    "graphite at 293.6K                                                      mat 31\n",
    "   6000   0.000000      6012   0.000000         0   0.000000         0   0.000000\n",
    "      0   0.000000         0   0.000000         0   0.000000         0   0.000000\n",
    "      0   0.000000         0   0.000000         0   0.000000         0   0.000000\n",
    "      0   0.000000         0   0.000000         0   0.000000         0   0.000000\n",
);

fn write_file(root: &Path, relative_path: &str, content: &str) -> PathBuf {
    let path = root.join(relative_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent directory should be created");
    }
    fs::write(&path, content).expect("file should be written");
    path
}

fn write_library(root: &Path) -> PathBuf {
    for table in ["h1.710nc", "la150u", "mcplib84", "el03"] {
        write_file(root, table, "table data\n");
    }
    write_file(root, "sab/grph", &format!("preamble\nsecond\n{GRAPHITE_TABLE}"));
    write_file(root, "xsdir", XSDIR)
}

fn export(xsdir_path: &Path) -> ScatteringCenterPropertiesDatabase {
    let mut database = ScatteringCenterPropertiesDatabase::new();
    Xsdir::new(xsdir_path, true)
        .expect("xsdir should open")
        .export_data(&mut database)
        .expect("export should succeed");
    database
}

#[test]
fn neutron_table_is_exported_with_its_location() {
    let temp = TempDir::new().expect("tempdir should be created");
    let xsdir_path = write_file(
        temp.path(),
        "xsdir",
        concat!(
            "atomic weight ratios\n",
            " 1001 0.99916733\n",
            "directory\n",
            " 1001.80c 0.999167 h1.710nc 0 1 4 17969 0 0 2.5301E-08\n",
        ),
    );
    write_file(temp.path(), "h1.710nc", "table data\n");

    let database = export(&xsdir_path);

    assert!(database.do_nuclide_properties_exist(Zaid::new(1001)));
    let properties = database
        .nuclide_properties(Zaid::new(1001))
        .expect("nuclide should exist")
        .nuclear_data_properties(FileType::Standard, 8, 2.5301e-8, true)
        .expect("nuclear data should exist");
    assert_eq!(properties.location().table_name().name(), "1001.80c");
    assert_eq!(properties.location().file_path(), Path::new("h1.710nc"));
    assert_eq!(properties.location().file_start_line(), 4);
    assert_eq!(properties.location().table_length(), 17969);
    assert!(!database.do_atom_properties_exist(Zaid::new(1001)));
}

#[test]
fn every_supported_kind_is_attached_to_its_owner() {
    let temp = TempDir::new().expect("tempdir should be created");
    let database = export(&write_library(temp.path()));

    assert_eq!(
        database.nuclide_zaids(),
        BTreeSet::from([
            Zaid::new(1001),
            Zaid::new(1002),
            Zaid::new(6000),
            Zaid::new(6012)
        ])
    );
    assert_eq!(
        database.atom_zaids(),
        BTreeSet::from([Zaid::new(1000), Zaid::new(6000)])
    );

    let hydrogen = database
        .nuclide_properties(Zaid::new(1001))
        .expect("hydrogen should exist");
    assert_eq!(
        hydrogen.nuclear_data_file_versions(FileType::Standard),
        BTreeSet::from([8])
    );
    assert_eq!(
        hydrogen
            .nuclear_data_evaluation_temps_in_mev(FileType::Standard, 8)
            .expect("temperatures should exist"),
        vec![2.5301e-8]
    );

    let deuterium = database
        .nuclide_properties(Zaid::new(1002))
        .expect("deuterium should exist");
    let photonuclear = deuterium
        .photonuclear_data_properties(FileType::Alternate, 24)
        .expect("photonuclear data should exist");
    assert!((photonuclear.atomic_weight() - 1.9963 * 1.008_664_915_88).abs() < 1.0e-9);

    let carbon = database
        .atom_properties(Zaid::new(6012))
        .expect("carbon atom should exist");
    assert!(carbon.electroatomic_data_available(FileType::Standard, Some(3)));
    assert!(!carbon.photoatomic_data_available(FileType::Standard, None));
}

#[test]
fn legacy_photoatomic_table_also_provides_electron_data() {
    let temp = TempDir::new().expect("tempdir should be created");
    let database = export(&write_library(temp.path()));

    let hydrogen_atom = database
        .atom_properties(Zaid::new(1000))
        .expect("hydrogen atom should exist");
    let photoatomic = hydrogen_atom
        .photoatomic_data_properties(FileType::Standard, 12)
        .expect("photoatomic data should exist");
    let electroatomic = hydrogen_atom
        .electroatomic_data_properties(FileType::Standard, 12)
        .expect("electroatomic data should exist");
    assert_eq!(photoatomic.location(), electroatomic.location());
    assert_eq!(
        hydrogen_atom
            .recommended_electroatomic_data_file_version(FileType::Standard)
            .expect("recommendation should exist"),
        12
    );
}

#[test]
fn thermal_table_is_shared_by_every_listed_nuclide() {
    let temp = TempDir::new().expect("tempdir should be created");
    let database = export(&write_library(temp.path()));

    assert_eq!(database.thermal_nuclear_data_records().len(), 1);
    for zaid in [6000, 6012] {
        let nuclide = database
            .nuclide_properties(Zaid::new(zaid))
            .expect("carbon nuclide should exist");
        assert_eq!(
            nuclide.thermal_nuclear_data_names(),
            BTreeSet::from(["grph.t".to_string()])
        );
        assert_eq!(
            nuclide
                .recommended_thermal_nuclear_data_file_version("grph.t", FileType::Standard)
                .expect("recommendation should exist"),
            1
        );
        let record = database
            .thermal_nuclear_data_properties(
                Zaid::new(zaid),
                "grph.t",
                FileType::Standard,
                1,
                2.6e-8,
                false,
            )
            .expect("nearest thermal data should resolve");
        assert_eq!(record.location().file_path(), Path::new("sab").join("grph"));
        assert_eq!(record.location().file_start_line(), 3);
    }
}

#[test]
fn binary_and_unsupported_entries_are_skipped() {
    let temp = TempDir::new().expect("tempdir should be created");
    let database = export(&write_library(temp.path()));

    let hydrogen = database
        .nuclide_properties(Zaid::new(1001))
        .expect("hydrogen should exist");
    assert!(!hydrogen.nuclear_data_available(FileType::Standard, Some(8), Some(5.1704e-8)));
    assert!(!database.describe().contains("1001.50d"));
}

#[test]
fn unreferenced_declarations_are_removed() {
    let temp = TempDir::new().expect("tempdir should be created");
    let database = export(&write_library(temp.path()));

    assert!(!database.do_nuclide_properties_exist(Zaid::new(1000)));
    assert!(!database.do_nuclide_properties_exist(Zaid::new(2004)));
    assert!(!database.do_atom_properties_exist(Zaid::new(2004)));
}

#[test]
fn repeated_exports_produce_identical_databases() {
    let temp = TempDir::new().expect("tempdir should be created");
    let xsdir_path = write_library(temp.path());

    let first = export(&xsdir_path);
    let second = export(&xsdir_path);
    assert_eq!(first, second);
}

#[test]
fn table_without_declared_nuclide_is_consistency_error() {
    let temp = TempDir::new().expect("tempdir should be created");
    let xsdir_path = write_file(
        temp.path(),
        "xsdir",
        concat!(
            " 1001 0.99916733\n",
            " 1002.80c 1.996800 h2.710nc 0 1 1 9000 0 0 2.5301E-08\n",
        ),
    );
    write_file(temp.path(), "h2.710nc", "table data\n");

    let mut database = ScatteringCenterPropertiesDatabase::new();
    let error = Xsdir::new(&xsdir_path, false)
        .expect("xsdir should open")
        .export_data(&mut database)
        .expect_err("undeclared nuclide should fail");
    assert_eq!(error.category(), XsdirErrorCategory::ConsistencyError);
    assert_eq!(error.exit_code(), 4);
    assert!(error.message().contains("1002"));
}

#[test]
fn exported_database_survives_json_round_trip() {
    let temp = TempDir::new().expect("tempdir should be created");
    let database = export(&write_library(temp.path()));
    let json_path = temp.path().join("database.json");

    save_database(&database, &json_path).expect("save should succeed");
    let loaded = load_database(&json_path).expect("load should succeed");

    assert_eq!(loaded, database);
}

#[test]
fn element_ratio_does_not_depend_on_declaration_order() {
    let temp = TempDir::new().expect("tempdir should be created");
    write_file(temp.path(), "mcplib84", "table data\n");
    let mut ratios = Vec::new();
    for awr_line in [
        " 1000 0.99931697 1001 0.99916733\n",
        " 1001 0.99916733 1000 0.99931697\n",
    ] {
        let xsdir_path = write_file(
            temp.path(),
            "xsdir",
            &format!(
                "atomic weight ratios\n{awr_line}directory\n 1000.84p 0.999242 mcplib84 0 1 1 1898 0 0 0.0\n"
            ),
        );
        let database = export(&xsdir_path);
        ratios.push(
            database
                .atom_properties(Zaid::new(1000))
                .expect("hydrogen atom should exist")
                .atomic_weight_ratio(),
        );
    }
    assert_eq!(ratios, vec![0.99931697, 0.99931697]);
}

#[test]
fn tables_repeating_a_temperature_keep_the_first_entry() {
    let temp = TempDir::new().expect("tempdir should be created");
    for table in ["endf60", "endf66"] {
        write_file(temp.path(), table, "table data\n");
    }
    let xsdir_path = write_file(
        temp.path(),
        "xsdir",
        concat!(
            "atomic weight ratios\n",
            " 1001 0.99916733\n",
            "directory\n",
            " 1001.60c 0.999167 endf60 0 1 1 2000 0 0 2.5301E-08\n",
            " 1001.66c 0.999167 endf66 0 1 1 2000 0 0 2.5301E-08\n",
        ),
    );

    let database = export(&xsdir_path);

    let hydrogen = database
        .nuclide_properties(Zaid::new(1001))
        .expect("hydrogen should exist");
    assert_eq!(
        hydrogen
            .nuclear_data_evaluation_temps_in_mev(FileType::Standard, 6)
            .expect("temperatures should exist"),
        vec![2.5301e-8]
    );
    let properties = hydrogen
        .nuclear_data_properties(FileType::Standard, 6, 2.5301e-8, true)
        .expect("nuclear data should exist");
    assert_eq!(properties.location().table_name().name(), "1001.60c");
}

#[test]
fn combined_photoatomic_version_14_also_provides_electron_data() {
    let temp = TempDir::new().expect("tempdir should be created");
    for table in ["eprdata14", "mcplib04"] {
        write_file(temp.path(), table, "table data\n");
    }
    let xsdir_path = write_file(
        temp.path(),
        "xsdir",
        concat!(
            "atomic weight ratios\n",
            " 8000 15.8619530\n",
            "directory\n",
            " 8000.14p 15.861950 eprdata14 0 1 1 44506 0 0 0.0\n",
            " 8000.04p 15.861950 mcplib04 0 1 1 7212 0 0 0.0\n",
        ),
    );

    let database = export(&xsdir_path);

    let oxygen = database
        .atom_properties(Zaid::new(8016))
        .expect("oxygen atom should exist");
    assert_eq!(
        oxygen.photoatomic_data_file_versions(FileType::Standard),
        BTreeSet::from([4, 14])
    );
    assert_eq!(
        oxygen.electroatomic_data_file_versions(FileType::Standard),
        BTreeSet::from([14])
    );
    let electroatomic = oxygen
        .electroatomic_data_properties(FileType::Standard, 14)
        .expect("electroatomic data should exist");
    assert_eq!(electroatomic.location().table_name().name(), "8000.14p");
    assert_eq!(electroatomic.location().file_path(), Path::new("eprdata14"));
}
