use super::ThermalPropertiesId;
use super::atom::AtomProperties;
use super::grid::DUPLICATE_TEMPERATURE;
use super::nuclide::NuclideProperties;
use super::records::{
    ElectroatomicDataProperties, NuclearDataProperties, PhotoatomicDataProperties,
    PhotonuclearDataProperties, ThermalNuclearDataProperties,
};
use crate::domain::{DatabaseResult, FileType, XsdirError, Zaid};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use tracing::debug;

/// Catalog of atom (element) and nuclide (isotope) properties.
///
/// Thermal records cover several nuclides at once and live in a registry
/// owned by the database; nuclides refer to them by [`ThermalPropertiesId`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScatteringCenterPropertiesDatabase {
    atom_properties: BTreeMap<Zaid, AtomProperties>,
    nuclide_properties: BTreeMap<Zaid, NuclideProperties>,
    thermal_nuclear_data_properties: Vec<ThermalNuclearDataProperties>,
}

impl ScatteringCenterPropertiesDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.atom_properties.is_empty() && self.nuclide_properties.is_empty()
    }

    /// Checks the element of `zaid`.
    pub fn do_atom_properties_exist(&self, zaid: Zaid) -> bool {
        self.atom_properties.contains_key(&zaid.atom())
    }

    pub fn do_nuclide_properties_exist(&self, zaid: Zaid) -> bool {
        self.nuclide_properties.contains_key(&zaid)
    }

    /// Returns the atom entry for the element of `zaid`, creating an empty
    /// one when absent. An element zaid always sets the atomic weight ratio;
    /// an isotope zaid only supplies it until the element's own pair is seen.
    pub fn initialize_atom_properties(
        &mut self,
        zaid: Zaid,
        atomic_weight_ratio: f64,
    ) -> &mut AtomProperties {
        let atom = self
            .atom_properties
            .entry(zaid.atom())
            .or_insert_with(|| AtomProperties::new(zaid, atomic_weight_ratio));
        if zaid.is_element() {
            atom.set_atomic_weight_ratio(atomic_weight_ratio);
        }
        atom
    }

    pub fn initialize_nuclide_properties(
        &mut self,
        zaid: Zaid,
        atomic_weight_ratio: f64,
    ) -> &mut NuclideProperties {
        self.nuclide_properties
            .entry(zaid)
            .or_insert_with(|| NuclideProperties::new(zaid, atomic_weight_ratio))
    }

    pub fn atom_properties(&self, zaid: Zaid) -> DatabaseResult<&AtomProperties> {
        self.atom_properties
            .get(&zaid.atom())
            .ok_or_else(|| unknown_atom(zaid))
    }

    pub fn atom_properties_mut(&mut self, zaid: Zaid) -> DatabaseResult<&mut AtomProperties> {
        self.atom_properties
            .get_mut(&zaid.atom())
            .ok_or_else(|| unknown_atom(zaid))
    }

    pub fn nuclide_properties(&self, zaid: Zaid) -> DatabaseResult<&NuclideProperties> {
        self.nuclide_properties
            .get(&zaid)
            .ok_or_else(|| unknown_nuclide(zaid))
    }

    pub fn nuclide_properties_mut(
        &mut self,
        zaid: Zaid,
    ) -> DatabaseResult<&mut NuclideProperties> {
        self.nuclide_properties
            .get_mut(&zaid)
            .ok_or_else(|| unknown_nuclide(zaid))
    }

    pub fn atom_zaids(&self) -> BTreeSet<Zaid> {
        self.atom_properties.keys().copied().collect()
    }

    pub fn nuclide_zaids(&self) -> BTreeSet<Zaid> {
        self.nuclide_properties.keys().copied().collect()
    }

    pub fn atoms(&self) -> impl Iterator<Item = &AtomProperties> {
        self.atom_properties.values()
    }

    pub fn nuclides(&self) -> impl Iterator<Item = &NuclideProperties> {
        self.nuclide_properties.values()
    }

    pub fn add_nuclear_data_properties(
        &mut self,
        properties: NuclearDataProperties,
    ) -> DatabaseResult<()> {
        let zaid = properties.zaid();
        self.stub_nuclide(zaid, properties.location().table_name().name())?
            .set_nuclear_data_properties(properties)
    }

    /// Registers the record once and attaches it to every nuclide it covers.
    /// Nothing is stored unless every nuclide accepts it.
    pub fn add_thermal_nuclear_data_properties(
        &mut self,
        properties: ThermalNuclearDataProperties,
    ) -> DatabaseResult<ThermalPropertiesId> {
        let location = properties.location();
        let file_type = location.file_type();
        let major_version = location.file_major_version();
        let evaluation_temp_in_mev = properties.evaluation_temp_in_mev();
        let table = location.table_name().name();

        for zaid in properties.zaids() {
            let nuclide = self
                .nuclide_properties
                .get(zaid)
                .ok_or_else(|| missing_nuclide(*zaid, table))?;
            if nuclide.thermal_nuclear_data_available(
                properties.name(),
                file_type,
                Some(major_version),
                Some(evaluation_temp_in_mev),
            ) {
                return Err(XsdirError::consistency(
                    DUPLICATE_TEMPERATURE,
                    format!(
                        "nuclide {} already has thermal nuclear data '{}' at evaluation temperature {:e} MeV (table {})",
                        zaid,
                        properties.name(),
                        evaluation_temp_in_mev,
                        table
                    ),
                ));
            }
        }

        let id = ThermalPropertiesId::new(self.thermal_nuclear_data_properties.len());
        for zaid in properties.zaids() {
            if let Some(nuclide) = self.nuclide_properties.get_mut(zaid) {
                nuclide.add_thermal_nuclear_data_id(
                    properties.name(),
                    file_type,
                    major_version,
                    evaluation_temp_in_mev,
                    id,
                )?;
            }
        }
        self.thermal_nuclear_data_properties.push(properties);
        Ok(id)
    }

    pub fn add_photonuclear_data_properties(
        &mut self,
        properties: PhotonuclearDataProperties,
    ) -> DatabaseResult<()> {
        let zaid = properties.zaid();
        self.stub_nuclide(zaid, properties.location().table_name().name())?
            .set_photonuclear_data_properties(properties)
    }

    pub fn add_photoatomic_data_properties(
        &mut self,
        properties: PhotoatomicDataProperties,
    ) -> DatabaseResult<()> {
        let zaid = properties.zaid();
        self.stub_atom(zaid, properties.location().table_name().name())?
            .set_photoatomic_data_properties(properties)
    }

    pub fn add_electroatomic_data_properties(
        &mut self,
        properties: ElectroatomicDataProperties,
    ) -> DatabaseResult<()> {
        let zaid = properties.zaid();
        self.stub_atom(zaid, properties.location().table_name().name())?
            .set_electroatomic_data_properties(properties)
    }

    /// Thermal record `name` attached to nuclide `zaid`.
    pub fn thermal_nuclear_data_properties(
        &self,
        zaid: Zaid,
        name: &str,
        file_type: FileType,
        major_version: u32,
        evaluation_temp_in_mev: f64,
        find_exact: bool,
    ) -> DatabaseResult<&ThermalNuclearDataProperties> {
        let id = self.nuclide_properties(zaid)?.thermal_nuclear_data_id(
            name,
            file_type,
            major_version,
            evaluation_temp_in_mev,
            find_exact,
        )?;
        self.thermal_nuclear_data_properties_by_id(id)
    }

    pub fn thermal_nuclear_data_properties_by_id(
        &self,
        id: ThermalPropertiesId,
    ) -> DatabaseResult<&ThermalNuclearDataProperties> {
        self.thermal_nuclear_data_properties
            .get(id.index())
            .ok_or_else(|| {
                XsdirError::internal(
                    "DB.UNKNOWN_THERMAL_ID",
                    format!("thermal registry has no record {}", id),
                )
            })
    }

    pub fn thermal_nuclear_data_records(&self) -> &[ThermalNuclearDataProperties] {
        &self.thermal_nuclear_data_properties
    }

    /// Drops atom and nuclide entries that never received a record.
    pub fn remove_empty_properties(&mut self) {
        let atoms_before = self.atom_properties.len();
        let nuclides_before = self.nuclide_properties.len();
        self.atom_properties.retain(|_, atom| !atom.is_empty());
        self.nuclide_properties.retain(|_, nuclide| !nuclide.is_empty());
        debug!(
            removed_atoms = atoms_before - self.atom_properties.len(),
            removed_nuclides = nuclides_before - self.nuclide_properties.len(),
            "removed empty scattering-center properties"
        );
    }

    /// Checks that every thermal reference resolves and that each record
    /// lists the nuclides referring to it.
    pub fn validate(&self) -> DatabaseResult<()> {
        for nuclide in self.nuclide_properties.values() {
            for id in nuclide.thermal_nuclear_data_ids() {
                let record = self.thermal_nuclear_data_properties_by_id(id).map_err(|_| {
                    XsdirError::consistency(
                        "DB.UNKNOWN_THERMAL_ID",
                        format!(
                            "nuclide {} refers to missing thermal record {}",
                            nuclide.zaid(),
                            id
                        ),
                    )
                })?;
                if !record.has_data_for_zaid(nuclide.zaid()) {
                    return Err(XsdirError::consistency(
                        "DB.ZAID_MISMATCH",
                        format!(
                            "thermal record {} ({}) does not cover nuclide {}",
                            id,
                            record.location().table_name(),
                            nuclide.zaid()
                        ),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Multi-line summary of the catalog.
    pub fn describe(&self) -> String {
        self.to_string()
    }

    fn stub_nuclide(&mut self, zaid: Zaid, table: &str) -> DatabaseResult<&mut NuclideProperties> {
        self.nuclide_properties
            .get_mut(&zaid)
            .ok_or_else(|| missing_nuclide(zaid, table))
    }

    fn stub_atom(&mut self, zaid: Zaid, table: &str) -> DatabaseResult<&mut AtomProperties> {
        self.atom_properties
            .get_mut(&zaid.atom())
            .ok_or_else(|| {
                XsdirError::consistency(
                    "DB.MISSING_ATOM",
                    format!(
                        "table {} refers to atom {} which has no atomic weight ratio entry",
                        table,
                        zaid.atom()
                    ),
                )
            })
    }
}

fn missing_nuclide(zaid: Zaid, table: &str) -> XsdirError {
    XsdirError::consistency(
        "DB.MISSING_NUCLIDE",
        format!(
            "table {} refers to nuclide {} which has no atomic weight ratio entry",
            table, zaid
        ),
    )
}

fn unknown_atom(zaid: Zaid) -> XsdirError {
    XsdirError::invalid_request(
        "DB.UNKNOWN_ATOM",
        format!("no atom properties for zaid {}", zaid.atom()),
    )
}

fn unknown_nuclide(zaid: Zaid) -> XsdirError {
    XsdirError::invalid_request(
        "DB.UNKNOWN_NUCLIDE",
        format!("no nuclide properties for zaid {}", zaid),
    )
}

impl Display for ScatteringCenterPropertiesDatabase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} atoms, {} nuclides, {} thermal tables",
            self.atom_properties.len(),
            self.nuclide_properties.len(),
            self.thermal_nuclear_data_properties.len()
        )?;
        for atom in self.atom_properties.values() {
            write!(f, "{}", atom)?;
        }
        for nuclide in self.nuclide_properties.values() {
            write!(f, "{}", nuclide)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ScatteringCenterPropertiesDatabase;
    use crate::domain::{FileType, TableName, XsdirErrorCategory, Zaid};
    use crate::properties::ThermalPropertiesId;
    use crate::properties::records::{
        AceTableLocation, AtomicDataProperties, NuclearDataProperties,
        ThermalNuclearDataProperties,
    };
    use std::collections::BTreeSet;

    fn location(name: &str) -> AceTableLocation {
        AceTableLocation::new(
            TableName::parse(name).expect("name should parse"),
            "data/table",
            1,
            100,
        )
        .expect("location should be valid")
    }

    fn thermal(name: &str, zaids: &[u32], evaluation_temp_in_mev: f64) -> ThermalNuclearDataProperties {
        ThermalNuclearDataProperties::new(
            location(name),
            zaids.iter().copied().map(Zaid::new).collect(),
            evaluation_temp_in_mev,
        )
        .expect("thermal record should be built")
    }

    #[test]
    fn stub_initialization_is_idempotent() {
        let mut database = ScatteringCenterPropertiesDatabase::new();
        database.initialize_atom_properties(Zaid::new(1001), 0.999167);
        database.initialize_atom_properties(Zaid::new(1002), 1.9968);
        database.initialize_nuclide_properties(Zaid::new(1001), 0.999167);
        database.initialize_nuclide_properties(Zaid::new(1001), 0.999167);

        assert!(database.do_atom_properties_exist(Zaid::new(1003)));
        assert!(database.do_nuclide_properties_exist(Zaid::new(1001)));
        assert!(!database.do_nuclide_properties_exist(Zaid::new(1002)));
        assert_eq!(database.atom_zaids(), BTreeSet::from([Zaid::new(1000)]));
        let atom = database
            .atom_properties(Zaid::new(1000))
            .expect("atom should exist");
        assert_eq!(atom.atomic_weight_ratio(), 0.999167);
    }

    #[test]
    fn element_pair_sets_atom_ratio_regardless_of_order() {
        let mut element_first = ScatteringCenterPropertiesDatabase::new();
        element_first.initialize_atom_properties(Zaid::new(1000), 0.99931697);
        element_first.initialize_atom_properties(Zaid::new(1001), 0.99916733);

        let mut isotope_first = ScatteringCenterPropertiesDatabase::new();
        isotope_first.initialize_atom_properties(Zaid::new(1001), 0.99916733);
        isotope_first.initialize_atom_properties(Zaid::new(1000), 0.99931697);
        isotope_first.initialize_atom_properties(Zaid::new(1002), 1.9968);

        for database in [&element_first, &isotope_first] {
            let atom = database
                .atom_properties(Zaid::new(1000))
                .expect("atom should exist");
            assert_eq!(atom.atomic_weight_ratio(), 0.99931697);
        }
    }

    #[test]
    fn records_without_stub_are_consistency_errors() {
        let mut database = ScatteringCenterPropertiesDatabase::new();
        let nuclear = NuclearDataProperties::new(location("1001.80c"), 0.999167, 2.5301e-8)
            .expect("record should be built");
        let error = database
            .add_nuclear_data_properties(nuclear)
            .expect_err("missing nuclide should fail");
        assert_eq!(error.category(), XsdirErrorCategory::ConsistencyError);
        assert_eq!(error.placeholder(), "DB.MISSING_NUCLIDE");
        assert!(error.message().contains("1001"));

        let photoatomic = AtomicDataProperties::new(location("1000.12p"), 0.999242)
            .expect("record should be built");
        let error = database
            .add_photoatomic_data_properties(photoatomic)
            .expect_err("missing atom should fail");
        assert_eq!(error.placeholder(), "DB.MISSING_ATOM");
    }

    #[test]
    fn thermal_records_are_shared_through_the_registry() {
        let mut database = ScatteringCenterPropertiesDatabase::new();
        database.initialize_nuclide_properties(Zaid::new(6000), 11.8969);
        database.initialize_nuclide_properties(Zaid::new(6012), 11.8969);

        let id = database
            .add_thermal_nuclear_data_properties(thermal("grph.20t", &[6000, 6012], 2.53e-8))
            .expect("thermal record should attach");
        assert_eq!(id, ThermalPropertiesId::new(0));
        assert_eq!(database.thermal_nuclear_data_records().len(), 1);

        for zaid in [6000, 6012] {
            let record = database
                .thermal_nuclear_data_properties(
                    Zaid::new(zaid),
                    "grph.t",
                    FileType::Alternate,
                    2,
                    2.53e-8,
                    true,
                )
                .expect("shared record should resolve");
            assert_eq!(record.location().table_name().name(), "grph.20t");
        }
        database.validate().expect("registry should be consistent");
    }

    #[test]
    fn thermal_record_is_not_stored_when_a_nuclide_is_missing() {
        let mut database = ScatteringCenterPropertiesDatabase::new();
        database.initialize_nuclide_properties(Zaid::new(1001), 0.999167);

        let error = database
            .add_thermal_nuclear_data_properties(thermal("hwtr.10t", &[1001, 1002], 2.53e-8))
            .expect_err("missing nuclide should fail");
        assert_eq!(error.placeholder(), "DB.MISSING_NUCLIDE");
        assert!(database.thermal_nuclear_data_records().is_empty());
        assert!(
            !database
                .nuclide_properties(Zaid::new(1001))
                .expect("nuclide should exist")
                .has_thermal_nuclear_data("hwtr.t")
        );
    }

    #[test]
    fn cleanup_removes_empty_entries() {
        let mut database = ScatteringCenterPropertiesDatabase::new();
        database.initialize_atom_properties(Zaid::new(1001), 0.999167);
        database.initialize_nuclide_properties(Zaid::new(1001), 0.999167);
        database.initialize_atom_properties(Zaid::new(2004), 3.968);
        database.initialize_nuclide_properties(Zaid::new(2004), 3.968);
        database
            .add_nuclear_data_properties(
                NuclearDataProperties::new(location("1001.80c"), 0.999167, 2.5301e-8)
                    .expect("record should be built"),
            )
            .expect("record should attach");

        database.remove_empty_properties();

        assert_eq!(database.nuclide_zaids(), BTreeSet::from([Zaid::new(1001)]));
        assert!(database.atom_zaids().is_empty());
        let error = database
            .atom_properties(Zaid::new(2000))
            .expect_err("removed atom should be gone");
        assert_eq!(error.category(), XsdirErrorCategory::InvalidRequestError);
        assert!(database.describe().contains("1001.80c"));
    }
}
