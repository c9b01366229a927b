//! Scattering-center property records and the two-level catalog that owns
//! them.

mod atom;
mod database;
mod grid;
mod index;
mod nuclide;
mod records;

pub use atom::AtomProperties;
pub use database::ScatteringCenterPropertiesDatabase;
pub use grid::{DUPLICATE_TEMPERATURE, TemperatureGrid};
pub use index::{TemperatureIndex, VersionIndex};
pub use nuclide::NuclideProperties;
pub use records::{
    AceTableLocation, AtomicDataProperties, ElectroatomicDataProperties, NuclearDataProperties,
    PhotoatomicDataProperties, PhotonuclearDataProperties, ThermalNuclearDataProperties,
};

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Index of a thermal record in the database registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThermalPropertiesId(usize);

impl ThermalPropertiesId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl Display for ThermalPropertiesId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
