//! Ingestion of MCNP-style `xsdir` cross section directories into a catalog
//! of scattering-center properties.

pub mod ace;
pub mod common;
pub mod domain;
pub mod properties;
pub mod serialization;
pub mod xsdir;

pub use domain::{FileType, TableKind, TableName, XsdirError, XsdirErrorCategory, XsdirResult, Zaid};
pub use properties::ScatteringCenterPropertiesDatabase;
pub use xsdir::Xsdir;
