//! Reading MCNP-style `xsdir` cross section directories.
//!
//! An [`Xsdir`] either exports its tables into a
//! [`ScatteringCenterPropertiesDatabase`] or echoes selected directory lines
//! verbatim to a writer.

mod factory;
pub mod parser;
pub mod scanner;

use crate::ace::{AceTextHeaderReader, ThermalZaidResolver};
use crate::common::constants::{EVALUATION_TEMP_RELATIVE_TOLERANCE, relative_error_equal};
use crate::domain::{TableName, XsdirError, XsdirResult, Zaid};
use crate::properties::ScatteringCenterPropertiesDatabase;
use factory::PropertiesFactory;
use globset::{Glob, GlobMatcher};
use parser::{
    construct_complete_table_file_path, extract_evaluation_temperature, extract_file_start_line,
    extract_path, extract_table_name_components, is_table_human_readable_quick,
};
use scanner::{EntryFilter, LineFilter, scan};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct Xsdir {
    xsdir_path: PathBuf,
    verbose: bool,
    thermal_resolver: Box<dyn ThermalZaidResolver>,
}

impl std::fmt::Debug for Xsdir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Xsdir")
            .field("xsdir_path", &self.xsdir_path)
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

impl Xsdir {
    pub fn new(xsdir_path: impl Into<PathBuf>, verbose: bool) -> XsdirResult<Self> {
        let xsdir_path = xsdir_path.into();
        if !xsdir_path.is_file() {
            return Err(XsdirError::io_system(
                "IO.XSDIR_OPEN",
                format!("xsdir file '{}' does not exist", xsdir_path.display()),
            ));
        }
        Ok(Self {
            xsdir_path,
            verbose,
            thermal_resolver: Box::new(AceTextHeaderReader),
        })
    }

    /// Replaces the reader used to discover which ZAIDs a thermal table
    /// covers.
    pub fn with_thermal_resolver(mut self, resolver: impl ThermalZaidResolver + 'static) -> Self {
        self.thermal_resolver = Box::new(resolver);
        self
    }

    pub fn xsdir_path(&self) -> &Path {
        &self.xsdir_path
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Populates `database` with every supported text table in the
    /// directory. Entries that never receive a table are removed afterwards.
    pub fn export_data(&self, database: &mut ScatteringCenterPropertiesDatabase) -> XsdirResult<()> {
        PropertiesFactory::new(&self.xsdir_path, self.thermal_resolver.as_ref(), self.verbose)
            .export(database)
    }

    pub fn show_entries_with_table_data<W>(&self, os: &mut W, human_readable_only: bool) -> XsdirResult<()>
    where
        W: Write + ?Sized,
    {
        self.show(os, &EntryFilter::table_entries(human_readable_only))
    }

    pub fn show_entries_with_table_type_key<W>(
        &self,
        os: &mut W,
        type_key: char,
        human_readable_only: bool,
    ) -> XsdirResult<()>
    where
        W: Write + ?Sized,
    {
        let filter = EntryFilter::table_entries(human_readable_only).with(
            move |entry_tokens: &[&str]| -> XsdirResult<bool> {
                Ok(table_name_of(entry_tokens).is_some_and(|name| name.type_key() == type_key))
            },
        );
        self.show(os, &filter)
    }

    /// Two-digit versions are compared by major version, so `8` selects
    /// `80c` through `89c`; other versions must match exactly.
    pub fn show_entries_with_table_type_key_and_version<W>(
        &self,
        os: &mut W,
        version: u32,
        type_key: char,
        human_readable_only: bool,
    ) -> XsdirResult<()>
    where
        W: Write + ?Sized,
    {
        let filter = EntryFilter::table_entries(human_readable_only).with(
            move |entry_tokens: &[&str]| -> XsdirResult<bool> {
                Ok(table_name_of(entry_tokens).is_some_and(|name| {
                    name.type_key() == type_key && version_matches(&name, version)
                }))
            },
        );
        self.show(os, &filter)
    }

    pub fn show_entries_with_basic_table_name<W>(
        &self,
        os: &mut W,
        basic_table_name: &str,
        human_readable_only: bool,
    ) -> XsdirResult<()>
    where
        W: Write + ?Sized,
    {
        let filter = EntryFilter::table_entries(human_readable_only).with(
            |entry_tokens: &[&str]| -> XsdirResult<bool> {
                Ok(table_name_of(entry_tokens)
                    .is_some_and(|name| name.basic_name() == basic_table_name))
            },
        );
        self.show(os, &filter)
    }

    /// Thermal tables are matched through the ZAIDs listed in their header.
    pub fn show_entries_with_zaid<W>(
        &self,
        os: &mut W,
        zaid: Zaid,
        human_readable_only: bool,
    ) -> XsdirResult<()>
    where
        W: Write + ?Sized,
    {
        self.show_entries_with_zaid_filter(os, ZaidFilter::new(zaid), human_readable_only)
    }

    pub fn show_entries_with_zaid_and_table_type_key<W>(
        &self,
        os: &mut W,
        zaid: Zaid,
        type_key: char,
        human_readable_only: bool,
    ) -> XsdirResult<()>
    where
        W: Write + ?Sized,
    {
        let zaid_filter = ZaidFilter {
            type_key: Some(type_key),
            ..ZaidFilter::new(zaid)
        };
        self.show_entries_with_zaid_filter(os, zaid_filter, human_readable_only)
    }

    pub fn show_entries_with_zaid_and_table_evaluation_temp<W>(
        &self,
        os: &mut W,
        zaid: Zaid,
        evaluation_temp_in_mev: f64,
        human_readable_only: bool,
    ) -> XsdirResult<()>
    where
        W: Write + ?Sized,
    {
        let zaid_filter = ZaidFilter {
            evaluation_temp_in_mev: Some(evaluation_temp_in_mev),
            ..ZaidFilter::new(zaid)
        };
        self.show_entries_with_zaid_filter(os, zaid_filter, human_readable_only)
    }

    /// Matches whole table names against a shell-style pattern such as
    /// `"92*.8?c"`.
    pub fn show_entries_with_table_name_glob<W>(
        &self,
        os: &mut W,
        pattern: &str,
        human_readable_only: bool,
    ) -> XsdirResult<()>
    where
        W: Write + ?Sized,
    {
        let matcher = compile_table_name_glob(pattern)?;
        let filter = EntryFilter::table_entries(human_readable_only).with(
            move |entry_tokens: &[&str]| -> XsdirResult<bool> {
                Ok(entry_tokens
                    .first()
                    .is_some_and(|name| matcher.is_match(name)))
            },
        );
        self.show(os, &filter)
    }

    fn show_entries_with_zaid_filter<W>(
        &self,
        os: &mut W,
        zaid_filter: ZaidFilter,
        human_readable_only: bool,
    ) -> XsdirResult<()>
    where
        W: Write + ?Sized,
    {
        let filter = EntryFilter::table_entries(human_readable_only).with(
            |entry_tokens: &[&str]| -> XsdirResult<bool> { self.matches_zaid(&zaid_filter, entry_tokens) },
        );
        self.show(os, &filter)
    }

    fn matches_zaid(&self, zaid_filter: &ZaidFilter, entry_tokens: &[&str]) -> XsdirResult<bool> {
        let Some(table_name) = table_name_of(entry_tokens) else {
            return Ok(false);
        };
        if zaid_filter
            .type_key
            .is_some_and(|type_key| table_name.type_key() != type_key)
        {
            return Ok(false);
        }
        if let Some(evaluation_temp_in_mev) = zaid_filter.evaluation_temp_in_mev {
            let Ok(table_temp_in_mev) = extract_evaluation_temperature(entry_tokens) else {
                return Ok(false);
            };
            if !relative_error_equal(
                table_temp_in_mev,
                evaluation_temp_in_mev,
                EVALUATION_TEMP_RELATIVE_TOLERANCE,
            ) {
                return Ok(false);
            }
        }

        if table_name.type_key() != 't' {
            return Ok(table_name.zaid() == Some(zaid_filter.zaid));
        }

        if !is_table_human_readable_quick(entry_tokens) {
            debug!(table = %table_name, "binary thermal table header is not read");
            return Ok(false);
        }
        let relative_path = extract_path(entry_tokens)?;
        let file_start_line = extract_file_start_line(entry_tokens)?;
        let complete_path = construct_complete_table_file_path(&self.xsdir_path, &relative_path);
        let zaids = self
            .thermal_resolver
            .resolve(&complete_path, table_name.name(), file_start_line)?;
        Ok(zaids.contains(&zaid_filter.zaid))
    }

    fn show<W, F>(&self, os: &mut W, filter: &F) -> XsdirResult<()>
    where
        W: Write + ?Sized,
        F: LineFilter + ?Sized,
    {
        let mut processor = |_: &[&str], line: &[u8]| -> XsdirResult<()> {
            os.write_all(line)
                .and_then(|()| os.write_all(b"\n"))
                .map_err(|source| {
                    XsdirError::io_system(
                        "IO.OUTPUT_WRITE",
                        format!("failed to write xsdir entry: {}", source),
                    )
                })
        };
        scan(&self.xsdir_path, filter, &mut processor)
    }
}

/// Optional refinements of a ZAID query.
#[derive(Debug, Clone, Copy)]
struct ZaidFilter {
    zaid: Zaid,
    type_key: Option<char>,
    evaluation_temp_in_mev: Option<f64>,
}

impl ZaidFilter {
    fn new(zaid: Zaid) -> Self {
        Self {
            zaid,
            type_key: None,
            evaluation_temp_in_mev: None,
        }
    }
}

fn table_name_of(entry_tokens: &[&str]) -> Option<TableName> {
    extract_table_name_components(entry_tokens).ok()
}

fn version_matches(table_name: &TableName, version: u32) -> bool {
    table_name.version() == version
        || (table_name.version() >= 10 && table_name.major_version() == version)
}

pub fn compile_table_name_glob(pattern: &str) -> XsdirResult<GlobMatcher> {
    Glob::new(pattern)
        .map(|glob| glob.compile_matcher())
        .map_err(|error| {
            XsdirError::input_validation(
                "INPUT.TABLE_NAME_GLOB",
                format!("invalid table name pattern '{}': {}", pattern, error),
            )
        })
}
