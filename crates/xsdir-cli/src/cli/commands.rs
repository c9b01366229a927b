use super::CliError;
use super::helpers::{ensure_parent_directory, flush_stdout};
use anyhow::Context;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use xsdir_core::domain::{XsdirError, Zaid};
use xsdir_core::properties::ScatteringCenterPropertiesDatabase;
use xsdir_core::serialization::{load_database, save_database};
use xsdir_core::xsdir::Xsdir;

#[derive(clap::Args)]
pub(super) struct ExportArgs {
    /// Path to the xsdir file
    #[arg(value_name = "XSDIR")]
    xsdir: PathBuf,

    /// JSON database output path
    #[arg(long, short, default_value = "scattering_center_database.json")]
    output: PathBuf,
}

#[derive(clap::Args)]
pub(super) struct ShowArgs {
    /// Path to the xsdir file
    #[arg(value_name = "XSDIR")]
    xsdir: PathBuf,

    /// Table type key (c, t, u, p, e, ...)
    #[arg(long)]
    key: Option<char>,

    /// Table version; two-digit versions match by major version
    #[arg(long, requires = "key", conflicts_with = "zaid")]
    version: Option<u32>,

    /// Isotope or element ZAID
    #[arg(long)]
    zaid: Option<Zaid>,

    /// Basic table name, e.g. 1001 or lwtr
    #[arg(long, conflicts_with_all = ["key", "zaid"])]
    basic_name: Option<String>,

    /// Evaluation temperature in MeV; requires --zaid
    #[arg(long, requires = "zaid", conflicts_with = "key")]
    temp: Option<f64>,

    /// Table name glob, e.g. "92*.8?c"
    #[arg(long, conflicts_with_all = ["key", "zaid", "basic_name"])]
    name_glob: Option<String>,

    /// Also list binary (non text) tables
    #[arg(long)]
    include_binary: bool,
}

#[derive(clap::Args)]
pub(super) struct InspectArgs {
    /// Path to a database written by `export`
    #[arg(value_name = "DATABASE")]
    database: PathBuf,

    /// Print the atom and nuclide properties for this ZAID only
    #[arg(long)]
    zaid: Option<Zaid>,
}

pub(super) fn run_export_command(args: ExportArgs, verbose: bool) -> Result<i32, CliError> {
    let xsdir = Xsdir::new(&args.xsdir, verbose)?;
    let mut database = ScatteringCenterPropertiesDatabase::new();
    xsdir.export_data(&mut database)?;

    ensure_parent_directory(&args.output)?;
    save_database(&database, &args.output)?;
    info!(output = %args.output.display(), "saved scattering-center database");

    println!(
        "Exported {} atoms, {} nuclides and {} thermal tables to {}",
        database.atom_zaids().len(),
        database.nuclide_zaids().len(),
        database.thermal_nuclear_data_records().len(),
        args.output.display()
    );
    Ok(0)
}

pub(super) fn run_show_command(args: ShowArgs, verbose: bool) -> Result<i32, CliError> {
    let xsdir = Xsdir::new(&args.xsdir, verbose)?;
    let human_readable_only = !args.include_binary;
    let stdout = std::io::stdout();
    let mut output = stdout.lock();

    match (&args.name_glob, &args.basic_name, args.zaid, args.key) {
        (Some(pattern), _, _, _) => {
            xsdir.show_entries_with_table_name_glob(&mut output, pattern, human_readable_only)?
        }
        (None, Some(basic_name), _, _) => xsdir.show_entries_with_basic_table_name(
            &mut output,
            basic_name,
            human_readable_only,
        )?,
        (None, None, Some(zaid), Some(key)) => xsdir.show_entries_with_zaid_and_table_type_key(
            &mut output,
            zaid,
            key,
            human_readable_only,
        )?,
        (None, None, Some(zaid), None) => match args.temp {
            Some(evaluation_temp_in_mev) => xsdir.show_entries_with_zaid_and_table_evaluation_temp(
                &mut output,
                zaid,
                evaluation_temp_in_mev,
                human_readable_only,
            )?,
            None => xsdir.show_entries_with_zaid(&mut output, zaid, human_readable_only)?,
        },
        (None, None, None, Some(key)) => match args.version {
            Some(version) => xsdir.show_entries_with_table_type_key_and_version(
                &mut output,
                version,
                key,
                human_readable_only,
            )?,
            None => xsdir.show_entries_with_table_type_key(&mut output, key, human_readable_only)?,
        },
        (None, None, None, None) => {
            xsdir.show_entries_with_table_data(&mut output, human_readable_only)?
        }
    }

    flush_stdout(&mut output)?;
    Ok(0)
}

pub(super) fn run_inspect_command(args: InspectArgs) -> Result<i32, CliError> {
    let database = load_database(&args.database)?;
    let stdout = std::io::stdout();
    let mut output = stdout.lock();

    let Some(zaid) = args.zaid else {
        write!(output, "{}", database.describe()).context("failed to write database summary")?;
        flush_stdout(&mut output)?;
        return Ok(0);
    };

    let atom = database.atom_properties(zaid).ok();
    let nuclide = database.nuclide_properties(zaid).ok();
    if atom.is_none() && nuclide.is_none() {
        return Err(CliError::Compute(XsdirError::invalid_request(
            "DB.UNKNOWN_ZAID",
            format!(
                "database '{}' has no properties for zaid {}",
                args.database.display(),
                zaid
            ),
        )));
    }

    if let Some(atom) = atom {
        write!(output, "{}", atom).context("failed to write atom properties")?;
    }
    if let Some(nuclide) = nuclide {
        write!(output, "{}", nuclide).context("failed to write nuclide properties")?;
        for name in nuclide.thermal_nuclear_data_names() {
            for file_type in nuclide.thermal_nuclear_data_file_types(&name) {
                for major_version in nuclide.thermal_nuclear_data_file_versions(&name, file_type) {
                    for temp in nuclide.thermal_nuclear_data_evaluation_temps_in_mev(
                        &name,
                        file_type,
                        major_version,
                    )? {
                        let record = database.thermal_nuclear_data_properties(
                            zaid,
                            &name,
                            file_type,
                            major_version,
                            temp,
                            true,
                        )?;
                        writeln!(
                            output,
                            "    {} T={:.1}K zaids={}",
                            record.location(),
                            record.evaluation_temp_in_kelvin(),
                            record
                                .zaids()
                                .iter()
                                .map(ToString::to_string)
                                .collect::<Vec<_>>()
                                .join(",")
                        )
                        .context("failed to write thermal properties")?;
                    }
                }
            }
        }
    }
    flush_stdout(&mut output)?;
    Ok(0)
}
