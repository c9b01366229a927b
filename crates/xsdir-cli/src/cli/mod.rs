mod commands;
mod helpers;

use clap::Parser;
use xsdir_core::domain::XsdirError;

pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match run(args) {
        Ok(code) => code,
        Err(error) => {
            let xsdir_error = error.as_xsdir_error();
            eprintln!("{}", xsdir_error.diagnostic_line());
            eprintln!("{}", xsdir_error.fatal_exit_line());
            xsdir_error.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("xsdir-rs".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => {
            helpers::init_tracing(cli.verbose);
            dispatch_parsed(cli.command, cli.verbose)
        }
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(
    name = "xsdir-rs",
    about = "Nuclear data directory (xsdir) reader and scattering-center database builder"
)]
struct Cli {
    /// Log skipped entries and progress to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Build a scattering-center database from an xsdir file and save it as JSON
    Export(commands::ExportArgs),
    /// Print xsdir table entries that match a query
    Show(commands::ShowArgs),
    /// Print the properties stored in a saved database
    Inspect(commands::InspectArgs),
}

fn dispatch_parsed(command: CliCommand, verbose: bool) -> Result<i32, CliError> {
    match command {
        CliCommand::Export(args) => commands::run_export_command(args, verbose),
        CliCommand::Show(args) => commands::run_show_command(args, verbose),
        CliCommand::Inspect(args) => commands::run_inspect_command(args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Compute(XsdirError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<XsdirError> for CliError {
    fn from(error: XsdirError) -> Self {
        Self::Compute(error)
    }
}

impl CliError {
    fn as_xsdir_error(&self) -> XsdirError {
        match self {
            Self::Usage(message) => {
                XsdirError::input_validation("INPUT.CLI_USAGE", message.trim_end().to_string())
            }
            Self::Compute(error) => error.clone(),
            Self::Internal(error) => XsdirError::io_system("IO.CLI", format!("{error:#}")),
        }
    }
}
