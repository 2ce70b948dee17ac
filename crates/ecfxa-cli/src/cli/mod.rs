mod commands;
mod report;

use clap::Parser;
use ecfxa_core::domain::EcfError;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "ECFXA_LOG";

pub fn run_from_env() -> i32 {
    init_logging();

    match run(std::env::args().skip(1)) {
        Ok(code) => code,
        Err(error) => {
            let diagnostic = error.as_ecf_error();
            eprintln!("{}", diagnostic.diagnostic_line());
            eprintln!("{}", diagnostic.fatal_exit_line());
            diagnostic.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("ecfxa".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();

    match Cli::try_parse_from(&full_args) {
        Ok(cli) => dispatch_parsed(cli.command),
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Parser)]
#[command(
    name = "ecfxa",
    version,
    about = "Energy conversion factors for X-ray missions"
)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Estimate an ECF for eROSITA
    Erosita(commands::ErositaArgs),
    /// Estimate an ECF for Swift/XRT
    Swift(commands::SwiftArgs),
    /// Estimate an ECF for an XMM-Newton EPIC camera
    Xmm(commands::XmmArgs),
    /// List the energy bands of a mission
    Bands {
        /// erosita, swift or xmm
        mission: String,
    },
    /// List the calibration epochs of a mission
    Epochs {
        /// erosita, swift or xmm
        mission: String,
    },
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Erosita(args) => commands::run_erosita_command(args),
        CliCommand::Swift(args) => commands::run_swift_command(args),
        CliCommand::Xmm(args) => commands::run_xmm_command(args),
        CliCommand::Bands { mission } => commands::run_bands_command(&mission),
        CliCommand::Epochs { mission } => commands::run_epochs_command(&mission),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Compute(EcfError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<EcfError> for CliError {
    fn from(error: EcfError) -> Self {
        Self::Compute(error)
    }
}

impl CliError {
    fn as_ecf_error(&self) -> EcfError {
        match self {
            Self::Usage(message) => EcfError::configuration("CONFIG.CLI_USAGE", message.clone()),
            Self::Compute(error) => error.clone(),
            Self::Internal(error) => EcfError::internal("INTERNAL.CLI", format!("{error:#}")),
        }
    }
}
