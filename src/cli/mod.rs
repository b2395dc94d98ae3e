use std::fs::File;
use std::io::{self, BufReader, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::MachineService;
use crate::domain::Catalog;
use crate::io::ExportFormat;

pub mod logging;
pub mod session;

pub use session::{Session, SessionCommand, export_journal, print_catalog};

/// Souvenir Machine - vending machine simulator
#[derive(Parser)]
#[command(name = "souvenir-machine")]
#[command(about = "Deposit money, buy random souvenirs by price tier, take your change")]
#[command(version)]
pub struct Cli {
    /// JSON catalog file (built-in assortment if omitted)
    #[arg(short, long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Seed for reproducible souvenir selection
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Log verbosity
    #[arg(long, global = true, value_enum, default_value = logging::DEFAULT_LOG_LEVEL)]
    pub log_level: LogLevel,

    /// Log file path (defaults to the user cache directory)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive machine session (default)
    Run {
        /// Export the session journal to this file on exit
        #[arg(long)]
        journal: Option<PathBuf>,

        /// Journal format
        #[arg(short, long, value_enum, default_value_t)]
        format: ExportFormat,
    },

    /// Show the souvenirs on sale
    Catalog {
        /// Print the catalog as JSON (catalog file format)
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        logging::setup_logging(self.log_level.into(), self.log_file.as_deref())?;

        let catalog = match &self.catalog {
            Some(path) => load_catalog(path)?,
            None => Catalog::default(),
        };
        log::debug!("catalog loaded with {} tier(s)", catalog.tier_count());

        match self.command {
            Some(Commands::Catalog { json }) => run_catalog_command(&catalog, json)?,
            Some(Commands::Run { journal, format }) => {
                run_session(catalog, self.seed, journal.as_deref(), format)?
            }
            None => run_session(catalog, self.seed, None, ExportFormat::default())?,
        }

        Ok(())
    }
}

/// Read and validate a JSON catalog file.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let file = File::open(path)
        .with_context(|| format!("Cannot open catalog file {}", path.display()))?;
    let catalog = Catalog::from_json_reader(BufReader::new(file))
        .with_context(|| format!("Invalid catalog file {}", path.display()))?;
    Ok(catalog)
}

fn run_catalog_command(catalog: &Catalog, json: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if json {
        serde_json::to_writer_pretty(&mut out, catalog)?;
        writeln!(out)?;
    } else {
        print_catalog(catalog, &mut out)?;
    }
    Ok(())
}

fn run_session(
    catalog: Catalog,
    seed: Option<u64>,
    journal: Option<&Path>,
    format: ExportFormat,
) -> Result<()> {
    let mut service = match seed {
        Some(seed) => MachineService::with_seed(catalog, seed),
        None => MachineService::new(catalog),
    };

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if interactive {
        writeln!(out, "Souvenir machine. Type 'help' for commands.")?;
        print_catalog(service.catalog(), &mut out)?;
    }

    Session::new(&mut service)
        .with_prompt(interactive)
        .run(stdin.lock(), &mut out)?;

    if let Some(path) = journal {
        let count = export_journal(&service, path, format)
            .with_context(|| format!("Failed to export journal to {}", path.display()))?;
        writeln!(out, "Exported {} operation(s) to {}", count, path.display())?;
    }

    log::info!(
        "session ended with balance {} after {} operation(s)",
        service.balance(),
        service.journal().len()
    );
    Ok(())
}
