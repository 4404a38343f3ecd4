// benchcat - keeps the benchmark catalog content tree in sync with providers

mod catalog;
mod exit_codes;
mod fetch;
mod logger;
mod sync;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use benchcat_io::FsCatalog;
use benchcat_recon::{apply_ref_corrections, CatalogConfig, ReconError};

use exit_codes::{recon_exit_code, EXIT_INPUT, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "benchcat")]
#[command(about = "Reconcile AI benchmark scores into the catalog content tree")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Content root holding benchmarks/, models/ and publishers/
    #[arg(long, global = true, default_value = "src/content")]
    content: PathBuf,

    /// Catalog config (default: ./catalog.toml, then <config dir>/benchcat/catalog.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Sync date written to changed records, YYYY-MM-DD (default: local today)
    #[arg(long, global = true)]
    today: Option<String>,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// More output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pull scores from a provider and merge them into the catalog
    Sync {
        #[command(subcommand)]
        command: sync::SyncCommands,
    },

    /// Rewrite stored snapshot model refs using [aliases.refs]
    #[command(after_help = "\
Examples:
  benchcat migrate-refs
  benchcat migrate-refs --content site/src/content --json")]
    MigrateRefs {
        /// Print {"rewritten": N} on stdout
        #[arg(long)]
        json: bool,
    },

    /// Load and validate the catalog config, then exit
    #[command(after_help = "\
Examples:
  benchcat validate
  benchcat validate --config ./catalog.toml")]
    Validate,
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("BENCHCAT_COMMIT"), ")",
            "\nengine:  benchcat-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
            "\ntarget:  ", env!("BENCHCAT_TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("BENCHCAT_COMMIT"), ")",
            "\nengine:  benchcat-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
            "\ntarget:  ", env!("BENCHCAT_TARGET"),
        )
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(logger::level_for(cli.quiet, cli.verbose));

    match run(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let (config_path, config) = catalog::load(cli.config.as_deref())?;
    log::debug!("config: {}", config_path.display());

    match cli.command {
        Commands::Validate => cmd_validate(&config_path, &config),
        Commands::MigrateRefs { json } => cmd_migrate_refs(&cli.content, &config, json),
        Commands::Sync { command } => {
            let today = catalog::parse_today(cli.today.as_deref())?;
            let store = open_content(&cli.content)?;
            sync::run(command, &config, store, today)
        }
    }
}

fn open_content(root: &Path) -> Result<FsCatalog, CliError> {
    if !root.is_dir() {
        return Err(CliError::input(format!(
            "content directory not found: {}",
            root.display()
        ))
        .with_hint("run from the site root or pass --content DIR"));
    }
    Ok(FsCatalog::open(root))
}

fn cmd_validate(path: &Path, config: &CatalogConfig) -> Result<(), CliError> {
    println!("{}: ok", path.display());
    println!("  benchmarks:          {}", config.benchmarks.len());
    println!("  skipped ids:         {}", config.skip.len());
    println!("  publisher aliases:   {}", config.aliases.publishers.len());
    println!("  model aliases:       {}", config.aliases.models.len());
    println!("  ref corrections:     {}", config.aliases.refs.len());
    println!("  publisher styles:    {}", config.publishers.len());
    Ok(())
}

fn cmd_migrate_refs(content: &Path, config: &CatalogConfig, json: bool) -> Result<(), CliError> {
    let mut store = open_content(content)?;
    let rewritten = apply_ref_corrections(&mut store, config).map_err(CliError::from_recon)?;

    if json {
        println!("{}", serde_json::json!({ "rewritten": rewritten }));
    } else {
        log::info!("rewrote {} benchmark record(s)", rewritten);
    }
    Ok(())
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn input(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INPUT, message: msg.into(), hint: None }
    }

    /// Engine error with its registered exit code.
    pub fn from_recon(err: ReconError) -> Self {
        let hint = match &err {
            ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => {
                Some("fix catalog.toml and re-run `benchcat validate`".to_string())
            }
            _ => None,
        };
        Self { code: recon_exit_code(&err), message: err.to_string(), hint }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
