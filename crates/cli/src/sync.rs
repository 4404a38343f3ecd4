//! `benchcat sync`: run one provider pass against the content tree.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Subcommand;

use benchcat_io::csv::read_leaderboard;
use benchcat_io::json::read_json;
use benchcat_io::FsCatalog;
use benchcat_recon::model::ExtractedBenchmark;
use benchcat_recon::{
    sync_aggregator, sync_extracted, sync_leaderboard, CatalogConfig, ReconError, SyncContext,
    SyncReport,
};

use crate::exit_codes::{EXIT_ERROR, EXIT_INPUT, EXIT_PARTIAL};
use crate::fetch::artificial_analysis::{self, AaClient};
use crate::CliError;

pub const AA_PROVIDER: &str = "artificial-analysis";

#[derive(Subcommand)]
pub enum SyncCommands {
    /// Sync every AA-sourced benchmark from the Artificial Analysis API
    #[command(after_help = "\
Examples:
  benchcat sync aa
  benchcat sync aa --api-key aa_...
  ARTIFICIAL_ANALYSIS_API_KEY=aa_... benchcat sync aa --json
  benchcat sync aa --input models.json --today 2026-01-05")]
    Aa {
        /// Artificial Analysis key (default: ARTIFICIAL_ANALYSIS_API_KEY env)
        #[arg(long)]
        api_key: Option<String>,

        /// Read a saved {"data": [..]} payload instead of calling the API
        #[arg(long)]
        input: Option<PathBuf>,

        /// Print the sync report as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Sync one benchmark from a scraped leaderboard CSV
    #[command(after_help = "\
Columns: model, score, and optionally publisher (any order, any case).
A trailing % on scores is accepted; unparseable scores are skipped.

Examples:
  benchcat sync leaderboard swe_bash_only --rows swebench.csv
  benchcat sync leaderboard tau_bench --rows tau.tsv --json")]
    Leaderboard {
        /// Benchmark id from catalog.toml
        benchmark: String,

        /// CSV/TSV file with one row per model
        #[arg(long)]
        rows: PathBuf,

        /// Print the sync report as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Sync one benchmark from an LLM-extracted JSON description
    #[command(after_help = "\
Examples:
  benchcat sync extracted --input extracted.json
  benchcat sync extracted --input extracted.json --id livebench")]
    Extracted {
        /// Extracted benchmark JSON (name, publisher, metrics, snapshot, ...)
        #[arg(long)]
        input: PathBuf,

        /// Benchmark id (default: slug of the extracted name)
        #[arg(long)]
        id: Option<String>,

        /// Print the sync report as JSON on stdout
        #[arg(long)]
        json: bool,
    },
}

pub fn run(
    command: SyncCommands,
    config: &CatalogConfig,
    mut store: FsCatalog,
    today: NaiveDate,
) -> Result<(), CliError> {
    let ctx = SyncContext::new(config, today);

    let (report, json) = match command {
        SyncCommands::Aa { api_key, input, json } => {
            let models = match input {
                Some(path) => {
                    let body: serde_json::Value =
                        read_json(&path).map_err(CliError::from_recon)?;
                    artificial_analysis::parse_payload(&body).map_err(|mut e| {
                        e.code = EXIT_INPUT;
                        e.message = format!("{}: {}", path.display(), e.message);
                        e
                    })?
                }
                None => {
                    let key = artificial_analysis::resolve_api_key(api_key)?;
                    AaClient::new(key)?.fetch_models()?
                }
            };
            (sync_aggregator(&ctx, &mut store, AA_PROVIDER, &models), json)
        }
        SyncCommands::Leaderboard { benchmark, rows, json } => {
            if config.benchmark(&benchmark).is_none() {
                return Err(CliError::from_recon(ReconError::UnknownBenchmark(benchmark))
                    .with_hint("add it under [benchmarks] in catalog.toml"));
            }
            let rows = read_leaderboard(&rows).map_err(CliError::from_recon)?;
            (sync_leaderboard(&ctx, &mut store, "leaderboard", &benchmark, &rows), json)
        }
        SyncCommands::Extracted { input, id, json } => {
            let extracted: ExtractedBenchmark = read_json(&input).map_err(CliError::from_recon)?;
            (sync_extracted(&ctx, &mut store, "extracted", id.as_deref(), &extracted), json)
        }
    };

    if json {
        let text = serde_json::to_string_pretty(&report).map_err(|e| CliError {
            code: EXIT_ERROR,
            message: format!("cannot serialize report: {}", e),
            hint: None,
        })?;
        println!("{}", text);
    } else {
        print_report(&report);
    }

    partial_failure(&report)
}

fn print_report(report: &SyncReport) {
    for result in &report.benchmarks {
        match (&result.outcome, &result.detail) {
            (_, Some(detail)) => {
                log::info!("  {:<24} {} ({})", result.id, result.outcome, detail)
            }
            _ => log::info!("  {:<24} {} ({} entries)", result.id, result.outcome, result.entries),
        }
    }
}

/// A pass that wrote what it could but lost some records exits non-zero.
fn partial_failure(report: &SyncReport) -> Result<(), CliError> {
    let failed = report.summary.failed + report.record_errors;
    if failed == 0 {
        return Ok(());
    }
    Err(CliError {
        code: EXIT_PARTIAL,
        message: format!(
            "{} benchmark(s) and {} model/publisher record(s) failed to sync",
            report.summary.failed, report.record_errors
        ),
        hint: Some("re-run with -v for per-record details".into()),
    })
}
