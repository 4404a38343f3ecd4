//! Config lookup and the `--today` flag.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use benchcat_recon::CatalogConfig;

use crate::exit_codes::EXIT_CONFIG;
use crate::CliError;

pub const CONFIG_FILE: &str = "catalog.toml";

/// Lookup order: `--config`, then `./catalog.toml`, then the user config dir.
fn candidates(flag: Option<&Path>) -> Vec<PathBuf> {
    if let Some(path) = flag {
        return vec![path.to_path_buf()];
    }
    let mut paths = vec![PathBuf::from(CONFIG_FILE)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("benchcat").join(CONFIG_FILE));
    }
    paths
}

/// Find, read and validate the catalog config. Every failure is fatal.
pub fn load(flag: Option<&Path>) -> Result<(PathBuf, CatalogConfig), CliError> {
    let paths = candidates(flag);
    let Some(path) = paths.iter().find(|p| p.is_file()) else {
        let tried: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
        return Err(CliError {
            code: EXIT_CONFIG,
            message: format!("catalog config not found (tried {})", tried.join(", ")),
            hint: Some("pass --config FILE or run from the repository root".into()),
        });
    };

    let text = fs::read_to_string(path).map_err(|e| CliError {
        code: EXIT_CONFIG,
        message: format!("{}: {}", path.display(), e),
        hint: None,
    })?;

    let config = CatalogConfig::from_toml(&text).map_err(|e| {
        let mut err = CliError::from_recon(e);
        err.message = format!("{}: {}", path.display(), err.message);
        err
    })?;

    Ok((path.clone(), config))
}

pub fn parse_today(flag: Option<&str>) -> Result<NaiveDate, CliError> {
    match flag {
        None => Ok(chrono::Local::now().date_naive()),
        Some(text) => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").map_err(|_| {
            CliError::args(format!("invalid --today '{}'", text))
                .with_hint("expected YYYY-MM-DD, e.g. --today 2026-01-05")
        }),
    }
}
