// JSON payload input

use std::path::Path;

use serde::de::DeserializeOwned;

use benchcat_recon::error::ReconError;

use crate::csv::read_file_as_utf8;

/// Read and deserialize a JSON payload file (offline provider dumps,
/// extracted benchmarks). Parse failures carry the file path.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ReconError> {
    let text = read_file_as_utf8(path)?;
    serde_json::from_str(&text).map_err(|e| ReconError::Io(format!("{}: {e}", path.display())))
}
