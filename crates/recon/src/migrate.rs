//! One-off rewrite of stored model refs after a naming rule changed.
//!
//! Corrections come from `aliases.refs` (`"zai/glm-4.5" = "zai/glm-4-5"`).
//! A rewritten snapshot is rebuilt so that two refs collapsing into one keep
//! the invariant of one entry per model. `lastUpdated` and `trending` are
//! kept: renaming is not a score change.

use crate::config::CatalogConfig;
use crate::error::ReconError;
use crate::model::{ModelRef, ScoreEntry};
use crate::snapshot;
use crate::store::CatalogStore;

/// Apply ref corrections to every stored benchmark. Returns the number of
/// records rewritten. Corrupt records are logged and left alone.
pub fn apply_ref_corrections<S: CatalogStore>(
    store: &mut S,
    config: &CatalogConfig,
) -> Result<usize, ReconError> {
    let corrections = &config.aliases.refs;
    if corrections.is_empty() {
        return Ok(0);
    }

    let mut rewritten = 0;
    for id in store.benchmark_ids()? {
        let mut record = match store.load_benchmark(&id) {
            Ok(Some(record)) => record,
            Ok(None) => continue,
            Err(e @ ReconError::CorruptRecord { .. }) => {
                log::warn!("{e}; skipping");
                continue;
            }
            Err(e) => return Err(e),
        };

        let mut touched = 0;
        let entries: Vec<ScoreEntry> = record
            .snapshot
            .iter()
            .map(|entry| match corrections.get(entry.model_ref.as_str()) {
                Some(fixed) => {
                    touched += 1;
                    ScoreEntry {
                        model_ref: ModelRef::from_raw(fixed.as_str()),
                        score: entry.score,
                    }
                }
                None => entry.clone(),
            })
            .collect();
        if touched == 0 {
            continue;
        }

        let rebuilt = snapshot::build(entries, record.metrics.is_better_higher);
        if rebuilt == record.snapshot {
            continue;
        }
        record.snapshot = rebuilt;
        store.save_benchmark(&record)?;
        log::info!("{id}: corrected {touched} model refs");
        rewritten += 1;
    }

    Ok(rewritten)
}
