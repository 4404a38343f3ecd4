use std::cmp::Ordering;
use std::collections::HashMap;

use crate::model::{ModelRef, ScoreEntry};

/// Build the ordered snapshot for one benchmark.
///
/// At most one entry per model ref survives; on duplicates the last one in
/// input order wins. Ordering is by score (descending when higher is better,
/// ascending otherwise), ties broken by model ref ascending in both
/// directions.
pub fn build(entries: Vec<ScoreEntry>, is_better_higher: bool) -> Vec<ScoreEntry> {
    let mut latest: HashMap<ModelRef, f64> = HashMap::with_capacity(entries.len());
    for entry in entries {
        latest.insert(entry.model_ref, entry.score);
    }

    let mut snapshot: Vec<ScoreEntry> = latest
        .into_iter()
        .map(|(model_ref, score)| ScoreEntry { model_ref, score })
        .collect();

    snapshot.sort_by(|a, b| compare_entries(a, b, is_better_higher));
    snapshot
}

fn compare_entries(a: &ScoreEntry, b: &ScoreEntry, is_better_higher: bool) -> Ordering {
    let by_score = if is_better_higher {
        b.score.total_cmp(&a.score)
    } else {
        a.score.total_cmp(&b.score)
    };
    by_score.then_with(|| a.model_ref.cmp(&b.model_ref))
}
