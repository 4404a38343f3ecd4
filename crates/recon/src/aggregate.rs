use std::collections::BTreeMap;

use crate::model::{Metric, ModelRef, ScoreEntry};
use crate::normalize::normalize;

/// Raw scores for one benchmark collected during one sync pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawBatch {
    pub entries: Vec<(ModelRef, f64)>,
}

impl RawBatch {
    pub fn push(&mut self, model_ref: ModelRef, raw_score: f64) {
        self.entries.push((model_ref, raw_score));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Normalize the whole batch at once and pair scores back with refs.
    pub fn into_score_entries(self, metric: &Metric) -> Vec<ScoreEntry> {
        let raw: Vec<f64> = self.entries.iter().map(|(_, s)| *s).collect();
        let scores = normalize(&raw, metric);
        self.entries
            .into_iter()
            .zip(scores)
            .map(|((model_ref, _), score)| ScoreEntry { model_ref, score })
            .collect()
    }
}

/// Raw batches keyed by benchmark id, plus the scores that were dropped.
#[derive(Debug, Default)]
pub struct Batches {
    pub by_benchmark: BTreeMap<String, RawBatch>,
    /// Null or non-finite scores, excluded from every snapshot.
    pub missing: usize,
}

impl Batches {
    /// Record one `(model, benchmark)` score. Absent and non-finite scores are
    /// counted and excluded.
    pub fn add(&mut self, benchmark_id: &str, model_ref: &ModelRef, raw_score: Option<f64>) {
        match raw_score {
            Some(score) if score.is_finite() => {
                self.by_benchmark
                    .entry(benchmark_id.to_string())
                    .or_default()
                    .push(model_ref.clone(), score);
            }
            _ => self.missing += 1,
        }
    }
}
