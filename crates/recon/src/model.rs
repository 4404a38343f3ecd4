use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Canonical `(publisher, model)` pair produced by the identity resolver.
///
/// Both halves are slugs: lowercase `[a-z0-9-]`, no leading/trailing hyphen.
/// They double as file-path segments in the content tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelIdentity {
    pub publisher_slug: String,
    pub model_slug: String,
}

impl ModelIdentity {
    pub fn model_ref(&self) -> ModelRef {
        ModelRef(format!("{}/{}", self.publisher_slug, self.model_slug))
    }
}

/// `"{publisher}/{model}"` key of a model across the whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelRef(String);

impl ModelRef {
    /// Wrap a stored ref as-is. Stored refs predate the current slug rules and
    /// are not re-validated.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn publisher_slug(&self) -> &str {
        self.0.split_once('/').map(|(p, _)| p).unwrap_or("")
    }

    pub fn model_slug(&self) -> &str {
        self.0.split_once('/').map(|(_, m)| m).unwrap_or(&self.0)
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Benchmark record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    pub model_ref: ModelRef,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    pub unit: String,
    #[serde(default = "default_true")]
    pub is_better_higher: bool,
}

fn default_true() -> bool {
    true
}

/// View counters owned by the front end. The engine only carries them over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingState {
    #[serde(default, alias = "view")]
    pub views: i64,
    #[serde(default)]
    pub initial_weight: i64,
}

impl Default for TrendingState {
    fn default() -> Self {
        Self {
            views: 0,
            initial_weight: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkRecord {
    /// Catalog key; lives in the file name, not the file body.
    #[serde(skip)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub publisher: String,
    pub description: String,
    pub link: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub last_updated: NaiveDate,
    pub metrics: Metric,
    #[serde(default)]
    pub trending: TrendingState,
    #[serde(default)]
    pub snapshot: Vec<ScoreEntry>,
    /// Provider-specific flags (`isFromAA`, `AALink`, ...).
    #[serde(flatten)]
    pub source_flags: BTreeMap<String, serde_json::Value>,
}

impl BenchmarkRecord {
    /// Parse a persisted record. Any failure is reported as `CorruptRecord`.
    pub fn from_json(id: &str, text: &str) -> Result<Self, ReconError> {
        let mut record: BenchmarkRecord =
            serde_json::from_str(text).map_err(|e| ReconError::CorruptRecord {
                key: format!("benchmarks/{id}"),
                reason: e.to_string(),
            })?;
        record.id = id.to_string();
        Ok(record)
    }
}

// ---------------------------------------------------------------------------
// Model + publisher metadata records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRecord {
    pub name: String,
    /// Publisher slug.
    pub publisher: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub params: String,
    #[serde(default)]
    pub license: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub discussion_id: String,
}

/// Hand-edited model files sometimes carry `params` as a bare number.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublisherRecord {
    pub name: String,
    pub color: String,
    pub logo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

// ---------------------------------------------------------------------------
// Provider input
// ---------------------------------------------------------------------------

/// One model from an aggregator API, with scores for many benchmarks.
#[derive(Debug, Clone, Default)]
pub struct AggregatorModel {
    /// Provider slug for the publisher, or its display name when absent.
    pub publisher_key: String,
    pub publisher_name: String,
    pub publisher_website: Option<String>,
    /// Provider slug for the model, or its display name when absent.
    pub model_key: String,
    pub model_name: String,
    pub release_date: Option<String>,
    pub evaluations: BTreeMap<String, Option<f64>>,
}

/// One row of a scraped single-benchmark leaderboard.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardRow {
    pub model_name: String,
    pub publisher_name: Option<String>,
    pub score: Option<f64>,
}

/// Benchmark description extracted from free text by an LLM.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedBenchmark {
    pub name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub publisher: String,
    pub description: String,
    pub link: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub metrics: Metric,
    #[serde(default)]
    pub snapshot: Vec<ExtractedScore>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractedScore {
    pub model: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub publisher: Option<String>,
}

// ---------------------------------------------------------------------------
// Sync output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkOutcome {
    Created,
    Updated,
    Unchanged,
    SkippedUnknown,
    Failed,
}

impl fmt::Display for BenchmarkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Updated => write!(f, "updated"),
            Self::Unchanged => write!(f, "unchanged"),
            Self::SkippedUnknown => write!(f, "skipped_unknown"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkSyncResult {
    pub id: String,
    pub outcome: BenchmarkOutcome,
    pub entries: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncSummary {
    pub total: usize,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub provider: String,
    pub sync_date: NaiveDate,
    pub benchmarks: Vec<BenchmarkSyncResult>,
    pub models_written: usize,
    pub publishers_written: usize,
    pub missing_scores: usize,
    /// Model/publisher records that could not be written.
    pub record_errors: usize,
    pub summary: SyncSummary,
}
