//! Sync pipelines, one per provider shape.
//!
//! raw payload → identity (per item) → normalize (per batch) → snapshot (per
//! benchmark) → merge against the store (per benchmark) → write.
//!
//! Failures are isolated per benchmark and per model: a pass always runs to
//! the end and reports what happened in a [`SyncReport`].

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::aggregate::{Batches, RawBatch};
use crate::config::{is_benchmark_id, BenchmarkMeta, CatalogConfig, PublisherStyle};
use crate::error::ReconError;
use crate::identity::{slugify, strip_release_suffix, IdentityResolver, UNKNOWN};
use crate::merge::merge;
use crate::model::{
    AggregatorModel, BenchmarkOutcome, BenchmarkRecord, BenchmarkSyncResult, ExtractedBenchmark,
    LeaderboardRow, ModelIdentity, PublisherRecord, SyncReport,
};
use crate::snapshot;
use crate::store::CatalogStore;
use crate::summary::compute_summary;

/// Injected configuration for one sync pass.
pub struct SyncContext<'a> {
    pub config: &'a CatalogConfig,
    pub resolver: IdentityResolver,
    pub today: NaiveDate,
}

impl<'a> SyncContext<'a> {
    pub fn new(config: &'a CatalogConfig, today: NaiveDate) -> Self {
        Self {
            config,
            resolver: IdentityResolver::from_aliases(&config.aliases),
            today,
        }
    }
}

/// How a pipeline treats model/publisher records that already exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Upsert {
    /// The provider is authoritative for name/website/release date.
    Refresh,
    /// Only create records that do not exist yet.
    CreateOnly,
}

/// Per-pass bookkeeping shared by the pipelines.
struct Pass<'c, 'a, S> {
    ctx: &'c SyncContext<'a>,
    store: &'c mut S,
    seen_models: HashSet<ModelIdentity>,
    seen_publishers: HashSet<String>,
    models_written: usize,
    publishers_written: usize,
    record_errors: usize,
}

impl<'c, 'a, S: CatalogStore> Pass<'c, 'a, S> {
    fn new(ctx: &'c SyncContext<'a>, store: &'c mut S) -> Self {
        Self {
            ctx,
            store,
            seen_models: HashSet::new(),
            seen_publishers: HashSet::new(),
            models_written: 0,
            publishers_written: 0,
            record_errors: 0,
        }
    }

    fn finish(
        self,
        provider: &str,
        benchmarks: Vec<BenchmarkSyncResult>,
        missing_scores: usize,
    ) -> SyncReport {
        let summary = compute_summary(&benchmarks);
        log::info!(
            "{provider}: {} benchmarks, {} created, {} updated, {} unchanged, {} skipped, {} failed",
            summary.total,
            summary.created,
            summary.updated,
            summary.unchanged,
            summary.skipped,
            summary.failed,
        );
        SyncReport {
            provider: provider.to_string(),
            sync_date: self.ctx.today,
            benchmarks,
            models_written: self.models_written,
            publishers_written: self.publishers_written,
            missing_scores,
            record_errors: self.record_errors,
            summary,
        }
    }

    // -- publisher / model metadata -----------------------------------------

    fn touch_publisher(
        &mut self,
        slug: &str,
        display_name: &str,
        website: Option<&str>,
        mode: Upsert,
    ) {
        if !self.seen_publishers.insert(slug.to_string()) {
            return;
        }
        match upsert_publisher(&mut *self.store, self.ctx.config, slug, display_name, website, mode) {
            Ok(true) => self.publishers_written += 1,
            Ok(false) => {}
            Err(e) => {
                log::warn!("publisher '{slug}': {e}");
                self.record_errors += 1;
            }
        }
    }

    fn touch_model(
        &mut self,
        identity: &ModelIdentity,
        display_name: &str,
        release_date: Option<&str>,
        mode: Upsert,
    ) {
        if !self.seen_models.insert(identity.clone()) {
            return;
        }
        match upsert_model(&mut *self.store, identity, display_name, release_date, mode) {
            Ok(true) => self.models_written += 1,
            Ok(false) => {}
            Err(e) => {
                log::warn!("model '{}': {e}", identity.model_ref());
                self.record_errors += 1;
            }
        }
    }

    // -- benchmark records --------------------------------------------------

    /// Normalize, build, merge and persist one benchmark.
    fn reconcile(&mut self, mut fresh: BenchmarkRecord, batch: RawBatch) -> BenchmarkSyncResult {
        let id = fresh.id.clone();
        let entries = batch.into_score_entries(&fresh.metrics);
        fresh.snapshot = snapshot::build(entries, fresh.metrics.is_better_higher);
        let entry_count = fresh.snapshot.len();

        let existing = match self.store.load_benchmark(&id) {
            Ok(existing) => existing,
            Err(e @ ReconError::CorruptRecord { .. }) => {
                log::warn!("{e}; treating benchmark '{id}' as new");
                None
            }
            Err(e) => {
                log::warn!("benchmark '{id}': {e}");
                return failed(&id, entry_count, e);
            }
        };

        let merged = merge(fresh, existing.as_ref(), self.ctx.today);
        if merged.outcome.changed() {
            log::info!("update occurs for {id} ({} entries)", entry_count);
        } else {
            log::debug!("{id}: snapshot unchanged");
        }

        if existing.as_ref() != Some(&merged.record) {
            if let Err(e) = self.store.save_benchmark(&merged.record) {
                log::warn!("benchmark '{id}': {e}");
                return failed(&id, entry_count, e);
            }
        }

        BenchmarkSyncResult {
            id,
            outcome: merged.outcome.into(),
            entries: entry_count,
            detail: None,
        }
    }

    /// Publisher for a leaderboard row that names none: the only publisher
    /// outside `unknown/` holding a model with the same slug, else `unknown`.
    fn publisher_from_catalog(&self, model_slug: &str) -> String {
        match self.store.publishers_for_model(model_slug) {
            Ok(found) => {
                let mut known: Vec<String> = found.into_iter().filter(|p| p != UNKNOWN).collect();
                if known.len() == 1 {
                    return known.remove(0);
                }
                if known.len() > 1 {
                    log::debug!("model '{model_slug}' stored under {} publishers", known.len());
                }
                UNKNOWN.to_string()
            }
            Err(e) => {
                log::warn!("publisher lookup for '{model_slug}': {e}");
                UNKNOWN.to_string()
            }
        }
    }
}

fn failed(id: &str, entries: usize, err: ReconError) -> BenchmarkSyncResult {
    BenchmarkSyncResult {
        id: id.to_string(),
        outcome: BenchmarkOutcome::Failed,
        entries,
        detail: Some(err.to_string()),
    }
}

fn skipped_unknown(id: &str, entries: usize) -> BenchmarkSyncResult {
    log::warn!("{}; dropping {entries} scores", ReconError::UnknownBenchmark(id.to_string()));
    BenchmarkSyncResult {
        id: id.to_string(),
        outcome: BenchmarkOutcome::SkippedUnknown,
        entries,
        detail: Some("not in benchmark registry".into()),
    }
}

/// Record template from registry metadata. Snapshot, trending and
/// `last_updated` are filled in by the reconcile step.
pub fn fresh_record(id: &str, meta: &BenchmarkMeta, today: NaiveDate) -> BenchmarkRecord {
    BenchmarkRecord {
        id: id.to_string(),
        name: meta.name.clone(),
        full_name: meta.full_name.clone(),
        publisher: meta.publisher.clone(),
        description: meta.description.clone(),
        link: meta.link.clone(),
        tags: meta.tags.clone(),
        last_updated: today,
        metrics: meta.metrics.clone(),
        trending: Default::default(),
        snapshot: Vec::new(),
        source_flags: meta.flags.clone(),
    }
}

// ---------------------------------------------------------------------------
// Pipelines
// ---------------------------------------------------------------------------

/// Aggregator-API pass: many models, each scored on many benchmarks.
pub fn sync_aggregator<S: CatalogStore>(
    ctx: &SyncContext<'_>,
    store: &mut S,
    provider: &str,
    models: &[AggregatorModel],
) -> SyncReport {
    let mut pass = Pass::new(ctx, store);
    let mut batches = Batches::default();

    for model in models {
        // The provider slug wins unless the display name has an alias.
        let display_name = model.publisher_name.trim();
        let canonical = ctx.resolver.canonical_publisher_name(display_name);
        let raw_publisher = if canonical != display_name || model.publisher_key.trim().is_empty() {
            canonical
        } else {
            model.publisher_key.as_str()
        };
        let identity = ctx.resolver.resolve(Some(raw_publisher), &model.model_key);
        let display = if canonical.is_empty() {
            identity.publisher_slug.clone()
        } else {
            canonical.to_string()
        };

        pass.touch_publisher(
            &identity.publisher_slug,
            &display,
            model.publisher_website.as_deref(),
            Upsert::Refresh,
        );
        let model_name = if model.model_name.trim().is_empty() {
            model.model_key.as_str()
        } else {
            model.model_name.as_str()
        };
        pass.touch_model(&identity, model_name, model.release_date.as_deref(), Upsert::Refresh);

        let model_ref = identity.model_ref();
        for (benchmark_id, score) in &model.evaluations {
            if ctx.config.is_skipped(benchmark_id) {
                continue;
            }
            batches.add(benchmark_id, &model_ref, *score);
        }
    }

    let mut results = Vec::with_capacity(batches.by_benchmark.len());
    for (id, batch) in batches.by_benchmark {
        let result = match ctx.config.benchmark(&id) {
            Some(meta) => pass.reconcile(fresh_record(&id, meta, ctx.today), batch),
            None => skipped_unknown(&id, batch.len()),
        };
        results.push(result);
    }

    pass.finish(provider, results, batches.missing)
}

/// Scraped-leaderboard pass: one benchmark, one row per model.
pub fn sync_leaderboard<S: CatalogStore>(
    ctx: &SyncContext<'_>,
    store: &mut S,
    provider: &str,
    benchmark_id: &str,
    rows: &[LeaderboardRow],
) -> SyncReport {
    let mut pass = Pass::new(ctx, store);

    let Some(meta) = ctx.config.benchmark(benchmark_id) else {
        let result = skipped_unknown(benchmark_id, rows.len());
        return pass.finish(provider, vec![result], 0);
    };

    let mut batches = Batches::default();
    for row in rows {
        let identity = match row.publisher_name.as_deref().map(str::trim) {
            Some(publisher) if !publisher.is_empty() => {
                ctx.resolver.resolve(Some(publisher), &row.model_name)
            }
            _ => {
                let model_slug = ctx.resolver.resolve_model(&row.model_name);
                ModelIdentity {
                    publisher_slug: pass.publisher_from_catalog(&model_slug),
                    model_slug,
                }
            }
        };

        // Unscored rows and unresolved publishers leave no metadata behind.
        if is_scored(row.score) && identity.publisher_slug != UNKNOWN {
            if let Some(name) = row.publisher_name.as_deref().filter(|n| !n.trim().is_empty()) {
                let display = publisher_display(&ctx.resolver, name, &identity);
                pass.touch_publisher(&identity.publisher_slug, &display, None, Upsert::CreateOnly);
            }
            pass.touch_model(
                &identity,
                strip_release_suffix(&row.model_name),
                None,
                Upsert::CreateOnly,
            );
        }

        batches.add(benchmark_id, &identity.model_ref(), row.score);
    }

    let result = match batches.by_benchmark.remove(benchmark_id) {
        Some(batch) => pass.reconcile(fresh_record(benchmark_id, meta, ctx.today), batch),
        None => no_scores(benchmark_id),
    };
    pass.finish(provider, vec![result], batches.missing)
}

/// LLM-extracted pass. The payload carries its own metadata, which the
/// registry overrides when it knows the benchmark id.
pub fn sync_extracted<S: CatalogStore>(
    ctx: &SyncContext<'_>,
    store: &mut S,
    provider: &str,
    benchmark_id: Option<&str>,
    extracted: &ExtractedBenchmark,
) -> SyncReport {
    let mut pass = Pass::new(ctx, store);
    let id = match benchmark_id {
        Some(id) => id.to_string(),
        None => slugify(&extracted.name),
    };

    if !is_benchmark_id(&id) {
        let err = ReconError::ConfigValidation(format!("invalid benchmark id '{id}'"));
        log::warn!("{err}");
        return pass.finish(provider, vec![failed(&id, 0, err)], 0);
    }

    let fresh = match ctx.config.benchmark(&id) {
        Some(meta) => fresh_record(&id, meta, ctx.today),
        None => BenchmarkRecord {
            id: id.clone(),
            name: extracted.name.clone(),
            full_name: extracted.full_name.clone(),
            publisher: extracted.publisher.clone(),
            description: extracted.description.clone(),
            link: extracted.link.clone(),
            tags: extracted.tags.clone(),
            last_updated: ctx.today,
            metrics: extracted.metrics.clone(),
            trending: Default::default(),
            snapshot: Vec::new(),
            source_flags: Default::default(),
        },
    };

    let mut batches = Batches::default();
    for item in &extracted.snapshot {
        let identity = ctx.resolver.resolve(item.publisher.as_deref(), &item.model);
        if is_scored(item.score) && identity.publisher_slug != UNKNOWN {
            if let Some(name) = item.publisher.as_deref().filter(|n| !n.trim().is_empty()) {
                let display = publisher_display(&ctx.resolver, name, &identity);
                pass.touch_publisher(&identity.publisher_slug, &display, None, Upsert::CreateOnly);
            }
            pass.touch_model(&identity, strip_release_suffix(&item.model), None, Upsert::CreateOnly);
        }
        batches.add(&id, &identity.model_ref(), item.score);
    }

    let result = match batches.by_benchmark.remove(&id) {
        Some(batch) => pass.reconcile(fresh, batch),
        None => no_scores(&id),
    };
    pass.finish(provider, vec![result], batches.missing)
}

/// Scores that will enter a batch. Everything else is counted as missing.
fn is_scored(score: Option<f64>) -> bool {
    score.is_some_and(f64::is_finite)
}

/// A single-benchmark pass with no usable score keeps the stored record.
fn no_scores(id: &str) -> BenchmarkSyncResult {
    log::warn!("benchmark '{id}': no usable scores in input; record left as is");
    BenchmarkSyncResult {
        id: id.to_string(),
        outcome: BenchmarkOutcome::Unchanged,
        entries: 0,
        detail: Some("no usable scores".into()),
    }
}

fn publisher_display(resolver: &IdentityResolver, raw: &str, identity: &ModelIdentity) -> String {
    let name = resolver.canonical_publisher_name(raw);
    if name.is_empty() {
        identity.publisher_slug.clone()
    } else {
        name.to_string()
    }
}

// ---------------------------------------------------------------------------
// Metadata upserts
// ---------------------------------------------------------------------------

fn upsert_publisher<S: CatalogStore>(
    store: &mut S,
    config: &CatalogConfig,
    slug: &str,
    display_name: &str,
    website: Option<&str>,
    mode: Upsert,
) -> Result<bool, ReconError> {
    let existing = load_or_none(store.load_publisher(slug))?;
    if mode == Upsert::CreateOnly && existing.is_some() {
        return Ok(false);
    }

    let style = config
        .publisher_style(display_name)
        .cloned()
        .or_else(|| {
            existing.as_ref().map(|p| PublisherStyle {
                color: p.color.clone(),
                logo: p.logo.clone(),
            })
        })
        .unwrap_or_else(|| config.default_publisher.clone());

    let website = website
        .filter(|w| !w.trim().is_empty())
        .map(str::to_string)
        .or_else(|| existing.as_ref().and_then(|p| p.website.clone()));

    let record = PublisherRecord {
        name: display_name.to_string(),
        color: style.color,
        logo: style.logo,
        website,
    };

    if existing.as_ref() == Some(&record) {
        return Ok(false);
    }
    store.save_publisher(slug, &record)?;
    Ok(true)
}

fn upsert_model<S: CatalogStore>(
    store: &mut S,
    identity: &ModelIdentity,
    display_name: &str,
    release_date: Option<&str>,
    mode: Upsert,
) -> Result<bool, ReconError> {
    let existing = load_or_none(store.load_model(identity))?;
    if mode == Upsert::CreateOnly && existing.is_some() {
        return Ok(false);
    }

    let mut record = existing.clone().unwrap_or_default();
    record.name = display_name.to_string();
    record.publisher = identity.publisher_slug.clone();
    if let Some(date) = release_date.filter(|d| !d.trim().is_empty()) {
        record.release_date = date.to_string();
    }

    if existing.as_ref() == Some(&record) {
        return Ok(false);
    }
    store.save_model(identity, &record)?;
    Ok(true)
}

/// Corrupt metadata records are rewritten from scratch, not fatal.
fn load_or_none<T>(loaded: Result<Option<T>, ReconError>) -> Result<Option<T>, ReconError> {
    match loaded {
        Err(e @ ReconError::CorruptRecord { .. }) => {
            log::warn!("{e}; rewriting");
            Ok(None)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExtractedScore, ModelRecord};
    use crate::store::MemoryCatalog;
    use std::collections::BTreeMap;

    const CONFIG: &str = r##"
skip = ["aime"]

[benchmarks.gpqa]
name = "GPQA Diamond"
publisher = "idavidrein"
description = "Graduate-level Google-proof Q&A"
link = "https://github.com/idavidrein/gpqa"
tags = ["Scientific", "LLM"]
metrics = { unit = "pass@1(%)", isBetterHigher = true }

[benchmarks.gpqa.flags]
isFromAA = true

[benchmarks.swe_bash_only]
name = "SWE-bench (Bash Only)"
publisher = "Princeton University & University of Chicago"
description = "Real GitHub issues"
link = "https://www.swebench.com/"
metrics = { unit = "% Resolved", isBetterHigher = true }

[aliases.publishers]
Qwen = "Alibaba"

[aliases.models]
gemini-3-pro-preview = "gemini-3-pro"

[publishers.Alibaba]
color = "#623ce5"
logo = "/logos/qwen.svg"
"##;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn aa_model(publisher: &str, model: &str, evals: &[(&str, Option<f64>)]) -> AggregatorModel {
        AggregatorModel {
            publisher_key: publisher.to_lowercase(),
            publisher_name: publisher.into(),
            publisher_website: None,
            model_key: model.to_lowercase(),
            model_name: model.into(),
            release_date: Some("2025-08-07".into()),
            evaluations: evals
                .iter()
                .map(|(id, s)| (id.to_string(), *s))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn aggregator_pass_builds_records() {
        let config = CatalogConfig::from_toml(CONFIG).unwrap();
        let ctx = SyncContext::new(&config, date("2026-01-10"));
        let mut store = MemoryCatalog::new();

        let models = vec![
            aa_model("OpenAI", "GPT-5", &[("gpqa", Some(0.85)), ("aime", Some(0.9)), ("hle", None)]),
            aa_model("Google", "Gemini 3 Pro", &[("gpqa", Some(0.91)), ("mystery", Some(0.1))]),
        ];
        let report = sync_aggregator(&ctx, &mut store, "aa", &models);

        assert_eq!(report.summary.created, 1);
        assert_eq!(report.summary.skipped, 1);
        assert_eq!(report.missing_scores, 1);
        assert_eq!(report.models_written, 2);
        assert_eq!(report.publishers_written, 2);

        let gpqa = store.load_benchmark("gpqa").unwrap().unwrap();
        assert_eq!(gpqa.snapshot.len(), 2);
        assert_eq!(gpqa.snapshot[0].model_ref.as_str(), "google/gemini-3-pro");
        assert_eq!(gpqa.snapshot[0].score, 91.0);
        assert_eq!(gpqa.snapshot[1].score, 85.0);
        assert_eq!(gpqa.last_updated, date("2026-01-10"));
        assert_eq!(gpqa.source_flags["isFromAA"], serde_json::Value::Bool(true));
        assert!(store.load_benchmark("aime").unwrap().is_none());
        assert!(store.load_benchmark("mystery").unwrap().is_none());
    }

    #[test]
    fn second_identical_pass_writes_nothing() {
        let config = CatalogConfig::from_toml(CONFIG).unwrap();
        let mut store = MemoryCatalog::new();
        let models = vec![aa_model("OpenAI", "GPT-5", &[("gpqa", Some(0.85))])];

        let ctx = SyncContext::new(&config, date("2026-01-10"));
        sync_aggregator(&ctx, &mut store, "aa", &models);
        let writes = store.writes();

        let ctx = SyncContext::new(&config, date("2026-02-01"));
        let report = sync_aggregator(&ctx, &mut store, "aa", &models);
        assert_eq!(report.summary.unchanged, 1);
        assert_eq!(report.models_written, 0);
        assert_eq!(report.publishers_written, 0);
        assert_eq!(store.writes(), writes);
        let gpqa = store.load_benchmark("gpqa").unwrap().unwrap();
        assert_eq!(gpqa.last_updated, date("2026-01-10"));
    }

    #[test]
    fn aggregator_refresh_keeps_hand_edited_model_fields() {
        let config = CatalogConfig::from_toml(CONFIG).unwrap();
        let mut store = MemoryCatalog::new();
        let identity = ModelIdentity {
            publisher_slug: "openai".into(),
            model_slug: "gpt-5".into(),
        };
        store
            .save_model(
                &identity,
                &ModelRecord {
                    name: "old".into(),
                    publisher: "openai".into(),
                    params: "1.8T".into(),
                    license: "Proprietary".into(),
                    ..ModelRecord::default()
                },
            )
            .unwrap();

        let ctx = SyncContext::new(&config, date("2026-01-10"));
        let models = vec![aa_model("OpenAI", "GPT-5", &[("gpqa", Some(0.85))])];
        sync_aggregator(&ctx, &mut store, "aa", &models);

        let model = store.load_model(&identity).unwrap().unwrap();
        assert_eq!(model.name, "GPT-5");
        assert_eq!(model.params, "1.8T");
        assert_eq!(model.license, "Proprietary");
        assert_eq!(model.release_date, "2025-08-07");
    }

    #[test]
    fn publisher_style_from_alias_target() {
        let config = CatalogConfig::from_toml(CONFIG).unwrap();
        let ctx = SyncContext::new(&config, date("2026-01-10"));
        let mut store = MemoryCatalog::new();
        let rows = vec![LeaderboardRow {
            model_name: "Qwen3 Coder (2025-07-22)".into(),
            publisher_name: Some("Qwen".into()),
            score: Some(55.4),
        }];
        sync_leaderboard(&ctx, &mut store, "swe", "swe_bash_only", &rows);

        let publisher = store.load_publisher("alibaba").unwrap().unwrap();
        assert_eq!(publisher.name, "Alibaba");
        assert_eq!(publisher.color, "#623ce5");
        let record = store.load_benchmark("swe_bash_only").unwrap().unwrap();
        assert_eq!(record.snapshot[0].model_ref.as_str(), "alibaba/qwen3-coder");
        let model = store
            .load_model(&ModelIdentity {
                publisher_slug: "alibaba".into(),
                model_slug: "qwen3-coder".into(),
            })
            .unwrap()
            .unwrap();
        assert_eq!(model.name, "Qwen3 Coder");
    }

    #[test]
    fn leaderboard_without_publisher_uses_catalog() {
        let config = CatalogConfig::from_toml(CONFIG).unwrap();
        let ctx = SyncContext::new(&config, date("2026-01-10"));
        let mut store = MemoryCatalog::new();
        store
            .save_model(
                &ModelIdentity {
                    publisher_slug: "google".into(),
                    model_slug: "gemini-3-pro".into(),
                },
                &ModelRecord {
                    name: "Gemini 3 Pro".into(),
                    publisher: "google".into(),
                    ..ModelRecord::default()
                },
            )
            .unwrap();

        let rows = vec![
            LeaderboardRow {
                model_name: "Gemini 3 Pro Preview".into(),
                publisher_name: None,
                score: Some(76.2),
            },
            LeaderboardRow {
                model_name: "Mystery Model".into(),
                publisher_name: None,
                score: Some(40.0),
            },
            LeaderboardRow {
                model_name: "Broken Row".into(),
                publisher_name: None,
                score: None,
            },
        ];
        let report = sync_leaderboard(&ctx, &mut store, "swe", "swe_bash_only", &rows);
        assert_eq!(report.missing_scores, 1);

        let record = store.load_benchmark("swe_bash_only").unwrap().unwrap();
        let refs: Vec<&str> = record.snapshot.iter().map(|e| e.model_ref.as_str()).collect();
        assert_eq!(refs, vec!["google/gemini-3-pro", "unknown/mystery-model"]);
    }

    #[test]
    fn leaderboard_for_unknown_benchmark_is_dropped() {
        let config = CatalogConfig::from_toml(CONFIG).unwrap();
        let ctx = SyncContext::new(&config, date("2026-01-10"));
        let mut store = MemoryCatalog::new();
        let rows = vec![LeaderboardRow {
            model_name: "X".into(),
            publisher_name: Some("Y".into()),
            score: Some(1.0),
        }];
        let report = sync_leaderboard(&ctx, &mut store, "tau", "tau_bench", &rows);
        assert_eq!(report.benchmarks[0].outcome, BenchmarkOutcome::SkippedUnknown);
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn corrupt_existing_record_is_replaced() {
        let config = CatalogConfig::from_toml(CONFIG).unwrap();
        let ctx = SyncContext::new(&config, date("2026-01-10"));
        let mut store = MemoryCatalog::new();
        store.insert_raw_benchmark("gpqa", "{\"name\": ");

        let models = vec![aa_model("OpenAI", "GPT-5", &[("gpqa", Some(0.85))])];
        let report = sync_aggregator(&ctx, &mut store, "aa", &models);
        assert_eq!(report.benchmarks[0].outcome, BenchmarkOutcome::Created);
        let gpqa = store.load_benchmark("gpqa").unwrap().unwrap();
        assert_eq!(gpqa.trending.initial_weight, 1000);
    }

    #[test]
    fn extracted_pass_uses_payload_metadata() {
        let config = CatalogConfig::from_toml(CONFIG).unwrap();
        let ctx = SyncContext::new(&config, date("2026-01-10"));
        let mut store = MemoryCatalog::new();
        let extracted = ExtractedBenchmark {
            name: "MATH Hard".into(),
            full_name: None,
            publisher: "Stanford University".into(),
            description: "Extremely difficult math".into(),
            link: "https://github.com/stanford/math-hard".into(),
            tags: vec!["Math".into()],
            metrics: crate::model::Metric {
                unit: "pass@1(%)".into(),
                is_better_higher: true,
            },
            snapshot: vec![
                ExtractedScore {
                    model: "GPT-4.5".into(),
                    score: Some(72.5),
                    publisher: Some("OpenAI".into()),
                },
                ExtractedScore {
                    model: "Claude 4 Opus".into(),
                    score: Some(70.1),
                    publisher: Some("Anthropic".into()),
                },
            ],
        };
        let report = sync_extracted(&ctx, &mut store, "extracted", None, &extracted);
        assert_eq!(report.benchmarks[0].id, "math-hard");
        assert_eq!(report.benchmarks[0].outcome, BenchmarkOutcome::Created);

        let record = store.load_benchmark("math-hard").unwrap().unwrap();
        assert_eq!(record.name, "MATH Hard");
        assert_eq!(record.snapshot[0].model_ref.as_str(), "openai/gpt-4-5");
        assert_eq!(record.snapshot[0].score, 72.5);
        assert_eq!(record.snapshot[1].model_ref.as_str(), "anthropic/claude-4-opus");
    }

    fn gemini_4(publisher: &str) -> ModelIdentity {
        ModelIdentity {
            publisher_slug: publisher.into(),
            model_slug: "gemini-4".into(),
        }
    }

    #[test]
    fn unknown_publisher_resolves_once_model_is_cataloged() {
        let config = CatalogConfig::from_toml(CONFIG).unwrap();
        let ctx = SyncContext::new(&config, date("2026-01-10"));
        let mut store = MemoryCatalog::new();
        let rows = vec![LeaderboardRow {
            model_name: "Gemini 4".into(),
            publisher_name: None,
            score: Some(61.0),
        }];

        sync_leaderboard(&ctx, &mut store, "swe", "swe_bash_only", &rows);
        let record = store.load_benchmark("swe_bash_only").unwrap().unwrap();
        assert_eq!(record.snapshot[0].model_ref.as_str(), "unknown/gemini-4");
        assert!(store.load_model(&gemini_4(UNKNOWN)).unwrap().is_none());

        // Trees written before this rule may still carry an unknown/ record.
        let model = ModelRecord {
            name: "Gemini 4".into(),
            publisher: "google".into(),
            ..ModelRecord::default()
        };
        store.save_model(&gemini_4(UNKNOWN), &model).unwrap();
        store.save_model(&gemini_4("google"), &model).unwrap();

        let ctx = SyncContext::new(&config, date("2026-01-11"));
        let report = sync_leaderboard(&ctx, &mut store, "swe", "swe_bash_only", &rows);
        assert_eq!(report.benchmarks[0].outcome, BenchmarkOutcome::Updated);
        let record = store.load_benchmark("swe_bash_only").unwrap().unwrap();
        assert_eq!(record.snapshot[0].model_ref.as_str(), "google/gemini-4");
    }

    #[test]
    fn leaderboard_without_scores_keeps_stored_record() {
        let config = CatalogConfig::from_toml(CONFIG).unwrap();
        let ctx = SyncContext::new(&config, date("2026-01-10"));
        let mut store = MemoryCatalog::new();
        let scored = vec![LeaderboardRow {
            model_name: "GPT-5".into(),
            publisher_name: Some("OpenAI".into()),
            score: Some(70.0),
        }];
        sync_leaderboard(&ctx, &mut store, "swe", "swe_bash_only", &scored);
        let before = store.raw_benchmark("swe_bash_only").unwrap().to_string();
        let writes = store.writes();

        let unscored = vec![
            LeaderboardRow {
                model_name: "GPT-5".into(),
                publisher_name: Some("OpenAI".into()),
                score: None,
            },
            LeaderboardRow {
                model_name: "GPT-6".into(),
                publisher_name: Some("OpenAI".into()),
                score: Some(f64::NAN),
            },
        ];
        let ctx = SyncContext::new(&config, date("2026-02-01"));
        let report = sync_leaderboard(&ctx, &mut store, "swe", "swe_bash_only", &unscored);

        assert_eq!(report.benchmarks[0].outcome, BenchmarkOutcome::Unchanged);
        assert_eq!(report.benchmarks[0].entries, 0);
        assert_eq!(report.missing_scores, 2);
        assert_eq!(store.writes(), writes);
        assert_eq!(store.raw_benchmark("swe_bash_only").unwrap(), before);
        let record = store.load_benchmark("swe_bash_only").unwrap().unwrap();
        assert_eq!(record.last_updated, date("2026-01-10"));
    }

    #[test]
    fn extracted_without_scores_writes_nothing() {
        let config = CatalogConfig::from_toml(CONFIG).unwrap();
        let ctx = SyncContext::new(&config, date("2026-01-10"));
        let mut store = MemoryCatalog::new();
        let extracted = ExtractedBenchmark {
            name: "MATH Hard".into(),
            full_name: None,
            publisher: "Stanford University".into(),
            description: "Extremely difficult math".into(),
            link: "https://github.com/stanford/math-hard".into(),
            tags: vec![],
            metrics: crate::model::Metric {
                unit: "pass@1(%)".into(),
                is_better_higher: true,
            },
            snapshot: vec![ExtractedScore {
                model: "GPT-4.5".into(),
                score: None,
                publisher: Some("OpenAI".into()),
            }],
        };
        let report = sync_extracted(&ctx, &mut store, "extracted", None, &extracted);
        assert_eq!(report.benchmarks[0].outcome, BenchmarkOutcome::Unchanged);
        assert_eq!(report.missing_scores, 1);
        assert_eq!(store.writes(), 0);
        assert!(store.load_benchmark("math-hard").unwrap().is_none());
    }

    #[test]
    fn unscored_rows_leave_no_model_or_publisher() {
        let config = CatalogConfig::from_toml(CONFIG).unwrap();
        let ctx = SyncContext::new(&config, date("2026-01-10"));
        let mut store = MemoryCatalog::new();
        let rows = vec![
            LeaderboardRow {
                model_name: "GPT-5".into(),
                publisher_name: Some("OpenAI".into()),
                score: Some(70.0),
            },
            LeaderboardRow {
                model_name: "Some Preview Model".into(),
                publisher_name: Some("Acme".into()),
                score: None,
            },
        ];
        let report = sync_leaderboard(&ctx, &mut store, "swe", "swe_bash_only", &rows);
        assert_eq!(report.missing_scores, 1);
        assert_eq!(report.models_written, 1);
        assert_eq!(report.publishers_written, 1);

        let acme_model = ModelIdentity {
            publisher_slug: "acme".into(),
            model_slug: "some-preview-model".into(),
        };
        assert!(store.load_model(&acme_model).unwrap().is_none());
        assert!(store.load_publisher("acme").unwrap().is_none());
        assert!(store.load_publisher("openai").unwrap().is_some());
    }
}
