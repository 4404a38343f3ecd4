//! Artificial Analysis LLM catalog: model list with per-benchmark evaluations.

use std::collections::BTreeMap;

use serde_json::Value;

use benchcat_recon::AggregatorModel;

use crate::exit_codes;
use crate::CliError;

use super::common::{self, FetchClient};

// ── Constants ───────────────────────────────────────────────────────

pub const AA_API_BASE: &str = "https://artificialanalysis.ai/api/v2";
pub const AA_API_KEY_ENV: &str = "ARTIFICIAL_ANALYSIS_API_KEY";
const SOURCE_NAME: &str = "Artificial Analysis";

// ── Client ──────────────────────────────────────────────────────────

pub struct AaClient {
    client: FetchClient,
    api_key: String,
    base_url: String,
}

impl AaClient {
    pub fn new(api_key: String) -> Result<Self, CliError> {
        Self::with_base_url(api_key, AA_API_BASE.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, CliError> {
        Ok(Self {
            client: FetchClient::new(SOURCE_NAME, extract_aa_error)?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET the full model list and map it into aggregator models.
    pub fn fetch_models(&self) -> Result<Vec<AggregatorModel>, CliError> {
        let url = format!("{}/data/llms/models", self.base_url);
        let body = self
            .client
            .request_with_retry(|http| http.get(&url).header("x-api-key", &self.api_key))?;
        parse_payload(&body)
    }
}

/// Flag > `ARTIFICIAL_ANALYSIS_API_KEY` > error.
pub fn resolve_api_key(flag: Option<String>) -> Result<String, CliError> {
    common::resolve_api_key(flag, SOURCE_NAME, AA_API_KEY_ENV)
}

fn extract_aa_error(body: &Value, status: u16) -> String {
    body["message"]
        .as_str()
        .or_else(|| body["error"].as_str())
        .or_else(|| body["error"]["message"].as_str())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status))
}

// ── Payload mapping ─────────────────────────────────────────────────

fn non_empty(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Map `{data: [..]}` into aggregator models.
///
/// Provider slugs are preferred as identity keys; the display name is the
/// fallback. Non-numeric evaluation values count as missing scores.
pub fn parse_payload(body: &Value) -> Result<Vec<AggregatorModel>, CliError> {
    let entries = body["data"].as_array().ok_or_else(|| CliError {
        code: exit_codes::EXIT_FETCH_UPSTREAM,
        message: format!("{} response missing 'data' array", SOURCE_NAME),
        hint: None,
    })?;

    let mut models = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let model_name = non_empty(&entry["name"]).unwrap_or_default();
        let model_key = non_empty(&entry["slug"]).unwrap_or_else(|| model_name.clone());
        if model_key.is_empty() {
            log::warn!("{} model #{}: no name or slug, skipped", SOURCE_NAME, i);
            continue;
        }

        let creator = &entry["model_creator"];
        let publisher_name = non_empty(&creator["name"]).unwrap_or_default();
        let publisher_key = non_empty(&creator["slug"]).unwrap_or_else(|| publisher_name.clone());

        let evaluations: BTreeMap<String, Option<f64>> = entry["evaluations"]
            .as_object()
            .map(|evals| {
                evals
                    .iter()
                    .map(|(id, score)| (id.clone(), score.as_f64()))
                    .collect()
            })
            .unwrap_or_default();

        models.push(AggregatorModel {
            publisher_key,
            publisher_name,
            publisher_website: non_empty(&creator["website"]),
            model_key,
            model_name,
            release_date: non_empty(&entry["release_date"]),
            evaluations,
        });
    }

    log::debug!("{}: {} models in payload", SOURCE_NAME, models.len());
    Ok(models)
}

// ── Tests ───────────────────────────────────────────────────────────
