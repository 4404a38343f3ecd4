use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use crate::error::ReconError;
use crate::identity::is_slug;
use crate::model::Metric;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Everything the engine needs that is not fetched: benchmark metadata,
/// alias tables and publisher styling. Loaded once per process.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogConfig {
    /// Provider benchmark ids that are dropped without a warning.
    #[serde(default)]
    pub skip: BTreeSet<String>,
    #[serde(default)]
    pub benchmarks: BTreeMap<String, BenchmarkMeta>,
    #[serde(default)]
    pub aliases: AliasConfig,
    #[serde(default)]
    pub publishers: BTreeMap<String, PublisherStyle>,
    #[serde(default)]
    pub default_publisher: PublisherStyle,
}

// ---------------------------------------------------------------------------
// Benchmark metadata registry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkMeta {
    pub name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub publisher: String,
    pub description: String,
    pub link: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub metrics: Metric,
    /// Copied verbatim into the record's source flags.
    #[serde(default)]
    pub flags: BTreeMap<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Alias tables
// ---------------------------------------------------------------------------

/// Overrides for names that independent sources spell differently.
///
/// `publishers` is keyed by the raw display name, `models` by the already
/// slugged model name, `refs` by a full stored ModelRef.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AliasConfig {
    #[serde(default)]
    pub publishers: BTreeMap<String, String>,
    #[serde(default)]
    pub models: BTreeMap<String, String>,
    #[serde(default)]
    pub refs: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// Publisher styling
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PublisherStyle {
    pub color: String,
    pub logo: String,
}

impl Default for PublisherStyle {
    fn default() -> Self {
        Self {
            color: "#94a3b8".into(),
            logo: "/logos/unknown.svg".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl CatalogConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: CatalogConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        for id in self.benchmarks.keys() {
            if !is_benchmark_id(id) {
                return Err(ReconError::ConfigValidation(format!(
                    "benchmark id '{id}' must be non-empty and use only [A-Za-z0-9_-]"
                )));
            }
        }

        for (raw, canonical) in &self.aliases.publishers {
            if canonical.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "publisher alias '{raw}' maps to an empty name"
                )));
            }
        }

        for (raw, canonical) in &self.aliases.models {
            if !is_slug(canonical) {
                return Err(ReconError::ConfigValidation(format!(
                    "model alias '{raw}' -> '{canonical}': target is not a valid slug"
                )));
            }
        }

        for (raw, canonical) in &self.aliases.refs {
            let valid = canonical
                .split_once('/')
                .map(|(p, m)| is_slug(p) && is_slug(m))
                .unwrap_or(false);
            if !valid {
                return Err(ReconError::ConfigValidation(format!(
                    "ref correction '{raw}' -> '{canonical}': target must be 'publisher/model' slugs"
                )));
            }
        }

        Ok(())
    }

    pub fn benchmark(&self, id: &str) -> Option<&BenchmarkMeta> {
        self.benchmarks.get(id)
    }

    pub fn is_skipped(&self, id: &str) -> bool {
        self.skip.contains(id)
    }

    /// Style for a publisher display name, if the lookup table has one.
    pub fn publisher_style(&self, display_name: &str) -> Option<&PublisherStyle> {
        self.publishers.get(display_name)
    }
}

/// Benchmark ids become file names: keep them to a conservative alphabet.
pub fn is_benchmark_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r##"
skip = ["aime"]

[benchmarks.mmlu_pro]
name = "MMLU-Pro"
fullName = "Massive Multitask Language Understanding Pro"
publisher = "TIGER AI Lab"
description = "Graduate-level multitask questions"
link = "https://github.com/TIGER-AI-Lab/MMLU-Pro"
tags = ["Multitask", "General", "LLM"]
metrics = { unit = "pass@1(%)", isBetterHigher = true }

[benchmarks.mmlu_pro.flags]
isFromAA = true
AALink = "https://artificialanalysis.ai/evaluations/mmlu-pro"

[aliases.publishers]
"Google DeepMind" = "Google"
Qwen = "Alibaba"

[aliases.models]
gemini-3-pro-preview = "gemini-3-pro"

[aliases.refs]
"zai/glm-4.5" = "zai/glm-4-5"

[publishers.OpenAI]
color = "#1f1f1f"
logo = "/logos/openai.svg"
"##;

    #[test]
    fn parse_valid() {
        let config = CatalogConfig::from_toml(VALID).unwrap();
        assert!(config.is_skipped("aime"));
        let meta = config.benchmark("mmlu_pro").unwrap();
        assert_eq!(meta.name, "MMLU-Pro");
        assert_eq!(meta.metrics.unit, "pass@1(%)");
        assert!(meta.metrics.is_better_higher);
        assert_eq!(meta.flags["isFromAA"], serde_json::Value::Bool(true));
        assert_eq!(config.aliases.publishers["Qwen"], "Alibaba");
        assert_eq!(config.aliases.models["gemini-3-pro-preview"], "gemini-3-pro");
        assert_eq!(config.publisher_style("OpenAI").unwrap().color, "#1f1f1f");
        assert_eq!(config.default_publisher, PublisherStyle::default());
    }

    #[test]
    fn empty_config_is_valid() {
        let config = CatalogConfig::from_toml("").unwrap();
        assert!(config.benchmarks.is_empty());
        assert!(config.benchmark("anything").is_none());
    }

    #[test]
    fn metric_direction_defaults_to_higher() {
        let input = r#"
[benchmarks.x]
name = "X"
publisher = "P"
description = "d"
link = "https://example.com"
metrics = { unit = "%" }
"#;
        let config = CatalogConfig::from_toml(input).unwrap();
        assert!(config.benchmark("x").unwrap().metrics.is_better_higher);
        assert!(config.benchmark("x").unwrap().full_name.is_none());
    }

    #[test]
    fn reject_path_like_benchmark_id() {
        let input = r#"
[benchmarks."../escape"]
name = "X"
publisher = "P"
description = "d"
link = "https://example.com"
metrics = { unit = "%" }
"#;
        let err = CatalogConfig::from_toml(input).unwrap_err();
        assert!(matches!(err, ReconError::ConfigValidation(_)), "{err}");
    }

    #[test]
    fn reject_invalid_model_alias_target() {
        let input = r#"
[aliases.models]
glm-4-6-t-1 = "GLM 4.6"
"#;
        let err = CatalogConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("glm-4-6-t-1"));
    }

    #[test]
    fn reject_invalid_ref_target() {
        let input = r#"
[aliases.refs]
"zai/glm-4.5" = "glm-4-5"
"#;
        assert!(CatalogConfig::from_toml(input).is_err());
    }

    #[test]
    fn reject_malformed_toml() {
        let err = CatalogConfig::from_toml("[benchmarks.x\nname = 1").unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
    }
}
