//! Canonical `(publisher, model)` identity from raw provider strings.
//!
//! Pipeline per pair:
//! 1. publisher display name → publisher alias (exact, trimmed) → slug
//! 2. model display name → strip trailing `(2024-01-05)`-style suffixes →
//!    slug → model-slug alias
//!
//! Resolution never fails. Anything that cannot produce a slug becomes
//! [`UNKNOWN`].

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::AliasConfig;
use crate::model::ModelIdentity;

pub const UNKNOWN: &str = "unknown";

/// Lowercase, collapse every run outside `[a-z0-9]` to one hyphen, trim
/// hyphens. Dots in version numbers (`4.5`) become hyphens (`4-5`).
///
/// Empty input, or input with no slug characters at all, yields [`UNKNOWN`].
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        UNKNOWN.to_string()
    } else {
        slug
    }
}

/// True if `s` already satisfies the slug invariant.
pub fn is_slug(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with('-')
        && !s.ends_with('-')
        && !s.contains("--")
        && s
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

fn release_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:\s*\(\d+(?:-\d+)*\))+\s*$").expect("release suffix pattern is valid")
    })
}

/// Drop trailing parenthesized date/version annotations:
/// `"Model X (2024-01)"` → `"Model X"`.
pub fn strip_release_suffix(name: &str) -> &str {
    match release_suffix().find(name) {
        Some(m) => name[..m.start()].trim(),
        None => name.trim(),
    }
}

/// Resolves raw provider names into catalog identities.
///
/// Alias tables are injected at construction and never change afterwards.
#[derive(Debug, Clone, Default)]
pub struct IdentityResolver {
    publisher_alias: BTreeMap<String, String>,
    model_slug_alias: BTreeMap<String, String>,
}

impl IdentityResolver {
    pub fn new(
        publisher_alias: BTreeMap<String, String>,
        model_slug_alias: BTreeMap<String, String>,
    ) -> Self {
        Self {
            publisher_alias,
            model_slug_alias,
        }
    }

    pub fn from_aliases(aliases: &AliasConfig) -> Self {
        Self::new(aliases.publishers.clone(), aliases.models.clone())
    }

    pub fn resolve(&self, raw_publisher: Option<&str>, raw_model: &str) -> ModelIdentity {
        ModelIdentity {
            publisher_slug: self.resolve_publisher(raw_publisher),
            model_slug: self.resolve_model(raw_model),
        }
    }

    /// Publisher alias sees the human-readable name, before slugging.
    pub fn resolve_publisher(&self, raw_publisher: Option<&str>) -> String {
        let name = match raw_publisher.map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => return UNKNOWN.to_string(),
        };
        slugify(self.canonical_publisher_name(name))
    }

    /// Display name after aliasing. Used for publisher records and style lookup.
    pub fn canonical_publisher_name<'a>(&'a self, raw_publisher: &'a str) -> &'a str {
        let trimmed = raw_publisher.trim();
        self.publisher_alias
            .get(trimmed)
            .map(String::as_str)
            .unwrap_or(trimmed)
    }

    /// Model alias sees the slugged form, since sources differ in punctuation.
    pub fn resolve_model(&self, raw_model: &str) -> String {
        let slug = slugify(strip_release_suffix(raw_model));
        match self.model_slug_alias.get(&slug) {
            Some(canonical) => canonical.clone(),
            None => slug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> IdentityResolver {
        let publishers = BTreeMap::from([
            ("Qwen".to_string(), "Alibaba".to_string()),
            ("Google DeepMind".to_string(), "Google".to_string()),
            ("Z.ai".to_string(), "Zai".to_string()),
        ]);
        let models = BTreeMap::from([
            ("gemini-3-pro-preview".to_string(), "gemini-3-pro".to_string()),
            ("gpt-5-2-high-reasoning".to_string(), "gpt-5-2".to_string()),
        ]);
        IdentityResolver::new(publishers, models)
    }

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("OpenAI"), "openai");
        assert_eq!(slugify("Claude 4.5 Sonnet"), "claude-4-5-sonnet");
        assert_eq!(slugify("  --GPT-5 (high)--  "), "gpt-5-high");
        assert_eq!(slugify("Llama_3.1...70B"), "llama-3-1-70b");
    }

    #[test]
    fn slugify_degenerate_inputs() {
        assert_eq!(slugify(""), UNKNOWN);
        assert_eq!(slugify("..."), UNKNOWN);
        assert_eq!(slugify("τ"), UNKNOWN);
        assert_eq!(slugify("τ-bench"), "bench");
    }

    #[test]
    fn strip_suffix() {
        assert_eq!(strip_release_suffix("Model X (2024-01)"), "Model X");
        assert_eq!(strip_release_suffix("Model X (2024-01-05)"), "Model X");
        assert_eq!(strip_release_suffix("Model X (2024) (01-05)"), "Model X");
        assert_eq!(strip_release_suffix("Model X (preview)"), "Model X (preview)");
        assert_eq!(strip_release_suffix("Model (2024) X"), "Model (2024) X");
    }

    #[test]
    fn resolve_strips_suffix_before_slugging() {
        let id = resolver().resolve(Some("OpenAI"), "Model X (2024-01-05)");
        assert_eq!(id.publisher_slug, "openai");
        assert_eq!(id.model_slug, "model-x");
        assert_eq!(id.model_ref().as_str(), "openai/model-x");
    }

    #[test]
    fn resolve_publisher_alias_on_display_name() {
        let id = resolver().resolve(Some("Qwen"), "QwQ-32B");
        assert_eq!(id.publisher_slug, "alibaba");
        assert_eq!(id.model_slug, "qwq-32b");

        // Alias keys are display names; the slugged form does not match.
        let id = resolver().resolve(Some("qwen"), "QwQ-32B");
        assert_eq!(id.publisher_slug, "qwen");

        let id = resolver().resolve(Some("Z.ai"), "GLM-4.6");
        assert_eq!(id.publisher_slug, "zai");
        assert_eq!(id.model_slug, "glm-4-6");
    }

    #[test]
    fn resolve_model_alias_on_slug() {
        let r = resolver();
        assert_eq!(r.resolve_model("Gemini 3 Pro Preview"), "gemini-3-pro");
        assert_eq!(r.resolve_model("gemini-3-pro-preview"), "gemini-3-pro");
        assert_eq!(r.resolve_model("GPT-5.2 (high reasoning)"), "gpt-5-2");
    }

    #[test]
    fn missing_publisher_is_unknown() {
        let r = resolver();
        assert_eq!(r.resolve(None, "x").publisher_slug, UNKNOWN);
        assert_eq!(r.resolve(Some(""), "x").publisher_slug, UNKNOWN);
        assert_eq!(r.resolve(Some("   "), "x").publisher_slug, UNKNOWN);
    }

    #[test]
    fn canonical_publisher_name_uses_alias() {
        let r = resolver();
        assert_eq!(r.canonical_publisher_name("Google DeepMind"), "Google");
        assert_eq!(r.canonical_publisher_name(" Anthropic "), "Anthropic");
    }

    #[test]
    fn is_slug_checks() {
        assert!(is_slug("gpt-5-2"));
        assert!(!is_slug(""));
        assert!(!is_slug("-a"));
        assert!(!is_slug("a-"));
        assert!(!is_slug("a.b"));
        assert!(!is_slug("A"));
        assert!(!is_slug("a--b"));
    }
}
