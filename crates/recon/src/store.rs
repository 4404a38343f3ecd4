use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ReconError;
use crate::model::{BenchmarkRecord, ModelIdentity, ModelRecord, PublisherRecord};

/// Durable key/value storage for catalog records.
///
/// Read-modify-write per key, last writer wins. Loads distinguish "absent"
/// (`Ok(None)`) from "present but unparseable" (`Err(CorruptRecord)`); the
/// sync pipelines treat the latter as absent.
pub trait CatalogStore {
    fn load_benchmark(&self, id: &str) -> Result<Option<BenchmarkRecord>, ReconError>;
    fn save_benchmark(&mut self, record: &BenchmarkRecord) -> Result<(), ReconError>;
    /// Ids of every stored benchmark, sorted.
    fn benchmark_ids(&self) -> Result<Vec<String>, ReconError>;

    fn load_model(&self, identity: &ModelIdentity) -> Result<Option<ModelRecord>, ReconError>;
    fn save_model(
        &mut self,
        identity: &ModelIdentity,
        record: &ModelRecord,
    ) -> Result<(), ReconError>;
    /// Publisher slugs under which a model with `model_slug` is stored.
    fn publishers_for_model(&self, model_slug: &str) -> Result<Vec<String>, ReconError>;

    fn load_publisher(&self, slug: &str) -> Result<Option<PublisherRecord>, ReconError>;
    fn save_publisher(&mut self, slug: &str, record: &PublisherRecord) -> Result<(), ReconError>;
}

/// Pretty JSON with 4-space indentation, the content tree's on-disk format.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, ReconError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .map_err(|e| ReconError::Serialize(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| ReconError::Serialize(e.to_string()))
}

/// Parse a stored metadata record, mapping failures to `CorruptRecord`.
pub fn parse_record<T: DeserializeOwned>(key: &str, text: &str) -> Result<T, ReconError> {
    serde_json::from_str(text).map_err(|e| ReconError::CorruptRecord {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Store holding serialized JSON in memory. Records go through the same
/// encode/parse path as the filesystem store.
#[derive(Debug, Default, Clone)]
pub struct MemoryCatalog {
    benchmarks: BTreeMap<String, String>,
    models: BTreeMap<(String, String), String>,
    publishers: BTreeMap<String, String>,
    writes: usize,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw text for a benchmark id, bypassing serialization.
    pub fn insert_raw_benchmark(&mut self, id: &str, text: &str) {
        self.benchmarks.insert(id.to_string(), text.to_string());
    }

    pub fn raw_benchmark(&self, id: &str) -> Option<&str> {
        self.benchmarks.get(id).map(String::as_str)
    }

    /// Number of save calls since construction.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl CatalogStore for MemoryCatalog {
    fn load_benchmark(&self, id: &str) -> Result<Option<BenchmarkRecord>, ReconError> {
        self.benchmarks
            .get(id)
            .map(|text| BenchmarkRecord::from_json(id, text))
            .transpose()
    }

    fn save_benchmark(&mut self, record: &BenchmarkRecord) -> Result<(), ReconError> {
        let text = to_pretty_json(record)?;
        self.benchmarks.insert(record.id.clone(), text);
        self.writes += 1;
        Ok(())
    }

    fn benchmark_ids(&self) -> Result<Vec<String>, ReconError> {
        Ok(self.benchmarks.keys().cloned().collect())
    }

    fn load_model(&self, identity: &ModelIdentity) -> Result<Option<ModelRecord>, ReconError> {
        let key = (identity.publisher_slug.clone(), identity.model_slug.clone());
        self.models
            .get(&key)
            .map(|text| parse_record(&format!("models/{}", identity.model_ref()), text))
            .transpose()
    }

    fn save_model(
        &mut self,
        identity: &ModelIdentity,
        record: &ModelRecord,
    ) -> Result<(), ReconError> {
        let text = to_pretty_json(record)?;
        let key = (identity.publisher_slug.clone(), identity.model_slug.clone());
        self.models.insert(key, text);
        self.writes += 1;
        Ok(())
    }

    fn publishers_for_model(&self, model_slug: &str) -> Result<Vec<String>, ReconError> {
        Ok(self
            .models
            .keys()
            .filter(|(_, m)| m == model_slug)
            .map(|(p, _)| p.clone())
            .collect())
    }

    fn load_publisher(&self, slug: &str) -> Result<Option<PublisherRecord>, ReconError> {
        self.publishers
            .get(slug)
            .map(|text| parse_record(&format!("publishers/{slug}"), text))
            .transpose()
    }

    fn save_publisher(&mut self, slug: &str, record: &PublisherRecord) -> Result<(), ReconError> {
        let text = to_pretty_json(record)?;
        self.publishers.insert(slug.to_string(), text);
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_json_uses_four_spaces() {
        let record = PublisherRecord {
            name: "OpenAI".into(),
            color: "#1f1f1f".into(),
            logo: "/logos/openai.svg".into(),
            website: None,
        };
        let text = to_pretty_json(&record).unwrap();
        assert!(text.contains("\n    \"name\": \"OpenAI\""), "{text}");
        assert!(!text.contains("website"));
    }

    #[test]
    fn pretty_json_keeps_utf8() {
        let text = to_pretty_json(&serde_json::json!({ "name": "τ-bench" })).unwrap();
        assert!(text.contains("τ-bench"));
    }

    #[test]
    fn corrupt_benchmark_is_reported() {
        let mut store = MemoryCatalog::new();
        store.insert_raw_benchmark("hle", "{ not json");
        let err = store.load_benchmark("hle").unwrap_err();
        assert!(matches!(err, ReconError::CorruptRecord { .. }));
        assert!(store.load_benchmark("missing").unwrap().is_none());
    }

    #[test]
    fn model_lookup_by_slug() {
        let mut store = MemoryCatalog::new();
        let id = ModelIdentity {
            publisher_slug: "anthropic".into(),
            model_slug: "claude-4-5-sonnet".into(),
        };
        let record = ModelRecord {
            name: "Claude 4.5 Sonnet".into(),
            publisher: "anthropic".into(),
            ..ModelRecord::default()
        };
        store.save_model(&id, &record).unwrap();
        assert_eq!(store.load_model(&id).unwrap(), Some(record));
        assert_eq!(store.publishers_for_model("claude-4-5-sonnet").unwrap(), vec!["anthropic"]);
        assert!(store.publishers_for_model("gpt-5").unwrap().is_empty());
        assert_eq!(store.writes(), 1);
    }
}
