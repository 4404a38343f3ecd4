// Content-tree catalog store
//
// Layout under the content root:
//   benchmarks/<id>.json
//   models/<publisher>/<model>.json
//   publishers/<publisher>.json

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use benchcat_recon::error::ReconError;
use benchcat_recon::model::{BenchmarkRecord, ModelIdentity, ModelRecord, PublisherRecord};
use benchcat_recon::store::{parse_record, to_pretty_json, CatalogStore};

/// [`CatalogStore`] backed by the JSON content tree the site is built from.
#[derive(Debug, Clone)]
pub struct FsCatalog {
    root: PathBuf,
}

impl FsCatalog {
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn benchmark_path(&self, id: &str) -> PathBuf {
        self.root.join("benchmarks").join(format!("{id}.json"))
    }

    fn model_path(&self, identity: &ModelIdentity) -> PathBuf {
        self.root
            .join("models")
            .join(&identity.publisher_slug)
            .join(format!("{}.json", identity.model_slug))
    }

    fn publisher_path(&self, slug: &str) -> PathBuf {
        self.root.join("publishers").join(format!("{slug}.json"))
    }
}

/// `Ok(None)` when the file does not exist.
fn read_optional(path: &Path) -> Result<Option<String>, ReconError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ReconError::Io(format!("{}: {e}", path.display()))),
    }
}

/// Write via a sibling temp file so readers never see a half-written record.
fn write_file(path: &Path, text: &str) -> Result<(), ReconError> {
    let io_err = |e: std::io::Error| ReconError::Io(format!("{}: {e}", path.display()));

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, text).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

/// Entries of `dir`, or nothing if it does not exist yet.
fn list_dir(dir: &Path) -> Result<Vec<fs::DirEntry>, ReconError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(ReconError::Io(format!("{}: {e}", dir.display()))),
    };
    entries
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ReconError::Io(format!("{}: {e}", dir.display())))
}

impl CatalogStore for FsCatalog {
    fn load_benchmark(&self, id: &str) -> Result<Option<BenchmarkRecord>, ReconError> {
        read_optional(&self.benchmark_path(id))?
            .map(|text| BenchmarkRecord::from_json(id, &text))
            .transpose()
    }

    fn save_benchmark(&mut self, record: &BenchmarkRecord) -> Result<(), ReconError> {
        write_file(&self.benchmark_path(&record.id), &to_pretty_json(record)?)
    }

    fn benchmark_ids(&self) -> Result<Vec<String>, ReconError> {
        let mut ids: Vec<String> = list_dir(&self.root.join("benchmarks"))?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect();
        ids.sort();
        Ok(ids)
    }

    fn load_model(&self, identity: &ModelIdentity) -> Result<Option<ModelRecord>, ReconError> {
        let key = format!("models/{}", identity.model_ref());
        read_optional(&self.model_path(identity))?
            .map(|text| parse_record(&key, &text))
            .transpose()
    }

    fn save_model(
        &mut self,
        identity: &ModelIdentity,
        record: &ModelRecord,
    ) -> Result<(), ReconError> {
        write_file(&self.model_path(identity), &to_pretty_json(record)?)
    }

    fn publishers_for_model(&self, model_slug: &str) -> Result<Vec<String>, ReconError> {
        let file_name = format!("{model_slug}.json");
        let mut publishers: Vec<String> = list_dir(&self.root.join("models"))?
            .into_iter()
            .filter(|entry| entry.path().join(&file_name).is_file())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .collect();
        publishers.sort();
        Ok(publishers)
    }

    fn load_publisher(&self, slug: &str) -> Result<Option<PublisherRecord>, ReconError> {
        let key = format!("publishers/{slug}");
        read_optional(&self.publisher_path(slug))?
            .map(|text| parse_record(&key, &text))
            .transpose()
    }

    fn save_publisher(&mut self, slug: &str, record: &PublisherRecord) -> Result<(), ReconError> {
        write_file(&self.publisher_path(slug), &to_pretty_json(record)?)
    }
}
