use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad benchmark id, invalid alias target, etc.).
    ConfigValidation(String),
    /// Scores reference a benchmark id absent from the metadata registry.
    UnknownBenchmark(String),
    /// A persisted record exists but cannot be parsed.
    CorruptRecord { key: String, reason: String },
    /// Record could not be serialized for writing.
    Serialize(String),
    /// IO error (file read/write, etc.).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::UnknownBenchmark(id) => write!(f, "unknown benchmark id: {id}"),
            Self::CorruptRecord { key, reason } => {
                write!(f, "record '{key}' cannot be parsed: {reason}")
            }
            Self::Serialize(msg) => write!(f, "serialization error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
