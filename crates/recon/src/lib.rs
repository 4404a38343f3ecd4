//! `benchcat-recon`: benchmark record reconciliation engine.
//!
//! Pure engine crate: receives provider payloads and a [`store::CatalogStore`],
//! returns a [`SyncReport`]. No CLI or network dependencies.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod identity;
pub mod merge;
pub mod migrate;
pub mod model;
pub mod normalize;
pub mod snapshot;
pub mod store;
pub mod summary;
pub mod sync;

pub use config::CatalogConfig;
pub use error::ReconError;
pub use identity::IdentityResolver;
pub use merge::{merge, MergeOutcome};
pub use migrate::apply_ref_corrections;
pub use model::{
    AggregatorModel, BenchmarkOutcome, BenchmarkRecord, ExtractedBenchmark, LeaderboardRow,
    ModelIdentity, ModelRef, ScoreEntry, SyncReport,
};
pub use store::{CatalogStore, MemoryCatalog};
pub use sync::{sync_aggregator, sync_extracted, sync_leaderboard, SyncContext};
