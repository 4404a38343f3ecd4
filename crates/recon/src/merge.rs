//! Merge a freshly computed benchmark record with the persisted one.
//!
//! State per benchmark id across syncs:
//!
//! ```text
//! ABSENT ──first sync──▶ CREATED ──each sync──▶ UNCHANGED | UPDATED
//! ```
//!
//! The change test looks at `snapshot` only. Name, description, tags and
//! metrics come from static metadata; editing them must not move
//! `lastUpdated`. `trending` belongs to the front end and is always carried
//! over from the existing record.

use chrono::NaiveDate;

use crate::model::{BenchmarkOutcome, BenchmarkRecord, TrendingState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Created,
    Unchanged,
    Updated,
}

impl MergeOutcome {
    pub fn changed(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

impl From<MergeOutcome> for BenchmarkOutcome {
    fn from(outcome: MergeOutcome) -> Self {
        match outcome {
            MergeOutcome::Created => BenchmarkOutcome::Created,
            MergeOutcome::Unchanged => BenchmarkOutcome::Unchanged,
            MergeOutcome::Updated => BenchmarkOutcome::Updated,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Merged {
    pub record: BenchmarkRecord,
    pub outcome: MergeOutcome,
}

/// Combine `fresh` with `existing`. The output replaces the stored record
/// wholesale; only `trending` and (when the snapshot is equal) `last_updated`
/// come from `existing`.
pub fn merge(
    mut fresh: BenchmarkRecord,
    existing: Option<&BenchmarkRecord>,
    today: NaiveDate,
) -> Merged {
    let Some(existing) = existing else {
        fresh.trending = TrendingState::default();
        fresh.last_updated = today;
        return Merged {
            record: fresh,
            outcome: MergeOutcome::Created,
        };
    };

    fresh.trending = existing.trending;

    let outcome = if fresh.snapshot == existing.snapshot {
        fresh.last_updated = existing.last_updated;
        MergeOutcome::Unchanged
    } else {
        fresh.last_updated = today;
        MergeOutcome::Updated
    };

    Merged {
        record: fresh,
        outcome,
    }
}
