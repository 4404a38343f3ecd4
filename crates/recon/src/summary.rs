use crate::model::{BenchmarkOutcome, BenchmarkSyncResult, SyncSummary};

/// Count outcomes across one sync pass.
pub fn compute_summary(results: &[BenchmarkSyncResult]) -> SyncSummary {
    let mut summary = SyncSummary {
        total: results.len(),
        ..SyncSummary::default()
    };

    for r in results {
        match r.outcome {
            BenchmarkOutcome::Created => summary.created += 1,
            BenchmarkOutcome::Updated => summary.updated += 1,
            BenchmarkOutcome::Unchanged => summary.unchanged += 1,
            BenchmarkOutcome::SkippedUnknown => summary.skipped += 1,
            BenchmarkOutcome::Failed => summary.failed += 1,
        }
    }

    summary
}
