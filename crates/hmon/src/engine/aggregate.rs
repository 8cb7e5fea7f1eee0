use serde::Serialize;

use crate::monitor::{BatchResult, CheckResult};

/// Success and failure counts over a set of results.
/// `success + failure == total` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub success: usize,
    pub failure: usize,
}

impl RunSummary {
    fn record(&mut self, result: &CheckResult) {
        self.total += 1;
        if result.is_success() {
            self.success += 1;
        } else {
            self.failure += 1;
        }
    }

    /// True when no check failed
    pub fn all_passed(&self) -> bool {
        self.failure == 0
    }
}

/// Count successes and failures over all results of all batches
pub fn aggregate<'a>(batches: impl IntoIterator<Item = &'a BatchResult>) -> RunSummary {
    let mut summary = RunSummary::default();
    for result in batches.into_iter().flat_map(BatchResult::results) {
        summary.record(result);
    }
    summary
}

impl BatchResult {
    /// Counts for this batch alone
    pub fn summary(&self) -> RunSummary {
        aggregate([self])
    }
}

/// Results of a whole run, grouped per batch
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub batches: Vec<BatchResult>,
    pub summary: RunSummary,
}

impl RunReport {
    pub fn new(batches: Vec<BatchResult>) -> Self {
        let summary = aggregate(&batches);
        Self { batches, summary }
    }

    /// Find a batch by name
    pub fn batch(&self, name: &str) -> Option<&BatchResult> {
        self.batches.iter().find(|batch| batch.name() == name)
    }

    /// Per-batch counts in batch order
    pub fn batch_summaries(&self) -> impl Iterator<Item = (&str, RunSummary)> + '_ {
        self.batches.iter().map(|batch| (batch.name(), batch.summary()))
    }
}
