//! Applying decoded update batches to the entity store.

use starwatch_core::protocol::{DecodedBatch, RejectedItem};
use starwatch_core::types::EntityKey;
use starwatch_tracking::{EntityStore, IngestOutcome};

/// Summary of one inbound batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    pub server_us: u64,
    pub created: usize,
    pub updated: usize,
    pub stale: usize,
    pub rejected: Vec<RejectedItem>,
    /// Entities evicted by the TTL policy after this batch.
    pub expired: Vec<EntityKey>,
}

impl IngestReport {
    /// Number of items that reached the store (including stale ones).
    pub fn accepted(&self) -> usize {
        self.created + self.updated + self.stale
    }
}

/// Push every snapshot of `batch` into `store` at the batch timestamp.
pub fn apply_batch(store: &mut EntityStore, batch: DecodedBatch) -> IngestReport {
    let mut report = IngestReport {
        server_us: batch.server_us,
        rejected: batch.rejected,
        ..Default::default()
    };

    for rejected in &report.rejected {
        log::warn!(
            "ts={} rejected item #{}: {}",
            batch.server_us,
            rejected.index,
            rejected.error
        );
    }

    for snapshot in &batch.snapshots {
        match store.ingest(snapshot, batch.server_us) {
            IngestOutcome::Created => report.created += 1,
            IngestOutcome::Updated => report.updated += 1,
            IngestOutcome::Stale => report.stale += 1,
        }
    }

    log::debug!(
        "ts={} ingest: created={} updated={} stale={} rejected={}",
        report.server_us,
        report.created,
        report.updated,
        report.stale,
        report.rejected.len()
    );
    report
}
