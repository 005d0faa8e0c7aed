use crate::core::MutationEnvelope;
use crate::entity::EntityRecord;

/// Single-record optimistic cell for detail views.
///
/// Where a list view folds envelopes into a list, a detail view holds one
/// record and replaces it wholesale with each envelope's payload, so edits
/// show immediately while the round trip settles. Reseeding swaps in the
/// freshly fetched authoritative record.
pub struct DetailCell<R: EntityRecord> {
    record: R,
}

impl<R: EntityRecord> DetailCell<R> {
    pub fn new(record: R) -> Self {
        Self { record }
    }

    /// Replaces the shown record with the envelope's payload.
    pub fn apply(&mut self, envelope: &MutationEnvelope<R>) {
        self.record = envelope.data.clone();
    }

    /// Swaps in the authoritative record after reconciliation.
    pub fn reseed(&mut self, record: R) {
        self.record = record;
    }

    pub fn record(&self) -> &R {
        &self.record
    }
}
