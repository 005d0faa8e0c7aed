// ============================================================================
// Overlay Container
// ============================================================================
//
// Owns the overlay list for one mounted view. Exactly one writer: envelopes
// fold in through `dispatch`, and the list resets to the authoritative
// snapshot through `reseed`. Reseeding is the only operation that removes a
// placeholder sentinel from view.
//
// ============================================================================

use im::Vector;
use log::debug;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::reducer::reduce;
use crate::core::MutationEnvelope;
use crate::entity::{EntityDescriptor, EntityRecord};

/// Owned state cell for one mounted list view.
pub struct OverlayCell<D: EntityDescriptor> {
    seed: Vector<D::Record>,
    overlay: Vector<D::Record>,
    parents: D::ParentSet,
}

impl<D: EntityDescriptor> OverlayCell<D> {
    /// Mounts the cell on an authoritative snapshot: overlay = snapshot.
    pub fn seeded(authoritative: Vector<D::Record>, parents: D::ParentSet) -> Self {
        Self {
            overlay: authoritative.clone(),
            seed: authoritative,
            parents,
        }
    }

    /// Folds one envelope into the overlay, synchronously.
    pub fn dispatch(&mut self, envelope: &MutationEnvelope<D::Record>) {
        debug!(
            "{} overlay: folding {} envelope",
            D::ENTITY_NAME,
            envelope.kind
        );
        self.overlay = reduce::<D>(&self.overlay, envelope, &self.parents);
    }

    /// Replaces the overlay with a fresh authoritative snapshot, discarding
    /// every envelope folded since the previous seed.
    pub fn reseed(&mut self, authoritative: Vector<D::Record>) {
        debug!(
            "{} overlay: reseeding {} rows over {} (pending {})",
            D::ENTITY_NAME,
            authoritative.len(),
            self.overlay.len(),
            self.pending_count()
        );
        self.overlay = authoritative.clone();
        self.seed = authoritative;
    }

    /// Reseeds and refreshes the parent set used for denormalization.
    pub fn reseed_with_parents(&mut self, authoritative: Vector<D::Record>, parents: D::ParentSet) {
        self.parents = parents;
        self.reseed(authoritative);
    }

    /// The list the view renders.
    pub fn list(&self) -> Vector<D::Record> {
        self.overlay.clone()
    }

    /// The authoritative snapshot this cell was last seeded with.
    pub fn seed_list(&self) -> Vector<D::Record> {
        self.seed.clone()
    }

    /// Rows currently carrying a placeholder sentinel.
    pub fn pending_count(&self) -> usize {
        self.overlay
            .iter()
            .filter(|record| record.id().is_pending())
            .count()
    }

    pub fn has_pending(&self) -> bool {
        self.overlay.iter().any(|record| record.id().is_pending())
    }
}

/// Cloneable async handle over an [`OverlayCell`], for orchestration code
/// that crosses await points. The cell keeps its single-writer discipline;
/// the lock only serializes access.
pub struct OverlayHandle<D: EntityDescriptor> {
    inner: Arc<Mutex<OverlayCell<D>>>,
}

impl<D: EntityDescriptor> Clone for OverlayHandle<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D: EntityDescriptor> OverlayHandle<D> {
    pub fn new(cell: OverlayCell<D>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cell)),
        }
    }

    /// Folds one envelope into the overlay. Completes before the caller can
    /// await anything else, which is what makes the optimistic row visible
    /// ahead of the network round trip.
    pub async fn dispatch(&self, envelope: &MutationEnvelope<D::Record>) {
        let mut cell = self.inner.lock().await;
        cell.dispatch(envelope);
    }

    pub async fn list(&self) -> Vector<D::Record> {
        let cell = self.inner.lock().await;
        cell.list()
    }

    pub async fn reseed(&self, authoritative: Vector<D::Record>) {
        let mut cell = self.inner.lock().await;
        cell.reseed(authoritative);
    }

    pub async fn reseed_with_parents(
        &self,
        authoritative: Vector<D::Record>,
        parents: D::ParentSet,
    ) {
        let mut cell = self.inner.lock().await;
        cell.reseed_with_parents(authoritative, parents);
    }

    pub async fn pending_count(&self) -> usize {
        let cell = self.inner.lock().await;
        cell.pending_count()
    }
}
