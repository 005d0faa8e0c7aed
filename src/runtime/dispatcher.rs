// ============================================================================
// Mutation orchestration. One submit walks a fixed sequence: validate,
// build the provisional record, close the edit surface, fold the envelope
// into the overlay, then call the gateway. The first four steps finish
// before the network is awaited, so the optimistic row is visible while the
// call is in flight.
// ============================================================================

use chrono::Utc;
use std::sync::Arc;
use tracing::{info_span, Instrument};

use crate::core::{MutationEnvelope, MutationKind, OverlayError, Result};
use crate::entity::{EntityDescriptor, EntityRecord};
use crate::overlay::OverlayHandle;
use crate::runtime::contracts::ServerActionGateway;
use crate::runtime::reconcile::{Reconciler, Settlement};
use crate::surface::ModalSurface;

/// Whether a form submission creates a new record or rewrites an existing
/// one. Forms that serve both roles derive it from the record they were
/// opened with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMode {
    Create,
    Update,
}

impl SubmitMode {
    /// Editing when the form was opened on a persisted record, creating
    /// otherwise. A record carrying a placeholder identifier counts as
    /// creating: it came from a failed submit being retried.
    pub fn for_record<R: EntityRecord>(existing: Option<&R>) -> Self {
        match existing {
            Some(record) if record.id().is_persisted() => SubmitMode::Update,
            _ => SubmitMode::Create,
        }
    }

    pub fn kind(&self) -> MutationKind {
        match self {
            SubmitMode::Create => MutationKind::Create,
            SubmitMode::Update => MutationKind::Update,
        }
    }
}

/// Drives user-initiated mutations for one entity through the overlay and
/// the gateway, then hands the outcome to the reconciler.
pub struct MutationDispatcher<D: EntityDescriptor> {
    overlay: OverlayHandle<D>,
    gateway: Arc<dyn ServerActionGateway<D>>,
    modal: Arc<dyn ModalSurface<D::Record>>,
    reconciler: Reconciler<D>,
}

impl<D: EntityDescriptor> MutationDispatcher<D> {
    pub fn new(
        overlay: OverlayHandle<D>,
        gateway: Arc<dyn ServerActionGateway<D>>,
        modal: Arc<dyn ModalSurface<D::Record>>,
        reconciler: Reconciler<D>,
    ) -> Self {
        MutationDispatcher {
            overlay,
            gateway,
            modal,
            reconciler,
        }
    }

    pub fn overlay(&self) -> &OverlayHandle<D> {
        &self.overlay
    }

    /// Submits a create or update.
    ///
    /// `existing` carries the record the form was opened with. In update
    /// mode it is required and must be persisted; in create mode it is the
    /// fallback for unset optional fields, so a retried submission keeps the
    /// values the user already entered.
    ///
    /// # Errors
    /// `OverlayError::Validation` when the params fail the field contract,
    /// `OverlayError::Conflict` when an update targets a record that is
    /// missing or still pending. A gateway failure is NOT an error here; it
    /// settles into the returned `Settlement`.
    pub async fn submit(
        &self,
        params: D::Params,
        mode: SubmitMode,
        existing: Option<D::Record>,
    ) -> Result<Settlement<D::Record>> {
        let span = info_span!(
            "overlay.submit",
            entity = D::ENTITY_NAME,
            mode = ?mode
        );
        async {
            D::validate_params(&params)?;

            if let Some(record) = existing.as_ref() {
                if record.id().is_pending() {
                    return Err(OverlayError::Conflict(format!(
                        "{} mutation still in flight",
                        D::ENTITY_NAME
                    )));
                }
            }
            if mode == SubmitMode::Update
                && !existing
                    .as_ref()
                    .map(|record| record.id().is_persisted())
                    .unwrap_or(false)
            {
                return Err(OverlayError::Conflict(format!(
                    "update requires a persisted {}",
                    D::ENTITY_NAME
                )));
            }

            let provisional = D::provisional(&params, existing.as_ref(), Utc::now());

            self.modal.close();
            let envelope = MutationEnvelope::new(mode.kind(), provisional.clone());
            self.overlay.dispatch(&envelope).await;

            let outcome = match mode {
                SubmitMode::Create => self.gateway.create(params).await,
                SubmitMode::Update => {
                    self.gateway
                        .update(provisional.id().clone(), params)
                        .await
                }
            };

            Ok(self
                .reconciler
                .on_settled(mode.kind(), outcome, provisional)
                .await)
        }
        .instrument(span)
        .await
    }

    /// Marks the record as deleting in the overlay and asks the gateway to
    /// remove it. The row stays in the list, identifier rewritten, until a
    /// reseed drops it.
    ///
    /// # Errors
    /// `OverlayError::Conflict` when the record is not persisted; placeholder
    /// identifiers never reach the gateway.
    pub async fn request_delete(&self, existing: D::Record) -> Result<Settlement<D::Record>> {
        let span = info_span!("overlay.delete", entity = D::ENTITY_NAME);
        async {
            if !existing.id().is_persisted() {
                return Err(OverlayError::Conflict(format!(
                    "delete requires a persisted {}",
                    D::ENTITY_NAME
                )));
            }
            let id = existing.id().clone();

            self.modal.close();
            self.overlay
                .dispatch(&MutationEnvelope::delete(existing.clone()))
                .await;

            let outcome = self.gateway.delete(id).await;

            Ok(self
                .reconciler
                .on_settled(MutationKind::Delete, outcome, existing)
                .await)
        }
        .instrument(span)
        .await
    }
}
