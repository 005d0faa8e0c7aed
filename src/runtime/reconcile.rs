// ============================================================================
// Settlement handling. Once the gateway reports an outcome the overlay is
// NOT touched directly: a confirmed mutation triggers the injected refresh
// (reseed is the only place pending rows disappear), a failed one re-opens
// the form with the attempted values so the user can correct and resubmit.
// ============================================================================

use std::sync::Arc;
use tracing::{event, Level};

use crate::core::{MutationKind, ReconcilePolicy};
use crate::entity::EntityDescriptor;
use crate::runtime::contracts::{ActionOutcome, RefreshFn};
use crate::surface::{ModalSurface, Navigator, Notifier};

/// What one mutation settled to. Returned to callers so tests and demos can
/// assert on the terminal state without reaching into the collaborators.
#[derive(Debug, Clone)]
pub struct Settlement<R> {
    pub action: MutationKind,
    pub outcome: ActionOutcome,
    /// The optimistic record that was shown while the call was in flight.
    pub pending: R,
}

impl<R> Settlement<R> {
    pub fn is_confirmed(&self) -> bool {
        self.outcome.is_confirmed()
    }
}

/// Applies the post-gateway protocol for one entity.
pub struct Reconciler<D: EntityDescriptor> {
    refresh: RefreshFn,
    notifier: Arc<dyn Notifier>,
    modal: Arc<dyn ModalSurface<D::Record>>,
    navigator: Arc<dyn Navigator>,
    policy: ReconcilePolicy,
}

impl<D: EntityDescriptor> Reconciler<D> {
    pub fn new(
        refresh: RefreshFn,
        notifier: Arc<dyn Notifier>,
        modal: Arc<dyn ModalSurface<D::Record>>,
        navigator: Arc<dyn Navigator>,
        policy: ReconcilePolicy,
    ) -> Self {
        Reconciler {
            refresh,
            notifier,
            modal,
            navigator,
            policy,
        }
    }

    /// Settles one gateway outcome.
    ///
    /// Confirmed: re-fetch authoritative data, announce success, and for a
    /// delete navigate back to the collection when the policy says so. A
    /// refresh error is logged and swallowed; the next reseed will converge.
    ///
    /// Failed: re-open the form pre-filled with the attempted values and
    /// announce the failure. The optimistic row is left in place on purpose;
    /// it lives until the next reseed.
    pub async fn on_settled(
        &self,
        action: MutationKind,
        outcome: ActionOutcome,
        pending: D::Record,
    ) -> Settlement<D::Record> {
        match &outcome {
            ActionOutcome::Confirmed => {
                event!(
                    Level::INFO,
                    entity = D::ENTITY_NAME,
                    action = %action,
                    "mutation confirmed"
                );
                if let Err(err) = (self.refresh)().await {
                    log::warn!(
                        "refresh after confirmed {} of {} failed: {}",
                        action.verb(),
                        D::ENTITY_NAME,
                        err
                    );
                }
                self.notifier
                    .success(&format!("{} {}!", D::ENTITY_NAME, action.past_tense()));
                if action == MutationKind::Delete && self.policy.navigate_after_delete {
                    self.navigator.push(D::COLLECTION_PATH);
                }
            }
            ActionOutcome::Failed(reason) => {
                event!(
                    Level::ERROR,
                    entity = D::ENTITY_NAME,
                    action = %action,
                    error = %reason,
                    "mutation rejected"
                );
                self.modal.open(Some(pending.clone()));
                let detail = if reason.trim().is_empty() {
                    self.policy.fallback_message.as_str()
                } else {
                    reason.as_str()
                };
                self.notifier.failure(
                    &format!("Failed to {} {}", action.verb(), D::ENTITY_NAME),
                    detail,
                );
            }
        }

        Settlement {
            action,
            outcome,
            pending,
        }
    }
}
