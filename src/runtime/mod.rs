// ============================================================================
// Runtime: gateway contracts, the mutation dispatcher, and reconciliation.
// ============================================================================

pub mod contracts;
pub mod dispatcher;
pub mod reconcile;

pub use contracts::{
    ActionOutcome, AuthoritativeSource, RefreshFn, ServerActionGateway, Session, SessionProvider,
    SessionUser,
};
pub use dispatcher::{MutationDispatcher, SubmitMode};
pub use reconcile::{Reconciler, Settlement};
