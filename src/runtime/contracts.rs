use async_trait::async_trait;
use futures::future::BoxFuture;
use im::Vector;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::{OverlayError, RecordId, Result};
use crate::entity::EntityDescriptor;

/// Outcome of one gateway call: confirmed, or failed with the server's
/// reported reason. Failures are data here, not errors; the reconciler
/// turns them into user-facing behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActionOutcome {
    Confirmed,
    Failed(String),
}

impl ActionOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        ActionOutcome::Failed(reason.into())
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, ActionOutcome::Confirmed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ActionOutcome::Failed(_))
    }

    /// The server-reported reason, when the call failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            ActionOutcome::Confirmed => None,
            ActionOutcome::Failed(reason) => Some(reason),
        }
    }

    /// Converts into a `Result`, for callers that treat failure as an error.
    ///
    /// # Errors
    /// Returns `OverlayError::Gateway` carrying the reported reason.
    pub fn into_result(self) -> Result<()> {
        match self {
            ActionOutcome::Confirmed => Ok(()),
            ActionOutcome::Failed(reason) => Err(OverlayError::Gateway(reason)),
        }
    }
}

/// The signed-in user attached to the current session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: RecordId,
    pub email: String,
    pub name: Option<String>,
}

/// An authenticated session. Owner scoping for fetches and mutations comes
/// from `user.id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: SessionUser,
}

/// Server-side mutation endpoints for one entity. Implementations
/// re-validate the payload, authorize against the session owner, persist,
/// and invalidate the cached fetch path before reporting the outcome.
#[async_trait]
pub trait ServerActionGateway<D: EntityDescriptor>: Send + Sync {
    async fn create(&self, params: D::Params) -> ActionOutcome;
    async fn update(&self, id: RecordId, params: D::Params) -> ActionOutcome;
    async fn delete(&self, id: RecordId) -> ActionOutcome;
}

/// Authoritative, owner-scoped, relation-joined data for one entity. The
/// overlay seeds from this at mount and reseeds after every confirmed
/// mutation.
#[async_trait]
pub trait AuthoritativeSource<D: EntityDescriptor>: Send + Sync {
    /// The full list for the session owner, parents joined in.
    ///
    /// # Errors
    /// Returns `OverlayError::Unauthenticated` when no session is active.
    async fn fetch_list(&self) -> Result<Vector<D::Record>>;

    /// The client-side parent collection used for denormalization.
    async fn fetch_parents(&self) -> Result<D::ParentSet>;
}

/// Supplies the current user identity.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// # Errors
    /// Returns `OverlayError::Unauthenticated` when nobody is signed in.
    async fn current_session(&self) -> Result<Session>;
}

/// Refresh capability handed to the reconciler: re-fetch authoritative data
/// and reseed the overlay. Always an explicit dependency, never an ambient
/// invalidation call.
pub type RefreshFn = Arc<dyn Fn() -> BoxFuture<'static, Result<()>> + Send + Sync>;
