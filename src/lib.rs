// ============================================================================
// Rustoverlay Library
// ============================================================================

pub mod backend;
pub mod core;
pub mod entity;
pub mod overlay;
pub mod runtime;
pub mod surface;
pub mod workbench;

// `entity_record!` expands through `$crate::paste::paste!`.
#[doc(hidden)]
pub use paste;

// Re-export main types for convenience
pub use crate::core::{
    FieldErrors, MutationEnvelope, MutationKind, OverlayError, ReconcilePolicy, RecordId, Result,
};
pub use crate::overlay::{DetailCell, OverlayCell, OverlayHandle};
pub use crate::workbench::ViewWorkbench;

// Re-export the entity catalog
pub use crate::entity::{
    catalog::{
        Comment, CommentEntity, CommentParams, Post, PostEntity, PostParams, Subscription,
        SubscriptionEntity, SubscriptionParams, Topic, TopicEntity, TopicParams, Vote, VoteEntity,
        VoteParams,
    },
    EntityDescriptor, EntityRecord,
};

// Re-export the runtime API
pub use crate::runtime::{
    ActionOutcome, AuthoritativeSource, MutationDispatcher, Reconciler, ServerActionGateway,
    Session, SessionProvider, SessionUser, Settlement, SubmitMode,
};

// Re-export the view surfaces and the in-memory backend
pub use crate::backend::InMemoryBackend;
pub use crate::surface::{ModalSurface, Navigator, Notifier};
