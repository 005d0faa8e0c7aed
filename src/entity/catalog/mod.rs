// ============================================================================
// Entity Catalog
// ============================================================================
//
// The five record shapes the overlay manages, one module each: field layout,
// form parameters, validation rules, and the descriptor wiring denormalization
// against the client-side parent set.
//
// ============================================================================

pub mod comment;
pub mod post;
pub mod subscription;
pub mod topic;
pub mod vote;

pub use comment::{Comment, CommentEntity, CommentId, CommentParams};
pub use post::{Post, PostEntity, PostId, PostParams};
pub use subscription::{Subscription, SubscriptionEntity, SubscriptionId, SubscriptionParams};
pub use topic::{Topic, TopicEntity, TopicId, TopicParams};
pub use vote::{Vote, VoteEntity, VoteId, VoteParams};
