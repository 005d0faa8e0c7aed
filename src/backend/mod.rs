// ============================================================================
// In-memory backend: the collaborator set the overlay runs against when no
// real server is involved. Tables, owner-scoped queries with relation
// joins, a path-invalidated list cache, mutation gateways, and sessions.
// ============================================================================

pub mod cache;
pub mod gateway;
pub mod queries;
pub mod session;
pub mod store;

pub use cache::ListCache;
pub use gateway::{FaultPlan, InMemoryGateway};
pub use queries::{NoParents, ParentSource, StoreSource, TableParents};
pub use session::SessionService;
pub use store::{new_table, EntityTable, TableHandle};

use chrono::Utc;
use std::sync::Arc;

use crate::core::{RecordId, Result};
use crate::entity::catalog::{
    Comment, CommentEntity, Post, PostEntity, Subscription, SubscriptionEntity, Topic,
    TopicEntity, Vote, VoteEntity,
};
use crate::entity::EntityDescriptor;
use crate::runtime::Session;

/// Gateway + authoritative source for one entity, sharing the backend's
/// tables, cache, and sessions.
pub struct EntityBackend<D: EntityDescriptor> {
    pub gateway: Arc<InMemoryGateway<D>>,
    pub source: Arc<StoreSource<D>>,
}

/// The full in-memory collaborator set: one table and list cache per
/// entity, plus the shared session service.
pub struct InMemoryBackend {
    topics: TableHandle<Topic>,
    posts: TableHandle<Post>,
    comments: TableHandle<Comment>,
    votes: TableHandle<Vote>,
    subscriptions: TableHandle<Subscription>,
    sessions: Arc<SessionService>,
    topic_cache: Arc<ListCache<Topic>>,
    post_cache: Arc<ListCache<Post>>,
    comment_cache: Arc<ListCache<Comment>>,
    vote_cache: Arc<ListCache<Vote>>,
    subscription_cache: Arc<ListCache<Subscription>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        InMemoryBackend {
            topics: new_table(),
            posts: new_table(),
            comments: new_table(),
            votes: new_table(),
            subscriptions: new_table(),
            sessions: SessionService::shared(),
            topic_cache: Arc::new(ListCache::new()),
            post_cache: Arc::new(ListCache::new()),
            comment_cache: Arc::new(ListCache::new()),
            vote_cache: Arc::new(ListCache::new()),
            subscription_cache: Arc::new(ListCache::new()),
        }
    }

    pub fn sessions(&self) -> Arc<SessionService> {
        self.sessions.clone()
    }

    /// Registers a user and leaves them signed in.
    pub async fn sign_up(
        &self,
        email: &str,
        name: Option<&str>,
        password: &str,
    ) -> Result<Session> {
        self.sessions.sign_up(email, name, password).await
    }

    pub fn topic_stack(&self) -> EntityBackend<TopicEntity> {
        EntityBackend {
            gateway: Arc::new(InMemoryGateway::new(
                self.topics.clone(),
                self.sessions.clone(),
                self.topic_cache.clone(),
            )),
            source: Arc::new(StoreSource::new(
                self.topics.clone(),
                Arc::new(NoParents),
                self.sessions.clone(),
                self.topic_cache.clone(),
            )),
        }
    }

    pub fn post_stack(&self) -> EntityBackend<PostEntity> {
        EntityBackend {
            gateway: Arc::new(InMemoryGateway::new(
                self.posts.clone(),
                self.sessions.clone(),
                self.post_cache.clone(),
            )),
            source: Arc::new(StoreSource::new(
                self.posts.clone(),
                Arc::new(TableParents::new(self.topics.clone())),
                self.sessions.clone(),
                self.post_cache.clone(),
            )),
        }
    }

    pub fn comment_stack(&self) -> EntityBackend<CommentEntity> {
        EntityBackend {
            gateway: Arc::new(InMemoryGateway::new(
                self.comments.clone(),
                self.sessions.clone(),
                self.comment_cache.clone(),
            )),
            source: Arc::new(StoreSource::new(
                self.comments.clone(),
                Arc::new(TableParents::new(self.posts.clone())),
                self.sessions.clone(),
                self.comment_cache.clone(),
            )),
        }
    }

    pub fn vote_stack(&self) -> EntityBackend<VoteEntity> {
        EntityBackend {
            gateway: Arc::new(InMemoryGateway::new(
                self.votes.clone(),
                self.sessions.clone(),
                self.vote_cache.clone(),
            )),
            source: Arc::new(StoreSource::new(
                self.votes.clone(),
                Arc::new(TableParents::new(self.posts.clone())),
                self.sessions.clone(),
                self.vote_cache.clone(),
            )),
        }
    }

    pub fn subscription_stack(&self) -> EntityBackend<SubscriptionEntity> {
        EntityBackend {
            gateway: Arc::new(InMemoryGateway::new(
                self.subscriptions.clone(),
                self.sessions.clone(),
                self.subscription_cache.clone(),
            )),
            source: Arc::new(StoreSource::new(
                self.subscriptions.clone(),
                Arc::new(TableParents::new(self.topics.clone())),
                self.sessions.clone(),
                self.subscription_cache.clone(),
            )),
        }
    }

    /// Inserts a topic directly into the store, bypassing the gateway.
    pub async fn seed_topic(&self, name: &str, slug: &str, author: Option<&RecordId>) -> Topic {
        let now = Utc::now();
        let stored = self.topics.write().await.insert(Topic {
            id: RecordId::unassigned(),
            name: name.into(),
            slug: slug.into(),
            author_id: author.cloned(),
            created_at: now,
            updated_at: now,
        });
        self.topic_cache.invalidate_path(TopicEntity::COLLECTION_PATH);
        stored
    }

    /// Inserts a post directly into the store, bypassing the gateway.
    pub async fn seed_post(
        &self,
        title: &str,
        slug: &str,
        content: &str,
        topic_id: &RecordId,
        author: &RecordId,
    ) -> Post {
        let now = Utc::now();
        let stored = self.posts.write().await.insert(Post {
            id: RecordId::unassigned(),
            title: title.into(),
            slug: slug.into(),
            content: content.into(),
            topic_id: topic_id.clone(),
            author_id: author.clone(),
            created_at: now,
            updated_at: now,
            topic: None,
        });
        self.post_cache.invalidate_path(PostEntity::COLLECTION_PATH);
        stored
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}
