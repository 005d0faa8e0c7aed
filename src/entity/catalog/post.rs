use chrono::{DateTime, Utc};
use im::Vector;
use log::warn;
use serde::{Deserialize, Serialize};

use super::topic::Topic;
use crate::core::{FieldErrors, RecordId, Result};
use crate::entity::contracts::EntityDescriptor;
use crate::entity::validate::{require_present, require_slug};
use crate::entity_record;

/// A post inside a topic. List views render the parent topic's fields, so
/// the record carries a denormalized relation slot filled client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: RecordId,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub topic_id: RecordId,
    pub author_id: RecordId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Parent topic attached by foreign-key lookup; `None` when the topic is
    /// not in the client's loaded set.
    pub topic: Option<Topic>,
}

entity_record!(Post, owner = author_id, timestamps);

/// Form parameters for creating or editing a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostParams {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub topic_id: RecordId,
}

impl Post {
    pub fn apply_params(&mut self, params: &PostParams) {
        self.title = params.title.clone();
        self.slug = params.slug.clone();
        self.content = params.content.clone();
        self.topic_id = params.topic_id.clone();
    }
}

/// Descriptor marker for the post entity.
pub enum PostEntity {}

impl EntityDescriptor for PostEntity {
    type Record = Post;
    type Params = PostParams;
    type ParentSet = Vector<Topic>;

    const ENTITY_NAME: &'static str = "Post";
    const COLLECTION_PATH: &'static str = "/posts";

    fn validate_params(params: &PostParams) -> Result<()> {
        let mut errors = FieldErrors::new();
        require_present(&mut errors, "title", &params.title);
        require_slug(&mut errors, "slug", &params.slug);
        require_present(&mut errors, "topic_id", params.topic_id.as_str());
        errors.into_result()
    }

    fn provisional(params: &PostParams, existing: Option<&Post>, now: DateTime<Utc>) -> Post {
        Post {
            id: existing
                .map(|p| p.id.clone())
                .unwrap_or_else(RecordId::unassigned),
            title: params.title.clone(),
            slug: params.slug.clone(),
            content: params.content.clone(),
            topic_id: params.topic_id.clone(),
            author_id: existing
                .map(|p| p.author_id.clone())
                .unwrap_or_else(RecordId::unassigned),
            created_at: existing.map(|p| p.created_at).unwrap_or(now),
            updated_at: existing.map(|p| p.updated_at).unwrap_or(now),
            topic: None,
        }
    }

    fn denormalize(record: &mut Post, topics: &Vector<Topic>) {
        record.topic = topics.iter().find(|t| t.id == record.topic_id).cloned();
        if record.topic.is_none() {
            warn!(
                "post '{}' references topic '{}' not present in the loaded set",
                record.title, record.topic_id
            );
        }
    }

    fn apply_params(record: &mut Post, params: &PostParams) {
        record.apply_params(params);
    }

    fn persist_guard(candidate: &Post, existing: &[Post]) -> Result<()> {
        if existing.iter().any(|p| p.slug == candidate.slug) {
            return Err(crate::core::OverlayError::Conflict("duplicate slug".into()));
        }
        Ok(())
    }
}
