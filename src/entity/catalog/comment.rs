use chrono::{DateTime, Utc};
use im::Vector;
use log::warn;
use serde::{Deserialize, Serialize};

use super::post::Post;
use crate::core::{FieldErrors, RecordId, Result};
use crate::entity::contracts::EntityDescriptor;
use crate::entity::validate::require_present;
use crate::entity_record;

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: RecordId,
    pub text: String,
    pub post_id: RecordId,
    pub author_id: RecordId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Parent post attached by foreign-key lookup.
    pub post: Option<Post>,
}

entity_record!(Comment, owner = author_id, timestamps);

/// Form parameters for creating or editing a comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentParams {
    pub text: String,
    pub post_id: RecordId,
}

impl Comment {
    pub fn apply_params(&mut self, params: &CommentParams) {
        self.text = params.text.clone();
        self.post_id = params.post_id.clone();
    }
}

/// Descriptor marker for the comment entity.
pub enum CommentEntity {}

impl EntityDescriptor for CommentEntity {
    type Record = Comment;
    type Params = CommentParams;
    type ParentSet = Vector<Post>;

    const ENTITY_NAME: &'static str = "Comment";
    const COLLECTION_PATH: &'static str = "/comments";

    fn validate_params(params: &CommentParams) -> Result<()> {
        let mut errors = FieldErrors::new();
        require_present(&mut errors, "text", &params.text);
        require_present(&mut errors, "post_id", params.post_id.as_str());
        errors.into_result()
    }

    fn provisional(params: &CommentParams, existing: Option<&Comment>, now: DateTime<Utc>) -> Comment {
        Comment {
            id: existing
                .map(|c| c.id.clone())
                .unwrap_or_else(RecordId::unassigned),
            text: params.text.clone(),
            post_id: params.post_id.clone(),
            author_id: existing
                .map(|c| c.author_id.clone())
                .unwrap_or_else(RecordId::unassigned),
            created_at: existing.map(|c| c.created_at).unwrap_or(now),
            updated_at: existing.map(|c| c.updated_at).unwrap_or(now),
            post: None,
        }
    }

    fn denormalize(record: &mut Comment, posts: &Vector<Post>) {
        record.post = posts.iter().find(|p| p.id == record.post_id).cloned();
        if record.post.is_none() {
            warn!(
                "comment references post '{}' not present in the loaded set",
                record.post_id
            );
        }
    }

    fn apply_params(record: &mut Comment, params: &CommentParams) {
        record.apply_params(params);
    }
}
