use super::reaction::{ReactionCounts, ReactionSet};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Comment on a post. Comments can be liked but not disliked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub likes: ReactionSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn reaction_counts(&self) -> ReactionCounts {
        ReactionCounts {
            likes: self.likes.len(),
            dislikes: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub content: String,
    pub post_id: Uuid,
    pub author_id: Uuid,
}
