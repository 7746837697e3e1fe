use super::reaction::{ReactionCounts, ReactionSet};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Cover image used when a post is created without one
pub const DEFAULT_COVER_URL: &str = "/uploads/default.png";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub cover_image_url: String,
    pub author_id: Uuid,
    pub likes: ReactionSet,
    pub dislikes: ReactionSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn reaction_counts(&self) -> ReactionCounts {
        ReactionCounts {
            likes: self.likes.len(),
            dislikes: Some(self.dislikes.len()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub cover_image_url: String,
    pub author_id: Uuid,
}
