/// Reaction toggle engine
///
/// A toggle reads the caller's current membership, plans a targeted update
/// and hands it to the store as one atomic write. Likes and dislikes on a
/// post are mutually exclusive: adding to one set always removes from the
/// other.
use crate::db::{CommentRepository, PostRepository};
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::{Comment, Post, ReactionCounts, ReactionKind, ReactionUpdate, SetOp};
use std::sync::Arc;
use uuid::Uuid;

/// Plan the toggle of `kind` on a post for `user_id`
pub fn plan_post_toggle(post: &Post, user_id: Uuid, kind: ReactionKind) -> ReactionUpdate {
    let target = match kind {
        ReactionKind::Like => &post.likes,
        ReactionKind::Dislike => &post.dislikes,
    };

    // An add always clears the opposite set, whatever the snapshot shows.
    let (target_op, opposite_op) = if target.contains(user_id) {
        (SetOp::RemoveIfPresent, SetOp::Keep)
    } else {
        (SetOp::AddIfAbsent, SetOp::RemoveIfPresent)
    };

    match kind {
        ReactionKind::Like => ReactionUpdate {
            user_id,
            likes: target_op,
            dislikes: opposite_op,
        },
        ReactionKind::Dislike => ReactionUpdate {
            user_id,
            likes: opposite_op,
            dislikes: target_op,
        },
    }
}

/// Plan a like toggle on a comment
pub fn plan_comment_like(comment: &Comment, user_id: Uuid) -> ReactionUpdate {
    let likes = if comment.likes.contains(user_id) {
        SetOp::RemoveIfPresent
    } else {
        SetOp::AddIfAbsent
    };

    ReactionUpdate {
        user_id,
        likes,
        dislikes: SetOp::Keep,
    }
}

#[derive(Clone)]
pub struct ReactionService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl ReactionService {
    pub fn new(posts: Arc<dyn PostRepository>, comments: Arc<dyn CommentRepository>) -> Self {
        Self { posts, comments }
    }

    /// Toggle a like or dislike on a post and return the stored counts.
    pub async fn toggle_post(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        kind: ReactionKind,
    ) -> Result<ReactionCounts> {
        let post = self
            .posts
            .find_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Blog not found".to_string()))?;

        let update = plan_post_toggle(&post, user_id, kind);
        let counts = self
            .posts
            .apply_post_reaction(post_id, update)
            .await?
            .ok_or_else(|| AppError::NotFound("Blog not found".to_string()))?;

        metrics::record_reaction("post", kind.as_str(), update.adds_reaction());
        tracing::info!(
            post_id = %post_id,
            user_id = %user_id,
            kind = kind.as_str(),
            likes = counts.likes,
            dislikes = counts.dislikes.unwrap_or(0),
            "post reaction toggled"
        );
        Ok(counts)
    }

    /// Toggle a like on a comment that must belong to `post_id`.
    pub async fn toggle_comment_like(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        user_id: Uuid,
    ) -> Result<ReactionCounts> {
        let comment = self
            .comments
            .find_comment(comment_id)
            .await?
            .filter(|c| c.post_id == post_id)
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

        let update = plan_comment_like(&comment, user_id);
        let counts = self
            .comments
            .apply_comment_reaction(comment_id, update)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

        metrics::record_reaction("comment", ReactionKind::Like.as_str(), update.adds_reaction());
        tracing::info!(
            post_id = %post_id,
            comment_id = %comment_id,
            user_id = %user_id,
            likes = counts.likes,
            "comment like toggled"
        );
        Ok(counts)
    }
}
