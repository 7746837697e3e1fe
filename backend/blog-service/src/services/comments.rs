use crate::db::{CommentRepository, PostRepository};
use crate::error::{AppError, Result};
use crate::metrics;
use crate::middleware::{ensure_can_delete, AuthUser};
use crate::models::{Comment, NewComment};
use crate::sanitize::clean_text;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Validate)]
pub struct CommentInput {
    #[validate(length(min = 1, message = "Comment content is required"))]
    pub content: String,
}

impl CommentInput {
    pub fn new(content: &str) -> Self {
        Self {
            content: content.trim().to_string(),
        }
    }
}

#[derive(Clone)]
pub struct CommentService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl CommentService {
    pub fn new(posts: Arc<dyn PostRepository>, comments: Arc<dyn CommentRepository>) -> Self {
        Self { posts, comments }
    }

    /// Add a comment to an existing post
    pub async fn create_comment(
        &self,
        author: &AuthUser,
        post_id: Uuid,
        input: CommentInput,
    ) -> Result<Comment> {
        input.validate()?;

        if self.posts.find_post(post_id).await?.is_none() {
            return Err(AppError::NotFound("Blog not found".to_string()));
        }

        let comment = self
            .comments
            .create_comment(NewComment {
                content: clean_text(&input.content),
                post_id,
                author_id: author.id,
            })
            .await?;

        tracing::info!(comment_id = %comment.id, post_id = %post_id, author_id = %author.id, "comment created");
        Ok(comment)
    }

    /// Admin-only. The comment must belong to `post_id`.
    pub async fn delete_comment(&self, actor: &AuthUser, post_id: Uuid, comment_id: Uuid) -> Result<()> {
        if let Err(err) = ensure_can_delete(actor) {
            metrics::record_deletion("comment", "forbidden");
            tracing::warn!(comment_id = %comment_id, user_id = %actor.id, "comment deletion refused");
            return Err(err);
        }

        let belongs = self
            .comments
            .find_comment(comment_id)
            .await?
            .is_some_and(|c| c.post_id == post_id);

        if !belongs || !self.comments.delete_comment(comment_id).await? {
            metrics::record_deletion("comment", "not_found");
            return Err(AppError::NotFound("Comment not found".to_string()));
        }

        metrics::record_deletion("comment", "deleted");
        tracing::info!(comment_id = %comment_id, post_id = %post_id, user_id = %actor.id, "comment deleted");
        Ok(())
    }
}
