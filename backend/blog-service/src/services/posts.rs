/// Post publishing, reading and moderation
use crate::db::{CommentRepository, PostRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::metrics;
use crate::middleware::{ensure_can_delete, AuthUser};
use crate::models::{AuthorSummary, Comment, NewPost, Post, DEFAULT_COVER_URL};
use crate::sanitize::clean_text;
use crate::storage::{ImageFolder, ImageStorage, ImageUpload};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Post fields as submitted, already trimmed
#[derive(Debug, Clone, Validate)]
pub struct PostInput {
    #[validate(length(min = 3, message = "Title should be at least 3 characters long"))]
    pub title: String,
    #[validate(length(min = 10, message = "Body should be at least 10 characters long"))]
    pub body: String,
}

impl PostInput {
    pub fn new(title: &str, body: &str) -> Self {
        Self {
            title: title.trim().to_string(),
            body: body.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub likes_count: usize,
    pub dislikes_count: usize,
    /// `None` once the author's account is gone
    pub author: Option<AuthorSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub likes_count: usize,
    pub author: Option<AuthorSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub post: PostView,
    pub comments: Vec<CommentView>,
}

#[derive(Clone)]
pub struct PostService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    images: Arc<dyn ImageStorage>,
}

impl PostService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        images: Arc<dyn ImageStorage>,
    ) -> Self {
        Self {
            users,
            posts,
            comments,
            images,
        }
    }

    /// Validate, escape and store a new post. The cover image falls back to
    /// the shared default.
    pub async fn create_post(
        &self,
        author: &AuthUser,
        input: PostInput,
        cover: Option<ImageUpload>,
    ) -> Result<Post> {
        input.validate()?;
        if let Some(cover) = &cover {
            cover.validate()?;
        }

        let cover_image_url = match &cover {
            Some(upload) => self.images.save(ImageFolder::Covers, upload).await?,
            None => DEFAULT_COVER_URL.to_string(),
        };

        let post = self
            .posts
            .create_post(NewPost {
                title: clean_text(&input.title),
                body: clean_text(&input.body),
                cover_image_url: cover_image_url.clone(),
                author_id: author.id,
            })
            .await;

        match post {
            Ok(post) => {
                tracing::info!(post_id = %post.id, author_id = %author.id, "post created");
                Ok(post)
            }
            Err(err) => {
                // Drop the orphaned upload; the insert error is what the caller sees
                if let Err(cleanup) = self.images.remove(&cover_image_url).await {
                    tracing::warn!(error = %cleanup, url = %cover_image_url, "failed to remove cover after insert error");
                }
                Err(err)
            }
        }
    }

    /// Home page listing, newest first
    pub async fn list_posts(&self) -> Result<Vec<PostView>> {
        let posts = self.posts.list_posts().await?;
        let authors = self
            .authors_by_id(posts.iter().map(|p| p.author_id))
            .await?;

        Ok(posts
            .into_iter()
            .map(|post| post_view(post, &authors))
            .collect())
    }

    /// A post with its comments, newest first.
    pub async fn get_post(&self, id: Uuid) -> Result<PostDetail> {
        let post = self
            .posts
            .find_post(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Blog not found".to_string()))?;
        let comments = self.comments.list_comments_for_post(id).await?;

        let authors = self
            .authors_by_id(
                std::iter::once(post.author_id).chain(comments.iter().map(|c| c.author_id)),
            )
            .await?;

        Ok(PostDetail {
            post: post_view(post, &authors),
            comments: comments
                .into_iter()
                .map(|comment| CommentView {
                    likes_count: comment.likes.len(),
                    author: authors.get(&comment.author_id).cloned(),
                    comment,
                })
                .collect(),
        })
    }

    /// Delete a post and its comments. Only administrators may do this; the
    /// role is checked before the post is looked up.
    pub async fn delete_post(&self, actor: &AuthUser, id: Uuid) -> Result<()> {
        if let Err(err) = ensure_can_delete(actor) {
            metrics::record_deletion("post", "forbidden");
            tracing::warn!(post_id = %id, user_id = %actor.id, "post deletion refused");
            return Err(err);
        }

        if !self.posts.delete_post_cascade(id).await? {
            metrics::record_deletion("post", "not_found");
            return Err(AppError::NotFound("Blog not found".to_string()));
        }

        metrics::record_deletion("post", "deleted");
        tracing::info!(post_id = %id, user_id = %actor.id, "post deleted");
        Ok(())
    }

    async fn authors_by_id(
        &self,
        ids: impl Iterator<Item = Uuid>,
    ) -> Result<HashMap<Uuid, AuthorSummary>> {
        let mut ids: Vec<Uuid> = ids.collect();
        ids.sort_unstable();
        ids.dedup();

        Ok(self
            .users
            .find_authors(&ids)
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect())
    }
}

fn post_view(post: Post, authors: &HashMap<Uuid, AuthorSummary>) -> PostView {
    PostView {
        likes_count: post.likes.len(),
        dislikes_count: post.dislikes.len(),
        author: authors.get(&post.author_id).cloned(),
        post,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{NewComment, Role};
    use crate::storage::LocalImageStorage;

    struct Fixture {
        store: MemoryStore,
        service: PostService,
        _dir: tempfile::TempDir,
    }

    fn fixture() -> Fixture {
        let store = MemoryStore::new();
        let dir = tempfile::tempdir().unwrap();
        let service = PostService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(LocalImageStorage::new(dir.path())),
        );
        Fixture {
            store,
            service,
            _dir: dir,
        }
    }

    fn actor(role: Role) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            email: "actor@example.com".into(),
            full_name: "Actor".into(),
            role,
        }
    }

    #[tokio::test]
    async fn test_create_post_escapes_and_defaults_cover() {
        let f = fixture();
        let post = f
            .service
            .create_post(
                &actor(Role::User),
                PostInput::new("  <b>Hi</b> ", "A body that is long enough"),
                None,
            )
            .await
            .unwrap();

        assert_eq!(post.title, "&lt;b&gt;Hi&lt;&#x2F;b&gt;");
        assert_eq!(post.cover_image_url, DEFAULT_COVER_URL);
    }

    #[tokio::test]
    async fn test_short_title_is_rejected() {
        let f = fixture();
        let err = f
            .service
            .create_post(
                &actor(Role::User),
                PostInput::new("  ab  ", "A body that is long enough"),
                None,
            )
            .await
            .unwrap_err();

        match err {
            AppError::Validation(fields) => {
                assert!(fields.contains_key("title"));
                assert!(!fields.contains_key("body"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(f.store.list_posts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_user_cannot_delete_post() {
        let f = fixture();
        let author = actor(Role::User);
        let post = f
            .service
            .create_post(&author, PostInput::new("Title", "A body that is long enough"), None)
            .await
            .unwrap();

        let err = f.service.delete_post(&author, post.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert!(f.store.find_post(post.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_forbidden_is_checked_before_existence() {
        let f = fixture();
        let err = f
            .service
            .delete_post(&actor(Role::User), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_admin_delete_cascades() {
        let f = fixture();
        let admin = actor(Role::Admin);
        let post = f
            .service
            .create_post(&admin, PostInput::new("Title", "A body that is long enough"), None)
            .await
            .unwrap();
        for _ in 0..2 {
            f.store
                .create_comment(NewComment {
                    content: "hello".into(),
                    post_id: post.id,
                    author_id: admin.id,
                })
                .await
                .unwrap();
        }

        f.service.delete_post(&admin, post.id).await.unwrap();

        assert!(f.store.find_post(post.id).await.unwrap().is_none());
        assert!(f.store.list_comments_for_post(post.id).await.unwrap().is_empty());
        assert!(matches!(
            f.service.get_post(post.id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }
}
