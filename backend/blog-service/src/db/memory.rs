//! In-memory store backing all three repositories.
//!
//! Every mutation happens under a single write lock, so a reaction update is
//! applied to the current sets atomically, like the Postgres statement.
use super::{CommentRepository, PostRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::models::{
    AuthorSummary, Comment, NewComment, NewPost, NewUser, Post, ReactionCounts, ReactionSet,
    ReactionUpdate, User, UserChanges,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == new_user.email) {
            return Err(AppError::Conflict("email already registered".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email,
            full_name: new_user.full_name,
            password_hash: new_user.password_hash,
            avatar_url: new_user.avatar_url,
            role: new_user.role,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<User> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("user {}", id)))?;

        if let Some(full_name) = changes.full_name {
            user.full_name = full_name;
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(avatar_url) = changes.avatar_url {
            user.avatar_url = avatar_url;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool> {
        Ok(self.tables.write().await.users.remove(&id).is_some())
    }

    async fn find_authors(&self, ids: &[Uuid]) -> Result<Vec<AuthorSummary>> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.users.get(id))
            .map(User::summary)
            .collect())
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create_post(&self, new_post: NewPost) -> Result<Post> {
        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            title: new_post.title,
            body: new_post.body,
            cover_image_url: new_post.cover_image_url,
            author_id: new_post.author_id,
            likes: ReactionSet::new(),
            dislikes: ReactionSet::new(),
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn list_posts(&self) -> Result<Vec<Post>> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables.posts.values().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn apply_post_reaction(
        &self,
        id: Uuid,
        update: ReactionUpdate,
    ) -> Result<Option<ReactionCounts>> {
        let mut tables = self.tables.write().await;
        let Some(post) = tables.posts.get_mut(&id) else {
            return Ok(None);
        };

        update.apply_to(&mut post.likes, Some(&mut post.dislikes));
        post.updated_at = Utc::now();
        Ok(Some(post.reaction_counts()))
    }

    async fn delete_post_cascade(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.posts.remove(&id).is_none() {
            return Ok(false);
        }
        tables.comments.retain(|_, c| c.post_id != id);
        Ok(true)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn create_comment(&self, new_comment: NewComment) -> Result<Comment> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&new_comment.post_id) {
            return Err(AppError::NotFound(format!("post {}", new_comment.post_id)));
        }

        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4(),
            content: new_comment.content,
            post_id: new_comment.post_id,
            author_id: new_comment.author_id,
            likes: ReactionSet::new(),
            created_at: now,
            updated_at: now,
        };
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn list_comments_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }

    async fn apply_comment_reaction(
        &self,
        id: Uuid,
        update: ReactionUpdate,
    ) -> Result<Option<ReactionCounts>> {
        let mut tables = self.tables.write().await;
        let Some(comment) = tables.comments.get_mut(&id) else {
            return Ok(None);
        };

        update.apply_to(&mut comment.likes, None);
        comment.updated_at = Utc::now();
        Ok(Some(comment.reaction_counts()))
    }

    async fn delete_comment(&self, id: Uuid) -> Result<bool> {
        Ok(self.tables.write().await.comments.remove(&id).is_some())
    }
}
