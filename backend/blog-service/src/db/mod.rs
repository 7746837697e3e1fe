/// Persistence layer
///
/// The repository traits are the only seam between services and storage.
/// `Pg*Repository` types back them with Postgres; `MemoryStore` implements all
/// three for tests and `DATABASE_BACKEND=memory` runs.
use crate::error::Result;
use crate::models::{
    AuthorSummary, Comment, NewComment, NewPost, NewUser, Post, ReactionCounts, ReactionUpdate,
    User, UserChanges,
};
use async_trait::async_trait;
use uuid::Uuid;

pub mod comment_repo;
pub mod memory;
pub mod post_repo;
pub mod user_repo;

pub use comment_repo::PgCommentRepository;
pub use memory::MemoryStore;
pub use post_repo::PgPostRepository;
pub use user_repo::PgUserRepository;

/// Credential store.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Conflict` if the email is already registered.
    async fn create_user(&self, new_user: NewUser) -> Result<User>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Lookup by normalized email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Apply the supplied fields and bump `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the user does not exist.
    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<User>;

    /// Returns `false` if no row was deleted
    async fn delete_user(&self, id: Uuid) -> Result<bool>;

    /// Author summaries for the given ids. Unknown ids are skipped.
    async fn find_authors(&self, ids: &[Uuid]) -> Result<Vec<AuthorSummary>>;
}

/// Post half of the content store.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create_post(&self, new_post: NewPost) -> Result<Post>;

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>>;

    /// All posts, newest first
    async fn list_posts(&self) -> Result<Vec<Post>>;

    /// Apply a reaction update to one post as a single atomic write.
    ///
    /// Returns the counts after the write, or `None` if the post does not
    /// exist.
    async fn apply_post_reaction(
        &self,
        id: Uuid,
        update: ReactionUpdate,
    ) -> Result<Option<ReactionCounts>>;

    /// Delete a post and every comment referencing it in one transaction.
    ///
    /// Returns `false` if the post did not exist.
    async fn delete_post_cascade(&self, id: Uuid) -> Result<bool>;

    /// Round trip used by the health check
    async fn ping(&self) -> Result<()>;
}

/// Comment half of the content store.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create_comment(&self, new_comment: NewComment) -> Result<Comment>;

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>>;

    /// Comments of one post, newest first
    async fn list_comments_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>>;

    /// Apply a reaction update to one comment. Only the like half of the
    /// update is used.
    async fn apply_comment_reaction(
        &self,
        id: Uuid,
        update: ReactionUpdate,
    ) -> Result<Option<ReactionCounts>>;

    async fn delete_comment(&self, id: Uuid) -> Result<bool>;
}
