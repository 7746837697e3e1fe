/// Data models for blog-service
///
/// - User: account record with role and avatar
/// - Post: blog post with like/dislike sets
/// - Comment: comment on a post with a like set
/// - Reaction: reaction sets and the targeted updates applied to them
pub mod comment;
pub mod post;
pub mod reaction;
pub mod user;

pub use comment::{Comment, NewComment};
pub use post::{NewPost, Post, DEFAULT_COVER_URL};
pub use reaction::{ReactionCounts, ReactionKind, ReactionSet, ReactionUpdate, SetOp};
pub use user::{
    normalize_email, AuthorSummary, NewUser, Role, User, UserChanges, DEFAULT_AVATAR_URL,
};
