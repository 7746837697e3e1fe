/// Business logic layer
///
/// Services own validation, escaping, authorization checks and logging.
/// They talk to storage only through the repository and image traits.
pub mod accounts;
pub mod comments;
pub mod posts;
pub mod reactions;

pub use accounts::{AccountService, AccountUpdateInput, Session, SignUpInput};
pub use comments::{CommentInput, CommentService};
pub use posts::{CommentView, PostDetail, PostInput, PostService, PostView};
pub use reactions::{plan_comment_like, plan_post_toggle, ReactionService};
