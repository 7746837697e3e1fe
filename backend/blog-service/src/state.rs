use crate::db::{CommentRepository, MemoryStore, PostRepository, UserRepository};
use crate::services::{AccountService, CommentService, PostService, ReactionService};
use crate::storage::ImageStorage;
use crypto_core::jwt::JwtKeys;
use std::sync::Arc;

/// Cookie attributes applied to everything the service sets
#[derive(Debug, Clone, Copy, Default)]
pub struct CookieSettings {
    pub secure: bool,
}

/// Shared application state, built once in `main` and handed to actix as
/// `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub posts: PostService,
    pub comments: CommentService,
    pub reactions: ReactionService,
    pub cookies: CookieSettings,
    store_health: Arc<dyn PostRepository>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        images: Arc<dyn ImageStorage>,
        keys: JwtKeys,
        admin_emails: Vec<String>,
        cookies: CookieSettings,
    ) -> Self {
        Self {
            accounts: AccountService::new(users.clone(), images.clone(), keys, admin_emails),
            posts: PostService::new(users, posts.clone(), comments.clone(), images),
            comments: CommentService::new(posts.clone(), comments.clone()),
            reactions: ReactionService::new(posts.clone(), comments),
            cookies,
            store_health: posts,
        }
    }

    /// State over a single in-memory store
    pub fn in_memory(
        store: MemoryStore,
        images: Arc<dyn ImageStorage>,
        keys: JwtKeys,
        admin_emails: Vec<String>,
        cookies: CookieSettings,
    ) -> Self {
        Self::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store),
            images,
            keys,
            admin_emails,
            cookies,
        )
    }

    pub async fn check_store(&self) -> crate::error::Result<()> {
        self.store_health.ping().await
    }
}
