#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use blog_service::db::MemoryStore;
use blog_service::middleware::{AuthGate, AuthUser, CookieAuthMiddleware};
use blog_service::models::{Post, User};
use blog_service::services::{PostInput, SignUpInput};
use blog_service::state::{AppState, CookieSettings};
use blog_service::storage::LocalImageStorage;
use crypto_core::jwt::JwtKeys;
use std::sync::Arc;
use tempfile::TempDir;

pub const JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const PASSWORD: &str = "password123";
pub const BOUNDARY: &str = "----blogservicetestboundary";

pub struct TestContext {
    pub state: AppState,
    pub keys: JwtKeys,
    pub store: MemoryStore,
    pub public_dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        let keys = JwtKeys::from_secret(JWT_SECRET, 3600).expect("jwt keys");
        let store = MemoryStore::new();
        let public_dir = tempfile::tempdir().expect("tempdir");
        let images = Arc::new(LocalImageStorage::new(public_dir.path()));

        let state = AppState::in_memory(
            store.clone(),
            images,
            keys.clone(),
            vec![ADMIN_EMAIL.to_string()],
            CookieSettings::default(),
        );

        Self {
            state,
            keys,
            store,
            public_dir,
        }
    }

    pub async fn sign_up(&self, email: &str) -> User {
        self.state
            .accounts
            .sign_up(SignUpInput::new("Test User", email, PASSWORD), None)
            .await
            .expect("sign up")
    }

    pub async fn token_for(&self, email: &str) -> String {
        self.state
            .accounts
            .sign_in(email, PASSWORD)
            .await
            .expect("sign in")
            .token
    }

    pub async fn create_post(&self, author: &User) -> Post {
        self.state
            .posts
            .create_post(
                &auth_user(author),
                PostInput::new("A post title", "A post body that is long enough"),
                None,
            )
            .await
            .expect("create post")
    }
}

pub fn auth_user(user: &User) -> AuthUser {
    AuthUser {
        id: user.id,
        email: user.email.clone(),
        full_name: user.full_name.clone(),
        role: user.role,
    }
}

pub async fn init_app(
    ctx: &TestContext,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(ctx.state.clone()))
            .wrap(CookieAuthMiddleware::new(AuthGate::new(ctx.keys.clone())))
            .configure(blog_service::routes::configure),
    )
    .await
}

pub struct FilePart<'a> {
    pub field: &'a str,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub bytes: &'a [u8],
}

/// Encode a multipart/form-data body
pub fn multipart_body(fields: &[(&str, &str)], file: Option<FilePart<'_>>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    if let Some(file) = file {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                file.field, file.file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.content_type).as_bytes());
        body.extend_from_slice(file.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

pub fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(actix_web::http::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
