/// Blog Service Library
///
/// Users sign up and sign in with a cookie-carried session token, publish
/// posts with cover images, comment, and like or dislike. Administrators
/// moderate by deleting posts and comments.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `routes`: route table shared by the binary and the tests
/// - `services`: accounts, posts, comments and the reaction toggle engine
/// - `db`: repository traits with Postgres and in-memory implementations
/// - `storage`: image storage on local disk or S3
/// - `middleware`: session authentication and delete permissions
/// - `models`: domain types
/// - `error`: error type and HTTP mapping
/// - `config`: environment configuration
/// - `metrics`: Prometheus collectors
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod sanitize;
pub mod services;
pub mod state;
pub mod storage;

pub use config::Config;
pub use error::{AppError, Result};
pub use state::AppState;
