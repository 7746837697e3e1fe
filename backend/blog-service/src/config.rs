/// Configuration management for blog-service
///
/// All settings come from environment variables (a `.env` file is loaded by
/// `main` first). Development defaults are provided; settings that are unsafe
/// in production are refused there.
use db_pool::env_utils::{parse_env_bool, parse_env_list, parse_env_optional, parse_env_with_default};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEV_JWT_SECRET: &str = "development-only-secret-change-me-0123456789";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub cors: CorsConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

impl CorsConfig {
    pub fn origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Postgres,
    Memory,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    pub url: String,
    pub max_connections: u32,
}

/// Authentication settings
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    /// Normalized emails that receive the ADMIN role at sign-up
    pub admin_emails: Vec<String>,
    /// Mark auth cookies `Secure`
    pub secure_cookies: bool,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("admin_emails", &self.admin_emails)
            .field("secure_cookies", &self.secure_cookies)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Local,
    S3,
}

/// Image storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Root directory for the local backend; files land in `<dir>/<folder>/`
    pub public_dir: PathBuf,
    pub s3_bucket: Option<String>,
    pub s3_region: String,
    /// Custom endpoint for S3-compatible stores (MinIO, LocalStack)
    pub s3_endpoint: Option<String>,
    /// Public URL prefix for uploaded objects
    pub s3_base_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("BLOG_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_with_default("BLOG_SERVICE_PORT", 8000),
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if production => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "http://localhost:3000".to_string(),
                };

                if production && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            database: DatabaseConfig {
                backend: parse_database_backend()?,
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/blog".to_string()),
                max_connections: parse_env_with_default("DATABASE_MAX_CONNECTIONS", 10),
            },
            auth: {
                let jwt_secret = match std::env::var("JWT_SECRET") {
                    Ok(secret) => secret,
                    Err(_) if production => {
                        return Err("JWT_SECRET must be set in production".to_string())
                    }
                    Err(_) => DEV_JWT_SECRET.to_string(),
                };

                AuthConfig {
                    jwt_secret,
                    token_ttl_secs: parse_env_with_default("JWT_TTL_SECS", 24 * 60 * 60),
                    admin_emails: parse_env_list("ADMIN_EMAILS")
                        .iter()
                        .map(|e| crate::models::normalize_email(e))
                        .collect(),
                    secure_cookies: parse_env_bool("SECURE_COOKIES", production),
                }
            },
            storage: {
                let backend = parse_storage_backend()?;
                let s3_bucket = parse_env_optional::<String>("S3_BUCKET");
                if backend == StorageBackend::S3 && s3_bucket.is_none() {
                    return Err("S3_BUCKET must be set when STORAGE_BACKEND=s3".to_string());
                }

                StorageConfig {
                    backend,
                    public_dir: PathBuf::from(
                        std::env::var("PUBLIC_DIR").unwrap_or_else(|_| "public".to_string()),
                    ),
                    s3_bucket,
                    s3_region: std::env::var("AWS_REGION")
                        .unwrap_or_else(|_| "us-east-1".to_string()),
                    s3_endpoint: parse_env_optional("S3_ENDPOINT"),
                    s3_base_url: parse_env_optional("S3_BASE_URL"),
                }
            },
        })
    }
}

fn parse_database_backend() -> Result<DatabaseBackend, String> {
    match std::env::var("DATABASE_BACKEND")
        .unwrap_or_else(|_| "postgres".to_string())
        .to_ascii_lowercase()
        .as_str()
    {
        "postgres" | "postgresql" => Ok(DatabaseBackend::Postgres),
        "memory" => Ok(DatabaseBackend::Memory),
        other => Err(format!("unsupported DATABASE_BACKEND: {}", other)),
    }
}

fn parse_storage_backend() -> Result<StorageBackend, String> {
    match std::env::var("STORAGE_BACKEND")
        .unwrap_or_else(|_| "local".to_string())
        .to_ascii_lowercase()
        .as_str()
    {
        "local" => Ok(StorageBackend::Local),
        "s3" => Ok(StorageBackend::S3),
        other => Err(format!("unsupported STORAGE_BACKEND: {}", other)),
    }
}
