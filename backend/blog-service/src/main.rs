use actix_cors::Cors;
use actix_web::{middleware::DefaultHeaders, middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use blog_service::config::{Config, DatabaseBackend};
use blog_service::db::{MemoryStore, PgCommentRepository, PgPostRepository, PgUserRepository};
use blog_service::middleware::{AuthGate, CookieAuthMiddleware};
use blog_service::state::{AppState, CookieSettings};
use blog_service::storage::build_image_storage;
use crypto_core::jwt::JwtKeys;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "SIGTERM handler unavailable, waiting for Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let keys = JwtKeys::from_secret(&config.auth.jwt_secret, config.auth.token_ttl_secs)
        .context("invalid JWT_SECRET")?;
    let images = build_image_storage(&config.storage)
        .await
        .context("failed to initialize image storage")?;
    let cookies = CookieSettings {
        secure: config.auth.secure_cookies,
    };
    let admin_emails = config.auth.admin_emails.clone();

    match config.database.backend {
        DatabaseBackend::Memory => {
            tracing::warn!("using in-memory store; data is lost on restart");
            Ok(AppState::in_memory(
                MemoryStore::new(),
                images,
                keys,
                admin_emails,
                cookies,
            ))
        }
        DatabaseBackend::Postgres => {
            let db_config = db_pool::DbConfig::for_service(
                "blog-service",
                &config.database.url,
                config.database.max_connections,
            );
            db_config.log_config();
            let pool = db_pool::create_pool(db_config)
                .await
                .context("failed to connect to Postgres")?;

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("failed to run database migrations")?;
            tracing::info!("database migrations applied");

            Ok(AppState::new(
                Arc::new(PgUserRepository::new(pool.clone())),
                Arc::new(PgPostRepository::new(pool.clone())),
                Arc::new(PgCommentRepository::new(pool)),
                images,
                keys,
                admin_emails,
                cookies,
            ))
        }
    }
}

/// Blog Service
///
/// Serves the blog's JSON and redirect endpoints on actix-web.
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    tracing::info!("Starting blog-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let state = build_state(&config).await?;
    let gate = AuthGate::new(
        JwtKeys::from_secret(&config.auth.jwt_secret, config.auth.token_ttl_secs)
            .context("invalid JWT_SECRET")?,
    );

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let state_data = web::Data::new(state);
    let origins = config.cors.origins();

    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in &origins {
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(state_data.clone())
            .wrap(CookieAuthMiddleware::new(gate.clone()))
            .wrap(cors)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("X-Frame-Options", "SAMEORIGIN")),
            )
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(blog_service::routes::configure)
    })
    .disable_signals()
    .bind(&bind_address)
    .with_context(|| format!("failed to bind {}", bind_address))?
    .run();

    let handle = server.handle();
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, stopping HTTP server");
        handle.stop(true).await;
    });

    server.await.context("HTTP server error")?;
    tracing::info!("blog-service stopped");
    Ok(())
}
