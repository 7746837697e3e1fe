/// HTTP middleware for blog-service
///
/// `CookieAuthMiddleware` resolves the session token on every request and
/// stores the resulting `AuthUser` in the request extensions. It never rejects
/// a request; handlers that need a signed-in user take `AuthUser` as an
/// extractor, which answers 401 for anonymous requests.
pub mod permissions;

pub use permissions::{can_delete, ensure_can_delete};

use crate::error::AppError;
use crate::models::Role;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{http::header, Error, FromRequest, HttpMessage, HttpRequest};
use crypto_core::jwt::JwtKeys;
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use uuid::Uuid;

/// Cookie carrying the session token
pub const TOKEN_COOKIE: &str = "token";

// =====================================================================
// Authentication gate
// =====================================================================

/// Identity of the signed-in user, resolved from the session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

/// Turns a raw token into an identity.
#[derive(Clone)]
pub struct AuthGate {
    keys: JwtKeys,
}

impl AuthGate {
    pub fn new(keys: JwtKeys) -> Self {
        Self { keys }
    }

    /// Invalid, expired or malformed tokens resolve to `None`.
    pub fn resolve_identity(&self, token: &str) -> Option<AuthUser> {
        let claims = match self.keys.validate(token) {
            Ok(claims) => claims,
            Err(err) => {
                tracing::debug!(error = %err, "ignoring invalid session token");
                return None;
            }
        };

        let id = claims.user_id().ok()?;
        let role = claims.role.parse::<Role>().ok()?;

        Some(AuthUser {
            id,
            email: claims.email,
            full_name: claims.name,
            role,
        })
    }
}

/// Token from the `token` cookie, falling back to a Bearer header
fn request_token(req: &ServiceRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(TOKEN_COOKIE) {
        let value = cookie.value().trim();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }

    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Actix middleware that attaches an `AuthUser` to requests with a valid token.
pub struct CookieAuthMiddleware {
    gate: Rc<AuthGate>,
}

impl CookieAuthMiddleware {
    pub fn new(gate: AuthGate) -> Self {
        Self { gate: Rc::new(gate) }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CookieAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = CookieAuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CookieAuthMiddlewareService {
            service: Rc::new(service),
            gate: self.gate.clone(),
        }))
    }
}

pub struct CookieAuthMiddlewareService<S> {
    service: Rc<S>,
    gate: Rc<AuthGate>,
}

impl<S, B> Service<ServiceRequest> for CookieAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        if let Some(user) = request_token(&req).and_then(|t| self.gate.resolve_identity(&t)) {
            req.extensions_mut().insert(user);
        }

        Box::pin(async move { service.call(req).await })
    }
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or_else(|| AppError::Unauthorized("Please sign in".to_string())),
        )
    }
}
