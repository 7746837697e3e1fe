use crate::state::AppState;
use actix_web::{web, HttpResponse};

/// GET /health - liveness plus a store round trip
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    match state.check_store().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "blog-service",
        })),
        Err(err) => {
            tracing::error!(error = %err, "health check failed");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unavailable",
                "service": "blog-service",
            }))
        }
    }
}
