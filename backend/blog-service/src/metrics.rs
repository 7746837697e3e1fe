//! Prometheus metrics for blog-service.
//!
//! Collectors for reactions, deletions and sign-ins, plus the handler behind
//! `/metrics`.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

lazy_static! {
    /// Reaction toggles by target (post, comment), kind (like, dislike) and
    /// outcome (added, removed).
    pub static ref REACTION_TOGGLES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "blog_reaction_toggles_total",
        "Reaction toggles segmented by target, kind and outcome",
        &["target", "kind", "outcome"]
    )
    .expect("failed to register blog_reaction_toggles_total");

    /// Delete attempts by target and outcome (deleted, forbidden, not_found).
    pub static ref DELETIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "blog_deletions_total",
        "Delete attempts segmented by target and outcome",
        &["target", "outcome"]
    )
    .expect("failed to register blog_deletions_total");

    pub static ref SIGN_INS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "blog_sign_ins_total",
        "Sign-in attempts segmented by result",
        &["result"]
    )
    .expect("failed to register blog_sign_ins_total");
}

pub fn record_reaction(target: &str, kind: &str, added: bool) {
    let outcome = if added { "added" } else { "removed" };
    REACTION_TOGGLES_TOTAL
        .with_label_values(&[target, kind, outcome])
        .inc();
}

pub fn record_deletion(target: &str, outcome: &str) {
    DELETIONS_TOTAL.with_label_values(&[target, outcome]).inc();
}

pub fn record_sign_in(success: bool) {
    let result = if success { "success" } else { "failure" };
    SIGN_INS_TOTAL.with_label_values(&[result]).inc();
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
