/// HTTP handlers for blog-service
///
/// Handlers stay thin: extract, call a service, shape the response.
pub mod comments;
pub mod forms;
pub mod health;
pub mod home;
pub mod posts;
pub mod users;

use actix_web::{http::header, HttpResponse};

/// 303 redirect, used after form submissions
pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// 302 redirect
pub(crate) fn found(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}
