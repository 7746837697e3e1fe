use crate::handlers::{comments, health, home, posts, users};
use crate::metrics::serve_metrics;
use actix_web::web;

/// Register every route. Shared by `main` and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home::index))
        .route("/health", web::get().to(health::health))
        .route("/metrics", web::get().to(serve_metrics))
        .service(
            web::scope("/blog")
                .route("", web::post().to(posts::create_post))
                .route("/comment/{blog_id}", web::post().to(comments::create_comment))
                .route("/{id}", web::get().to(posts::get_post))
                .route("/{id}/like", web::post().to(posts::like_post))
                .route("/{id}/dislike", web::post().to(posts::dislike_post))
                .route("/{id}/delete", web::post().to(posts::delete_post))
                .route(
                    "/{blog_id}/comments/{comment_id}/like",
                    web::post().to(comments::like_comment),
                )
                .route(
                    "/{blog_id}/comments/{comment_id}/delete",
                    web::post().to(comments::delete_comment),
                ),
        )
        .service(
            web::scope("/user")
                .route("/signUp", web::post().to(users::sign_up))
                .route("/signIn", web::post().to(users::sign_in))
                .route("/logout", web::get().to(users::logout))
                .route("/account", web::get().to(users::account))
                .route("/account", web::post().to(users::update_account))
                .route("/account/delete", web::post().to(users::delete_account)),
        );
}
