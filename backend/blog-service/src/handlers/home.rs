use crate::error::Result;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

/// GET / - all posts, newest first
pub async fn index(state: web::Data<AppState>) -> Result<HttpResponse> {
    let posts = state.posts.list_posts().await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "posts": posts })))
}
