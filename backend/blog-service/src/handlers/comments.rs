use super::forms::CommentForm;
use super::see_other;
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::services::CommentInput;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use uuid::Uuid;

/// POST /blog/comment/{blogId}
pub async fn create_comment(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
    form: web::Form<CommentForm>,
) -> Result<HttpResponse> {
    let post_id = path.into_inner();
    state
        .comments
        .create_comment(&user, post_id, CommentInput::new(&form.content))
        .await?;
    Ok(see_other(&format!("/blog/{}", post_id)))
}

/// POST /blog/{blogId}/comments/{commentId}/like
pub async fn like_comment(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let counts = state
        .reactions
        .toggle_comment_like(post_id, comment_id, user.id)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Comment like status updated.",
        "likes": counts.likes,
    })))
}

/// POST /blog/{blogId}/comments/{commentId}/delete - admin only
pub async fn delete_comment(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    state
        .comments
        .delete_comment(&user, post_id, comment_id)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Comment deleted successfully"
    })))
}
