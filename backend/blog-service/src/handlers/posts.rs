/// Post handlers - reading, publishing, reactions and moderation
use super::forms::read_multipart;
use super::{found, see_other};
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::ReactionKind;
use crate::services::PostInput;
use crate::state::AppState;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use uuid::Uuid;

/// GET /blog/{id}
pub async fn get_post(state: web::Data<AppState>, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let detail = state.posts.get_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// POST /blog (multipart: title, body, coverImg)
pub async fn create_post(
    state: web::Data<AppState>,
    user: AuthUser,
    payload: Multipart,
) -> Result<HttpResponse> {
    let mut form = read_multipart(payload, &["coverImg"]).await?;
    let cover = form.take_file("coverImg");
    let input = PostInput::new(form.text_or_empty("title"), form.text_or_empty("body"));

    let post = state.posts.create_post(&user, input, cover).await?;
    Ok(see_other(&format!("/blog/{}", post.id)))
}

/// POST /blog/{id}/like
pub async fn like_post(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    toggle(state, user, path.into_inner(), ReactionKind::Like).await
}

/// POST /blog/{id}/dislike
pub async fn dislike_post(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    toggle(state, user, path.into_inner(), ReactionKind::Dislike).await
}

async fn toggle(
    state: web::Data<AppState>,
    user: AuthUser,
    post_id: Uuid,
    kind: ReactionKind,
) -> Result<HttpResponse> {
    let counts = state.reactions.toggle_post(post_id, user.id, kind).await?;
    let message = match kind {
        ReactionKind::Like => "Like status updated.",
        ReactionKind::Dislike => "Dislike status updated.",
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": message,
        "likes": counts.likes,
        "dislikes": counts.dislikes.unwrap_or(0),
    })))
}

/// POST /blog/{id}/delete - admin only
pub async fn delete_post(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    state.posts.delete_post(&user, path.into_inner()).await?;
    Ok(found("/"))
}
