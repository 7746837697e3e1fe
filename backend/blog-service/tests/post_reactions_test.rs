mod common;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test;
use blog_service::db::PostRepository;
use common::{init_app, TestContext};
use serde_json::Value;
use uuid::Uuid;

#[actix_rt::test]
async fn dislike_like_like_scenario() {
    let ctx = TestContext::new();
    let author = ctx.sign_up("author@example.com").await;
    let reader = ctx.sign_up("reader@example.com").await;
    let post = ctx.create_post(&author).await;
    let token = ctx.token_for("reader@example.com").await;
    let app = init_app(&ctx).await;

    let call = |action: &str| {
        test::TestRequest::post()
            .uri(&format!("/blog/{}/{}", post.id, action))
            .cookie(Cookie::new("token", token.clone()))
            .to_request()
    };

    let body: Value = test::call_and_read_body_json(&app, call("dislike")).await;
    assert_eq!(body["message"], "Dislike status updated.");
    assert_eq!(body["likes"], 0);
    assert_eq!(body["dislikes"], 1);

    let body: Value = test::call_and_read_body_json(&app, call("like")).await;
    assert_eq!(body["message"], "Like status updated.");
    assert_eq!(body["likes"], 1);
    assert_eq!(body["dislikes"], 0);

    let stored = ctx.store.find_post(post.id).await.unwrap().unwrap();
    assert!(stored.likes.contains(reader.id));
    assert!(!stored.dislikes.contains(reader.id));

    let body: Value = test::call_and_read_body_json(&app, call("like")).await;
    assert_eq!(body["likes"], 0);
    assert_eq!(body["dislikes"], 0);
}

#[actix_rt::test]
async fn reactions_from_different_users_compose() {
    let ctx = TestContext::new();
    let author = ctx.sign_up("author@example.com").await;
    ctx.sign_up("a@example.com").await;
    ctx.sign_up("b@example.com").await;
    let post = ctx.create_post(&author).await;
    let app = init_app(&ctx).await;

    for email in ["a@example.com", "b@example.com"] {
        let token = ctx.token_for(email).await;
        let req = test::TestRequest::post()
            .uri(&format!("/blog/{}/like", post.id))
            .cookie(Cookie::new("token", token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let token = ctx.token_for("a@example.com").await;
    let req = test::TestRequest::post()
        .uri(&format!("/blog/{}/dislike", post.id))
        .cookie(Cookie::new("token", token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["likes"], 1);
    assert_eq!(body["dislikes"], 1);
}

#[actix_rt::test]
async fn bearer_header_is_accepted() {
    let ctx = TestContext::new();
    let author = ctx.sign_up("author@example.com").await;
    let post = ctx.create_post(&author).await;
    let token = ctx.token_for("author@example.com").await;
    let app = init_app(&ctx).await;

    let req = test::TestRequest::post()
        .uri(&format!("/blog/{}/like", post.id))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn anonymous_reaction_is_unauthorized() {
    let ctx = TestContext::new();
    let author = ctx.sign_up("author@example.com").await;
    let post = ctx.create_post(&author).await;
    let app = init_app(&ctx).await;

    let req = test::TestRequest::post()
        .uri(&format!("/blog/{}/like", post.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri(&format!("/blog/{}/like", post.id))
        .cookie(Cookie::new("token", "garbage"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let stored = ctx.store.find_post(post.id).await.unwrap().unwrap();
    assert!(stored.likes.is_empty());
}

#[actix_rt::test]
async fn reaction_on_missing_post_is_not_found() {
    let ctx = TestContext::new();
    ctx.sign_up("reader@example.com").await;
    let token = ctx.token_for("reader@example.com").await;
    let app = init_app(&ctx).await;

    let req = test::TestRequest::post()
        .uri(&format!("/blog/{}/dislike", Uuid::new_v4()))
        .cookie(Cookie::new("token", token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn home_and_detail_show_counts() {
    let ctx = TestContext::new();
    let author = ctx.sign_up("author@example.com").await;
    let post = ctx.create_post(&author).await;
    let token = ctx.token_for("author@example.com").await;
    let app = init_app(&ctx).await;

    let req = test::TestRequest::post()
        .uri(&format!("/blog/{}/like", post.id))
        .cookie(Cookie::new("token", token))
        .to_request();
    test::call_service(&app, req).await;

    let body: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(body["posts"].as_array().unwrap().len(), 1);
    assert_eq!(body["posts"][0]["likes_count"], 1);

    let req = test::TestRequest::get()
        .uri(&format!("/blog/{}", post.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["post"]["id"], post.id.to_string());
    assert_eq!(body["post"]["author"]["full_name"], "Test User");
    assert_eq!(body["comments"].as_array().unwrap().len(), 0);
}
