mod common;

use actix_web::cookie::Cookie;
use actix_web::http::{header, StatusCode};
use actix_web::test;
use blog_service::db::{PostRepository, UserRepository};
use blog_service::models::DEFAULT_AVATAR_URL;
use common::{
    init_app, location, multipart_body, multipart_content_type, FilePart, TestContext, PASSWORD,
};
use serde_json::Value;

const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn sign_up_request(email: &str, avatar: Option<FilePart<'_>>) -> actix_http::Request {
    test::TestRequest::post()
        .uri("/user/signUp")
        .insert_header((header::CONTENT_TYPE, multipart_content_type()))
        .set_payload(multipart_body(
            &[("fullname", "Jane Doe"), ("email", email), ("password", PASSWORD)],
            avatar,
        ))
        .to_request()
}

#[actix_rt::test]
async fn sign_up_then_sign_in_sets_cookies() {
    let ctx = TestContext::new();
    let app = init_app(&ctx).await;

    let resp = test::call_service(&app, sign_up_request("Jane@Example.com", None)).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/user/signIn");

    let user = ctx
        .store
        .find_user_by_email("jane@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.avatar_url, DEFAULT_AVATAR_URL);

    let req = test::TestRequest::post()
        .uri("/user/signIn")
        .set_form([("email", "jane@example.com"), ("password", PASSWORD)])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");

    let cookies: Vec<Cookie<'_>> = resp.response().cookies().collect();
    let token = cookies
        .iter()
        .find(|c| c.name() == "token")
        .expect("token cookie");
    assert_eq!(token.http_only(), Some(true));
    assert!(cookies.iter().any(|c| c.name() == "fullName"));
    assert!(cookies.iter().any(|c| c.name() == "dp"));

    let req = test::TestRequest::get()
        .uri("/user/account")
        .cookie(Cookie::new("token", token.value().to_string()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["user"]["id"], user.id.to_string());
    assert_eq!(body["user"]["role"], "USER");
    assert!(body["user"].get("password_hash").is_none());
}

#[actix_rt::test]
async fn duplicate_sign_up_conflicts() {
    let ctx = TestContext::new();
    let app = init_app(&ctx).await;

    let resp = test::call_service(&app, sign_up_request("jane@example.com", None)).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let resp = test::call_service(&app, sign_up_request(" JANE@example.com", None)).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_rt::test]
async fn wrong_password_is_unauthorized() {
    let ctx = TestContext::new();
    ctx.sign_up("jane@example.com").await;
    let app = init_app(&ctx).await;

    let req = test::TestRequest::post()
        .uri("/user/signIn")
        .set_form([("email", "jane@example.com"), ("password", "wrong-password")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Incorrect Email or Password"));
}

#[actix_rt::test]
async fn sign_up_with_avatar_stores_file() {
    let ctx = TestContext::new();
    let app = init_app(&ctx).await;

    let avatar = FilePart {
        field: "profileImg",
        file_name: "me.png",
        content_type: "image/png",
        bytes: PNG,
    };
    let resp = test::call_service(&app, sign_up_request("jane@example.com", Some(avatar))).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let user = ctx
        .store
        .find_user_by_email("jane@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(user.avatar_url.starts_with("/images/"));
    let path = ctx
        .public_dir
        .path()
        .join(user.avatar_url.trim_start_matches('/'));
    assert_eq!(std::fs::read(path).unwrap(), PNG);
}

#[actix_rt::test]
async fn non_image_avatar_is_rejected() {
    let ctx = TestContext::new();
    let app = init_app(&ctx).await;

    let avatar = FilePart {
        field: "profileImg",
        file_name: "notes.txt",
        content_type: "text/plain",
        bytes: b"hello",
    };
    let resp = test::call_service(&app, sign_up_request("jane@example.com", Some(avatar))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["fields"]["profileImg"].is_array());
    assert!(ctx
        .store
        .find_user_by_email("jane@example.com")
        .await
        .unwrap()
        .is_none());
}

#[actix_rt::test]
async fn logout_clears_cookies() {
    let ctx = TestContext::new();
    let app = init_app(&ctx).await;

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/user/logout").to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/user/signIn");

    let cleared: Vec<String> = resp
        .response()
        .cookies()
        .filter(|c| c.value().is_empty())
        .map(|c| c.name().to_string())
        .collect();
    for name in ["token", "fullName", "dp"] {
        assert!(cleared.iter().any(|c| c == name), "{name} not cleared");
    }
}

#[actix_rt::test]
async fn account_update_replaces_avatar() {
    let ctx = TestContext::new();
    let app = init_app(&ctx).await;

    let first = FilePart {
        field: "profileImg",
        file_name: "first.png",
        content_type: "image/png",
        bytes: PNG,
    };
    test::call_service(&app, sign_up_request("jane@example.com", Some(first))).await;
    let before = ctx
        .store
        .find_user_by_email("jane@example.com")
        .await
        .unwrap()
        .unwrap();
    let old_path = ctx
        .public_dir
        .path()
        .join(before.avatar_url.trim_start_matches('/'));
    assert!(old_path.exists());

    let token = ctx.token_for("jane@example.com").await;
    let second = FilePart {
        field: "profileImg",
        file_name: "second.gif",
        content_type: "image/gif",
        bytes: b"GIF89a",
    };
    let req = test::TestRequest::post()
        .uri("/user/account")
        .cookie(Cookie::new("token", token))
        .insert_header((header::CONTENT_TYPE, multipart_content_type()))
        .set_payload(multipart_body(&[("fullname", "Jane Smith")], Some(second)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");

    let after = ctx.store.find_user_by_id(before.id).await.unwrap().unwrap();
    assert_eq!(after.full_name, "Jane Smith");
    assert!(after.avatar_url.ends_with("-second.gif"));
    assert!(!old_path.exists());
}

#[actix_rt::test]
async fn account_delete_keeps_authored_posts() {
    let ctx = TestContext::new();
    let user = ctx.sign_up("jane@example.com").await;
    let post = ctx.create_post(&user).await;
    let token = ctx.token_for("jane@example.com").await;
    let app = init_app(&ctx).await;

    let req = test::TestRequest::post()
        .uri("/user/account/delete")
        .cookie(Cookie::new("token", token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.response().cookies().any(|c| c.name() == "token"));

    assert!(ctx.store.find_user_by_id(user.id).await.unwrap().is_none());
    assert!(ctx.store.find_post(post.id).await.unwrap().is_some());

    let req = test::TestRequest::get()
        .uri(&format!("/blog/{}", post.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["post"]["author"].is_null());

    let req = test::TestRequest::get()
        .uri("/user/account")
        .cookie(Cookie::new("token", token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn anonymous_account_is_unauthorized() {
    let ctx = TestContext::new();
    let app = init_app(&ctx).await;

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/user/account").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn deleted_account_token_lives_until_expiry() {
    let ctx = TestContext::new();
    ctx.sign_up("jane@example.com").await;
    let token = ctx.token_for("jane@example.com").await;
    let app = init_app(&ctx).await;

    let req = test::TestRequest::post()
        .uri("/user/account/delete")
        .cookie(Cookie::new("token", token.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/blog")
        .cookie(Cookie::new("token", token))
        .insert_header((header::CONTENT_TYPE, multipart_content_type()))
        .set_payload(multipart_body(
            &[("title", "Still here"), ("body", "Written after the account was deleted")],
            None,
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let req = test::TestRequest::get().uri(&location(&resp)).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["post"]["author"].is_null());
}
