/// Account handlers: sign-up, sign-in, logout and profile management
///
/// Sign-in sets three cookies: `token` (HttpOnly session token), `fullName`
/// and `dp` (avatar URL) for the client to display. Logout and account
/// deletion clear all three.
use super::forms::{read_multipart, SignInForm};
use super::see_other;
use crate::error::Result;
use crate::middleware::{AuthUser, TOKEN_COOKIE};
use crate::models::User;
use crate::services::{AccountUpdateInput, SignUpInput};
use crate::state::{AppState, CookieSettings};
use actix_multipart::Multipart;
use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::{web, HttpResponse, HttpResponseBuilder};

pub const FULL_NAME_COOKIE: &str = "fullName";
pub const AVATAR_COOKIE: &str = "dp";

fn cookie(name: &'static str, value: String, settings: CookieSettings) -> Cookie<'static> {
    Cookie::build(name, value)
        .path("/")
        .same_site(SameSite::Lax)
        .secure(settings.secure)
        .finish()
}

fn profile_cookies(builder: &mut HttpResponseBuilder, user: &User, settings: CookieSettings) {
    builder.cookie(cookie(
        FULL_NAME_COOKIE,
        urlencoding::encode(&user.full_name).into_owned(),
        settings,
    ));
    builder.cookie(cookie(
        AVATAR_COOKIE,
        urlencoding::encode(&user.avatar_url).into_owned(),
        settings,
    ));
}

fn clear_session_cookies(builder: &mut HttpResponseBuilder) {
    for name in [TOKEN_COOKIE, FULL_NAME_COOKIE, AVATAR_COOKIE] {
        let mut removal = Cookie::build(name, "").path("/").finish();
        removal.make_removal();
        builder.cookie(removal);
    }
}

/// POST /user/signUp (multipart: fullname, email, password, profileImg)
pub async fn sign_up(state: web::Data<AppState>, payload: Multipart) -> Result<HttpResponse> {
    let mut form = read_multipart(payload, &["profileImg"]).await?;
    let avatar = form.take_file("profileImg");
    let input = SignUpInput::new(
        form.text_or_empty("fullname"),
        form.text_or_empty("email"),
        form.text_or_empty("password"),
    );

    state.accounts.sign_up(input, avatar).await?;
    Ok(see_other("/user/signIn"))
}

/// POST /user/signIn (form: email, password)
pub async fn sign_in(
    state: web::Data<AppState>,
    form: web::Form<SignInForm>,
) -> Result<HttpResponse> {
    let session = state.accounts.sign_in(&form.email, &form.password).await?;
    let settings = state.cookies;

    let mut token = cookie(TOKEN_COOKIE, session.token, settings);
    token.set_http_only(true);
    token.set_max_age(Duration::seconds(state.accounts.token_ttl_secs()));

    let mut builder = HttpResponse::SeeOther();
    builder.insert_header((actix_web::http::header::LOCATION, "/"));
    builder.cookie(token);
    profile_cookies(&mut builder, &session.user, settings);
    Ok(builder.finish())
}

/// GET /user/logout
pub async fn logout() -> HttpResponse {
    let mut builder = HttpResponse::SeeOther();
    builder.insert_header((actix_web::http::header::LOCATION, "/user/signIn"));
    clear_session_cookies(&mut builder);
    builder.finish()
}

/// GET /user/account
pub async fn account(state: web::Data<AppState>, user: AuthUser) -> Result<HttpResponse> {
    let profile = state.accounts.profile(&user).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "user": profile })))
}

/// POST /user/account (multipart: fullname, password, profileImg; all optional)
pub async fn update_account(
    state: web::Data<AppState>,
    user: AuthUser,
    payload: Multipart,
) -> Result<HttpResponse> {
    let mut form = read_multipart(payload, &["profileImg"]).await?;
    let avatar = form.take_file("profileImg");
    let input = AccountUpdateInput::new(form.text("fullname"), form.text("password"));

    let updated = state.accounts.update_account(&user, input, avatar).await?;

    let mut builder = HttpResponse::SeeOther();
    builder.insert_header((actix_web::http::header::LOCATION, "/"));
    profile_cookies(&mut builder, &updated, state.cookies);
    Ok(builder.finish())
}

/// POST /user/account/delete
pub async fn delete_account(state: web::Data<AppState>, user: AuthUser) -> Result<HttpResponse> {
    state.accounts.delete_account(&user).await?;

    let mut builder = HttpResponse::Ok();
    clear_session_cookies(&mut builder);
    Ok(builder.json(serde_json::json!({ "message": "Account deleted successfully" })))
}
