//! Auth and user-account endpoints: registration, login lockout, refresh
//! rotation via cookie and body, logout, and admin role management.

mod common;

use axum::body::Body;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use common::{
    body_json, delete_auth, get, get_auth, post_auth, post_json, put_json_auth, TEST_PASSWORD,
};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use usogui_core::roles::Role;
use usogui_db::repositories::UserRepo;

async fn login(app: axum::Router, username: &str, password: &str) -> axum::response::Response {
    post_json(
        app,
        "/api/v1/auth/login",
        json!({ "username": username, "password": password }),
    )
    .await
}

/// `refresh_token=<value>` from a `Set-Cookie` header.
fn refresh_cookie_pair(response: &axum::response::Response) -> String {
    let header = response
        .headers()
        .get(SET_COOKIE)
        .expect("Set-Cookie must be present")
        .to_str()
        .unwrap();
    header.split(';').next().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_creates_user_and_issues_tokens(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/register",
        json!({ "username": "baku", "email": "Baku@Example.com", "password": "liar_game_1" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.starts_with("refresh_token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));
    assert!(cookie.contains("Path=/api/v1/auth"));

    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["user"]["username"], "baku");
    assert_eq!(json["user"]["email"], "baku@example.com");
    assert_eq!(json["user"]["role"], "user");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_rejects_short_password_and_duplicate_username(pool: PgPool) {
    common::create_user(&pool, "marco", Role::User).await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app.clone(),
        "/api/v1/auth/register",
        json!({ "username": "kaji", "email": "kaji@example.com", "password": "short" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        app,
        "/api/v1/auth/register",
        json!({ "username": "marco", "email": "other@example.com", "password": "long_enough_pw" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_success_and_wrong_password(pool: PgPool) {
    common::create_user(&pool, "kaji", Role::User).await;
    let app = common::build_test_app(pool);

    let response = login(app.clone(), "kaji", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["expires_in"], 15 * 60);

    let response = login(app.clone(), "kaji", "not_the_password").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = login(app, "nobody", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn five_failed_logins_lock_the_account(pool: PgPool) {
    let user = common::create_user(&pool, "mardock", Role::User).await;
    let app = common::build_test_app(pool.clone());

    for _ in 0..5 {
        let response = login(app.clone(), "mardock", "wrong_password").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let response = login(app, "mardock", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(stored.locked_until.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deactivated_users_cannot_log_in(pool: PgPool) {
    let user = common::create_user(&pool, "lalo", Role::User).await;
    UserRepo::deactivate(&pool, user.id).await.unwrap();
    let app = common::build_test_app(pool);

    let response = login(app, "lalo", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Refresh and logout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn refresh_via_cookie_rotates_the_session(pool: PgPool) {
    common::create_user(&pool, "kaji", Role::User).await;
    let app = common::build_test_app(pool);

    let response = login(app.clone(), "kaji", TEST_PASSWORD).await;
    let cookie = refresh_cookie_pair(&response);

    let refresh = |cookie: String| {
        let app = app.clone();
        async move {
            let request = Request::builder()
                .method(Method::POST)
                .uri("/api/v1/auth/refresh")
                .header(COOKIE, cookie)
                .body(Body::empty())
                .unwrap();
            app.oneshot(request).await.unwrap()
        }
    };

    let response = refresh(cookie.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let rotated = refresh_cookie_pair(&response);
    assert_ne!(rotated, cookie);

    // The old token was revoked by the rotation.
    let response = refresh(cookie).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = refresh(rotated).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn refresh_accepts_token_in_body(pool: PgPool) {
    common::create_user(&pool, "kaji", Role::User).await;
    let app = common::build_test_app(pool);

    let json = body_json(login(app.clone(), "kaji", TEST_PASSWORD).await).await;
    let token = json["refresh_token"].as_str().unwrap();

    let response = post_json(
        app.clone(),
        "/api/v1/auth/refresh",
        json!({ "refresh_token": token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(app, "/api/v1/auth/refresh", json!({})).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn logout_revokes_all_sessions(pool: PgPool) {
    common::create_user(&pool, "kaji", Role::User).await;
    let app = common::build_test_app(pool);

    let json = body_json(login(app.clone(), "kaji", TEST_PASSWORD).await).await;
    let access = json["access_token"].as_str().unwrap().to_string();
    let refresh = json["refresh_token"].as_str().unwrap().to_string();

    let response = post_auth(app.clone(), "/api/v1/auth/logout", &access).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cleared = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cleared.contains("Max-Age=0"));

    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn me_requires_a_valid_token(pool: PgPool) {
    let (user, token) = common::user_token(&pool, "kaji", Role::User).await;
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app.clone(), "/api/v1/auth/me", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app, "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], user.id);
    assert!(json["data"].get("password_hash").is_none());
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn users_update_their_own_progress(pool: PgPool) {
    let (_, token) = common::user_token(&pool, "kaji", Role::User).await;
    let app = common::build_test_app(pool);

    let response = put_json_auth(
        app.clone(),
        "/api/v1/users/me/progress",
        &token,
        json!({ "user_progress": 120 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["user_progress"], 120);

    let response = put_json_auth(
        app,
        "/api/v1/users/me/progress",
        &token,
        json!({ "user_progress": -3 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn change_password_requires_current_password(pool: PgPool) {
    let (_, token) = common::user_token(&pool, "kaji", Role::User).await;
    let app = common::build_test_app(pool);

    let response = put_json_auth(
        app.clone(),
        "/api/v1/users/me/password",
        &token,
        json!({ "current_password": "wrong", "new_password": "new_password_1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = put_json_auth(
        app.clone(),
        "/api/v1/users/me/password",
        &token,
        json!({ "current_password": TEST_PASSWORD, "new_password": "new_password_1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = login(app, "kaji", "new_password_1").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_admins_manage_roles(pool: PgPool) {
    let (admin, admin_token) = common::user_token(&pool, "admin", Role::Admin).await;
    let (target, target_token) = common::user_token(&pool, "kaji", Role::User).await;
    let app = common::build_test_app(pool);

    let uri = format!("/api/v1/users/{}/role", target.id);
    let response = put_json_auth(app.clone(), &uri, &target_token, json!({ "role": "admin" })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_json_auth(app.clone(), &uri, &admin_token, json!({ "role": "editor" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["role"], "editor");

    let response = put_json_auth(app.clone(), &uri, &admin_token, json!({ "role": "overlord" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let own = format!("/api/v1/users/{}/role", admin.id);
    let response = put_json_auth(app.clone(), &own, &admin_token, json!({ "role": "user" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = delete_auth(app.clone(), &format!("/api/v1/users/{}", admin.id), &admin_token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = delete_auth(app.clone(), &format!("/api/v1/users/{}", target.id), &admin_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app, &format!("/api/v1/users/{}", target.id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
