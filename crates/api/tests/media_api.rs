//! Media submission, moderation queue, and URL resolution.
//!
//! The test config disables oEmbed lookups, so every result here comes from
//! URL heuristics alone.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get, get_auth, post_auth, post_json_auth};
use serde_json::{json, Value};
use sqlx::PgPool;
use usogui_core::roles::Role;

async fn character(app: &axum::Router, token: &str) -> Value {
    let response = post_json_auth(
        app.clone(),
        "/api/v1/characters",
        token,
        json!({ "name": "Baku Madarame" }),
    )
    .await;
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn youtube_submission_is_classified_and_queued(pool: PgPool) {
    let (_, editor) = common::user_token(&pool, "editor", Role::Editor).await;
    let (_, fan) = common::user_token(&pool, "fan", Role::User).await;
    let app = common::build_test_app(pool);
    let owner = character(&app, &editor).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/media",
        &fan,
        json!({
            "url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "owner_type": "character",
            "owner_id": owner["id"]
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let media = body_json(response).await["data"].clone();
    assert_eq!(media["media_type"], "video");
    assert_eq!(media["platform"], "youtube");
    assert_eq!(media["status"], "pending");
    assert_eq!(media["purpose"], "gallery");
    assert_eq!(
        media["thumbnail_url"],
        "https://img.youtube.com/vi/dQw4w9WgXcQ/hqdefault.jpg"
    );

    let json = body_json(get(app.clone(), "/api/v1/media").await).await;
    assert_eq!(json["meta"]["total"], 0);

    let uri = format!("/api/v1/media/{}", media["id"]);
    assert_eq!(get(app.clone(), &uri).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get_auth(app, &uri, &fan).await.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn moderators_review_the_queue_once(pool: PgPool) {
    let (_, editor) = common::user_token(&pool, "editor", Role::Editor).await;
    let (_, fan) = common::user_token(&pool, "fan", Role::User).await;
    let (_, moderator) = common::user_token(&pool, "mod", Role::Moderator).await;
    let app = common::build_test_app(pool);
    let owner = character(&app, &editor).await;

    let submit = |url: &'static str| {
        let app = app.clone();
        let fan = fan.clone();
        let owner_id = owner["id"].clone();
        async move {
            let response = post_json_auth(
                app,
                "/api/v1/media",
                &fan,
                json!({ "url": url, "owner_type": "character", "owner_id": owner_id }),
            )
            .await;
            body_json(response).await["data"].clone()
        }
    };
    let art = submit("https://cdn.example.com/fanart/baku.png").await;
    let clip = submit("https://vimeo.com/123456").await;

    let json = body_json(get_auth(app.clone(), "/api/v1/media/pending", &moderator).await).await;
    assert_eq!(json["meta"]["total"], 2);

    let response = get_auth(app.clone(), "/api/v1/media/pending", &fan).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let approve = format!("/api/v1/media/{}/approve", art["id"]);
    let response = post_auth(app.clone(), &approve, &moderator).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "approved");
    assert!(json["data"]["reviewed_at"].is_string());

    let response = post_auth(app.clone(), &approve, &moderator).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let reject = format!("/api/v1/media/{}/reject", clip["id"]);
    let response = post_json_auth(app.clone(), &reject, &moderator, json!({ "reason": "" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let response = post_json_auth(
        app.clone(),
        &reject,
        &moderator,
        json!({ "reason": "Unrelated clip" }),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["rejection_reason"], "Unrelated clip");

    let json = body_json(
        get(app, &format!("/api/v1/media?owner_type=character&owner_id={}", owner["id"])).await,
    )
    .await;
    assert_eq!(json["meta"]["total"], 1);
    assert_eq!(json["data"][0]["id"], art["id"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn moderator_submissions_skip_the_queue(pool: PgPool) {
    let (_, moderator) = common::user_token(&pool, "mod", Role::Moderator).await;
    let app = common::build_test_app(pool);
    let owner = character(&app, &moderator).await;

    let response = post_json_auth(
        app,
        "/api/v1/media",
        &moderator,
        json!({
            "url": "https://cdn.example.com/cover.jpg",
            "owner_type": "character",
            "owner_id": owner["id"],
            "purpose": "entity_display"
        }),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "approved");
    assert_eq!(json["data"]["purpose"], "entity_display");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn submissions_are_validated(pool: PgPool) {
    let (_, fan) = common::user_token(&pool, "fan", Role::User).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/media",
        &fan,
        json!({ "url": "https://cdn.example.com/a.png", "owner_type": "character", "owner_id": 4242 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/media",
        &fan,
        json!({ "url": "ftp://example.com/a.png", "owner_type": "user", "owner_id": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app,
        "/api/v1/media",
        &fan,
        json!({ "url": "https://cdn.example.com/a.png", "owner_type": "planet", "owner_id": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn submitters_and_moderators_can_delete(pool: PgPool) {
    let (fan_user, fan) = common::user_token(&pool, "fan", Role::User).await;
    let (_, other) = common::user_token(&pool, "other", Role::User).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/media",
        &fan,
        json!({ "url": "https://cdn.example.com/me.png", "owner_type": "user", "owner_id": fan_user.id }),
    )
    .await;
    let media = body_json(response).await["data"].clone();
    let uri = format!("/api/v1/media/{}", media["id"]);

    assert_eq!(delete_auth(app.clone(), &uri, &other).await.status(), StatusCode::FORBIDDEN);
    assert_eq!(delete_auth(app, &uri, &fan).await.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn resolve_requires_auth_and_reports_heuristics(pool: PgPool) {
    let (_, fan) = common::user_token(&pool, "fan", Role::User).await;
    let app = common::build_test_app(pool);

    let uri = "/api/v1/media/resolve?url=https%3A%2F%2Fyoutu.be%2FdQw4w9WgXcQ";
    assert_eq!(get(app.clone(), uri).await.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(get_auth(app.clone(), uri, &fan).await).await;
    assert_eq!(json["data"]["platform"], "youtube");
    assert_eq!(json["data"]["media_type"], "video");

    let response = get_auth(app, "/api/v1/media/resolve?url=javascript%3Aalert(1)", &fan).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
