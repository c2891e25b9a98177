//! Translation overlay: writes under `/translations`, reads via `?lang=`.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get, post_json_auth, put_json_auth};
use serde_json::json;
use sqlx::PgPool;
use usogui_core::roles::Role;

#[sqlx::test(migrations = "../../db/migrations")]
async fn japanese_overlay_replaces_text(pool: PgPool) {
    let (_, editor) = common::user_token(&pool, "editor", Role::Editor).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/characters",
        &editor,
        json!({ "name": "Baku Madarame", "description": "Professional gambler" }),
    )
    .await;
    let id = body_json(response).await["data"]["id"].clone();

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/translations/character/{id}/ja"),
        &editor,
        json!({ "name": "斑目貘" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let uri = format!("/api/v1/characters/{id}");
    let json = body_json(get(app.clone(), &format!("{uri}?lang=ja")).await).await;
    assert_eq!(json["data"]["name"], "斑目貘");
    // Untranslated fields fall back to English.
    assert_eq!(json["data"]["description"], "Professional gambler");

    let json = body_json(get(app.clone(), &uri).await).await;
    assert_eq!(json["data"]["name"], "Baku Madarame");

    let json = body_json(get(app.clone(), &format!("{uri}?lang=es")).await).await;
    assert_eq!(json["data"]["name"], "Baku Madarame");

    let json = body_json(get(app.clone(), &format!("/api/v1/translations/character/{id}")).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["language"], "ja");

    let response = get(app, &format!("{uri}?lang=xx")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upsert_is_validated(pool: PgPool) {
    let (_, editor) = common::user_token(&pool, "editor", Role::Editor).await;
    let (_, moderator) = common::user_token(&pool, "mod", Role::Moderator).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/factions",
        &editor,
        json!({ "name": "Kakerou" }),
    )
    .await;
    let id = body_json(response).await["data"]["id"].clone();

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/translations/faction/{id}/en"),
        &editor,
        json!({ "name": "Kakerou" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/translations/faction/{id}/ja"),
        &editor,
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/translations/guide/{id}/ja"),
        &editor,
        json!({ "name": "x" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_auth(
        app.clone(),
        "/api/v1/translations/faction/999999/ja",
        &editor,
        json!({ "name": "賭郎" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // A second write to the same language replaces the first.
    let uri = format!("/api/v1/translations/faction/{id}/ja");
    put_json_auth(app.clone(), &uri, &editor, json!({ "name": "かけろう" })).await;
    let response = put_json_auth(app.clone(), &uri, &editor, json!({ "name": "賭郎" })).await;
    assert_eq!(body_json(response).await["data"]["name"], "賭郎");

    assert_eq!(delete_auth(app.clone(), &uri, &editor).await.status(), StatusCode::FORBIDDEN);
    assert_eq!(delete_auth(app.clone(), &uri, &moderator).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(get(app, &uri).await.status(), StatusCode::NOT_FOUND);
}
