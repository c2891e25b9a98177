//! Integration tests for users, sessions and community-submitted content.

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use usogui_core::event::{EventStatus, EventType};
use usogui_core::guide::GuideStatus;
use usogui_core::media::MediaStatus;
use usogui_core::pagination::PageRequest;
use usogui_core::roles::Role;
use usogui_core::tag::TaggableEntity;
use usogui_db::models::character::CreateCharacter;
use usogui_db::models::event::{CreateEvent, EventFilter};
use usogui_db::models::guide::{CreateGuide, GuideFilter, GuideSort};
use usogui_db::models::media::{CreateMedia, MediaFilter};
use usogui_db::models::quote::{CreateQuote, QuoteFilter};
use usogui_db::models::session::CreateSession;
use usogui_db::models::user::{CreateUser, User};
use usogui_db::repositories::{
    CharacterRepo, EventRepo, GuideRepo, MediaRepo, QuoteRepo, SessionRepo, TagRepo, UserRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn user(pool: &PgPool, username: &str, role: Role) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "not-a-real-hash".to_string(),
            role,
        },
    )
    .await
    .unwrap()
}

async fn character(pool: &PgPool, name: &str) -> i64 {
    CharacterRepo::create(
        pool,
        &CreateCharacter {
            name: name.to_string(),
            alternate_names: None,
            description: None,
            backstory: None,
            first_appearance_chapter: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn new_guide(title: &str) -> CreateGuide {
    CreateGuide {
        title: title.to_string(),
        description: None,
        content: "Step one: lie.".to_string(),
        arc_id: None,
        gamble_id: None,
        character_ids: vec![],
    }
}

// ---------------------------------------------------------------------------
// Users and sessions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_defaults_and_lockout_counters(pool: PgPool) {
    let u = user(&pool, "baku", Role::User).await;
    assert_eq!(u.role(), Role::User);
    assert_eq!(u.user_progress, 0);
    assert!(u.is_active);

    assert_eq!(UserRepo::increment_failed_login(&pool, u.id).await.unwrap(), 1);
    assert_eq!(UserRepo::increment_failed_login(&pool, u.id).await.unwrap(), 2);

    let until = Utc::now() + Duration::minutes(15);
    UserRepo::lock_account(&pool, u.id, until).await.unwrap();
    let locked = UserRepo::find_by_id(&pool, u.id).await.unwrap().unwrap();
    assert!(locked.locked_until.is_some());
    assert_eq!(locked.failed_login_count, 0);

    UserRepo::record_successful_login(&pool, u.id).await.unwrap();
    let cleared = UserRepo::find_by_id(&pool, u.id).await.unwrap().unwrap();
    assert!(cleared.locked_until.is_none());
    assert!(cleared.last_login_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn role_and_progress_updates(pool: PgPool) {
    let u = user(&pool, "kaji", Role::User).await;
    let promoted = UserRepo::update_role(&pool, u.id, Role::Moderator)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(promoted.role(), Role::Moderator);

    let progressed = UserRepo::update_progress(&pool, u.id, 120)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(progressed.user_progress, 120);

    let err = UserRepo::update_progress(&pool, u.id, -1).await.unwrap_err();
    assert_matches!(err, sqlx::Error::Database(ref db) if db.code().as_deref() == Some("23514"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deactivated_users_drop_out_of_listing(pool: PgPool) {
    let a = user(&pool, "alpha", Role::User).await;
    user(&pool, "beta", Role::User).await;
    assert!(UserRepo::deactivate(&pool, a.id).await.unwrap());
    assert!(!UserRepo::deactivate(&pool, a.id).await.unwrap());

    let (rows, total) = UserRepo::list(&pool, None, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(rows[0].username, "beta");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sessions_revoke_once(pool: PgPool) {
    let u = user(&pool, "session_user", Role::User).await;
    let session = SessionRepo::create(
        &pool,
        &CreateSession {
            user_id: u.id,
            refresh_token_hash: "abc".to_string(),
            expires_at: Utc::now() + Duration::days(7),
            user_agent: None,
            ip_address: None,
        },
    )
    .await
    .unwrap();

    assert!(SessionRepo::find_active_by_token_hash(&pool, "abc")
        .await
        .unwrap()
        .is_some());
    assert!(SessionRepo::revoke(&pool, session.id).await.unwrap());
    assert!(!SessionRepo::revoke(&pool, session.id).await.unwrap());
    assert!(SessionRepo::find_active_by_token_hash(&pool, "abc")
        .await
        .unwrap()
        .is_none());
    assert_eq!(SessionRepo::cleanup_expired(&pool).await.unwrap(), 1);
}

// ---------------------------------------------------------------------------
// Guides
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn guide_transitions_are_status_guarded(pool: PgPool) {
    let author = user(&pool, "author", Role::User).await;
    let guide = GuideRepo::create(&pool, author.id, &new_guide("Reading Baku"))
        .await
        .unwrap();
    assert_eq!(guide.status, "draft");
    assert_eq!(guide.author_username, "author");

    let pending = GuideRepo::transition(
        &pool,
        guide.id,
        GuideStatus::Draft,
        GuideStatus::Pending,
        None,
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(pending.status, "pending");

    // A stale `from` status loses.
    let stale = GuideRepo::transition(
        &pool,
        guide.id,
        GuideStatus::Draft,
        GuideStatus::Pending,
        None,
    )
    .await
    .unwrap();
    assert!(stale.is_none());

    let rejected = GuideRepo::transition(
        &pool,
        guide.id,
        GuideStatus::Pending,
        GuideStatus::Rejected,
        Some("Too short"),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(rejected.rejection_reason.as_deref(), Some("Too short"));

    GuideRepo::transition(&pool, guide.id, GuideStatus::Rejected, GuideStatus::Pending, None)
        .await
        .unwrap();
    let published = GuideRepo::transition(
        &pool,
        guide.id,
        GuideStatus::Pending,
        GuideStatus::Published,
        None,
    )
    .await
    .unwrap()
    .unwrap();
    assert!(published.published_at.is_some());
    assert!(published.rejection_reason.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn guide_likes_toggle_and_sort(pool: PgPool) {
    let author = user(&pool, "writer", Role::User).await;
    let reader = user(&pool, "reader", Role::User).await;
    let quiet = GuideRepo::create(&pool, author.id, &new_guide("Quiet"))
        .await
        .unwrap();
    let loud = GuideRepo::create(&pool, author.id, &new_guide("Loud"))
        .await
        .unwrap();

    let liked = GuideRepo::toggle_like(&pool, loud.id, reader.id).await.unwrap();
    assert!(liked.liked);
    assert_eq!(liked.like_count, 1);

    let popular = GuideFilter {
        sort: GuideSort::Popular,
        ..Default::default()
    };
    let (rows, _) = GuideRepo::list(&pool, &popular, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(rows[0].id, loud.id);
    assert_eq!(rows[1].id, quiet.id);

    let unliked = GuideRepo::toggle_like(&pool, loud.id, reader.id).await.unwrap();
    assert!(!unliked.liked);
    assert_eq!(unliked.like_count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn guide_filters_by_status_and_character(pool: PgPool) {
    let author = user(&pool, "filterer", Role::User).await;
    let baku = character(&pool, "Baku").await;
    let mut input = new_guide("About Baku");
    input.character_ids = vec![baku];
    let guide = GuideRepo::create(&pool, author.id, &input).await.unwrap();
    assert_eq!(guide.character_ids, vec![baku]);
    GuideRepo::create(&pool, author.id, &new_guide("Other"))
        .await
        .unwrap();

    let published_only = GuideFilter {
        status: Some(GuideStatus::Published),
        ..Default::default()
    };
    let (_, total) = GuideRepo::list(&pool, &published_only, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(total, 0);

    let by_character = GuideFilter {
        character_id: Some(baku),
        ..Default::default()
    };
    let (rows, total) = GuideRepo::list(&pool, &by_character, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(rows[0].id, guide.id);

    GuideRepo::increment_view_count(&pool, guide.id).await.unwrap();
    let viewed = GuideRepo::find_by_id(&pool, guide.id).await.unwrap().unwrap();
    assert_eq!(viewed.view_count, 1);
}

// ---------------------------------------------------------------------------
// Quotes, events, media, tags
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn quotes_join_character_and_random_respects_progress(pool: PgPool) {
    let submitter = user(&pool, "quoter", Role::User).await;
    let baku = character(&pool, "Baku").await;
    for chapter in [1, 300] {
        QuoteRepo::create(
            &pool,
            &CreateQuote {
                text: format!("Line from {chapter}"),
                character_id: baku,
                chapter_number: chapter,
                page_number: None,
                context: None,
            },
            submitter.id,
        )
        .await
        .unwrap();
    }

    let (rows, total) = QuoteRepo::list(
        &pool,
        &QuoteFilter {
            character_id: Some(baku),
            search: Some("line".to_string()),
            max_chapter: None,
        },
        PageRequest::default(),
    )
    .await
    .unwrap();
    assert_eq!(total, 2);
    assert_eq!(rows[0].character_name, "Baku");

    let (rows, total) = QuoteRepo::list(
        &pool,
        &QuoteFilter {
            search: Some("line".to_string()),
            max_chapter: Some(10),
            ..Default::default()
        },
        PageRequest::default(),
    )
    .await
    .unwrap();
    assert_eq!(total, 1);
    assert_eq!(rows[0].chapter_number, 1);

    for _ in 0..5 {
        let q = QuoteRepo::random(&pool, Some(10)).await.unwrap().unwrap();
        assert_eq!(q.chapter_number, 1);
    }
    assert!(QuoteRepo::random(&pool, Some(0)).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn events_created_with_characters_and_approved(pool: PgPool) {
    let editor = user(&pool, "editor", Role::Editor).await;
    let baku = character(&pool, "Baku").await;
    let event = EventRepo::create(
        &pool,
        &CreateEvent {
            title: "Baku loses an eye".to_string(),
            description: None,
            event_type: None,
            chapter_number: 100,
            spoiler_chapter: None,
            arc_id: None,
            gamble_id: None,
            character_ids: vec![baku],
        },
        EventType::Reveal,
        EventStatus::Pending,
        editor.id,
    )
    .await
    .unwrap();
    assert_eq!(event.status, "pending");
    assert_eq!(event.character_ids, vec![baku]);

    let approved_only = EventFilter {
        status: Some("approved".to_string()),
        ..Default::default()
    };
    let (_, total) = EventRepo::list(&pool, &approved_only, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(total, 0);

    assert!(EventRepo::approve(&pool, event.id).await.unwrap());
    // A second approval finds nothing left to change.
    assert!(!EventRepo::approve(&pool, event.id).await.unwrap());
    let (_, total) = EventRepo::list(&pool, &approved_only, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(total, 1);

    EventRepo::set_characters(&pool, event.id, &[]).await.unwrap();
    let reloaded = EventRepo::find_by_id(&pool, event.id).await.unwrap().unwrap();
    assert!(reloaded.character_ids.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn media_review_happens_once(pool: PgPool) {
    let submitter = user(&pool, "submitter", Role::User).await;
    let moderator = user(&pool, "mod", Role::Moderator).await;
    let baku = character(&pool, "Baku").await;

    let media = MediaRepo::create(
        &pool,
        &CreateMedia {
            url: "https://example.com/baku.png".to_string(),
            media_type: "image".to_string(),
            status: MediaStatus::Pending.as_str().to_string(),
            purpose: "gallery".to_string(),
            owner_type: "character".to_string(),
            owner_id: baku,
            chapter_number: None,
            title: None,
            description: None,
            thumbnail_url: None,
            platform: Some("direct".to_string()),
            submitted_by: Some(submitter.id),
        },
    )
    .await
    .unwrap();

    let approved = MediaRepo::review(&pool, media.id, MediaStatus::Approved, moderator.id, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(approved.status, "approved");
    assert_eq!(approved.reviewed_by, Some(moderator.id));

    let again = MediaRepo::review(&pool, media.id, MediaStatus::Rejected, moderator.id, Some("no"))
        .await
        .unwrap();
    assert!(again.is_none());

    let filter = MediaFilter {
        owner_type: Some("character".to_string()),
        owner_id: Some(baku),
        status: Some("approved".to_string()),
        ..Default::default()
    };
    let (_, total) = MediaRepo::list(&pool, &filter, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(total, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn entity_tags_replace(pool: PgPool) {
    let baku = character(&pool, "Baku").await;
    let liar = TagRepo::create(&pool, "liar", None).await.unwrap();
    let genius = TagRepo::create(&pool, "genius", None).await.unwrap();

    let tags = TagRepo::set_for_entity(
        &pool,
        TaggableEntity::Character,
        baku,
        &[liar.id, genius.id, liar.id],
    )
    .await
    .unwrap();
    assert_eq!(
        tags.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
        vec!["genius", "liar"]
    );

    let tags = TagRepo::set_for_entity(&pool, TaggableEntity::Character, baku, &[genius.id])
        .await
        .unwrap();
    assert_eq!(tags.len(), 1);

    assert!(TagRepo::entity_exists(&pool, TaggableEntity::Character, baku)
        .await
        .unwrap());
    assert!(!TagRepo::entity_exists(&pool, TaggableEntity::Guide, 9999)
        .await
        .unwrap());
}
