//! Store-backed flow tests.
//!
//! These run against a live PostgreSQL instance and are skipped when
//! `DB_URL` is unset. Every test provisions the schema (idempotent) and
//! works on rows with freshly generated names, so reruns against the
//! same database stay independent.
use actix_web::App;
use actix_web::http::StatusCode;
use actix_web::test;
use actix_web::web;
use agora_auth::AuthRepository;
use agora_auth::Credential;
use agora_auth::Member;
use agora_auth::Token;
use agora_auth::mint;
use agora_core::ID;
use agora_core::Unique;
use agora_database::provision;
use agora_forum::Forum;
use agora_forum::ForumRepository;
use agora_forum::Post;
use agora_forum::PostRepository;
use agora_forum::Thread;
use agora_forum::ThreadRepository;
use serde_json::json;
use std::sync::Arc;
use tokio_postgres::Client;

async fn store() -> Option<Arc<Client>> {
    std::env::var("DB_URL").ok()?;
    let db = agora_database::db().await;
    provision::<Member>(&db).await.ok()?;
    provision::<Credential>(&db).await.ok()?;
    provision::<Token>(&db).await.ok()?;
    provision::<Forum>(&db).await.ok()?;
    provision::<Thread>(&db).await.ok()?;
    provision::<Post>(&db).await.ok()?;
    Some(db)
}

/// Fresh 12-character name, valid as both username and (lowercased) slug.
fn nonce() -> String {
    ID::<()>::default().to_string()
}

#[actix_web::test]
async fn rotation_replaces_the_live_access_token() {
    let Some(db) = store().await else { return };
    let name = nonce();
    let member = Member::register(name.clone(), format!("{name}@example.com"), String::new());
    let credential = Credential::new(name.clone(), "hunter2").unwrap();
    db.create(&member, &credential).await.unwrap();
    let token = Token::issue(&name, true);
    db.issue(&token).await.unwrap();
    let refresh = token.refresh_token.clone().unwrap();
    assert!(db.resolve(&token.access_token, "10.0.0.1").await.unwrap().is_some());
    let fresh = mint();
    assert!(db.rotate(&refresh, &fresh).await.unwrap());
    assert!(db.resolve(&fresh, "10.0.0.1").await.unwrap().is_some());
    assert!(db.resolve(&token.access_token, "10.0.0.1").await.unwrap().is_none());
}

#[actix_web::test]
async fn login_before_validation_is_forbidden() {
    let Some(db) = store().await else { return };
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(db.clone()))
            .route("/register", web::post().to(agora_auth::register))
            .route("/login", web::post().to(agora_auth::login)),
    )
    .await;
    let name = nonce();
    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(json!({
            "username": name,
            "email": format!("{name}@example.com"),
            "password": "hunter2",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let req = test::TestRequest::post()
        .uri("/login")
        .insert_header(("Username", name.as_str()))
        .insert_header(("Password", "hunter2"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn slug_rename_carries_every_thread() {
    let Some(db) = store().await else { return };
    let old = nonce().to_ascii_lowercase();
    let new = nonce().to_ascii_lowercase();
    let forum = Forum {
        slug: old.clone(),
        name: "Lounge".into(),
        description: String::new(),
        icon: String::new(),
        readable_role_ids: None,
        writable_role_ids: None,
    };
    db.insert_forum(&forum).await.unwrap();
    for title in ["one", "two"] {
        let thread = Thread {
            id: ID::default(),
            title: title.into(),
            parent_forum_id: old.clone(),
            author_id: "author".into(),
            created_on: chrono::Utc::now(),
            closed: false,
            pinned: false,
            hidden: false,
        };
        db.insert_thread(&thread).await.unwrap();
    }
    assert_eq!(db.retarget_threads(&old, &new).await.unwrap(), 2);
    let mut renamed = forum.clone();
    renamed.slug = new.clone();
    db.update_forum(&old, &renamed).await.unwrap();
    assert_eq!(db.threads_under(&new).await.unwrap().len(), 2);
    assert!(db.threads_under(&old).await.unwrap().is_empty());
    assert!(db.forum(&old).await.unwrap().is_none());
    assert_eq!(db.forum(&new).await.unwrap().unwrap().name, "Lounge");
}

#[actix_web::test]
async fn replies_returns_the_posts_alone() {
    let Some(db) = store().await else { return };
    let slug = nonce().to_ascii_lowercase();
    let forum = Forum {
        slug: slug.clone(),
        name: "Lounge".into(),
        description: String::new(),
        icon: String::new(),
        readable_role_ids: None,
        writable_role_ids: None,
    };
    db.insert_forum(&forum).await.unwrap();
    let thread = Thread {
        id: ID::default(),
        title: "t".into(),
        parent_forum_id: slug,
        author_id: "author".into(),
        created_on: chrono::Utc::now(),
        closed: false,
        pinned: false,
        hidden: false,
    };
    db.insert_thread(&thread).await.unwrap();
    let seed = Post::compose("author", "first", thread.id());
    db.insert_post(&seed).await.unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(db.clone()))
            .route("/api/thread/{id}/replies", web::get().to(agora_forum::replies)),
    )
    .await;
    let req = test::TestRequest::get()
        .uri(&format!("/api/thread/{}/replies", thread.id))
        .to_request();
    let posts: Vec<Post> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].content, "first");
    assert_eq!(posts[0].thread_id, thread.id);
}
