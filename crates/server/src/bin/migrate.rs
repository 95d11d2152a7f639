//! One-shot schema provisioning binary.
//!
//! Creates every table and index the backend expects. Safe to re-run;
//! all DDL is `IF NOT EXISTS`.
use agora_auth::Credential;
use agora_auth::Member;
use agora_auth::Token;
use agora_database::provision;
use agora_forum::Forum;
use agora_forum::Post;
use agora_forum::Thread;

#[tokio::main]
async fn main() {
    agora_core::log();
    let db = agora_database::db().await;
    provision::<Member>(&db).await.unwrap();
    provision::<Credential>(&db).await.unwrap();
    provision::<Token>(&db).await.unwrap();
    provision::<Forum>(&db).await.unwrap();
    provision::<Thread>(&db).await.unwrap();
    provision::<Post>(&db).await.unwrap();
    log::info!("schema provisioned");
}
