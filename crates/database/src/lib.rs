//! Store connectivity and schema provisioning.
//!
//! Thin layer over PostgreSQL: a shared connection handle, table name
//! constants, and the [`Schema`] trait used by the one-shot `migrate`
//! binary to provision tables and indexes.
//!
//! ## Connectivity
//!
//! - [`db()`] — Establishes a database connection from `DB_URL`
//!
//! ## Provisioning
//!
//! - [`Schema`] — Table metadata and DDL generation
//! - [`provision`] — Creates one entity's table and indexes
mod schema;

pub use schema::*;

use std::sync::Arc;
use tokio_postgres::Client;

/// Establishes a database connection.
///
/// Connects to PostgreSQL using the `DB_URL` environment variable.
/// Returns an `Arc<Client>` suitable for sharing across async tasks.
///
/// # Panics
///
/// Panics if `DB_URL` is not set or if connection fails.
pub async fn db() -> Arc<Client> {
    log::info!("connecting to database");
    let tls = tokio_postgres::tls::NoTls;
    let ref url = std::env::var("DB_URL").expect("DB_URL must be set");
    let (client, connection) = tokio_postgres::connect(url, tls)
        .await
        .expect("database connection failed");
    tokio::spawn(connection);
    Arc::new(client)
}

/// PostgreSQL error type alias.
pub type PgErr = tokio_postgres::Error;

/// Table for registered member accounts.
#[rustfmt::skip]
pub const MEMBERS:     &str = "members";
/// Table for password hashes, one row per member.
#[rustfmt::skip]
pub const CREDENTIALS: &str = "credentials";
/// Table for live bearer tokens.
#[rustfmt::skip]
pub const TOKENS:      &str = "tokens";
/// Table for forums (slugged content categories).
#[rustfmt::skip]
pub const FORUMS:      &str = "forums";
/// Table for threads under forums.
#[rustfmt::skip]
pub const THREADS:     &str = "threads";
/// Table for posts under threads.
#[rustfmt::skip]
pub const POSTS:       &str = "posts";
