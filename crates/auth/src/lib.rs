//! Authentication, sessions, and identity management.
//!
//! Opaque bearer tokens backed by the store, with bcrypt password
//! hashing. Tokens live until explicitly revoked; a refresh token is
//! issued only when a login asks to be remembered.
//!
//! ## Records
//!
//! - [`Member`] — Registered account, keyed by name
//! - [`Credential`] — Password hash, one per member
//! - [`Token`] — Live session (access token, optional refresh token)
//!
//! ## Request plumbing
//!
//! - [`Auth`] — Extractor requiring a resolved identity
//! - [`MaybeAuth`] — Extractor tolerating anonymous requests
//! - [`AuthRepository`] — Store operations behind the above
mod dto;
mod handlers;
mod member;
mod middleware;
mod repository;
mod token;

pub mod credential;

pub use dto::*;
pub use handlers::*;
pub use member::*;
pub use middleware::*;
pub use repository::*;
pub use token::*;

pub use credential::Credential;
