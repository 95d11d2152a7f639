//! Forum content: forums, threads, posts, and their HTTP handlers.
//!
//! Read routes are public with role-scoped narrowing; write routes
//! require a resolved identity. All store mutations that touch a single
//! row are single statements so concurrent requests cannot lose updates.
//!
//! ## Records
//!
//! - [`Forum`] — Slugged category with optional role gating
//! - [`Thread`] — Topic under a forum, carries a seed post
//! - [`Post`] — Content entry with like/dislike sets and edit history
//!
//! ## Plumbing
//!
//! - [`ForumRepository`], [`ThreadRepository`], [`PostRepository`]
//! - [`Notifier`] — Fire-and-forget webhook on new content
mod dto;
mod forum;
mod handlers;
mod notify;
mod post;
mod repository;
mod thread;

pub use dto::*;
pub use forum::*;
pub use handlers::*;
pub use notify::*;
pub use post::*;
pub use repository::*;
pub use thread::*;
