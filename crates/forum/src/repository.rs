use super::*;
use agora_core::ID;
use agora_database::*;
use std::sync::Arc;
use tokio_postgres::Client;

/// Store operations for forums.
#[allow(async_fn_in_trait)]
pub trait ForumRepository {
    async fn insert_forum(&self, forum: &Forum) -> Result<(), PgErr>;
    async fn forum(&self, slug: &str) -> Result<Option<Forum>, PgErr>;
    async fn forums(&self) -> Result<Vec<Forum>, PgErr>;
    /// Overwrites the forum row found under `slug` with the patched
    /// record (which may carry a new slug).
    async fn update_forum(&self, slug: &str, forum: &Forum) -> Result<(), PgErr>;
    /// Repoints every thread under `old` at `new`. Part of the slug
    /// rename: runs before the forum row itself is updated, and the two
    /// steps are not transactional. A crash in between leaves threads on
    /// the new slug with the forum still on the old one; recovery is an
    /// idempotent retry of the rename.
    async fn retarget_threads(&self, old: &str, new: &str) -> Result<u64, PgErr>;
}

/// Store operations for threads.
#[allow(async_fn_in_trait)]
pub trait ThreadRepository {
    async fn insert_thread(&self, thread: &Thread) -> Result<(), PgErr>;
    async fn thread(&self, id: &str) -> Result<Option<Thread>, PgErr>;
    async fn threads_under(&self, slug: &str) -> Result<Vec<Thread>, PgErr>;
}

/// Store operations for posts.
#[allow(async_fn_in_trait)]
pub trait PostRepository {
    async fn insert_post(&self, post: &Post) -> Result<(), PgErr>;
    async fn post(&self, id: &str) -> Result<Option<Post>, PgErr>;
    async fn posts_under(&self, thread: &ID<Thread>) -> Result<Vec<Post>, PgErr>;
    /// Casts a vote as one atomic statement: the member joins the target
    /// set unless already present and leaves the opposite set. True iff
    /// the post exists. See [`Post::vote`] for the reference transition.
    async fn vote(&self, id: &str, member: &str, vote: Vote) -> Result<bool, PgErr>;
    /// Removes the member from both sets, atomically and idempotently.
    async fn unvote(&self, id: &str, member: &str) -> Result<bool, PgErr>;
}

impl ForumRepository for Arc<Client> {
    async fn insert_forum(&self, forum: &Forum) -> Result<(), PgErr> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                FORUMS,
                " (",
                FORUM_COLUMNS,
                ") VALUES ($1, $2, $3, $4, $5, $6)"
            ),
            &[
                &forum.slug,
                &forum.name,
                &forum.description,
                &forum.icon,
                &forum.readable_role_ids,
                &forum.writable_role_ids,
            ],
        )
        .await
        .map(|_| ())
    }

    async fn forum(&self, slug: &str) -> Result<Option<Forum>, PgErr> {
        self.query_opt(
            const_format::concatcp!("SELECT ", FORUM_COLUMNS, " FROM ", FORUMS, " WHERE slug = $1"),
            &[&slug],
        )
        .await
        .map(|opt| opt.map(|row| Forum::from_row(&row)))
    }

    async fn forums(&self) -> Result<Vec<Forum>, PgErr> {
        self.query(
            const_format::concatcp!("SELECT ", FORUM_COLUMNS, " FROM ", FORUMS),
            &[],
        )
        .await
        .map(|rows| rows.iter().map(Forum::from_row).collect())
    }

    async fn update_forum(&self, slug: &str, forum: &Forum) -> Result<(), PgErr> {
        self.execute(
            const_format::concatcp!(
                "UPDATE ",
                FORUMS,
                " SET slug = $2, name = $3, description = $4, icon = $5,
                      readable_role_ids = $6, writable_role_ids = $7
                  WHERE slug = $1"
            ),
            &[
                &slug,
                &forum.slug,
                &forum.name,
                &forum.description,
                &forum.icon,
                &forum.readable_role_ids,
                &forum.writable_role_ids,
            ],
        )
        .await
        .map(|_| ())
    }

    async fn retarget_threads(&self, old: &str, new: &str) -> Result<u64, PgErr> {
        self.execute(
            const_format::concatcp!(
                "UPDATE ",
                THREADS,
                " SET parent_forum_id = $2 WHERE parent_forum_id = $1"
            ),
            &[&old, &new],
        )
        .await
    }
}

impl ThreadRepository for Arc<Client> {
    async fn insert_thread(&self, thread: &Thread) -> Result<(), PgErr> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                THREADS,
                " (",
                THREAD_COLUMNS,
                ") VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
            ),
            &[
                &thread.id.as_str(),
                &thread.title,
                &thread.parent_forum_id,
                &thread.author_id,
                &thread.created_on,
                &thread.closed,
                &thread.pinned,
                &thread.hidden,
            ],
        )
        .await
        .map(|_| ())
    }

    async fn thread(&self, id: &str) -> Result<Option<Thread>, PgErr> {
        self.query_opt(
            const_format::concatcp!(
                "SELECT ",
                THREAD_COLUMNS,
                " FROM ",
                THREADS,
                " WHERE id = $1"
            ),
            &[&id],
        )
        .await
        .map(|opt| opt.map(|row| Thread::from_row(&row)))
    }

    async fn threads_under(&self, slug: &str) -> Result<Vec<Thread>, PgErr> {
        self.query(
            const_format::concatcp!(
                "SELECT ",
                THREAD_COLUMNS,
                " FROM ",
                THREADS,
                " WHERE parent_forum_id = $1"
            ),
            &[&slug],
        )
        .await
        .map(|rows| rows.iter().map(Thread::from_row).collect())
    }
}

impl PostRepository for Arc<Client> {
    async fn insert_post(&self, post: &Post) -> Result<(), PgErr> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                POSTS,
                " (",
                POST_COLUMNS,
                ") VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)"
            ),
            &[
                &post.id.as_str(),
                &post.author_id,
                &post.content,
                &post.raw_content,
                &post.thread_id.as_str(),
                &post.created_on,
                &serde_json::to_value(&post.logs).unwrap_or_default(),
                &post.likes,
                &post.dislikes,
            ],
        )
        .await
        .map(|_| ())
    }

    async fn post(&self, id: &str) -> Result<Option<Post>, PgErr> {
        self.query_opt(
            const_format::concatcp!("SELECT ", POST_COLUMNS, " FROM ", POSTS, " WHERE id = $1"),
            &[&id],
        )
        .await
        .map(|opt| opt.map(|row| Post::from_row(&row)))
    }

    async fn posts_under(&self, thread: &ID<Thread>) -> Result<Vec<Post>, PgErr> {
        self.query(
            const_format::concatcp!(
                "SELECT ",
                POST_COLUMNS,
                " FROM ",
                POSTS,
                " WHERE thread_id = $1"
            ),
            &[&thread.as_str()],
        )
        .await
        .map(|rows| rows.iter().map(Post::from_row).collect())
    }

    async fn vote(&self, id: &str, member: &str, vote: Vote) -> Result<bool, PgErr> {
        let statement = match vote {
            Vote::Like => const_format::concatcp!(
                "UPDATE ",
                POSTS,
                " SET likes = CASE WHEN $2 = ANY(likes) THEN likes
                                   ELSE array_append(likes, $2) END,
                      dislikes = array_remove(dislikes, $2)
                  WHERE id = $1"
            ),
            Vote::Dislike => const_format::concatcp!(
                "UPDATE ",
                POSTS,
                " SET dislikes = CASE WHEN $2 = ANY(dislikes) THEN dislikes
                                      ELSE array_append(dislikes, $2) END,
                      likes = array_remove(likes, $2)
                  WHERE id = $1"
            ),
        };
        self.execute(statement, &[&id, &member]).await.map(|n| n == 1)
    }

    async fn unvote(&self, id: &str, member: &str) -> Result<bool, PgErr> {
        self.execute(
            const_format::concatcp!(
                "UPDATE ",
                POSTS,
                " SET likes = array_remove(likes, $2), dislikes = array_remove(dislikes, $2)
                  WHERE id = $1"
            ),
            &[&id, &member],
        )
        .await
        .map(|n| n == 1)
    }
}
