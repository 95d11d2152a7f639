use super::Thread;
use agora_core::ID;
use agora_core::Unique;
use chrono::DateTime;
use chrono::Utc;

/// Columns of the posts table, in the order [`Post::from_row`] expects.
pub(crate) const POST_COLUMNS: &str =
    "id, author_id, content, raw_content, thread_id, created_on, logs, likes, dislikes";

/// One edit-history entry: who changed the post, when, what it said
/// before, and why.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditLog {
    pub editor_id: String,
    pub edit_time: DateTime<Utc>,
    pub old_content: String,
    pub reason: String,
}

/// Which of the two vote sets a member is casting into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Like,
    Dislike,
}

/// Single content entry within a thread. Rendered and raw content are
/// identical at creation time.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: ID<Self>,
    pub author_id: String,
    pub content: String,
    pub raw_content: String,
    pub thread_id: ID<Thread>,
    pub created_on: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub logs: Vec<EditLog>,
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub dislikes: Vec<String>,
}

impl Unique for Post {
    fn id(&self) -> ID<Self> {
        self.id.clone()
    }
}

impl Post {
    /// Seed or reply post with fresh id and identical rendered/raw content.
    pub fn compose(author_id: &str, content: &str, thread_id: ID<Thread>) -> Self {
        Self {
            id: ID::default(),
            author_id: author_id.to_string(),
            content: content.to_string(),
            raw_content: content.to_string(),
            thread_id,
            created_on: Utc::now(),
            logs: Vec::new(),
            likes: Vec::new(),
            dislikes: Vec::new(),
        }
    }

    /// Casts a vote: joins the target set (if absent) and leaves the
    /// opposite set. A member is in at most one set at any time. This is
    /// the reference transition for [`PostRepository::vote`], which
    /// performs the same change as one store statement.
    pub fn vote(&mut self, member: &str, vote: Vote) {
        let (target, opposite) = match vote {
            Vote::Like => (&mut self.likes, &mut self.dislikes),
            Vote::Dislike => (&mut self.dislikes, &mut self.likes),
        };
        if !target.iter().any(|m| m == member) {
            target.push(member.to_string());
        }
        opposite.retain(|m| m != member);
    }

    /// Removes the member from both sets. Idempotent.
    pub fn unvote(&mut self, member: &str) {
        self.likes.retain(|m| m != member);
        self.dislikes.retain(|m| m != member);
    }

    pub fn from_row(row: &tokio_postgres::Row) -> Self {
        Self {
            id: ID::from(row.get::<_, String>(0)),
            author_id: row.get(1),
            content: row.get(2),
            raw_content: row.get(3),
            thread_id: ID::from(row.get::<_, String>(4)),
            created_on: row.get(5),
            logs: serde_json::from_value(row.get(6)).unwrap_or_default(),
            likes: row.get(7),
            dislikes: row.get(8),
        }
    }
}

mod schema {
    use super::*;
    use agora_database::*;

    impl Schema for Post {
        fn name() -> &'static str {
            POSTS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                POSTS,
                " (
                    id          TEXT PRIMARY KEY,
                    author_id   TEXT NOT NULL,
                    content     TEXT NOT NULL,
                    raw_content TEXT NOT NULL,
                    thread_id   TEXT NOT NULL,
                    created_on  TIMESTAMPTZ NOT NULL,
                    logs        JSONB NOT NULL DEFAULT '[]',
                    likes       TEXT[] NOT NULL DEFAULT '{}',
                    dislikes    TEXT[] NOT NULL DEFAULT '{}'
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_posts_thread ON ",
                POSTS,
                " (thread_id);"
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> Post {
        Post::compose("author", "hello", ID::default())
    }

    #[test]
    fn composed_post_mirrors_content() {
        let p = post();
        assert_eq!(p.content, p.raw_content);
        assert_eq!(p.author_id, "author");
        assert!(p.likes.is_empty() && p.dislikes.is_empty());
    }

    #[test]
    fn like_then_dislike_moves_the_member() {
        let mut p = post();
        p.vote("kelechi", Vote::Like);
        p.vote("kelechi", Vote::Dislike);
        assert!(!p.likes.contains(&"kelechi".to_string()));
        assert_eq!(p.dislikes.iter().filter(|m| *m == "kelechi").count(), 1);
    }

    #[test]
    fn repeated_votes_do_not_duplicate() {
        let mut p = post();
        p.vote("kelechi", Vote::Like);
        p.vote("kelechi", Vote::Like);
        assert_eq!(p.likes.len(), 1);
    }

    #[test]
    fn votes_from_different_members_coexist() {
        let mut p = post();
        p.vote("a", Vote::Like);
        p.vote("b", Vote::Dislike);
        assert_eq!(p.likes, vec!["a".to_string()]);
        assert_eq!(p.dislikes, vec!["b".to_string()]);
    }

    #[test]
    fn unvote_is_idempotent() {
        let mut p = post();
        p.vote("kelechi", Vote::Like);
        p.unvote("kelechi");
        let once = p.clone();
        p.unvote("kelechi");
        assert_eq!(p, once);
        assert!(p.likes.is_empty() && p.dislikes.is_empty());
    }

    #[test]
    fn empty_logs_stay_off_the_wire() {
        let json = serde_json::to_value(post()).unwrap();
        assert!(json.get("logs").is_none());
        assert!(json.get("likes").is_some());
        assert!(json.get("threadId").is_some());
    }
}
