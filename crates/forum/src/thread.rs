use agora_core::ID;
use agora_core::Unique;
use chrono::DateTime;
use chrono::Utc;

/// Columns of the threads table, in the order [`Thread::from_row`] expects.
pub(crate) const THREAD_COLUMNS: &str =
    "id, title, parent_forum_id, author_id, created_on, closed, pinned, hidden";

/// Topic container under a forum, referenced by the forum's slug.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: ID<Self>,
    pub title: String,
    pub parent_forum_id: String,
    pub author_id: String,
    pub created_on: DateTime<Utc>,
    pub closed: bool,
    pub pinned: bool,
    pub hidden: bool,
}

impl Unique for Thread {
    fn id(&self) -> ID<Self> {
        self.id.clone()
    }
}

impl Thread {
    pub fn from_row(row: &tokio_postgres::Row) -> Self {
        Self {
            id: ID::from(row.get::<_, String>(0)),
            title: row.get(1),
            parent_forum_id: row.get(2),
            author_id: row.get(3),
            created_on: row.get(4),
            closed: row.get(5),
            pinned: row.get(6),
            hidden: row.get(7),
        }
    }
}

mod schema {
    use super::*;
    use agora_database::*;

    impl Schema for Thread {
        fn name() -> &'static str {
            THREADS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                THREADS,
                " (
                    id              TEXT PRIMARY KEY,
                    title           TEXT NOT NULL,
                    parent_forum_id TEXT NOT NULL,
                    author_id       TEXT NOT NULL,
                    created_on      TIMESTAMPTZ NOT NULL,
                    closed          BOOLEAN NOT NULL DEFAULT FALSE,
                    pinned          BOOLEAN NOT NULL DEFAULT FALSE,
                    hidden          BOOLEAN NOT NULL DEFAULT FALSE
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_threads_forum ON ",
                THREADS,
                " (parent_forum_id);"
            )
        }
    }
}
