/// Columns of the forums table, in the order [`Forum::from_row`] expects.
pub(crate) const FORUM_COLUMNS: &str =
    "slug, name, description, icon, readable_role_ids, writable_role_ids";

/// Slugged content category with optional role gating.
///
/// An absent or empty readable set means world-readable. The writable
/// set is declared in the data model but not enforced by any operation;
/// that gap is inherited deliberately and documented rather than fixed.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Forum {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readable_role_ids: Option<Vec<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub writable_role_ids: Option<Vec<i32>>,
}

impl Forum {
    /// Pure visibility predicate: readable when the forum declares no
    /// readable roles, declares an empty set, or shares a role with the
    /// reader.
    pub fn readable_by(&self, role_ids: &[i32]) -> bool {
        match self.readable_role_ids.as_deref() {
            None => true,
            Some([]) => true,
            Some(readable) => readable.iter().any(|r| role_ids.contains(r)),
        }
    }

    pub fn from_row(row: &tokio_postgres::Row) -> Self {
        Self {
            slug: row.get(0),
            name: row.get(1),
            description: row.get(2),
            icon: row.get(3),
            readable_role_ids: row.get(4),
            writable_role_ids: row.get(5),
        }
    }
}

/// Slug pattern: `[a-z0-9_-]*`.
pub fn valid_slug(slug: &str) -> bool {
    slug.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

mod schema {
    use super::*;
    use agora_database::*;

    impl Schema for Forum {
        fn name() -> &'static str {
            FORUMS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                FORUMS,
                " (
                    slug              TEXT PRIMARY KEY,
                    name              TEXT NOT NULL,
                    description       TEXT NOT NULL DEFAULT '',
                    icon              TEXT NOT NULL DEFAULT '',
                    readable_role_ids INTEGER[],
                    writable_role_ids INTEGER[]
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_forums_slug ON ",
                FORUMS,
                " (LOWER(slug));"
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forum(readable: Option<Vec<i32>>) -> Forum {
        Forum {
            slug: "general".into(),
            name: "General".into(),
            description: String::new(),
            icon: String::new(),
            readable_role_ids: readable,
            writable_role_ids: None,
        }
    }

    #[test]
    fn absent_role_set_is_world_readable() {
        assert!(forum(None).readable_by(&[]));
        assert!(forum(None).readable_by(&[3]));
    }

    #[test]
    fn empty_role_set_is_world_readable() {
        assert!(forum(Some(vec![])).readable_by(&[]));
    }

    #[test]
    fn gated_forum_requires_an_intersecting_role() {
        let f = forum(Some(vec![5]));
        assert!(!f.readable_by(&[]));
        assert!(!f.readable_by(&[3]));
        assert!(f.readable_by(&[5, 7]));
    }

    #[test]
    fn slugs_allow_lowercase_word_characters_and_hyphens() {
        assert!(valid_slug("general-2"));
        assert!(valid_slug("off_topic"));
        assert!(valid_slug(""));
        assert!(!valid_slug("General"));
        assert!(!valid_slug("no spaces"));
    }
}
