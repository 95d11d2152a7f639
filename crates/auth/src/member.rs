use chrono::DateTime;
use chrono::Utc;

/// Columns of the members table, in the order [`Member::from_row`] expects.
pub(crate) const MEMBER_COLUMNS: &str =
    "name, email, ip, created_on, last_login, role_ids, validated, avatar, signature";

/// Registered account. The name doubles as the member's identity
/// everywhere else in the system (tokens, authorship, credentials).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub name: String,
    pub email: String,
    /// Last-seen peer address, refreshed on every authenticated request.
    pub ip: String,
    pub created_on: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
    pub role_ids: Vec<i32>,
    /// Gates login. No in-core path flips this; validation is external.
    pub validated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl Member {
    /// Fresh unvalidated member as created by registration.
    pub fn register(name: String, email: String, ip: String) -> Self {
        let now = Utc::now();
        Self {
            name,
            email,
            ip,
            created_on: now,
            last_login: now,
            role_ids: Vec::new(),
            validated: false,
            avatar: None,
            signature: None,
        }
    }

    pub fn from_row(row: &tokio_postgres::Row) -> Self {
        Self {
            name: row.get(0),
            email: row.get(1),
            ip: row.get(2),
            created_on: row.get(3),
            last_login: row.get(4),
            role_ids: row.get(5),
            validated: row.get(6),
            avatar: row.get(7),
            signature: row.get(8),
        }
    }
}

/// Username pattern: `[a-zA-Z0-9_]*`.
pub fn valid_username(name: &str) -> bool {
    name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

mod schema {
    use super::*;
    use agora_database::*;

    impl Schema for Member {
        fn name() -> &'static str {
            MEMBERS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                MEMBERS,
                " (
                    name        TEXT PRIMARY KEY,
                    email       TEXT NOT NULL,
                    ip          TEXT NOT NULL,
                    created_on  TIMESTAMPTZ NOT NULL,
                    last_login  TIMESTAMPTZ NOT NULL,
                    role_ids    INTEGER[] NOT NULL DEFAULT '{}',
                    validated   BOOLEAN NOT NULL DEFAULT FALSE,
                    avatar      TEXT,
                    signature   TEXT
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_members_name ON ",
                MEMBERS,
                " (LOWER(name));
                 CREATE UNIQUE INDEX IF NOT EXISTS idx_members_email ON ",
                MEMBERS,
                " (LOWER(email));"
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usernames_allow_word_characters_only() {
        assert!(valid_username("kelechi_99"));
        assert!(valid_username("ABC"));
        assert!(valid_username(""));
        assert!(!valid_username("no spaces"));
        assert!(!valid_username("dash-ed"));
        assert!(!valid_username("émile"));
    }

    #[test]
    fn registration_defaults() {
        let m = Member::register("a".into(), "a@b.c".into(), "127.0.0.1".into());
        assert!(!m.validated);
        assert!(m.role_ids.is_empty());
        assert_eq!(m.created_on, m.last_login);
    }

    #[test]
    fn optional_fields_stay_off_the_wire() {
        let m = Member::register("a".into(), "a@b.c".into(), String::new());
        let json = serde_json::to_value(&m).unwrap();
        assert!(json.get("avatar").is_none());
        assert!(json.get("signature").is_none());
        assert!(json.get("roleIds").is_some());
        assert!(json.get("createdOn").is_some());
    }
}
