use super::*;
use agora_database::*;
use std::sync::Arc;
use tokio_postgres::Client;

/// Members-table columns qualified for joined queries.
const M_COLUMNS: &str =
    "m.name, m.email, m.ip, m.created_on, m.last_login, m.role_ids, m.validated, m.avatar, m.signature";

/// Repository trait for authentication store operations.
/// Abstracts SQL from handlers and middleware; implemented on the shared
/// connection handle so every component receives its store explicitly.
#[allow(async_fn_in_trait)]
pub trait AuthRepository {
    /// Name of any member colliding with the given name or email,
    /// case-insensitively. Registration uses this to report which field
    /// conflicted.
    async fn conflict(&self, name: &str, email: &str) -> Result<Option<String>, PgErr>;
    /// Inserts the member and their credential. Two statements, not
    /// transactional: a crash in between leaves a member who can never
    /// log in and must be cleaned up by retry or operator action.
    async fn create(&self, member: &Member, credential: &Credential) -> Result<(), PgErr>;
    /// Member joined with their stored hash, by exact name.
    async fn lookup(&self, name: &str) -> Result<Option<(Member, String)>, PgErr>;
    /// Bumps last_login to now.
    async fn touch(&self, name: &str) -> Result<(), PgErr>;
    /// Persists a freshly issued token.
    async fn issue(&self, token: &Token) -> Result<(), PgErr>;
    /// Resolves an access token to its member, stamping the member's
    /// last-seen IP in the same statement. One atomic operation so
    /// concurrent requests cannot interleave lookup and update.
    async fn resolve(&self, access: &str, ip: &str) -> Result<Option<Member>, PgErr>;
    /// Replaces the access token on the row holding this refresh token.
    async fn rotate(&self, refresh: &str, access: &str) -> Result<bool, PgErr>;
    /// Deletes the token row for this access token; true iff one row went.
    async fn revoke(&self, access: &str) -> Result<bool, PgErr>;
    /// Deletes every token for the member. Password changes call this,
    /// ending all sessions including the caller's own.
    async fn revoke_all(&self, member: &str) -> Result<u64, PgErr>;
    /// Stored hash for the member, if any.
    async fn credential(&self, member: &str) -> Result<Option<String>, PgErr>;
    /// Overwrites the stored hash wholesale.
    async fn rehash(&self, credential: &Credential) -> Result<(), PgErr>;
    /// Member by exact name.
    async fn member(&self, name: &str) -> Result<Option<Member>, PgErr>;
    /// Every member, store order.
    async fn members(&self) -> Result<Vec<Member>, PgErr>;
}

impl AuthRepository for Arc<Client> {
    async fn conflict(&self, name: &str, email: &str) -> Result<Option<String>, PgErr> {
        self.query_opt(
            const_format::concatcp!(
                "SELECT name FROM ",
                MEMBERS,
                " WHERE LOWER(name) = LOWER($1) OR LOWER(email) = LOWER($2) LIMIT 1"
            ),
            &[&name, &email],
        )
        .await
        .map(|opt| opt.map(|row| row.get(0)))
    }

    async fn create(&self, member: &Member, credential: &Credential) -> Result<(), PgErr> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                MEMBERS,
                " (",
                MEMBER_COLUMNS,
                ") VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)"
            ),
            &[
                &member.name,
                &member.email,
                &member.ip,
                &member.created_on,
                &member.last_login,
                &member.role_ids,
                &member.validated,
                &member.avatar,
                &member.signature,
            ],
        )
        .await?;
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                CREDENTIALS,
                " (member_id, hash) VALUES ($1, $2)"
            ),
            &[&credential.member_id, &credential.hash],
        )
        .await
        .map(|_| ())
    }

    async fn lookup(&self, name: &str) -> Result<Option<(Member, String)>, PgErr> {
        self.query_opt(
            const_format::concatcp!(
                "SELECT ",
                M_COLUMNS,
                ", c.hash FROM ",
                MEMBERS,
                " m JOIN ",
                CREDENTIALS,
                " c ON c.member_id = m.name WHERE m.name = $1"
            ),
            &[&name],
        )
        .await
        .map(|opt| opt.map(|row| (Member::from_row(&row), row.get(9))))
    }

    async fn touch(&self, name: &str) -> Result<(), PgErr> {
        self.execute(
            const_format::concatcp!(
                "UPDATE ",
                MEMBERS,
                " SET last_login = NOW() WHERE name = $1"
            ),
            &[&name],
        )
        .await
        .map(|_| ())
    }

    async fn issue(&self, token: &Token) -> Result<(), PgErr> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                TOKENS,
                " (member_id, access_token, refresh_token, created_on) VALUES ($1, $2, $3, $4)"
            ),
            &[
                &token.member_id,
                &token.access_token,
                &token.refresh_token,
                &token.created_on,
            ],
        )
        .await
        .map(|_| ())
    }

    async fn resolve(&self, access: &str, ip: &str) -> Result<Option<Member>, PgErr> {
        self.query_opt(
            const_format::concatcp!(
                "UPDATE ",
                MEMBERS,
                " m SET ip = $2 FROM ",
                TOKENS,
                " t WHERE t.access_token = $1 AND m.name = t.member_id RETURNING ",
                M_COLUMNS
            ),
            &[&access, &ip],
        )
        .await
        .map(|opt| opt.map(|row| Member::from_row(&row)))
    }

    async fn rotate(&self, refresh: &str, access: &str) -> Result<bool, PgErr> {
        self.execute(
            const_format::concatcp!(
                "UPDATE ",
                TOKENS,
                " SET access_token = $2 WHERE refresh_token = $1"
            ),
            &[&refresh, &access],
        )
        .await
        .map(|n| n > 0)
    }

    async fn revoke(&self, access: &str) -> Result<bool, PgErr> {
        self.execute(
            const_format::concatcp!("DELETE FROM ", TOKENS, " WHERE access_token = $1"),
            &[&access],
        )
        .await
        .map(|n| n == 1)
    }

    async fn revoke_all(&self, member: &str) -> Result<u64, PgErr> {
        self.execute(
            const_format::concatcp!("DELETE FROM ", TOKENS, " WHERE member_id = $1"),
            &[&member],
        )
        .await
    }

    async fn credential(&self, member: &str) -> Result<Option<String>, PgErr> {
        self.query_opt(
            const_format::concatcp!("SELECT hash FROM ", CREDENTIALS, " WHERE member_id = $1"),
            &[&member],
        )
        .await
        .map(|opt| opt.map(|row| row.get(0)))
    }

    async fn rehash(&self, credential: &Credential) -> Result<(), PgErr> {
        self.execute(
            const_format::concatcp!("UPDATE ", CREDENTIALS, " SET hash = $2 WHERE member_id = $1"),
            &[&credential.member_id, &credential.hash],
        )
        .await
        .map(|_| ())
    }

    async fn member(&self, name: &str) -> Result<Option<Member>, PgErr> {
        self.query_opt(
            const_format::concatcp!(
                "SELECT ",
                MEMBER_COLUMNS,
                " FROM ",
                MEMBERS,
                " WHERE name = $1"
            ),
            &[&name],
        )
        .await
        .map(|opt| opt.map(|row| Member::from_row(&row)))
    }

    async fn members(&self) -> Result<Vec<Member>, PgErr> {
        self.query(
            const_format::concatcp!("SELECT ", MEMBER_COLUMNS, " FROM ", MEMBERS),
            &[],
        )
        .await
        .map(|rows| rows.iter().map(Member::from_row).collect())
    }
}
