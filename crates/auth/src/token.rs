use chrono::DateTime;
use chrono::Utc;

/// Entropy per token. 25 random bytes encode to a 36-character string.
pub const TOKEN_BYTES: usize = 25;

/// Live session record. The access token is the bearer credential;
/// the refresh token exists only when the login asked to be remembered.
/// Neither expires: revocation is the only way out.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    #[serde(skip)]
    pub member_id: String,
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip)]
    pub created_on: DateTime<Utc>,
}

impl Token {
    pub fn issue(member_id: &str, remember: bool) -> Self {
        Self {
            member_id: member_id.to_string(),
            access_token: mint(),
            refresh_token: remember.then(mint),
            created_on: Utc::now(),
        }
    }
}

/// Generates a fresh token: [`TOKEN_BYTES`] of randomness, base64-encoded.
/// Uniqueness rides on the entropy; the store still looks up exact matches.
pub fn mint() -> String {
    use base64::Engine;
    use rand::Rng;
    let ref mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill(bytes);
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

mod schema {
    use super::*;
    use agora_database::*;

    impl Schema for Token {
        fn name() -> &'static str {
            TOKENS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                TOKENS,
                " (
                    member_id     TEXT NOT NULL,
                    access_token  TEXT NOT NULL,
                    refresh_token TEXT,
                    created_on    TIMESTAMPTZ NOT NULL
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_tokens_access ON ",
                TOKENS,
                " (access_token);
                 CREATE INDEX IF NOT EXISTS idx_tokens_member ON ",
                TOKENS,
                " (member_id);"
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minted_tokens_have_fixed_length() {
        for _ in 0..32 {
            assert_eq!(mint().len(), 36);
        }
    }

    #[test]
    fn minted_tokens_are_distinct() {
        assert_ne!(mint(), mint());
    }

    #[test]
    fn refresh_token_only_when_remembered() {
        assert!(Token::issue("kelechi", false).refresh_token.is_none());
        assert!(Token::issue("kelechi", true).refresh_token.is_some());
    }

    #[test]
    fn response_shape_is_camel_case() {
        let t = Token::issue("kelechi", false);
        let json = serde_json::to_value(&t).unwrap();
        assert!(json.get("accessToken").is_some());
        assert!(json.get("refreshToken").is_none());
        assert!(json.get("createdOn").is_none());
        assert!(json.get("memberId").is_none());
    }
}
