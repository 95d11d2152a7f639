//! Password hashing and the credential record.
//!
//! bcrypt with a fixed cost, matching the hashes already present in the
//! credential store. Verification failures and malformed hashes are both
//! reported as a mismatch.

/// bcrypt cost factor. Fixed for compatibility with existing hashes.
pub const COST: u32 = 10;

/// One-to-one with [`Member`](crate::Member): holds the password hash and
/// nothing else. Replaced wholesale on password change, never patched.
#[derive(Debug, Clone)]
pub struct Credential {
    pub member_id: String,
    pub hash: String,
}

impl Credential {
    pub fn new(member_id: String, password: &str) -> Result<Self, bcrypt::BcryptError> {
        Ok(Self {
            member_id,
            hash: hash(password)?,
        })
    }
}

pub fn hash(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, COST)
}

pub fn verify(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

mod schema {
    use super::*;
    use agora_database::*;

    impl Schema for Credential {
        fn name() -> &'static str {
            CREDENTIALS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                CREDENTIALS,
                " (
                    member_id   TEXT NOT NULL,
                    hash        TEXT NOT NULL
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_credentials_member ON ",
                CREDENTIALS,
                " (LOWER(member_id));"
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_original_password() {
        let h = hash("hunter2").unwrap();
        assert!(verify("hunter2", &h));
        assert!(!verify("hunter3", &h));
    }

    #[test]
    fn hash_uses_fixed_cost() {
        let h = hash("hunter2").unwrap();
        assert!(h.contains("$10$"), "unexpected cost in {}", h);
    }

    #[test]
    fn salts_are_randomized() {
        let a = hash("hunter2").unwrap();
        let b = hash("hunter2").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_is_a_mismatch() {
        assert!(!verify("hunter2", "not a bcrypt hash"));
    }
}
