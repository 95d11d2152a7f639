use serde::Deserialize;
use serde::Serialize;

/// Body of POST /register.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Body of POST /changePassword. `password` is the current password.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub password: String,
    pub new_password: String,
}

/// Uniform `{"success": bool}` acknowledgement.
#[derive(Debug, Serialize)]
pub struct Acknowledged {
    pub success: bool,
}

impl Acknowledged {
    pub fn of(success: bool) -> Self {
        Self { success }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_password_body_is_camel_case() {
        let body: ChangePasswordRequest =
            serde_json::from_str(r#"{"password": "old", "newPassword": "new"}"#).unwrap();
        assert_eq!(body.password, "old");
        assert_eq!(body.new_password, "new");
    }

    #[test]
    fn register_body_requires_all_fields() {
        let missing = serde_json::from_str::<RegisterRequest>(r#"{"username": "a"}"#);
        assert!(missing.is_err());
    }
}
