//! Error taxonomy shared by every request handler.
//!
//! Each variant maps to one conventional HTTP status code, and every
//! client-visible error body has the shape `{"error": "..."}`. Internal
//! detail (store failures in particular) is logged server-side and never
//! leaks to the client.
use actix_web::HttpResponse;
use actix_web::http::StatusCode;

/// Handler-level failure with a fixed HTTP mapping.
#[derive(Debug, thiserror::Error)]
pub enum Fault {
    /// Malformed or missing input fields (400).
    #[error("{0}")]
    Invalid(&'static str),
    /// Missing or unusable credentials (401).
    #[error("{0}")]
    Unauthorized(&'static str),
    /// Authenticated but not permitted in the current state (403).
    #[error("{0}")]
    Forbidden(&'static str),
    /// Missing forum/thread/post/member (404).
    #[error("{0}")]
    Missing(&'static str),
    /// Duplicate slug/name/email (409).
    #[error("{0}")]
    Conflict(&'static str),
    /// Store failure or unexpected condition (500). Opaque to clients.
    #[error("Internal Server Error!")]
    Internal,
}

impl Fault {
    /// Wrap a store error, logging the detail before discarding it.
    pub fn store(e: tokio_postgres::Error) -> Self {
        log::error!("store failure: {}", e);
        Self::Internal
    }
}

impl From<tokio_postgres::Error> for Fault {
    fn from(e: tokio_postgres::Error) -> Self {
        Self::store(e)
    }
}

impl actix_web::ResponseError for Fault {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Invalid(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Missing(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(Fault::Invalid("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            Fault::Unauthorized("x").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(Fault::Forbidden("x").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(Fault::Missing("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(Fault::Conflict("x").status_code(), StatusCode::CONFLICT);
        assert_eq!(
            Fault::Internal.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_fault_is_opaque() {
        assert_eq!(Fault::Internal.to_string(), "Internal Server Error!");
    }
}
