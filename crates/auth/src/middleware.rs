use super::*;
use agora_core::Fault;
use actix_web::FromRequest;
use actix_web::HttpRequest;
use actix_web::dev::Payload;
use actix_web::web;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio_postgres::Client;

/// Extractor for requests that require a resolved identity.
///
/// Resolves the bearer token to its member and stamps the member's
/// last-seen IP, in a single store operation. Runs once per request;
/// tokens stay valid across uses until revoked.
pub struct Auth(pub Member);

impl Auth {
    pub fn member(&self) -> &Member {
        &self.0
    }
}

impl FromRequest for Auth {
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;
    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let db = req.app_data::<web::Data<Arc<Client>>>().cloned();
        let token = bearer(req);
        let ip = peer(req);
        Box::pin(async move {
            let token =
                token.ok_or(Fault::Unauthorized("No authorization token provided!"))?;
            let db = db.ok_or_else(|| {
                log::error!("database handle not configured");
                Fault::Internal
            })?;
            let member = db
                .resolve(&token, &ip)
                .await
                .map_err(Fault::store)?
                .ok_or(Fault::Unauthorized("Invalid access token!"))?;
            Ok(Auth(member))
        })
    }
}

/// Optional identity extractor for the public allow-list routes.
/// Anonymous requests pass through with no identity attached; a presented
/// token is still resolved (and its member's IP stamped) so visibility
/// filtering can use the member's roles.
pub struct MaybeAuth(pub Option<Member>);

impl MaybeAuth {
    pub fn member(&self) -> Option<&Member> {
        self.0.as_ref()
    }
    /// Role ids of the resolved member, or none for anonymous readers.
    pub fn role_ids(&self) -> Vec<i32> {
        self.0.as_ref().map(|m| m.role_ids.clone()).unwrap_or_default()
    }
}

impl FromRequest for MaybeAuth {
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;
    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let auth = Auth::from_request(req, payload);
        Box::pin(async move {
            // A missing or dead token degrades to anonymous rather than
            // failing the read; a store failure stays a failure.
            match auth.await {
                Ok(Auth(member)) => Ok(MaybeAuth(Some(member))),
                Err(e) if degrades(&e) => Ok(MaybeAuth(None)),
                Err(e) => Err(e),
            }
        })
    }
}

/// True when the failure is an authentication failure rather than a
/// store or configuration failure. Only the former reads as anonymous.
pub(crate) fn degrades(e: &actix_web::Error) -> bool {
    !matches!(e.as_error::<Fault>(), Some(Fault::Internal))
}

/// Access token from the Authorization header. The `Bearer` prefix is
/// optional: historical clients send the raw token.
pub(crate) fn bearer(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .map(|h| h.strip_prefix("Bearer ").unwrap_or(h).to_owned())
}

/// Peer address honoring X-Forwarded-For, as recorded on member rows.
pub(crate) fn peer(req: &HttpRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .unwrap_or_default()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dead_tokens_read_as_anonymous() {
        assert!(degrades(&Fault::Unauthorized("Invalid access token!").into()));
        assert!(degrades(
            &Fault::Unauthorized("No authorization token provided!").into()
        ));
    }

    #[test]
    fn store_failures_do_not_read_as_anonymous() {
        assert!(!degrades(&Fault::Internal.into()));
    }
}
