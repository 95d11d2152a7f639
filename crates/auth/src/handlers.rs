use super::*;
use agora_core::Fault;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::web;
use std::sync::Arc;
use tokio_postgres::Client;

fn header<'r>(req: &'r HttpRequest, name: &str) -> Option<&'r str> {
    req.headers().get(name).and_then(|h| h.to_str().ok())
}

/// POST /login — credentials travel in the Username/Password headers;
/// RememberMe: "true" additionally mints a refresh token.
pub async fn login(
    db: web::Data<Arc<Client>>,
    req: HttpRequest,
) -> Result<HttpResponse, Fault> {
    let (username, password) = match (header(&req, "Username"), header(&req, "Password")) {
        (Some(u), Some(p)) => (u.to_owned(), p.to_owned()),
        _ => return Err(Fault::Invalid("No username and/or password provided!")),
    };
    let remember = header(&req, "RememberMe") == Some("true");
    // Unknown member and wrong password are deliberately indistinguishable.
    let (member, hash) = db
        .lookup(&username)
        .await?
        .ok_or(Fault::Unauthorized("Invalid username or password!"))?;
    if !credential::verify(&password, &hash) {
        return Err(Fault::Unauthorized("Invalid username or password!"));
    }
    if !member.validated {
        return Err(Fault::Forbidden("This account is unverified!"));
    }
    let token = Token::issue(&member.name, remember);
    db.issue(&token).await?;
    db.touch(&member.name).await?;
    log::info!("member {} logged in", member.name);
    Ok(HttpResponse::Ok().json(token))
}

/// POST /logout — revokes exactly the presented access token.
pub async fn logout(
    db: web::Data<Arc<Client>>,
    req: HttpRequest,
) -> Result<HttpResponse, Fault> {
    let token = bearer(&req).ok_or(Fault::Unauthorized("No authorization token provided!"))?;
    match db.revoke(&token).await? {
        true => Ok(HttpResponse::Ok().json(Acknowledged::of(true))),
        false => Err(Fault::Unauthorized("Invalid access token!")),
    }
}

/// POST /register — creates an unvalidated member and their credential.
/// The account cannot log in until it is validated externally.
pub async fn register(
    db: web::Data<Arc<Client>>,
    req: HttpRequest,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, Fault> {
    let body = body.into_inner();
    if !valid_username(&body.username) {
        return Err(Fault::Invalid("Invalid username!"));
    }
    if let Some(existing) = db.conflict(&body.username, &body.email).await? {
        return Err(match existing.eq_ignore_ascii_case(&body.username) {
            true => Fault::Conflict("This username is already taken!"),
            false => Fault::Conflict("An account with this email already exists!"),
        });
    }
    let member = Member::register(body.username, body.email, peer(&req));
    let credential = Credential::new(member.name.clone(), &body.password).map_err(|e| {
        log::error!("password hashing failed: {}", e);
        Fault::Internal
    })?;
    db.create(&member, &credential).await?;
    log::info!("member {} registered", member.name);
    Ok(HttpResponse::Ok().json(Acknowledged::of(true)))
}

/// POST /refreshToken — the Authorization header carries the *refresh*
/// token; the matching row gets a newly minted access token. The prior
/// access token dies with the rotation.
pub async fn refresh(
    db: web::Data<Arc<Client>>,
    req: HttpRequest,
) -> Result<HttpResponse, Fault> {
    let refresh = bearer(&req).ok_or(Fault::Unauthorized("No authorization token provided!"))?;
    let access = mint();
    match db.rotate(&refresh, &access).await? {
        true => Ok(HttpResponse::Ok().json(serde_json::json!({
            "accessToken": access,
            "refreshToken": refresh,
        }))),
        false => Err(Fault::Unauthorized("Invalid access token!")),
    }
}

/// POST /changePassword — verifies the current password, overwrites the
/// stored hash, and revokes every token for the member (the caller's
/// session included).
pub async fn change_password(
    db: web::Data<Arc<Client>>,
    auth: Auth,
    body: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, Fault> {
    let member = auth.0;
    let hash = db.credential(&member.name).await?.ok_or_else(|| {
        log::error!("member {} has no credential row", member.name);
        Fault::Internal
    })?;
    if !credential::verify(&body.password, &hash) {
        return Err(Fault::Forbidden("Invalid password!"));
    }
    let credential = Credential::new(member.name.clone(), &body.new_password).map_err(|e| {
        log::error!("password hashing failed: {}", e);
        Fault::Internal
    })?;
    db.rehash(&credential).await?;
    let revoked = db.revoke_all(&member.name).await?;
    log::info!(
        "member {} changed password, {} sessions revoked",
        member.name,
        revoked
    );
    Ok(HttpResponse::Ok().json(Acknowledged::of(true)))
}
