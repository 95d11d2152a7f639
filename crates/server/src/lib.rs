//! HTTP wiring for the agora forum backend.
//!
//! Assembles the auth and forum route handlers into a single actix-web
//! server with permissive CORS, request logging, and a database-backed
//! liveness probe at `/`.
use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::middleware::Logger;
use actix_web::web;
use agora_core::Fault;
use std::sync::Arc;
use tokio_postgres::Client;

/// GET / — liveness probe; checks the store round trip.
async fn alive(client: web::Data<Arc<Client>>) -> impl Responder {
    match client
        .execute("SELECT 1", &[])
        .await
        .inspect_err(|e| log::error!("liveness check failed: {}", e))
    {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "alive": true,
            "timestamp": chrono::Utc::now(),
        })),
        Err(_) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "alive": false,
        })),
    }
}

/// Malformed JSON bodies surface as the uniform `{"error": ...}` shape.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|_err, _req| Fault::Invalid("Invalid request body!").into())
}

#[rustfmt::skip]
pub async fn run() -> Result<(), std::io::Error> {
    let client = agora_database::db().await;
    let notifier = web::Data::new(agora_forum::Notifier::from_env());
    let client = web::Data::new(client);
    log::info!("starting server");
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .app_data(json_config())
            .app_data(client.clone())
            .app_data(notifier.clone())
            .route("/", web::get().to(alive))
            .route("/login", web::post().to(agora_auth::login))
            .route("/logout", web::post().to(agora_auth::logout))
            .route("/register", web::post().to(agora_auth::register))
            .route("/refreshToken", web::post().to(agora_auth::refresh))
            .route("/changePassword", web::post().to(agora_auth::change_password))
            .service(
                web::scope("/api")
                    .route("/forums", web::get().to(agora_forum::forums))
                    .route("/forum", web::post().to(agora_forum::create_forum))
                    .route("/forum/{slug}", web::get().to(agora_forum::forum))
                    .route("/forum/{slug}", web::patch().to(agora_forum::update_forum))
                    .route("/forum/{slug}/threads", web::get().to(agora_forum::forum_threads))
                    .route("/thread", web::post().to(agora_forum::create_thread))
                    .route("/thread/{id}", web::get().to(agora_forum::thread))
                    .route("/thread/{id}/replies", web::get().to(agora_forum::replies))
                    .route("/post/{thread_id}", web::post().to(agora_forum::create_post))
                    .route("/post/{id}", web::get().to(agora_forum::post))
                    .route("/post/{id}/like", web::post().to(agora_forum::like))
                    .route("/post/{id}/like", web::delete().to(agora_forum::unvote))
                    .route("/post/{id}/dislike", web::post().to(agora_forum::dislike))
                    .route("/post/{id}/dislike", web::delete().to(agora_forum::unvote))
                    .route("/members", web::get().to(agora_forum::members))
                    .route("/member/{name}", web::get().to(agora_forum::member)),
            )
    })
    .workers(6)
    .bind(std::env::var("BIND_ADDR").expect("BIND_ADDR must be set"))?
    .run()
    .await
}
