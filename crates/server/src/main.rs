//! Forum backend binary.
//!
//! Serves the auth and content API on BIND_ADDR (e.g. 0.0.0.0:8080).

#[tokio::main]
async fn main() {
    agora_core::log();
    agora_server::run().await.unwrap();
}
