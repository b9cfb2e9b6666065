use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr};
use tower_sessions::{
    Expiry, MemoryStore, SessionManagerLayer,
    cookie::{Key, time::Duration},
};

use crate::{
    api, config, error, info,
    spotify::{auth::SpotifyAuth, top::ResourceClient},
    store::TokenBackend,
    warning,
};

/// Shared application state, built once at startup and injected into every
/// handler. The credential-store backend is selected here, not per request.
#[derive(Clone)]
pub struct AppState {
    pub auth: SpotifyAuth,
    pub api: ResourceClient,
    pub backend: TokenBackend,
}

/// The session cookie is the sole binding between a browser and its cached
/// credential, so it is always signed.
fn session_key() -> Key {
    match config::session_secret() {
        Some(secret) if secret.len() >= 64 => Key::from(secret.as_bytes()),
        Some(_) => {
            warning!("SESSION_SECRET is shorter than 64 bytes, using a generated key instead");
            Key::generate()
        }
        None => {
            warning!("SESSION_SECRET not set, using a generated key; sessions reset on restart");
            Key::generate()
        }
    }
}

pub async fn start_server(address: Option<String>) {
    let state = AppState {
        auth: SpotifyAuth::from_config(),
        api: ResourceClient::from_config(),
        backend: TokenBackend::from_config(),
    };

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_name("tunetop.sid")
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(Duration::hours(1)))
        .with_signed(session_key());

    let app = Router::new()
        .route("/", get(api::welcome))
        .route("/login", get(api::login))
        .route("/redirect", get(api::callback))
        .route("/home", get(api::home))
        .route("/logout", get(api::logout))
        .route("/about", get(api::about))
        .route("/privacy", get(api::privacy))
        .route("/health", get(api::health))
        .route("/{item_type}/{time_range}", get(api::top_items))
        .layer(session_layer)
        .layer(Extension(state));

    let addr = match SocketAddr::from_str(&address.unwrap_or_else(config::server_addr)) {
        Ok(addr) => addr,
        Err(e) => error!("Failed to parse server address: {}", e),
    };

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => error!("Failed to bind {}: {}", addr, e),
    };

    info!("Listening on {}", addr);
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
    }
}
