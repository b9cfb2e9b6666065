//! Configuration management for the Spotify top-items server.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. It provides a centralized way to
//! manage application configuration including Spotify API credentials, server
//! settings, session signing and the credential-store backend selection.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the working directory
//! 3. Application defaults (where applicable)

use std::env;

use dotenv;

/// Loads environment variables from a `.env` file in the working directory.
///
/// A missing `.env` file is not an error: in containerized deployments the
/// variables are usually injected directly into the process environment and
/// no file exists. Variables already present in the environment always win
/// over values from the file.
///
/// # Example
///
/// ```
/// use tunetop::config;
///
/// config::load_env();
/// ```
pub fn load_env() {
    dotenv::dotenv().ok();
}

/// Returns the address and port the HTTP server binds to.
///
/// Retrieves the `SERVER_ADDRESS` environment variable, falling back to
/// `127.0.0.1:8080` when unset.
///
/// # Example
///
/// ```
/// let addr = server_addr(); // e.g., "127.0.0.1:8080"
/// ```
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").unwrap_or_else(|_| "127.0.0.1:8080".to_string())
}

/// Returns the Spotify API client ID for authentication.
///
/// Retrieves the `SPOTIFY_API_AUTH_CLIENT_ID` environment variable which
/// contains the client ID obtained when registering the application with
/// Spotify's developer platform.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_AUTH_CLIENT_ID` environment variable is not set.
///
/// # Example
///
/// ```
/// let client_id = spotify_client_id(); // e.g., "abc123..."
/// ```
pub fn spotify_client_id() -> String {
    env::var("SPOTIFY_API_AUTH_CLIENT_ID").expect("SPOTIFY_API_AUTH_CLIENT_ID must be set")
}

/// Returns the Spotify API client secret for authentication.
///
/// Retrieves the `SPOTIFY_API_AUTH_CLIENT_SECRET` environment variable which
/// contains the client secret obtained when registering the application with
/// Spotify's developer platform. The authorization-code grant and the refresh
/// grant both present it to the token endpoint.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_AUTH_CLIENT_SECRET` environment variable is not set.
///
/// # Security Note
///
/// The client secret should be kept confidential and never exposed in logs
/// or version control.
///
/// # Example
///
/// ```
/// let client_secret = spotify_client_secret(); // e.g., "def456..."
/// ```
pub fn spotify_client_secret() -> String {
    env::var("SPOTIFY_API_AUTH_CLIENT_SECRET").expect("SPOTIFY_API_AUTH_CLIENT_SECRET must be set")
}

/// Returns the Spotify OAuth redirect URI.
///
/// Retrieves the `SPOTIFY_API_REDIRECT_URI` environment variable which specifies
/// the callback URL that Spotify should redirect to after user authorization.
/// This must match the redirect URI registered in the Spotify application settings.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_REDIRECT_URI` environment variable is not set.
///
/// # Example
///
/// ```
/// let redirect_uri = spotify_redirect_uri(); // e.g., "http://localhost:8080/redirect"
/// ```
pub fn spotify_redirect_uri() -> String {
    env::var("SPOTIFY_API_REDIRECT_URI").expect("SPOTIFY_API_REDIRECT_URI must be set")
}

/// Returns the Spotify API scope permissions.
///
/// Retrieves the `SPOTIFY_API_AUTH_SCOPE` environment variable, falling back
/// to `user-top-read`, the only scope the top-items routes need.
///
/// # Example
///
/// ```
/// let scope = spotify_scope(); // e.g., "user-top-read"
/// ```
pub fn spotify_scope() -> String {
    env::var("SPOTIFY_API_AUTH_SCOPE").unwrap_or_else(|_| "user-top-read".to_string())
}

/// Returns the Spotify OAuth authorization URL.
///
/// Retrieves the `SPOTIFY_API_AUTH_URL` environment variable which contains
/// the base URL for Spotify's OAuth authorization endpoint. This is where
/// users are redirected to grant permissions to the application.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_AUTH_URL` environment variable is not set.
///
/// # Example
///
/// ```
/// let auth_url = spotify_apiauth_url(); // e.g., "https://accounts.spotify.com/authorize"
/// ```
pub fn spotify_apiauth_url() -> String {
    env::var("SPOTIFY_API_AUTH_URL").expect("SPOTIFY_API_AUTH_URL must be set")
}

/// Returns the Spotify Web API base URL.
///
/// Retrieves the `SPOTIFY_API_URL` environment variable which contains the
/// base URL for Spotify's Web API endpoints. This is used for all API
/// operations after authentication.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_URL` environment variable is not set.
///
/// # Example
///
/// ```
/// let api_url = spotify_apiurl(); // e.g., "https://api.spotify.com/v1"
/// ```
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").expect("SPOTIFY_API_URL must be set")
}

/// Returns the Spotify OAuth token exchange URL.
///
/// Retrieves the `SPOTIFY_API_TOKEN_URL` environment variable which contains
/// the URL for exchanging authorization codes for access tokens and for
/// refreshing expired access tokens.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_TOKEN_URL` environment variable is not set.
///
/// # Example
///
/// ```
/// let token_url = spotify_apitoken_url(); // e.g., "https://accounts.spotify.com/api/token"
/// ```
pub fn spotify_apitoken_url() -> String {
    env::var("SPOTIFY_API_TOKEN_URL").expect("SPOTIFY_API_TOKEN_URL must be set")
}

/// Returns the secret used to sign the session cookie, if configured.
///
/// Retrieves the `SESSION_SECRET` environment variable. The session cookie is
/// the sole binding between a browser and its cached credential, so it is
/// always signed; when this variable is unset the server falls back to a key
/// generated at startup, which invalidates all sessions on restart.
///
/// # Example
///
/// ```
/// let secret = session_secret(); // e.g., Some("64-byte-random-string...")
/// ```
pub fn session_secret() -> Option<String> {
    env::var("SESSION_SECRET").ok()
}

/// Returns the configured credential-store backend.
///
/// Retrieves the `TOKEN_STORE` environment variable, falling back to
/// `session`. Valid values are `session` (credentials live inside each
/// visitor's session record) and `memory` (a process-wide map partitioned by
/// visitor identifier).
///
/// # Example
///
/// ```
/// let backend = token_store(); // e.g., "session"
/// ```
pub fn token_store() -> String {
    env::var("TOKEN_STORE").unwrap_or_else(|_| "session".to_string())
}
