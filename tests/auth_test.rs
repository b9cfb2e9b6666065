use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{Form, Json, Router, http::StatusCode, routing::post};
use chrono::Utc;
use serde_json::{Value, json};
use tunetop::{
    error::AuthError,
    management::CredentialRefresher,
    spotify::auth::SpotifyAuth,
    store::{MemoryTokenStore, TokenStore},
    types::Credential,
};

// Helper function to create a test credential
fn create_test_credential(access_token: &str, expires_at: i64) -> Credential {
    Credential {
        access_token: access_token.to_string(),
        refresh_token: "RT_OLD".to_string(),
        expires_at,
        scope: "user-top-read".to_string(),
    }
}

// Helper function to create an auth client pointed at a stub token endpoint
fn create_test_auth(token_url: &str) -> SpotifyAuth {
    SpotifyAuth::new(
        "test-client-id".to_string(),
        "test-client-secret".to_string(),
        "http://localhost:8080/redirect".to_string(),
        "https://accounts.example.com/authorize".to_string(),
        token_url.to_string(),
        "user-top-read".to_string(),
    )
}

// Spawns a stub token endpoint on an ephemeral port. Returns its URL and a
// counter of how many requests it received.
async fn spawn_token_endpoint(status: StatusCode, body: Value) -> (String, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let handler_calls = Arc::clone(&calls);

    let app = Router::new().route(
        "/token",
        post(move |Form(_params): Form<HashMap<String, String>>| {
            let calls = Arc::clone(&handler_calls);
            let body = body.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                (status, Json(body))
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/token", addr), calls)
}

#[tokio::test]
async fn test_ensure_fresh_absent_fails_without_network() {
    let (token_url, calls) = spawn_token_endpoint(StatusCode::OK, json!({})).await;
    let refresher = CredentialRefresher::new(create_test_auth(&token_url));
    let store = MemoryTokenStore::new();

    let result = refresher.ensure_fresh("visitor-1", &store).await;

    assert!(matches!(result, Err(AuthError::NotAuthenticated)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_ensure_fresh_valid_credential_is_idempotent() {
    let (token_url, calls) = spawn_token_endpoint(StatusCode::OK, json!({})).await;
    let refresher = CredentialRefresher::new(create_test_auth(&token_url));
    let store = MemoryTokenStore::new();

    // Comfortably outside the 60-second skew margin
    let credential = create_test_credential("AT_VALID", Utc::now().timestamp() + 3600);
    store.put("visitor-1", credential.clone()).await.unwrap();

    let first = refresher.ensure_fresh("visitor-1", &store).await.unwrap();
    let second = refresher.ensure_fresh("visitor-1", &store).await.unwrap();

    // Same credential back both times, no refresh call issued
    assert_eq!(first, credential);
    assert_eq!(second, credential);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_ensure_fresh_refreshes_expired_credential() {
    let (token_url, calls) = spawn_token_endpoint(
        StatusCode::OK,
        json!({
            "access_token": "AT_NEW",
            "token_type": "Bearer",
            "expires_in": 3600,
            "scope": "user-top-read"
        }),
    )
    .await;
    let refresher = CredentialRefresher::new(create_test_auth(&token_url));
    let store = MemoryTokenStore::new();

    let now = Utc::now().timestamp();
    store
        .put("visitor-1", create_test_credential("AT_OLD", now - 1))
        .await
        .unwrap();

    let renewed = refresher.ensure_fresh("visitor-1", &store).await.unwrap();

    // Exactly one refresh call, fresh expiry, old refresh token retained
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(renewed.access_token, "AT_NEW");
    assert_eq!(renewed.refresh_token, "RT_OLD");
    assert!(renewed.expires_at > Utc::now().timestamp());

    // The renewed credential was persisted
    let stored = store.get("visitor-1").await.unwrap().unwrap();
    assert_eq!(stored, renewed);
}

#[tokio::test]
async fn test_ensure_fresh_within_skew_margin_refreshes() {
    let (token_url, calls) = spawn_token_endpoint(
        StatusCode::OK,
        json!({
            "access_token": "AT_NEW",
            "expires_in": 3600,
            "refresh_token": "RT_ROTATED",
            "scope": "user-top-read"
        }),
    )
    .await;
    let refresher = CredentialRefresher::new(create_test_auth(&token_url));
    let store = MemoryTokenStore::new();

    // Not yet expired, but inside the 60-second margin
    store
        .put(
            "visitor-1",
            create_test_credential("AT_OLD", Utc::now().timestamp() + 30),
        )
        .await
        .unwrap();

    let renewed = refresher.ensure_fresh("visitor-1", &store).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(renewed.access_token, "AT_NEW");
    // Endpoint rotated the refresh token, so the new one is kept
    assert_eq!(renewed.refresh_token, "RT_ROTATED");
}

#[tokio::test]
async fn test_ensure_fresh_remote_failure_keeps_stored_credential() {
    let (token_url, calls) =
        spawn_token_endpoint(StatusCode::BAD_REQUEST, json!({"error": "invalid_grant"})).await;
    let refresher = CredentialRefresher::new(create_test_auth(&token_url));
    let store = MemoryTokenStore::new();

    let expired = create_test_credential("AT_OLD", Utc::now().timestamp() - 100);
    store.put("visitor-1", expired.clone()).await.unwrap();

    let result = refresher.ensure_fresh("visitor-1", &store).await;

    assert!(matches!(result, Err(AuthError::RefreshFailed(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // No durable state is lost: the old credential stays in the store
    assert_eq!(store.get("visitor-1").await.unwrap(), Some(expired));
}

#[tokio::test]
async fn test_begin_authorization_clears_prior_credential() {
    let (token_url, _calls) = spawn_token_endpoint(StatusCode::OK, json!({})).await;
    let auth = create_test_auth(&token_url);
    let store = MemoryTokenStore::new();

    store
        .put("visitor-1", create_test_credential("AT_STALE", 1_000))
        .await
        .unwrap();

    let url = auth.begin_authorization("visitor-1", &store).await.unwrap();

    assert!(store.get("visitor-1").await.unwrap().is_none());
    assert!(url.starts_with("https://accounts.example.com/authorize?"));
    assert!(url.contains("client_id=test-client-id"));
    assert!(url.contains("response_type=code"));
    assert!(url.contains("scope=user-top-read"));
    assert!(url.contains("show_dialog=true"));
}

#[tokio::test]
async fn test_callback_denial_skips_token_exchange() {
    let (token_url, calls) = spawn_token_endpoint(StatusCode::OK, json!({})).await;
    let auth = create_test_auth(&token_url);
    let store = MemoryTokenStore::new();

    let mut params = HashMap::new();
    params.insert("error".to_string(), "access_denied".to_string());

    let result = auth.handle_callback("visitor-1", &params, &store).await;

    assert!(matches!(result, Err(AuthError::AuthorizationDenied(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(store.get("visitor-1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_callback_without_code_fails_without_network() {
    let (token_url, calls) = spawn_token_endpoint(StatusCode::OK, json!({})).await;
    let auth = create_test_auth(&token_url);
    let store = MemoryTokenStore::new();

    let result = auth.handle_callback("visitor-1", &HashMap::new(), &store).await;

    assert!(matches!(result, Err(AuthError::CodeExchangeFailed(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_callback_exchanges_code_and_persists_credential() {
    let (token_url, calls) = spawn_token_endpoint(
        StatusCode::OK,
        json!({
            "access_token": "AT1",
            "token_type": "Bearer",
            "expires_in": 3600,
            "refresh_token": "RT1",
            "scope": "user-top-read"
        }),
    )
    .await;
    let auth = create_test_auth(&token_url);
    let store = MemoryTokenStore::new();

    let before = Utc::now().timestamp();
    let mut params = HashMap::new();
    params.insert("code".to_string(), "one-time-code".to_string());

    let credential = auth.handle_callback("visitor-1", &params, &store).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(credential.access_token, "AT1");
    assert_eq!(credential.refresh_token, "RT1");

    // expires_at is now + 3600, within a small tolerance
    assert!(credential.expires_at >= before + 3600);
    assert!(credential.expires_at <= Utc::now().timestamp() + 3600);

    let stored = store.get("visitor-1").await.unwrap().unwrap();
    assert_eq!(stored, credential);
}

#[tokio::test]
async fn test_callback_replaces_prior_credential() {
    let (token_url, _calls) = spawn_token_endpoint(
        StatusCode::OK,
        json!({
            "access_token": "AT2",
            "expires_in": 3600,
            "refresh_token": "RT2",
            "scope": "user-top-read"
        }),
    )
    .await;
    let auth = create_test_auth(&token_url);
    let store = MemoryTokenStore::new();

    store
        .put("visitor-1", create_test_credential("AT_STALE", 1_000))
        .await
        .unwrap();

    let mut params = HashMap::new();
    params.insert("code".to_string(), "new-code".to_string());
    auth.handle_callback("visitor-1", &params, &store).await.unwrap();

    // A new authorization code invalidates the prior credential entirely
    let stored = store.get("visitor-1").await.unwrap().unwrap();
    assert_eq!(stored.access_token, "AT2");
    assert_eq!(stored.refresh_token, "RT2");
}

#[tokio::test]
async fn test_exchange_failure_leaves_no_credential() {
    let (token_url, calls) =
        spawn_token_endpoint(StatusCode::BAD_REQUEST, json!({"error": "invalid_grant"})).await;
    let auth = create_test_auth(&token_url);
    let store = MemoryTokenStore::new();

    let mut params = HashMap::new();
    params.insert("code".to_string(), "expired-code".to_string());

    let result = auth.handle_callback("visitor-1", &params, &store).await;

    assert!(matches!(result, Err(AuthError::CodeExchangeFailed(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(store.get("visitor-1").await.unwrap().is_none());
}
