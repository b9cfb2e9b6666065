use std::{collections::HashMap, time::Duration};

use chrono::Utc;
use reqwest::Client;

use crate::{
    config,
    error::AuthError,
    store::TokenStore,
    types::{Credential, TokenResponse},
};

/// Request timeout for all calls to the accounts service. Token-endpoint
/// calls run inside a browser request, so they must be bounded.
const TOKEN_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for Spotify's accounts service (authorization and token endpoints).
///
/// Holds the application credentials and endpoint URLs explicitly instead of
/// reading them ambiently per call, so tests can point an instance at a stub
/// token endpoint. Production code constructs it once at startup via
/// [`SpotifyAuth::from_config`].
#[derive(Clone)]
pub struct SpotifyAuth {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    auth_url: String,
    token_url: String,
    scope: String,
    client: Client,
}

impl SpotifyAuth {
    /// Builds a client from explicit parameters.
    pub fn new(
        client_id: String,
        client_secret: String,
        redirect_uri: String,
        auth_url: String,
        token_url: String,
        scope: String,
    ) -> Self {
        let client = Client::builder()
            .timeout(TOKEN_REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        SpotifyAuth {
            client_id,
            client_secret,
            redirect_uri,
            auth_url,
            token_url,
            scope,
            client,
        }
    }

    /// Builds a client from the environment-backed configuration.
    ///
    /// # Panics
    ///
    /// Panics if a required `SPOTIFY_API_*` environment variable is not set;
    /// this is called once during startup where failing fast is intended.
    pub fn from_config() -> Self {
        Self::new(
            config::spotify_client_id(),
            config::spotify_client_secret(),
            config::spotify_redirect_uri(),
            config::spotify_apiauth_url(),
            config::spotify_apitoken_url(),
            config::spotify_scope(),
        )
    }

    /// Constructs the provider authorization URL the browser is redirected to.
    ///
    /// Embeds the client id, redirect URI, requested scope and
    /// `response_type=code`, and sets `show_dialog=true` so the provider
    /// always shows the consent dialog on a fresh login instead of silently
    /// reusing an earlier authorization. Pure URL construction; no network
    /// call is made.
    ///
    /// # Example
    ///
    /// ```
    /// let url = auth.authorize_url();
    /// // https://accounts.spotify.com/authorize?client_id=...&response_type=code&...
    /// ```
    pub fn authorize_url(&self) -> String {
        format!(
            "{auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&scope={scope}&show_dialog=true",
            auth_url = self.auth_url,
            client_id = self.client_id,
            redirect_uri = self.redirect_uri,
            scope = self.scope,
        )
    }

    /// Exchanges a one-time authorization code for an initial credential.
    ///
    /// Posts `grant_type=authorization_code` to the token endpoint together
    /// with the code, redirect URI and client credentials. The returned
    /// credential derives `expires_at` as `now + expires_in` at receipt time.
    ///
    /// # Arguments
    ///
    /// * `code` - Authorization code received from the OAuth callback
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::CodeExchangeFailed`] when the endpoint is
    /// unreachable, times out, or rejects the code (invalid, expired or
    /// already used). The authorization code is single-use and short-lived,
    /// so the exchange happens immediately in the callback handler.
    pub async fn exchange_code(&self, code: &str) -> Result<Credential, AuthError> {
        let res = self
            .client
            .post(&self.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", &self.redirect_uri),
                ("client_id", &self.client_id),
                ("client_secret", &self.client_secret),
            ])
            .send()
            .await
            .map_err(|e| AuthError::CodeExchangeFailed(e.to_string()))?
            .error_for_status()
            .map_err(|e| AuthError::CodeExchangeFailed(e.to_string()))?;

        let token: TokenResponse = res
            .json()
            .await
            .map_err(|e| AuthError::CodeExchangeFailed(e.to_string()))?;

        let refresh_token = token.refresh_token.clone().ok_or_else(|| {
            AuthError::CodeExchangeFailed("token response carried no refresh_token".to_string())
        })?;

        Ok(credential_from_response(token, refresh_token, &self.scope))
    }

    /// Exchanges a refresh token for a new access token.
    ///
    /// Posts `grant_type=refresh_token` to the token endpoint. The current
    /// refresh token is retained in the returned credential unless the
    /// endpoint rotates it, and `expires_at` is derived from the returned
    /// TTL at receipt time.
    ///
    /// # Arguments
    ///
    /// * `current` - The expiring credential whose refresh token is spent
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::RefreshFailed`] when the endpoint is unreachable,
    /// times out, or rejects the refresh token (invalid or revoked). Callers
    /// treat this exactly like a missing credential and send the visitor back
    /// to re-authorize.
    pub async fn refresh(&self, current: &Credential) -> Result<Credential, AuthError> {
        let res = self
            .client
            .post(&self.token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", &current.refresh_token),
                ("client_id", &self.client_id),
                ("client_secret", &self.client_secret),
            ])
            .send()
            .await
            .map_err(|e| AuthError::RefreshFailed(e.to_string()))?
            .error_for_status()
            .map_err(|e| AuthError::RefreshFailed(e.to_string()))?;

        let token: TokenResponse = res
            .json()
            .await
            .map_err(|e| AuthError::RefreshFailed(e.to_string()))?;

        // Provider may rotate the refresh token; keep the old one otherwise.
        let refresh_token = token
            .refresh_token
            .clone()
            .unwrap_or_else(|| current.refresh_token.clone());

        Ok(credential_from_response(token, refresh_token, &current.scope))
    }
    /// Begins a fresh authorization for this visitor.
    ///
    /// Clears any stored credential first - a fresh login must never resume
    /// a stale or invalid credential - then returns the authorize URL to
    /// redirect the browser to. One store mutation, no network call.
    ///
    /// # Errors
    ///
    /// Only store failures; URL construction itself cannot fail.
    pub async fn begin_authorization(
        &self,
        visitor_id: &str,
        store: &dyn TokenStore,
    ) -> Result<String, AuthError> {
        store.clear(visitor_id).await?;
        Ok(self.authorize_url())
    }

    /// Completes the redirect-based handshake for this visitor.
    ///
    /// Any stored credential is cleared up front: the incoming callback
    /// invalidates whatever authorization preceded it, whether the exchange
    /// below succeeds or not.
    ///
    /// # Arguments
    ///
    /// * `visitor_id` - Identity of the visitor completing the handshake
    /// * `params` - Query parameters of the callback request
    /// * `store` - Credential store to persist the exchanged credential in
    ///
    /// # Errors
    ///
    /// - [`AuthError::AuthorizationDenied`] when the provider reported an
    ///   `error` query parameter; no token exchange is attempted.
    /// - [`AuthError::CodeExchangeFailed`] when the `code` parameter is
    ///   missing or the exchange with the token endpoint fails.
    pub async fn handle_callback(
        &self,
        visitor_id: &str,
        params: &HashMap<String, String>,
        store: &dyn TokenStore,
    ) -> Result<Credential, AuthError> {
        store.clear(visitor_id).await?;

        if let Some(error) = params.get("error") {
            return Err(AuthError::AuthorizationDenied(error.clone()));
        }

        let code = params.get("code").ok_or_else(|| {
            AuthError::CodeExchangeFailed("callback carried neither code nor error".to_string())
        })?;

        let credential = self.exchange_code(code).await?;
        store.put(visitor_id, credential.clone()).await?;
        Ok(credential)
    }
}

fn credential_from_response(
    token: TokenResponse,
    refresh_token: String,
    fallback_scope: &str,
) -> Credential {
    Credential {
        access_token: token.access_token,
        refresh_token,
        expires_at: Utc::now().timestamp() + token.expires_in,
        scope: token.scope.unwrap_or_else(|| fallback_scope.to_string()),
    }
}
