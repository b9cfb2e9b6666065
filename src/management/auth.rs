use chrono::Utc;

use crate::{error::AuthError, spotify::auth::SpotifyAuth, store::TokenStore, types::Credential};

/// Skew margin between the validity check and actual use of the token at the
/// resource API. A credential within this many seconds of expiry is treated
/// as expiring and refreshed before use, covering clock drift and
/// request-processing latency.
pub const EXPIRY_SKEW_SECS: i64 = 60;

/// Decides whether a stored credential is usable and refreshes it if not.
pub struct CredentialRefresher {
    auth: SpotifyAuth,
}

impl CredentialRefresher {
    pub fn new(auth: SpotifyAuth) -> Self {
        CredentialRefresher { auth }
    }

    /// Returns a credential for this visitor that is valid for at least
    /// [`EXPIRY_SKEW_SECS`] more seconds, refreshing transparently if needed.
    ///
    /// - No entry in the store: fails with [`AuthError::NotAuthenticated`].
    /// - Entry with enough remaining lifetime: returned as-is, no network
    ///   call is made.
    /// - Entry within the skew margin (or already expired): a refresh-token
    ///   exchange is performed, the renewed credential is persisted and
    ///   returned. A rejected or unreachable refresh fails with
    ///   [`AuthError::RefreshFailed`], which callers treat like
    ///   `NotAuthenticated`.
    ///
    /// Overlapping requests for the same visitor are not coordinated: both
    /// may refresh and the last write wins in the store. Either resulting
    /// credential is valid.
    pub async fn ensure_fresh(
        &self,
        visitor_id: &str,
        store: &dyn TokenStore,
    ) -> Result<Credential, AuthError> {
        let credential = store
            .get(visitor_id)
            .await?
            .ok_or(AuthError::NotAuthenticated)?;

        let now = Utc::now().timestamp();
        if credential.remaining(now) >= EXPIRY_SKEW_SECS {
            return Ok(credential);
        }

        let renewed = self.auth.refresh(&credential).await?;
        store.put(visitor_id, renewed.clone()).await?;
        Ok(renewed)
    }
}
