use thiserror::Error;

/// Failures of the per-visitor token lifecycle.
///
/// Every variant is recovered at the handler boundary and translated into a
/// redirect to the entry or login page; none of them is ever surfaced to the
/// browser as a raw error. `RefreshFailed` is treated by callers exactly like
/// `NotAuthenticated`: the visitor is sent back to re-authorize.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No credential on file for this visitor.
    #[error("visitor is not authenticated")]
    NotAuthenticated,

    /// The remote token endpoint rejected the refresh token or was
    /// unreachable.
    #[error("token refresh failed: {0}")]
    RefreshFailed(String),

    /// The provider reported a denial on the authorization callback
    /// (e.g. `error=access_denied`).
    #[error("authorization denied by provider: {0}")]
    AuthorizationDenied(String),

    /// The remote token endpoint rejected the one-time authorization code
    /// or was unreachable.
    #[error("code exchange failed: {0}")]
    CodeExchangeFailed(String),

    /// The session layer failed to read or write visitor state.
    #[error("session store error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}
