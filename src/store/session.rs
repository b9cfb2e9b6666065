use async_trait::async_trait;
use tower_sessions::Session;

use crate::{
    error::AuthError,
    store::{TokenStore, credential_key},
    types::Credential,
};

/// Credential store backed by the visitor's own session record.
///
/// Each entry lives under `token:<visitor_id>` inside the session that the
/// signed cookie binds to the browser, so the credential's lifetime is the
/// session's lifetime and nothing survives session expiry or logout.
#[derive(Clone)]
pub struct SessionTokenStore {
    session: Session,
}

impl SessionTokenStore {
    pub fn new(session: Session) -> Self {
        SessionTokenStore { session }
    }
}

#[async_trait]
impl TokenStore for SessionTokenStore {
    async fn get(&self, visitor_id: &str) -> Result<Option<Credential>, AuthError> {
        let entry = self
            .session
            .get::<Credential>(&credential_key(visitor_id))
            .await?;
        Ok(entry)
    }

    async fn put(&self, visitor_id: &str, credential: Credential) -> Result<(), AuthError> {
        self.session
            .insert(&credential_key(visitor_id), credential)
            .await?;
        Ok(())
    }

    async fn clear(&self, visitor_id: &str) -> Result<(), AuthError> {
        self.session
            .remove::<Credential>(&credential_key(visitor_id))
            .await?;
        Ok(())
    }
}
