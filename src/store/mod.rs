//! # Credential Store Module
//!
//! Visitor-scoped storage for cached Spotify credentials. The store is the
//! only shared mutable state in the application, and it is partitioned by
//! visitor identifier by construction: every entry lives under a key derived
//! purely from the identifier, so two visitors with distinct identifiers can
//! never observe each other's credentials, and a visitor without an
//! identifier can never read any entry at all.
//!
//! Two backends implement the [`TokenStore`] trait and are selected once at
//! startup via the `TOKEN_STORE` environment variable:
//!
//! - [`SessionTokenStore`] - entries live inside the visitor's own session
//!   record, so they share the session's lifetime and expiry
//! - [`MemoryTokenStore`] - a process-wide map partitioned by the same keys,
//!   useful when session payloads should stay small
//!
//! Both backends perform atomic single-key replacements; a credential is
//! either absent or fully written, never partial.

mod memory;
mod session;

use async_trait::async_trait;
pub use memory::MemoryTokenStore;
pub use session::SessionTokenStore;
use tower_sessions::Session;

use crate::{config, error::AuthError, types::Credential};

/// Derives the store key for a visitor's credential entry.
///
/// A pure function of the visitor identifier only. Keeping key derivation
/// free of any ambient state is what makes the cross-visitor isolation
/// property mechanically checkable.
pub fn credential_key(visitor_id: &str) -> String {
    format!("token:{}", visitor_id)
}

/// Keyed storage mapping a visitor identifier to a cached credential.
///
/// Implementations must never read or write outside the key derived from
/// the given visitor identifier.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Reads the credential for this visitor, `None` if no entry exists.
    async fn get(&self, visitor_id: &str) -> Result<Option<Credential>, AuthError>;

    /// Writes or overwrites the credential for this visitor.
    async fn put(&self, visitor_id: &str, credential: Credential) -> Result<(), AuthError>;

    /// Removes the credential entry for this visitor, if any.
    async fn clear(&self, visitor_id: &str) -> Result<(), AuthError>;
}

/// Store backend chosen once at startup, not improvised per request.
#[derive(Clone)]
pub enum TokenBackend {
    /// Credentials are kept inside each visitor's session record.
    Session,
    /// Credentials are kept in a process-wide map shared across requests.
    Memory(MemoryTokenStore),
}

impl TokenBackend {
    /// Builds the backend named by the `TOKEN_STORE` environment variable.
    ///
    /// Unknown values fall back to the session backend, which is the safer
    /// default: entries die with the session they belong to.
    pub fn from_config() -> Self {
        match config::token_store().as_str() {
            "memory" => TokenBackend::Memory(MemoryTokenStore::new()),
            _ => TokenBackend::Session,
        }
    }

    /// Returns the [`TokenStore`] to use for the request owning `session`.
    pub fn store_for(&self, session: &Session) -> Box<dyn TokenStore> {
        match self {
            TokenBackend::Session => Box::new(SessionTokenStore::new(session.clone())),
            TokenBackend::Memory(store) => Box::new(store.clone()),
        }
    }
}
