use tower_sessions::Session;
use uuid::Uuid;

use crate::error::AuthError;

/// Session key holding the visitor identifier.
pub const VISITOR_ID_KEY: &str = "uuid";

/// Returns the visitor identifier for this session, minting one if absent.
///
/// The identifier is an opaque UUID v4 generated once per browser session.
/// It is the only value the signed session cookie binds to, and every
/// credential-store key is derived from it. Repeated calls within one
/// session return the same identifier.
pub async fn ensure_identity(session: &Session) -> Result<String, AuthError> {
    if let Some(id) = session.get::<String>(VISITOR_ID_KEY).await? {
        return Ok(id);
    }

    let id = Uuid::new_v4().to_string();
    session.insert(VISITOR_ID_KEY, id.clone()).await?;
    Ok(id)
}

/// Returns the visitor identifier without minting a new one.
pub async fn current_identity(session: &Session) -> Result<Option<String>, AuthError> {
    Ok(session.get::<String>(VISITOR_ID_KEY).await?)
}

/// Removes the visitor identifier from the session.
///
/// Called on logout after the credential entry has been cleared, so a
/// subsequent login mints a fresh identity instead of reusing the old one.
pub async fn clear_identity(session: &Session) -> Result<(), AuthError> {
    session.remove::<String>(VISITOR_ID_KEY).await?;
    Ok(())
}
