use std::collections::HashMap;

use axum::{Extension, extract::Query, response::Redirect};
use tower_sessions::Session;

use crate::{error::AuthError, info, server::AppState, session, success, warning};

/// Begins the authorization flow: ensures the visitor has an identity,
/// clears any stale credential and redirects to the provider consent dialog.
pub async fn login(session: Session, Extension(state): Extension<AppState>) -> Redirect {
    let visitor_id = match session::ensure_identity(&session).await {
        Ok(id) => id,
        Err(e) => {
            warning!("Failed to establish visitor identity on login: {}", e);
            return Redirect::to("/");
        }
    };

    let store = state.backend.store_for(&session);
    match state
        .auth
        .begin_authorization(&visitor_id, store.as_ref())
        .await
    {
        Ok(url) => Redirect::to(&url),
        Err(e) => {
            warning!("Visitor {}: failed to begin authorization: {}", visitor_id, e);
            Redirect::to("/")
        }
    }
}

/// Handles the provider redirect after the consent dialog.
///
/// On success the visitor lands on the home page; on denial or exchange
/// failure they are returned to the entry page. Raw errors never reach the
/// browser.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    session: Session,
    Extension(state): Extension<AppState>,
) -> Redirect {
    let visitor_id = match session::ensure_identity(&session).await {
        Ok(id) => id,
        Err(e) => {
            warning!("Failed to establish visitor identity on callback: {}", e);
            return Redirect::to("/");
        }
    };

    let store = state.backend.store_for(&session);
    match state
        .auth
        .handle_callback(&visitor_id, &params, store.as_ref())
        .await
    {
        Ok(_) => {
            success!("Visitor {} authorized", visitor_id);
            Redirect::to("/home")
        }
        Err(AuthError::AuthorizationDenied(reason)) => {
            info!(
                "Visitor {}: authorization denied by provider: {}",
                visitor_id, reason
            );
            Redirect::to("/")
        }
        Err(e) => {
            warning!("Visitor {}: callback handling failed: {}", visitor_id, e);
            Redirect::to("/")
        }
    }
}

/// Clears the stored credential and invalidates the visitor identity, so a
/// later login mints a new one.
pub async fn logout(session: Session, Extension(state): Extension<AppState>) -> Redirect {
    match session::current_identity(&session).await {
        Ok(Some(visitor_id)) => {
            let store = state.backend.store_for(&session);
            if let Err(e) = store.clear(&visitor_id).await {
                warning!("Visitor {}: failed to clear credential: {}", visitor_id, e);
            }
            if let Err(e) = session::clear_identity(&session).await {
                warning!("Visitor {}: failed to clear identity: {}", visitor_id, e);
            }
            info!("Visitor {} logged out", visitor_id);
        }
        Ok(None) => {}
        Err(e) => {
            warning!("Failed to read session on logout: {}", e);
        }
    }

    Redirect::to("/")
}
