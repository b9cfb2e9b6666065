use axum::{
    Extension, Json,
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::{
    info,
    management::CredentialRefresher,
    server::AppState,
    session,
    types::{ItemType, TimeRange},
    utils, warning,
};

/// Serves the visitor's top tracks or artists, shaped for display.
///
/// Route shape: `GET /{item_type}/{time_range}` with `item_type` one of
/// `tracks`/`artists` and `time_range` one of `short_term`/`medium_term`/
/// `long_term`. A missing or unusable credential redirects to login; remote
/// API failures redirect to the entry page. Unknown path segments are a 404.
pub async fn top_items(
    Path((item_type, time_range)): Path<(String, String)>,
    session: Session,
    Extension(state): Extension<AppState>,
) -> Response {
    let Ok(item_type) = item_type.parse::<ItemType>() else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let Ok(time_range) = time_range.parse::<TimeRange>() else {
        return StatusCode::NOT_FOUND.into_response();
    };

    // No identity means no credential can exist; fail closed without ever
    // touching the store or the resource API.
    let visitor_id = match session::current_identity(&session).await {
        Ok(Some(id)) => id,
        _ => return Redirect::to("/login").into_response(),
    };

    let store = state.backend.store_for(&session);
    let refresher = CredentialRefresher::new(state.auth.clone());
    let credential = match refresher.ensure_fresh(&visitor_id, store.as_ref()).await {
        Ok(credential) => credential,
        Err(e) => {
            info!("Visitor {}: not logged in ({})", visitor_id, e);
            return Redirect::to("/login").into_response();
        }
    };

    match item_type {
        ItemType::Tracks => {
            match state.api.top_tracks(&credential.access_token, time_range).await {
                Ok(response) => Json(utils::track_views(response.items)).into_response(),
                Err(e) => {
                    warning!("Visitor {}: top tracks query failed: {}", visitor_id, e);
                    Redirect::to("/").into_response()
                }
            }
        }
        ItemType::Artists => {
            match state.api.top_artists(&credential.access_token, time_range).await {
                Ok(response) => Json(utils::artist_views(response.items)).into_response(),
                Err(e) => {
                    warning!("Visitor {}: top artists query failed: {}", visitor_id, e);
                    Redirect::to("/").into_response()
                }
            }
        }
    }
}
