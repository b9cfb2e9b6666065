use axum::{
    Extension,
    response::{Html, IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::{info, management::CredentialRefresher, server::AppState, session};

pub async fn welcome() -> Html<&'static str> {
    Html(
        "<h2>Your listening, summed up.</h2>\
         <p><a href=\"/login\">Log in with Spotify</a> to see your top tracks and artists.</p>",
    )
}

/// Landing page after authorization. Requires a fresh credential; visitors
/// without one are sent to login instead.
pub async fn home(session: Session, Extension(state): Extension<AppState>) -> Response {
    let visitor_id = match session::current_identity(&session).await {
        Ok(Some(id)) => id,
        _ => return Redirect::to("/login").into_response(),
    };

    let store = state.backend.store_for(&session);
    let refresher = CredentialRefresher::new(state.auth.clone());
    if let Err(e) = refresher.ensure_fresh(&visitor_id, store.as_ref()).await {
        info!("Visitor {}: not logged in ({})", visitor_id, e);
        return Redirect::to("/login").into_response();
    }

    Html(
        "<h2>You're in.</h2>\
         <ul>\
         <li><a href=\"/tracks/short_term\">Top tracks (last 4 weeks)</a></li>\
         <li><a href=\"/tracks/medium_term\">Top tracks (last 6 months)</a></li>\
         <li><a href=\"/tracks/long_term\">Top tracks (all time)</a></li>\
         <li><a href=\"/artists/short_term\">Top artists (last 4 weeks)</a></li>\
         <li><a href=\"/artists/medium_term\">Top artists (last 6 months)</a></li>\
         <li><a href=\"/artists/long_term\">Top artists (all time)</a></li>\
         </ul>\
         <p><a href=\"/logout\">Log out</a></p>",
    )
    .into_response()
}

pub async fn about() -> Html<&'static str> {
    Html(
        "<h2>About</h2>\
         <p>This site shows the top tracks and artists of your Spotify account. \
         It only ever requests the <code>user-top-read</code> scope.</p>",
    )
}

pub async fn privacy() -> Html<&'static str> {
    Html(
        "<h2>Privacy</h2>\
         <p>Credentials are cached per browser session and are deleted on logout. \
         Nothing is stored durably and nothing is shared with third parties.</p>",
    )
}
