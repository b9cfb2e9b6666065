use std::time::Duration;

use reqwest::Client;

use crate::{
    config,
    types::{TimeRange, TopArtistsResponse, TopTracksResponse},
};

/// Fixed page size for top-item queries.
const PAGE_LIMIT: u32 = 10;

/// Request timeout for Web API calls issued from inside a browser request.
const API_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the authenticated top-items queries of the Spotify Web API.
///
/// A pass-through to the remote API contract: given a valid access token it
/// performs the `GET /me/top/{type}` calls and deserializes the responses.
/// It never touches the credential store and never refreshes tokens; callers
/// obtain a fresh access token first.
#[derive(Clone)]
pub struct ResourceClient {
    api_url: String,
    client: Client,
}

impl ResourceClient {
    pub fn new(api_url: String) -> Self {
        let client = Client::builder()
            .timeout(API_REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        ResourceClient { api_url, client }
    }

    pub fn from_config() -> Self {
        Self::new(config::spotify_apiurl())
    }

    /// Retrieves the visitor's top tracks for the given time range.
    ///
    /// Queries `GET /me/top/tracks` with a fixed page size of 10 and offset 0,
    /// authenticated with `Authorization: Bearer <access_token>`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on network failure, timeout, or a non-success
    /// status (including 401 for a stale token, which the refresher's skew
    /// margin makes unlikely but not impossible).
    pub async fn top_tracks(
        &self,
        access_token: &str,
        time_range: TimeRange,
    ) -> Result<TopTracksResponse, reqwest::Error> {
        let api_url = format!(
            "{uri}/me/top/tracks?time_range={time_range}&limit={limit}&offset=0",
            uri = self.api_url,
            time_range = time_range.as_str(),
            limit = PAGE_LIMIT,
        );

        let response = self
            .client
            .get(&api_url)
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?;

        response.json::<TopTracksResponse>().await
    }

    /// Retrieves the visitor's top artists for the given time range.
    ///
    /// Queries `GET /me/top/artists` with a fixed page size of 10 and offset 0,
    /// authenticated with `Authorization: Bearer <access_token>`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` on network failure, timeout, or a non-success
    /// status.
    pub async fn top_artists(
        &self,
        access_token: &str,
        time_range: TimeRange,
    ) -> Result<TopArtistsResponse, reqwest::Error> {
        let api_url = format!(
            "{uri}/me/top/artists?time_range={time_range}&limit={limit}&offset=0",
            uri = self.api_url,
            time_range = time_range.as_str(),
            limit = PAGE_LIMIT,
        );

        let response = self
            .client
            .get(&api_url)
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?;

        response.json::<TopArtistsResponse>().await
    }
}
