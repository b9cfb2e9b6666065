use crate::types::{ArtistView, TopArtist, TopTrack, TrackView};

pub fn milli_to_min(duration_ms: u64) -> String {
    let duration_seconds = duration_ms / 1000;
    let minutes = duration_seconds / 60;
    let seconds = duration_seconds % 60;
    format!("{}:{:02}", minutes, seconds)
}

pub fn track_views(tracks: Vec<TopTrack>) -> Vec<TrackView> {
    tracks
        .into_iter()
        .map(|track| {
            let artist = track
                .artists
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");

            TrackView {
                name: track.name,
                artist,
                duration: milli_to_min(track.duration_ms),
                image: track.album.images.first().map(|i| i.url.clone()),
            }
        })
        .collect()
}

pub fn artist_views(artists: Vec<TopArtist>) -> Vec<ArtistView> {
    artists
        .into_iter()
        .map(|artist| ArtistView {
            image: artist.images.first().map(|i| i.url.clone()),
            name: artist.name,
        })
        .collect()
}
