use tunetop::types::{Image, ItemType, TimeRange, TopArtist, TopTrack, TrackAlbum, TrackArtist};
use tunetop::utils::{artist_views, milli_to_min, track_views};

// Helper function to create a test track
fn create_test_track(name: &str, duration_ms: u64, artist_names: &[&str]) -> TopTrack {
    TopTrack {
        name: name.to_string(),
        duration_ms,
        artists: artist_names
            .iter()
            .map(|n| TrackArtist {
                name: n.to_string(),
            })
            .collect(),
        album: TrackAlbum {
            images: vec![Image {
                url: format!("https://img.example.com/{}.jpg", name),
            }],
        },
    }
}

#[test]
fn test_milli_to_min() {
    assert_eq!(milli_to_min(0), "0:00");
    assert_eq!(milli_to_min(999), "0:00");
    assert_eq!(milli_to_min(1_000), "0:01");

    // Seconds below ten are zero-padded
    assert_eq!(milli_to_min(61_000), "1:01");
    assert_eq!(milli_to_min(69_000), "1:09");
    assert_eq!(milli_to_min(70_000), "1:10");

    // Milliseconds are truncated, not rounded
    assert_eq!(milli_to_min(199_999), "3:19");
    assert_eq!(milli_to_min(600_000), "10:00");
}

#[test]
fn test_track_views_join_artists_and_format_duration() {
    let tracks = vec![
        create_test_track("Song A", 215_000, &["Artist One"]),
        create_test_track("Song B", 65_000, &["Artist One", "Artist Two"]),
    ];

    let views = track_views(tracks);

    assert_eq!(views.len(), 2);
    assert_eq!(views[0].name, "Song A");
    assert_eq!(views[0].artist, "Artist One");
    assert_eq!(views[0].duration, "3:35");
    assert_eq!(
        views[0].image.as_deref(),
        Some("https://img.example.com/Song A.jpg")
    );

    assert_eq!(views[1].artist, "Artist One, Artist Two");
    assert_eq!(views[1].duration, "1:05");
}

#[test]
fn test_track_views_without_album_image() {
    let mut track = create_test_track("Bare", 1_000, &["Solo"]);
    track.album.images.clear();

    let views = track_views(vec![track]);
    assert_eq!(views[0].image, None);
}

#[test]
fn test_artist_views_take_first_image() {
    let artists = vec![TopArtist {
        name: "Artist One".to_string(),
        images: vec![
            Image {
                url: "https://img.example.com/large.jpg".to_string(),
            },
            Image {
                url: "https://img.example.com/small.jpg".to_string(),
            },
        ],
    }];

    let views = artist_views(artists);
    assert_eq!(views[0].name, "Artist One");
    assert_eq!(
        views[0].image.as_deref(),
        Some("https://img.example.com/large.jpg")
    );
}

#[test]
fn test_item_type_parsing() {
    assert_eq!("tracks".parse::<ItemType>(), Ok(ItemType::Tracks));
    assert_eq!("artists".parse::<ItemType>(), Ok(ItemType::Artists));
    assert!("playlists".parse::<ItemType>().is_err());
    assert!("Tracks".parse::<ItemType>().is_err());

    assert_eq!(ItemType::Tracks.as_str(), "tracks");
    assert_eq!(ItemType::Artists.as_str(), "artists");
}

#[test]
fn test_time_range_parsing() {
    assert_eq!("short_term".parse::<TimeRange>(), Ok(TimeRange::ShortTerm));
    assert_eq!("medium_term".parse::<TimeRange>(), Ok(TimeRange::MediumTerm));
    assert_eq!("long_term".parse::<TimeRange>(), Ok(TimeRange::LongTerm));
    assert!("last_week".parse::<TimeRange>().is_err());

    assert_eq!(TimeRange::ShortTerm.as_str(), "short_term");
    assert_eq!(TimeRange::MediumTerm.as_str(), "medium_term");
    assert_eq!(TimeRange::LongTerm.as_str(), "long_term");
}
