// ============================================================
// PLAYLIST ENTRY
// ============================================================
// One song of one playlist, the normalized output unit of the reader

use serde::{Deserialize, Serialize};
use super::raw_row::strip_ordinal;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    /// Full header text including the ordinal, the grouping key
    #[serde(rename = "Playlist")]
    pub playlist: String,

    #[serde(rename = "Song")]
    pub song: String,

    #[serde(rename = "Artist")]
    pub artist: String,

    /// Combined display string as it appeared in the first column
    #[serde(rename = "Song_Artist")]
    pub song_artist: String,

    /// Empty until a video link has been found
    #[serde(rename = "YouTube_Link")]
    pub youtube_link: String,

    /// Copied from the playlist header, identical within a playlist
    #[serde(rename = "Spotify_Link")]
    pub spotify_link: String,
}

impl PlaylistEntry {
    /// Create an entry with a reconstructed display string and empty links
    pub fn new(
        playlist: impl Into<String>,
        song: impl Into<String>,
        artist: impl Into<String>,
    ) -> Self {
        let song = song.into();
        let artist = artist.into();
        Self {
            playlist: playlist.into(),
            song_artist: combine_song_artist(&song, &artist),
            song,
            artist,
            youtube_link: String::new(),
            spotify_link: String::new(),
        }
    }

    pub fn with_song_artist(mut self, song_artist: impl Into<String>) -> Self {
        self.song_artist = song_artist.into();
        self
    }

    pub fn with_youtube_link(mut self, link: impl Into<String>) -> Self {
        self.youtube_link = link.into();
        self
    }

    pub fn with_spotify_link(mut self, link: impl Into<String>) -> Self {
        self.spotify_link = link.into();
        self
    }

    /// The stored display string, or `"{song} - {artist}"` when it is empty
    pub fn display_name(&self) -> String {
        self.display_name_with(&self.song, &self.artist)
    }

    /// Like `display_name`, but rebuilds a blank display string from the
    /// given song and artist instead of the stored ones
    pub fn display_name_with(&self, song: &str, artist: &str) -> String {
        if self.song_artist.trim().is_empty() {
            combine_song_artist(song, artist)
        } else {
            self.song_artist.clone()
        }
    }

    /// Query used for video lookups, `"{song} - {artist}"`
    pub fn search_query(&self) -> String {
        combine_song_artist(&self.song, &self.artist)
    }

    /// Playlist name without the ordinal prefix
    pub fn title(&self) -> &str {
        strip_ordinal(&self.playlist)
    }

    pub fn has_video_link(&self) -> bool {
        !self.youtube_link.trim().is_empty()
    }
}

/// `"{song} - {artist}"`, the reconstructed display string
pub fn combine_song_artist(song: &str, artist: &str) -> String {
    format!("{} - {}", song, artist)
}
