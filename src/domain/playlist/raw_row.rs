// ============================================================
// RAW ROW CLASSIFICATION
// ============================================================
// Positional rows of the interchange format and the kind of each row

use once_cell::sync::Lazy;
use regex::Regex;

/// Number of positional fields in every interchange row
pub const ROW_WIDTH: usize = 5;

static PLAYLIST_HEADER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{3}\s+(.+)$").unwrap());

/// Whether a first-column value names a playlist (`"003 Some Title"`)
pub fn is_playlist_header(value: &str) -> bool {
    PLAYLIST_HEADER_PATTERN.is_match(value)
}

/// Playlist key without its three-digit ordinal.
/// Keys that do not carry an ordinal are returned unchanged.
pub fn strip_ordinal(key: &str) -> &str {
    PLAYLIST_HEADER_PATTERN
        .captures(key)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(key)
}

/// What a single row means, decided from its own fields only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind<'a> {
    /// Starts a new playlist context; never produces an entry itself
    PlaylistHeader {
        playlist: &'a str,
        spotify_link: &'a str,
    },

    /// Song under the most recent header
    SongEntry {
        song_artist: &'a str,
        song: &'a str,
        artist: &'a str,
        youtube_link: &'a str,
    },

    /// Separator row, every field empty
    Blank,

    /// Anything else, e.g. a song row missing its title or artist
    Unrecognized,
}

/// One row of the interchange file, normalized to exactly five fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    fields: [String; ROW_WIDTH],
}

impl RawRow {
    /// Build a row from any number of fields.
    /// Missing trailing fields become empty, fields past the fifth are dropped.
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row = Self::default();
        for (slot, value) in row.fields.iter_mut().zip(fields) {
            *slot = value.into();
        }
        row
    }

    pub fn field(&self, index: usize) -> &str {
        self.fields.get(index).map(String::as_str).unwrap_or("")
    }

    /// A field counts as present when it has non-whitespace content
    pub fn is_present(&self, index: usize) -> bool {
        !self.field(index).trim().is_empty()
    }

    pub fn is_blank(&self) -> bool {
        (0..ROW_WIDTH).all(|index| !self.is_present(index))
    }

    pub fn fields(&self) -> &[String; ROW_WIDTH] {
        &self.fields
    }

    pub fn into_fields(self) -> [String; ROW_WIDTH] {
        self.fields
    }

    /// Classify the row. Header detection wins over song detection.
    pub fn classify(&self) -> RowKind<'_> {
        if is_playlist_header(self.field(0)) {
            return RowKind::PlaylistHeader {
                playlist: self.field(0),
                spotify_link: self.optional(4),
            };
        }

        if self.is_present(0) && self.is_present(1) && self.is_present(2) {
            return RowKind::SongEntry {
                song_artist: self.field(0),
                song: self.field(1),
                artist: self.field(2),
                youtube_link: self.optional(3),
            };
        }

        if self.is_blank() {
            RowKind::Blank
        } else {
            RowKind::Unrecognized
        }
    }

    fn optional(&self, index: usize) -> &str {
        if self.is_present(index) {
            self.field(index)
        } else {
            ""
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_needs_exactly_three_digits() {
        assert!(is_playlist_header("003 The Elegant Affair Wedding Cocktail Hour"));
        assert!(is_playlist_header("003 Anything"));
        assert!(is_playlist_header("123    spaced"));
        assert!(!is_playlist_header("12 Not Three Digits"));
        assert!(!is_playlist_header("0003 Four Digits"));
        assert!(!is_playlist_header("003"));
        assert!(!is_playlist_header("003 "));
        assert!(!is_playlist_header("abc Letters"));
    }

    #[test]
    fn test_non_ascii_digits_are_not_ordinals() {
        assert!(!is_playlist_header("\u{0661}\u{0662}\u{0663} Arabic Indic"));
    }

    #[test]
    fn test_strip_ordinal() {
        assert_eq!(strip_ordinal("001 The Sunset"), "The Sunset");
        assert_eq!(strip_ordinal("No Ordinal"), "No Ordinal");
    }

    #[test]
    fn test_short_rows_are_padded_and_long_rows_truncated() {
        let short = RawRow::from_fields(["a", "b"]);
        assert_eq!(short.field(2), "");
        assert_eq!(short.field(4), "");

        let long = RawRow::from_fields(["a", "b", "c", "d", "e", "f"]);
        assert_eq!(long.field(4), "e");
        assert_eq!(long.fields().len(), ROW_WIDTH);
    }

    #[test]
    fn test_classify_header_captures_spotify_link() {
        let row = RawRow::from_fields(["001 Sunset", "", "", "", "https://music.example/pl/abc"]);
        assert_eq!(
            row.classify(),
            RowKind::PlaylistHeader {
                playlist: "001 Sunset",
                spotify_link: "https://music.example/pl/abc",
            }
        );

        let bare = RawRow::from_fields(["001 Sunset"]);
        assert_eq!(
            bare.classify(),
            RowKind::PlaylistHeader {
                playlist: "001 Sunset",
                spotify_link: "",
            }
        );
    }

    #[test]
    fn test_classify_song_entry() {
        let row = RawRow::from_fields(["Song-Artist", "Song", "Artist", "https://video.example/x"]);
        assert_eq!(
            row.classify(),
            RowKind::SongEntry {
                song_artist: "Song-Artist",
                song: "Song",
                artist: "Artist",
                youtube_link: "https://video.example/x",
            }
        );
    }

    #[test]
    fn test_classify_song_missing_artist_is_unrecognized() {
        let row = RawRow::from_fields(["Song-Artist", "Song", "  "]);
        assert_eq!(row.classify(), RowKind::Unrecognized);
    }

    #[test]
    fn test_classify_blank() {
        assert_eq!(RawRow::from_fields(["", "", "", "", ""]).classify(), RowKind::Blank);
        assert_eq!(RawRow::from_fields(Vec::<String>::new()).classify(), RowKind::Blank);
    }
}
