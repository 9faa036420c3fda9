// ============================================================
// PLAYLIST TABLE WRITER
// ============================================================
// Serialize a playlist table back to the headerless positional layout

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::domain::error::{AppError, Result};
use crate::domain::playlist::{
    is_playlist_header, InterchangeConfig, PlaylistEntry, PlaylistTable, RawRow,
};

pub const UNKNOWN_SONG: &str = "Unknown Song";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Playlist file writer
pub struct TableWriter {
    /// Delimiter character (default: comma)
    delimiter: u8,
}

impl Default for TableWriter {
    fn default() -> Self {
        Self::from_config(&InterchangeConfig::default())
    }
}

impl TableWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &InterchangeConfig) -> Self {
        Self {
            delimiter: config.delimiter_byte(),
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Lay the table out as rows: per playlist a header row, one row per
    /// song and a blank separator.
    pub fn rows(&self, table: &PlaylistTable) -> Vec<RawRow> {
        let mut rows = Vec::new();

        for group in table.groups() {
            if !is_playlist_header(group.playlist) {
                tracing::warn!(
                    playlist = group.playlist,
                    "Playlist key has no 3-digit ordinal and will not be recognized when read back"
                );
            }

            rows.push(RawRow::from_fields([
                group.playlist,
                "",
                "",
                "",
                group.spotify_link,
            ]));

            for entry in group.entries {
                rows.push(song_row(entry));
            }

            rows.push(RawRow::default());
        }

        rows
    }

    pub fn write_to<W: Write>(&self, table: &PlaylistTable, writer: W) -> Result<()> {
        let mut csv_writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(writer);

        for row in self.rows(table) {
            csv_writer
                .write_record(row.fields())
                .map_err(|e| AppError::IoFailure(format!("Failed to write row: {}", e)))?;
        }

        csv_writer
            .flush()
            .map_err(|e| AppError::IoFailure(format!("Failed to flush output: {}", e)))
    }

    pub fn write_path(&self, table: &PlaylistTable, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| {
            AppError::IoFailure(format!("Failed to create {}: {}", path.display(), e))
        })?;
        self.write_to(table, file)?;

        tracing::info!(
            songs = table.len(),
            path = %path.display(),
            "Saved playlist file"
        );
        Ok(())
    }

    pub fn to_bytes(&self, table: &PlaylistTable) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_to(table, &mut buffer)?;
        Ok(buffer)
    }
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

fn song_row(entry: &PlaylistEntry) -> RawRow {
    let song = or_placeholder(&entry.song, UNKNOWN_SONG);
    let artist = or_placeholder(&entry.artist, UNKNOWN_ARTIST);
    let song_artist = entry.display_name_with(song, artist);

    RawRow::from_fields([
        song_artist.as_str(),
        song,
        artist,
        entry.youtube_link.as_str(),
        "",
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::csv::TableReader;

    fn sample_table() -> PlaylistTable {
        vec![
            PlaylistEntry::new("001 The Sunset Wedding Cocktail Hour", "Fly Me To The Moon", "Frank Sinatra")
                .with_song_artist("Fly Me To The Moon-Frank Sinatra")
                .with_youtube_link("https://video.example/xyz")
                .with_spotify_link("https://music.example/pl/abc"),
            PlaylistEntry::new("001 The Sunset Wedding Cocktail Hour", "At Last", "Etta James")
                .with_spotify_link("https://music.example/pl/abc"),
            PlaylistEntry::new("002 Love, Actually", "Song, Part 2", "Artist"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_layout() {
        let bytes = TableWriter::new().to_bytes(&sample_table()).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let expected = "001 The Sunset Wedding Cocktail Hour,,,,https://music.example/pl/abc\n\
Fly Me To The Moon-Frank Sinatra,Fly Me To The Moon,Frank Sinatra,https://video.example/xyz,\n\
At Last - Etta James,At Last,Etta James,,\n\
,,,,\n\
\"002 Love, Actually\",,,,\n\
\"Song, Part 2 - Artist\",\"Song, Part 2\",Artist,,\n\
,,,,\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_placeholders_for_missing_fields() {
        let mut entry = PlaylistEntry::new("001 A", "", "");
        entry.song_artist = String::new();
        let table: PlaylistTable = vec![entry].into_iter().collect();

        let rows = TableWriter::new().rows(&table);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].field(0), "Unknown Song - Unknown Artist");
        assert_eq!(rows[1].field(1), UNKNOWN_SONG);
        assert_eq!(rows[1].field(2), UNKNOWN_ARTIST);
        assert_eq!(rows[1].field(3), "");
        assert!(rows[2].is_blank());
    }

    #[test]
    fn test_written_display_name_matches_entry() {
        let entry = PlaylistEntry::new("001 A", "Song", "Artist").with_song_artist(" ");
        let expected = entry.display_name();
        let table: PlaylistTable = vec![entry].into_iter().collect();

        let rows = TableWriter::new().rows(&table);
        assert_eq!(rows[1].field(0), expected);
        assert_eq!(rows[1].field(0), "Song - Artist");
    }

    #[test]
    fn test_round_trip() {
        let table = sample_table();
        let bytes = TableWriter::new().to_bytes(&table).unwrap();
        let reread = TableReader::new().read_bytes(&bytes).unwrap();

        assert_eq!(reread, table);
    }

    #[test]
    fn test_round_trip_from_read() {
        let content = "001 A,,,,https://music.example/pl/a\n\
a-1,a,1,https://video.example/1\n\
\n\
Orphan,row\n\
002 B,,,,\n\
b-2,b,2,,https://ignored.example\n";
        let reader = TableReader::new();
        let table = reader.read_bytes(content.as_bytes()).unwrap();
        let written = TableWriter::new().to_bytes(&table).unwrap();

        assert_eq!(reader.read_bytes(&written).unwrap(), table);
    }

    #[test]
    fn test_write_is_idempotent() {
        let table = sample_table();
        let writer = TableWriter::new();
        assert_eq!(writer.to_bytes(&table).unwrap(), writer.to_bytes(&table).unwrap());
    }

    #[test]
    fn test_write_path_round_trip() {
        let path = std::env::temp_dir().join(format!("playlists-{}.csv", uuid::Uuid::new_v4()));
        let table = sample_table();

        TableWriter::new().write_path(&table, &path).unwrap();
        let reread = TableReader::new().read_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(reread, table);
    }

    #[test]
    fn test_unwritable_destination_is_io_failure() {
        let path = std::env::temp_dir()
            .join(format!("missing-dir-{}", uuid::Uuid::new_v4()))
            .join("out.csv");
        assert!(matches!(
            TableWriter::new().write_path(&sample_table(), &path),
            Err(AppError::IoFailure(_))
        ));
    }
}
