// ============================================================
// PLAYLIST TABLE READER
// ============================================================
// Parse headerless playlist exports with a size guard, encoding
// fallback and row-by-row classification

use std::borrow::Cow;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::Serialize;

use crate::domain::error::{AppError, Result};
use crate::domain::playlist::{InterchangeConfig, PlaylistEntry, PlaylistTable, RawRow, RowKind};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Encoding the source was decoded with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SourceEncoding {
    #[default]
    Utf8,
    Latin1,
}

/// Why a row produced nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    Blank,
    Unrecognized,
    /// Song row seen before any playlist header
    NoActivePlaylist,
}

/// Outcome of feeding one row to the scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowDisposition {
    Header,
    Entry,
    Skipped(SkipReason),
}

/// Counters collected while reading
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReadStats {
    pub rows: usize,
    pub headers: usize,
    pub entries: usize,
    pub skipped_blank: usize,
    pub skipped_unrecognized: usize,
    pub skipped_orphan: usize,
    pub encoding: SourceEncoding,
}

impl ReadStats {
    pub fn skipped(&self) -> usize {
        self.skipped_blank + self.skipped_unrecognized + self.skipped_orphan
    }
}

/// Accumulator threaded through the row loop: the active playlist context
/// plus everything emitted so far.
#[derive(Debug, Default)]
pub struct ScanState {
    context: Option<(String, String)>,
    table: PlaylistTable,
    stats: ReadStats,
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&mut self, row: &RawRow) -> RowDisposition {
        self.stats.rows += 1;

        let disposition = match row.classify() {
            RowKind::PlaylistHeader {
                playlist,
                spotify_link,
            } => {
                tracing::debug!(playlist, spotify_link, "Found playlist header");
                self.context = Some((playlist.to_string(), spotify_link.to_string()));
                RowDisposition::Header
            }
            RowKind::SongEntry {
                song_artist,
                song,
                artist,
                youtube_link,
            } => match &self.context {
                Some((playlist, spotify_link)) => {
                    let entry = PlaylistEntry::new(playlist.as_str(), song, artist)
                        .with_song_artist(song_artist)
                        .with_youtube_link(youtube_link)
                        .with_spotify_link(spotify_link.as_str());
                    self.table.push(entry);
                    RowDisposition::Entry
                }
                None => RowDisposition::Skipped(SkipReason::NoActivePlaylist),
            },
            RowKind::Blank => RowDisposition::Skipped(SkipReason::Blank),
            RowKind::Unrecognized => RowDisposition::Skipped(SkipReason::Unrecognized),
        };

        match disposition {
            RowDisposition::Header => self.stats.headers += 1,
            RowDisposition::Entry => self.stats.entries += 1,
            RowDisposition::Skipped(SkipReason::Blank) => self.stats.skipped_blank += 1,
            RowDisposition::Skipped(SkipReason::Unrecognized) => {
                self.stats.skipped_unrecognized += 1
            }
            RowDisposition::Skipped(SkipReason::NoActivePlaylist) => {
                self.stats.skipped_orphan += 1
            }
        }

        disposition
    }

    pub fn finish(self) -> (PlaylistTable, ReadStats) {
        (self.table, self.stats)
    }
}

/// Playlist file reader
pub struct TableReader {
    /// Delimiter character (default: comma)
    delimiter: u8,

    /// Whether to trim whitespace from values
    trim: bool,

    /// Maximum accepted source size in bytes
    max_input_bytes: u64,
}

impl Default for TableReader {
    fn default() -> Self {
        Self::from_config(&InterchangeConfig::default())
    }
}

impl TableReader {
    /// Create a new reader with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &InterchangeConfig) -> Self {
        Self {
            delimiter: config.delimiter_byte(),
            trim: config.trim_fields,
            max_input_bytes: config.max_input_bytes,
        }
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether to trim whitespace
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    pub fn with_max_input_bytes(mut self, max_input_bytes: u64) -> Self {
        self.max_input_bytes = max_input_bytes;
        self
    }

    /// Read a playlist file from disk
    pub fn read_path(&self, path: &Path) -> Result<PlaylistTable> {
        self.read_path_with_stats(path).map(|(table, _)| table)
    }

    pub fn read_path_with_stats(&self, path: &Path) -> Result<(PlaylistTable, ReadStats)> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            AppError::IoFailure(format!("File not found: {} ({})", path.display(), e))
        })?;
        self.check_size(metadata.len())?;

        let mut file = File::open(path).map_err(|e| {
            AppError::IoFailure(format!("Failed to open {}: {}", path.display(), e))
        })?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer).map_err(|e| {
            AppError::IoFailure(format!("Failed to read {}: {}", path.display(), e))
        })?;

        self.read_bytes_with_stats(&buffer)
    }

    /// Read from a seekable stream. The remaining length is measured by
    /// seeking, so oversized sources are rejected without reading them.
    pub fn read_seekable<R: Read + Seek>(&self, mut reader: R) -> Result<PlaylistTable> {
        let start = reader.stream_position()?;
        let end = reader.seek(SeekFrom::End(0))?;
        self.check_size(end.saturating_sub(start))?;
        reader.seek(SeekFrom::Start(start))?;

        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        self.read_bytes(&buffer)
    }

    /// Read from a stream of unknown length, buffering at most one byte
    /// past the limit.
    pub fn read_stream<R: Read>(&self, reader: R) -> Result<PlaylistTable> {
        let mut buffer = Vec::new();
        reader
            .take(self.max_input_bytes.saturating_add(1))
            .read_to_end(&mut buffer)?;
        self.read_bytes(&buffer)
    }

    pub fn read_bytes(&self, bytes: &[u8]) -> Result<PlaylistTable> {
        self.read_bytes_with_stats(bytes).map(|(table, _)| table)
    }

    pub fn read_bytes_with_stats(&self, bytes: &[u8]) -> Result<(PlaylistTable, ReadStats)> {
        self.check_size(bytes.len() as u64)?;

        let (content, encoding) = decode(bytes);
        if content.trim().is_empty() {
            tracing::error!("Playlist file is empty");
            return Err(AppError::EmptyInput);
        }

        if content.contains('\0') {
            tracing::error!("Playlist file contains NUL bytes");
            return Err(AppError::MalformedInput(
                "input looks like a binary file, not delimited text".to_string(),
            ));
        }

        let rows = self.parse_content(&content)?;
        if rows.is_empty() {
            tracing::error!("Playlist file is empty");
            return Err(AppError::EmptyInput);
        }
        tracing::info!(rows = rows.len(), ?encoding, "Read rows from playlist file");

        let (table, mut stats) = scan(&rows);
        stats.encoding = encoding;

        if table.is_empty() {
            tracing::error!(
                rows = stats.rows,
                headers = stats.headers,
                "No valid data found; either the format is incorrect or no songs follow a header"
            );
            return Err(AppError::NoValidData);
        }

        tracing::info!(
            songs = table.len(),
            playlists = table.playlists().len(),
            skipped = stats.skipped(),
            "Processed playlist file"
        );
        Ok((table, stats))
    }

    /// Split decoded content into five-field rows
    pub fn parse_content(&self, content: &str) -> Result<Vec<RawRow>> {
        // The csv crate reads an unclosed quote to EOF as one field.
        if let Some(line) = unterminated_quote_line(content, self.delimiter) {
            tracing::error!(line, "Unterminated quoted field");
            return Err(AppError::MalformedInput(format!(
                "Unterminated quoted field starting on line {}",
                line
            )));
        }

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .flexible(true) // Allow rows with different lengths
            .from_reader(content.as_bytes());

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::MalformedInput(format!("Failed to parse row {}: {}", index + 1, e))
            })?;
            rows.push(RawRow::from_fields(record.iter()));
        }

        Ok(rows)
    }

    fn check_size(&self, size: u64) -> Result<()> {
        if size > self.max_input_bytes {
            tracing::error!(size, limit = self.max_input_bytes, "Playlist file too large");
            return Err(AppError::InputTooLarge {
                size,
                limit: self.max_input_bytes,
            });
        }
        Ok(())
    }
}

/// Classify rows in order and fold them into a table
pub fn scan(rows: &[RawRow]) -> (PlaylistTable, ReadStats) {
    rows.iter()
        .fold(ScanState::new(), |mut state, row| {
            state.accept(row);
            state
        })
        .finish()
}

/// 1-based line of a quoted field that is never closed.
///
/// A quote opens a field only in first position; `""` inside it is an
/// escaped quote.
fn unterminated_quote_line(content: &str, delimiter: u8) -> Option<usize> {
    let bytes = content.as_bytes();
    let mut line = 1;
    let mut opened_on = None;
    let mut at_field_start = true;
    let mut i = 0;

    while i < bytes.len() {
        let byte = bytes[i];
        if opened_on.is_some() {
            if byte == b'"' {
                if bytes.get(i + 1) == Some(&b'"') {
                    i += 1;
                } else {
                    opened_on = None;
                    at_field_start = false;
                }
            }
        } else if at_field_start && byte == b'"' {
            opened_on = Some(line);
        } else {
            at_field_start = byte == delimiter || byte == b'\n' || byte == b'\r';
        }

        if byte == b'\n' {
            line += 1;
        }
        i += 1;
    }

    opened_on
}

/// Strict UTF-8 first, ISO-8859-1 when that fails. A UTF-8 BOM is dropped.
pub fn decode(bytes: &[u8]) -> (Cow<'_, str>, SourceEncoding) {
    let without_bom = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    match encoding_rs::UTF_8.decode_without_bom_handling_and_without_replacement(without_bom) {
        Some(content) => (content, SourceEncoding::Utf8),
        None => {
            tracing::warn!("UTF-8 decoding failed, trying latin-1");
            (
                encoding_rs::mem::decode_latin1(without_bom),
                SourceEncoding::Latin1,
            )
        }
    }
}
