// ============================================================
// PLAYLIST DOMAIN LAYER
// ============================================================
// Core types for the playlist interchange format
// No I/O, no async

mod interchange_config;
mod playlist_entry;
mod playlist_table;
mod raw_row;

pub use interchange_config::{InterchangeConfig, DEFAULT_MAX_INPUT_BYTES};
pub use playlist_entry::{combine_song_artist, PlaylistEntry};
pub use playlist_table::{PlaylistGroup, PlaylistTable};
pub use raw_row::{is_playlist_header, strip_ordinal, RawRow, RowKind, ROW_WIDTH};
