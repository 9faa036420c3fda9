// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Playlist interchange file reading and writing

mod table_reader;
mod table_writer;

pub use table_reader::{
    decode, scan, ReadStats, RowDisposition, ScanState, SkipReason, SourceEncoding, TableReader,
};
pub use table_writer::{TableWriter, UNKNOWN_ARTIST, UNKNOWN_SONG};
