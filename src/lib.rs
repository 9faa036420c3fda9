pub mod application;
pub mod domain;
pub mod infrastructure;

mod app;

pub use app::{init_tracing, run, Action, Cli};
pub use domain::error::{AppError, Result};
pub use domain::playlist::{PlaylistEntry, PlaylistTable};
pub use infrastructure::csv::{TableReader, TableWriter};
