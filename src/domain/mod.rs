pub mod blog_prompt;
pub mod error;
pub mod publishing;

// Playlist interchange format
pub mod playlist;
