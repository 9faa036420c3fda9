pub mod spotify;
pub mod youtube;

use crate::domain::blog_prompt::BlogPrompt;
use crate::domain::error::Result;
use crate::domain::publishing::{PublishRequest, PublishedPost};
use async_trait::async_trait;

pub use spotify::SpotifyClient;
pub use youtube::YouTubeClient;

/// Finds a video for a free-text query.
/// `Ok(None)` means nothing matched; `AppError::QuotaExceeded` means stop asking.
#[async_trait]
pub trait VideoLinkLookup {
    async fn find_video_link(&self, query: &str) -> Result<Option<String>>;
}

/// Finds a playlist of an account by case-insensitive exact name
#[async_trait]
pub trait PlaylistLinkLookup {
    async fn find_playlist_link(&self, account_id: &str, name: &str) -> Result<Option<String>>;
}

/// Creates or updates a remote document
#[async_trait]
pub trait ContentPublisher {
    async fn publish(&self, request: &PublishRequest) -> Result<PublishedPost>;
}

/// Turns a structured prompt into post markup
#[async_trait]
pub trait TextGenerator {
    async fn generate(&self, prompt: &BlogPrompt) -> Result<String>;
}
