use crate::domain::blog_prompt::{BlogPrompt, PromptSong, WritingStyle};
use crate::domain::error::{AppError, Result};
use crate::domain::playlist::{strip_ordinal, PlaylistTable};
use crate::domain::publishing::{PostStatus, PublishRequest, PublishedPost};
use crate::infrastructure::response::clean_generated_markup;
use crate::infrastructure::service_clients::{ContentPublisher, TextGenerator};
use std::sync::Arc;

pub struct BlogPostUseCase {
    generator: Arc<dyn TextGenerator + Send + Sync>,
    publisher: Arc<dyn ContentPublisher + Send + Sync>,
}

impl BlogPostUseCase {
    pub fn new(
        generator: Arc<dyn TextGenerator + Send + Sync>,
        publisher: Arc<dyn ContentPublisher + Send + Sync>,
    ) -> Self {
        Self {
            generator,
            publisher,
        }
    }

    pub fn compose_prompt(
        table: &PlaylistTable,
        playlist: &str,
        style: &WritingStyle,
    ) -> Result<BlogPrompt> {
        let group = table
            .groups()
            .into_iter()
            .find(|g| g.playlist == playlist)
            .ok_or_else(|| AppError::NotFound(format!("Playlist '{}'", playlist)))?;

        Ok(BlogPrompt {
            playlist_title: strip_ordinal(group.playlist).to_string(),
            songs: group
                .entries
                .iter()
                .map(|e| PromptSong {
                    song: e.song.clone(),
                    artist: e.artist.clone(),
                    youtube_link: e.youtube_link.clone(),
                })
                .collect(),
            spotify_link: group.spotify_link.to_string(),
            style: style.clone(),
        })
    }

    pub async fn generate(
        &self,
        table: &PlaylistTable,
        playlist: &str,
        style: &WritingStyle,
    ) -> Result<String> {
        let prompt = Self::compose_prompt(table, playlist, style)?;
        let raw_result = self.generator.generate(&prompt).await?;

        let markup = clean_generated_markup(&raw_result);
        if markup.is_empty() {
            return Err(AppError::ServiceError(
                "Text generation returned an empty post".to_string(),
            ));
        }
        Ok(markup)
    }

    pub async fn publish(
        &self,
        table: &PlaylistTable,
        playlist: &str,
        style: &WritingStyle,
        status: PostStatus,
        existing_id: Option<u64>,
    ) -> Result<PublishedPost> {
        let body = self.generate(table, playlist, style).await?;

        let request = PublishRequest {
            title: strip_ordinal(playlist).to_string(),
            body,
            status,
            existing_id,
        };
        let post = self.publisher.publish(&request).await?;

        if !post.success {
            return Err(AppError::ServiceError(format!(
                "Publishing '{}' was not accepted",
                request.title
            )));
        }

        tracing::info!(id = post.id, view_url = %post.view_url, "Published playlist post");
        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::playlist::PlaylistEntry;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeGenerator {
        output: String,
        prompts: Mutex<Vec<BlogPrompt>>,
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(&self, prompt: &BlogPrompt) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.clone());
            Ok(self.output.clone())
        }
    }

    struct FakePublisher {
        accept: bool,
        requests: Mutex<Vec<PublishRequest>>,
    }

    #[async_trait]
    impl ContentPublisher for FakePublisher {
        async fn publish(&self, request: &PublishRequest) -> Result<PublishedPost> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(PublishedPost {
                success: self.accept,
                id: request.existing_id.unwrap_or(42),
                view_url: "https://blog.example/?p=42".to_string(),
                edit_url: "https://blog.example/wp-admin/post.php?post=42&action=edit".to_string(),
            })
        }
    }

    fn table() -> PlaylistTable {
        vec![
            PlaylistEntry::new("001 The Sunset", "Fly Me To The Moon", "Frank Sinatra")
                .with_youtube_link("https://video.example/xyz")
                .with_spotify_link("https://music.example/pl/abc"),
            PlaylistEntry::new("002 Other", "At Last", "Etta James"),
        ]
        .into_iter()
        .collect()
    }

    fn use_case(output: &str, accept: bool) -> (BlogPostUseCase, Arc<FakeGenerator>, Arc<FakePublisher>) {
        let generator = Arc::new(FakeGenerator {
            output: output.to_string(),
            prompts: Mutex::new(Vec::new()),
        });
        let publisher = Arc::new(FakePublisher {
            accept,
            requests: Mutex::new(Vec::new()),
        });
        (
            BlogPostUseCase::new(generator.clone(), publisher.clone()),
            generator,
            publisher,
        )
    }

    #[test]
    fn test_compose_prompt() {
        let prompt =
            BlogPostUseCase::compose_prompt(&table(), "001 The Sunset", &WritingStyle::default())
                .unwrap();

        assert_eq!(prompt.playlist_title, "The Sunset");
        assert_eq!(prompt.spotify_link, "https://music.example/pl/abc");
        assert_eq!(prompt.songs.len(), 1);
        assert_eq!(prompt.songs[0].youtube_link, "https://video.example/xyz");
    }

    #[test]
    fn test_compose_prompt_unknown_playlist() {
        assert!(matches!(
            BlogPostUseCase::compose_prompt(&table(), "003 Missing", &WritingStyle::default()),
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_publish_cleans_and_sends() {
        let (use_case, generator, publisher) =
            use_case("<think>plan</think>```html\n<h1>The Sunset</h1>\n```", true);

        let post = use_case
            .publish(&table(), "001 The Sunset", &WritingStyle::default(), PostStatus::Draft, None)
            .await
            .unwrap();

        assert_eq!(post.id, 42);
        assert_eq!(generator.prompts.lock().unwrap().len(), 1);
        let requests = publisher.requests.lock().unwrap();
        assert_eq!(requests[0].title, "The Sunset");
        assert_eq!(requests[0].body, "<h1>The Sunset</h1>");
        assert_eq!(requests[0].status, PostStatus::Draft);
    }

    #[tokio::test]
    async fn test_rejected_publish_is_an_error() {
        let (use_case, _, _) = use_case("<p>Body</p>", false);
        let result = use_case
            .publish(&table(), "002 Other", &WritingStyle::default(), PostStatus::Publish, Some(7))
            .await;
        assert!(matches!(result, Err(AppError::ServiceError(_))));
    }

    #[tokio::test]
    async fn test_empty_generation_is_an_error() {
        let (use_case, _, publisher) = use_case("<think>only thoughts</think>", true);
        let result = use_case
            .generate(&table(), "001 The Sunset", &WritingStyle::default())
            .await;
        assert!(matches!(result, Err(AppError::ServiceError(_))));
        assert!(publisher.requests.lock().unwrap().is_empty());
    }
}
