use super::VideoLinkLookup;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::ServicesConfig;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Attempts per search request, the first one included
const MAX_ATTEMPTS: u32 = 3;
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

/// Why a single search request did not produce a result
enum SearchFailure {
    Transport(String),
    Status { status: u16, body: String },
    Decode(String),
}

impl SearchFailure {
    fn is_retryable(&self) -> bool {
        match self {
            SearchFailure::Transport(_) => true,
            SearchFailure::Status { status, body } => YouTubeClient::is_retryable(*status, body),
            SearchFailure::Decode(_) => false,
        }
    }

    fn into_error(self) -> AppError {
        match self {
            SearchFailure::Transport(e) => AppError::ServiceError(format!("Request failed: {}", e)),
            SearchFailure::Status { status, body } => YouTubeClient::classify_failure(status, &body),
            SearchFailure::Decode(e) => {
                AppError::ServiceError(format!("Failed to parse JSON: {}", e))
            }
        }
    }
}

pub struct YouTubeClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    /// Set once the daily quota is spent; later lookups fail fast
    quota_exceeded: AtomicBool,
    last_request: Mutex<Option<Instant>>,
}

impl YouTubeClient {
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(AppError::ConfigError("YouTube API key is required".to_string()));
        }

        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            quota_exceeded: AtomicBool::new(false),
            last_request: Mutex::new(None),
        })
    }

    pub fn from_config(config: &ServicesConfig) -> Result<Self> {
        let api_key = config.youtube_api_key.as_deref().unwrap_or_default();
        Self::new(
            api_key,
            &config.youtube_api_base,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn quota_exceeded(&self) -> bool {
        self.quota_exceeded.load(Ordering::Relaxed)
    }

    /// Nudge the search towards music videos
    pub fn refine_query(query: &str) -> String {
        if query.contains(" - ") || query.contains(" \u{2013} ") {
            format!("{} official music video", query)
        } else {
            format!("{} music song", query)
        }
    }

    pub fn video_url(video_id: &str) -> String {
        format!("https://www.youtube.com/watch?v={}", video_id)
    }

    fn classify_failure(status: u16, body: &str) -> AppError {
        if status == 403 && body.contains("quotaExceeded") {
            AppError::QuotaExceeded(
                "YouTube API quota exceeded. Please try again tomorrow.".to_string(),
            )
        } else {
            AppError::ServiceError(format!("YouTube API error ({}): {}", status, body))
        }
    }

    /// Transient failures worth another attempt. A spent quota never is.
    fn is_retryable(status: u16, body: &str) -> bool {
        if body.contains("quotaExceeded") {
            return false;
        }
        body.contains("rateLimitExceeded") || body.contains("backendError") || status >= 500
    }

    /// Wait before the retry that follows failed attempt `attempt` (1-based)
    fn backoff_delay(attempt: u32) -> Duration {
        Duration::from_secs(1 << (attempt - 1).min(5))
    }

    /// Keep consecutive requests at least `MIN_REQUEST_INTERVAL` apart
    async fn throttle(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < MIN_REQUEST_INTERVAL {
                tokio::time::sleep(MIN_REQUEST_INTERVAL - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    fn first_video(body: SearchResponse) -> Option<String> {
        body.items
            .into_iter()
            .find_map(|item| item.id.video_id)
            .map(|id| Self::video_url(&id))
    }

    async fn search(&self, params: &[(&str, &str)]) -> Result<Option<String>> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let failure = match self.send_search(params).await {
                Ok(found) => return Ok(found),
                Err(failure) => failure,
            };

            let retry = failure.is_retryable() && attempt < MAX_ATTEMPTS;
            let err = failure.into_error();
            if matches!(err, AppError::QuotaExceeded(_)) {
                tracing::warn!("YouTube API quota exceeded");
                self.quota_exceeded.store(true, Ordering::Relaxed);
                return Err(err);
            }
            if !retry {
                return Err(err);
            }

            let delay = Self::backoff_delay(attempt);
            tracing::warn!(
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "YouTube request failed, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn send_search(
        &self,
        params: &[(&str, &str)],
    ) -> std::result::Result<Option<String>, SearchFailure> {
        self.throttle().await;
        let url = format!("{}/search", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("maxResults", "1"), ("type", "video")])
            .query(params)
            .send()
            .await
            .map_err(|e| SearchFailure::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SearchFailure::Status { status, body });
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| SearchFailure::Decode(e.to_string()))?;

        Ok(Self::first_video(body))
    }
}

#[async_trait]
impl VideoLinkLookup for YouTubeClient {
    async fn find_video_link(&self, query: &str) -> Result<Option<String>> {
        if self.quota_exceeded() {
            return Err(AppError::QuotaExceeded(
                "YouTube API quota exceeded. Please try again tomorrow.".to_string(),
            ));
        }

        let refined = Self::refine_query(query);
        let found = self
            .search(&[
                ("q", refined.as_str()),
                ("part", "id,snippet"),
                ("videoEmbeddable", "true"),
                ("safeSearch", "moderate"),
                ("videoDefinition", "high"),
            ])
            .await?;
        if found.is_some() {
            return Ok(found);
        }

        // Relaxed search with the original query
        tracing::debug!(query, "No refined YouTube match, retrying with raw query");
        self.search(&[("q", query), ("part", "id")]).await
    }
}
