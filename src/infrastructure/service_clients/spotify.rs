use super::PlaylistLinkLookup;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::ServicesConfig;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Tokens are refreshed this long before they actually expire
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Deserialize)]
struct PlaylistPage {
    #[serde(default)]
    items: Vec<PlaylistItem>,
    next: Option<String>,
}

#[derive(Deserialize)]
struct PlaylistItem {
    name: String,
    #[serde(default)]
    external_urls: ExternalUrls,
}

#[derive(Deserialize, Default)]
struct ExternalUrls {
    spotify: Option<String>,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

pub struct SpotifyClient {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    api_base: String,
    token_url: String,
    token: Mutex<Option<CachedToken>>,
}

impl SpotifyClient {
    pub fn from_config(config: &ServicesConfig) -> Result<Self> {
        let (client_id, client_secret) = match (
            config.spotify_client_id.as_deref(),
            config.spotify_client_secret.as_deref(),
        ) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => (id, secret),
            _ => {
                return Err(AppError::ConfigError(
                    "Spotify client ID and secret are required".to_string(),
                ))
            }
        };

        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.request_timeout_secs))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            api_base: config.spotify_api_base.trim_end_matches('/').to_string(),
            token_url: config.spotify_token_url.clone(),
            token: Mutex::new(None),
        })
    }

    async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() + TOKEN_EXPIRY_MARGIN {
                return Ok(token.value.clone());
            }
        }

        let response = self
            .client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| AppError::ServiceError(format!("Token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::ServiceError(format!(
                "Spotify token error ({}): {}",
                status, text
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::ServiceError(format!("Failed to parse JSON: {}", e)))?;

        let value = token.access_token.clone();
        *cached = Some(CachedToken {
            value: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        });
        Ok(value)
    }

    async fn fetch_page(&self, url: &str, token: &str) -> Result<PlaylistPage> {
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AppError::ServiceError(format!("Request failed: {}", e)))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Self::classify_failure(status, &text));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ServiceError(format!("Failed to parse JSON: {}", e)))
    }

    fn classify_failure(status: u16, body: &str) -> AppError {
        match status {
            429 => AppError::QuotaExceeded(format!("Spotify rate limit reached: {}", body)),
            404 => AppError::NotFound(format!("Spotify account not found: {}", body)),
            _ => AppError::ServiceError(format!("Spotify API error ({}): {}", status, body)),
        }
    }

    fn find_in_page(page: &PlaylistPage, name: &str) -> Option<String> {
        let wanted = name.to_lowercase();
        page.items
            .iter()
            .find(|item| item.name.to_lowercase() == wanted)
            .and_then(|item| item.external_urls.spotify.clone())
    }
}

#[async_trait]
impl PlaylistLinkLookup for SpotifyClient {
    async fn find_playlist_link(&self, account_id: &str, name: &str) -> Result<Option<String>> {
        let token = self.access_token().await?;
        let mut next = Some(format!(
            "{}/users/{}/playlists?limit=50",
            self.api_base, account_id
        ));
        let mut pages = 0usize;

        while let Some(url) = next {
            let page = self.fetch_page(&url, &token).await?;
            pages += 1;

            if let Some(link) = Self::find_in_page(&page, name) {
                tracing::debug!(name, pages, "Found Spotify playlist");
                return Ok(Some(link));
            }
            next = page.next;
        }

        tracing::debug!(name, pages, "Spotify playlist not found");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_in_page_is_case_insensitive_exact() {
        let page: PlaylistPage = serde_json::from_str(
            r#"{
                "items": [
                    {"name": "001 The Sunset Wedding Cocktail Hour Extended", "external_urls": {"spotify": "https://open.spotify.com/playlist/long"}},
                    {"name": "001 the sunset wedding COCKTAIL hour", "external_urls": {"spotify": "https://open.spotify.com/playlist/abc"}}
                ],
                "next": null
            }"#,
        )
        .unwrap();

        assert_eq!(
            SpotifyClient::find_in_page(&page, "001 The Sunset Wedding Cocktail Hour"),
            Some("https://open.spotify.com/playlist/abc".to_string())
        );
        assert_eq!(SpotifyClient::find_in_page(&page, "001 The Sunset"), None);
    }

    #[test]
    fn test_page_without_links() {
        let page: PlaylistPage =
            serde_json::from_str(r#"{"items": [{"name": "A"}], "next": "https://api.example/next"}"#)
                .unwrap();
        assert_eq!(SpotifyClient::find_in_page(&page, "a"), None);
        assert_eq!(page.next.as_deref(), Some("https://api.example/next"));
    }

    #[test]
    fn test_failures_are_classified() {
        assert!(matches!(
            SpotifyClient::classify_failure(429, ""),
            AppError::QuotaExceeded(_)
        ));
        assert!(matches!(
            SpotifyClient::classify_failure(404, ""),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            SpotifyClient::classify_failure(500, ""),
            AppError::ServiceError(_)
        ));
    }

    #[test]
    fn test_credentials_required() {
        let result = SpotifyClient::from_config(&ServicesConfig::default());
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }
}
