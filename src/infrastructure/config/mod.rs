use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};
use crate::domain::playlist::InterchangeConfig;

pub const DEFAULT_CONFIG_FILE: &str = "playlist-interchange.toml";
pub const ENV_PREFIX: &str = "PLAYLIST_";

/// Endpoints and credentials for the link lookup services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub youtube_api_key: Option<String>,
    pub youtube_api_base: String,
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
    /// Account whose playlists are searched
    pub spotify_account_id: Option<String>,
    pub spotify_api_base: String,
    pub spotify_token_url: String,
    pub request_timeout_secs: u64,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            youtube_api_key: None,
            youtube_api_base: "https://www.googleapis.com/youtube/v3".to_string(),
            spotify_client_id: None,
            spotify_client_secret: None,
            spotify_account_id: None,
            spotify_api_base: "https://api.spotify.com/v1".to_string(),
            spotify_token_url: "https://accounts.spotify.com/api/token".to_string(),
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log_filter: String,
    pub interchange: InterchangeConfig,
    pub services: ServicesConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            interchange: InterchangeConfig::default(),
            services: ServicesConfig::default(),
        }
    }
}

pub struct ConfigService;

impl ConfigService {
    /// Defaults, then the TOML file, then `PLAYLIST_*` environment variables.
    /// An explicit path must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<AppConfig> {
        let toml = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::ConfigError(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Toml::file(path)
            }
            None => Toml::file(DEFAULT_CONFIG_FILE),
        };

        let figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(toml)
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        Self::extract(figment)
    }

    pub fn extract(figment: Figment) -> Result<AppConfig> {
        let config: AppConfig = figment
            .extract()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;

        config
            .interchange
            .validate()
            .map_err(AppError::ConfigError)?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(content: &str) -> Result<AppConfig> {
        ConfigService::extract(
            Figment::from(Serialized::defaults(AppConfig::default())).merge(Toml::string(content)),
        )
    }

    #[test]
    fn test_defaults() {
        let config = from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.interchange.max_input_bytes, 50 * 1024 * 1024);
    }

    #[test]
    fn test_toml_overrides() {
        let config = from_toml(
            r#"
            log_filter = "debug"

            [interchange]
            max_input_bytes = 1024
            delimiter = ";"

            [services]
            youtube_api_key = "abc"
            "#,
        )
        .unwrap();

        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.interchange.max_input_bytes, 1024);
        assert_eq!(config.interchange.delimiter, ';');
        assert!(!config.interchange.trim_fields);
        assert_eq!(config.services.youtube_api_key.as_deref(), Some("abc"));
        assert_eq!(config.services.request_timeout_secs, 30);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let result = from_toml("[interchange]\nmax_input_bytes = 0\n");
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    fn test_explicit_missing_file() {
        let path = std::env::temp_dir().join(format!("missing-{}.toml", uuid::Uuid::new_v4()));
        assert!(matches!(
            ConfigService::load(Some(&path)),
            Err(AppError::ConfigError(_))
        ));
    }
}
