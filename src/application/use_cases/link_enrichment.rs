use crate::domain::error::{AppError, Result};
use crate::domain::playlist::{strip_ordinal, PlaylistTable};
use crate::infrastructure::service_clients::{PlaylistLinkLookup, VideoLinkLookup};
use serde::Serialize;
use std::sync::Arc;

/// What a video link pass did to the table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentReport {
    /// Entries that had no video link when the pass started
    pub pending: usize,
    /// Lookups sent, including one that hit the quota
    pub looked_up: usize,
    pub found: usize,
    pub not_found: usize,
    pub failed: usize,
    /// The lookup service reported its quota as spent; remaining entries were left alone
    pub quota_exhausted: bool,
}

pub struct LinkEnrichmentUseCase {
    video_lookup: Arc<dyn VideoLinkLookup + Send + Sync>,
    playlist_lookup: Option<Arc<dyn PlaylistLinkLookup + Send + Sync>>,
}

impl LinkEnrichmentUseCase {
    pub fn new(video_lookup: Arc<dyn VideoLinkLookup + Send + Sync>) -> Self {
        Self {
            video_lookup,
            playlist_lookup: None,
        }
    }

    pub fn with_playlist_lookup(
        mut self,
        playlist_lookup: Arc<dyn PlaylistLinkLookup + Send + Sync>,
    ) -> Self {
        self.playlist_lookup = Some(playlist_lookup);
        self
    }

    /// Look up a video for every entry that has none, optionally limited to
    /// one playlist. Misses keep the empty sentinel; a quota signal ends the
    /// pass without failing it.
    pub async fn fill_video_links(
        &self,
        table: &mut PlaylistTable,
        playlist: Option<&str>,
    ) -> Result<EnrichmentReport> {
        if let Some(playlist) = playlist {
            if !table.contains_playlist(playlist) {
                return Err(AppError::NotFound(format!("Playlist '{}'", playlist)));
            }
        }

        let pending = table.entries_missing_video(playlist);
        let mut report = EnrichmentReport {
            pending: pending.len(),
            ..Default::default()
        };

        for index in pending {
            let query = table.entries()[index].search_query();
            report.looked_up += 1;

            match self.video_lookup.find_video_link(&query).await {
                Ok(Some(link)) => {
                    table.set_youtube_link(index, link)?;
                    report.found += 1;
                }
                Ok(None) => {
                    tracing::debug!(query = %query, "No video found");
                    report.not_found += 1;
                }
                Err(AppError::QuotaExceeded(msg)) => {
                    tracing::warn!(reason = %msg, "Stopping video lookups");
                    report.quota_exhausted = true;
                    break;
                }
                Err(err) => {
                    tracing::warn!(query = %query, error = %err, "Video lookup failed");
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            pending = report.pending,
            looked_up = report.looked_up,
            found = report.found,
            not_found = report.not_found,
            failed = report.failed,
            quota_exhausted = report.quota_exhausted,
            "Video link pass finished"
        );
        Ok(report)
    }

    /// Find the streaming playlist for a table playlist, first by its full
    /// key and then by its title without the ordinal. A hit is written to
    /// every entry of the playlist.
    pub async fn resolve_playlist_link(
        &self,
        table: &mut PlaylistTable,
        account_id: &str,
        playlist: &str,
    ) -> Result<Option<String>> {
        let lookup = self.playlist_lookup.as_ref().ok_or_else(|| {
            AppError::ConfigError("No playlist link lookup configured".to_string())
        })?;

        if !table.contains_playlist(playlist) {
            return Err(AppError::NotFound(format!("Playlist '{}'", playlist)));
        }

        let mut candidates = vec![playlist];
        let title = strip_ordinal(playlist);
        if title != playlist {
            candidates.push(title);
        }

        for name in candidates {
            if let Some(link) = lookup.find_playlist_link(account_id, name).await? {
                table.set_spotify_link(playlist, &link);
                return Ok(Some(link));
            }
        }

        Ok(None)
    }
}
