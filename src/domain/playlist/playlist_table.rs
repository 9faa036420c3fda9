// ============================================================
// PLAYLIST TABLE
// ============================================================
// Flat, ordered sequence of entries grouped by playlist key

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use super::PlaylistEntry;
use crate::domain::error::{AppError, Result};

/// All entries of one playlist, borrowed from a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistGroup<'a> {
    pub playlist: &'a str,
    pub spotify_link: &'a str,
    pub entries: Vec<&'a PlaylistEntry>,
}

/// Normalized playlist table.
///
/// Entries of one playlist are kept contiguous, playlists stay in the order
/// they were first seen, and every entry of a playlist carries the same
/// spotify link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistTable {
    entries: Vec<PlaylistEntry>,
}

impl PlaylistTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PlaylistEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<PlaylistEntry> {
        self.entries
    }

    pub fn contains_playlist(&self, playlist: &str) -> bool {
        self.entries.iter().any(|e| e.playlist == playlist)
    }

    /// Distinct playlist keys in first-seen order
    pub fn playlists(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for entry in &self.entries {
            if !seen.contains(&entry.playlist.as_str()) {
                seen.push(entry.playlist.as_str());
            }
        }
        seen
    }

    pub fn entries_for<'a>(
        &'a self,
        playlist: &'a str,
    ) -> impl Iterator<Item = &'a PlaylistEntry> + 'a {
        self.entries.iter().filter(move |e| e.playlist == playlist)
    }

    pub fn groups(&self) -> Vec<PlaylistGroup<'_>> {
        let mut groups: Vec<PlaylistGroup<'_>> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for entry in &self.entries {
            match index.get(entry.playlist.as_str()) {
                Some(&position) => groups[position].entries.push(entry),
                None => {
                    index.insert(entry.playlist.as_str(), groups.len());
                    groups.push(PlaylistGroup {
                        playlist: &entry.playlist,
                        spotify_link: &entry.spotify_link,
                        entries: vec![entry],
                    });
                }
            }
        }

        groups
    }

    /// Spotify link of a playlist, `None` when the playlist has no entries
    pub fn spotify_link(&self, playlist: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.playlist == playlist)
            .map(|e| e.spotify_link.as_str())
    }

    /// Add an entry after the last entry of its playlist, or at the end for
    /// a new playlist. An entry joining an existing playlist takes over that
    /// playlist's spotify link.
    pub fn push(&mut self, mut entry: PlaylistEntry) {
        let last_of_group = self
            .entries
            .iter()
            .rposition(|e| e.playlist == entry.playlist);

        match last_of_group {
            Some(position) => {
                entry.spotify_link = self.entries[position].spotify_link.clone();
                self.entries.insert(position + 1, entry);
            }
            None => self.entries.push(entry),
        }
    }

    pub fn set_youtube_link(&mut self, index: usize, link: impl Into<String>) -> Result<()> {
        let entry = self
            .entries
            .get_mut(index)
            .ok_or_else(|| AppError::NotFound(format!("No entry at row {}", index)))?;
        entry.youtube_link = link.into();
        Ok(())
    }

    /// Rewrite the spotify link of every entry of a playlist.
    /// Returns the number of entries touched.
    pub fn set_spotify_link(&mut self, playlist: &str, link: &str) -> usize {
        let mut updated = 0;
        for entry in self.entries.iter_mut().filter(|e| e.playlist == playlist) {
            entry.spotify_link = link.to_string();
            updated += 1;
        }
        updated
    }

    /// Indices of entries still waiting for a video link
    pub fn entries_missing_video(&self, playlist: Option<&str>) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| playlist.map_or(true, |p| e.playlist == p))
            .filter(|(_, e)| !e.has_video_link())
            .map(|(index, _)| index)
            .collect()
    }
}

impl FromIterator<PlaylistEntry> for PlaylistTable {
    fn from_iter<I: IntoIterator<Item = PlaylistEntry>>(iter: I) -> Self {
        let mut table = Self::new();
        for entry in iter {
            table.push(entry);
        }
        table
    }
}
