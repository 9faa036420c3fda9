use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WritingStyle {
    pub tone: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl Default for WritingStyle {
    fn default() -> Self {
        Self {
            tone: "warm, elegant and upbeat".to_string(),
            max_tokens: Some(2000),
            temperature: Some(0.7),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PromptSong {
    pub song: String,
    pub artist: String,
    pub youtube_link: String,
}

/// Everything a text generator needs to write one playlist post
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BlogPrompt {
    pub playlist_title: String,
    pub songs: Vec<PromptSong>,
    pub spotify_link: String,
    pub style: WritingStyle,
}

impl BlogPrompt {
    pub fn system_prompt(&self) -> String {
        format!(
            "You are a professional wedding DJ blog writer. Write in a {} tone.",
            self.style.tone
        )
    }

    pub fn user_prompt(&self) -> String {
        let songs_text = self
            .songs
            .iter()
            .map(|s| {
                if s.youtube_link.is_empty() {
                    format!("- {} by {}", s.song, s.artist)
                } else {
                    format!("- {} by {} (YouTube: {})", s.song, s.artist, s.youtube_link)
                }
            })
            .collect::<Vec<_>>()
            .join("\n");

        let spotify_line = if self.spotify_link.is_empty() {
            "- No Spotify playlist link is available, do not invent one".to_string()
        } else {
            format!("- The Spotify playlist link: {}", self.spotify_link)
        };

        format!(
            "Create a blog post for a wedding DJ website about the playlist '{}'.\n\
             Include the following elements:\n\
             - An engaging introduction about the playlist and its mood\n\
             - The complete song list with YouTube links\n\
             {}\n\
             - A conclusion about why this playlist works well for weddings\n\n\
             Song List:\n{}\n\n\
             Format the post in HTML with appropriate structure.",
            self.playlist_title, spotify_line, songs_text
        )
    }
}
