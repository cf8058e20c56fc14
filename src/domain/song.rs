use super::MediaInfo;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: String,
    pub title: String,
    pub artist: String,
    #[serde(alias = "audioUrl")]
    pub file_url: String,
    #[serde(default, alias = "coverImage")]
    pub cover_art: Option<String>,
    /// Seconds
    #[serde(default)]
    pub duration: Option<u64>,
}

impl MediaInfo for Song {
    fn get_title(&self) -> &str {
        &self.title
    }

    fn get_credit(&self) -> &str {
        &self.artist
    }

    fn get_file_url(&self) -> &str {
        &self.file_url
    }

    fn get_cover_art(&self) -> Option<&str> {
        self.cover_art.as_deref()
    }

    fn get_duration(&self) -> Option<Duration> {
        self.duration.map(Duration::from_secs)
    }
}
