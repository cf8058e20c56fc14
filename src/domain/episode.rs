use super::MediaInfo;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single podcast episode as served by the content API
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: String,
    pub title: String,
    pub host: String,
    pub file_url: String,
    #[serde(default, alias = "coverImage")]
    pub cover_art: Option<String>,
}

impl MediaInfo for Episode {
    fn get_title(&self) -> &str {
        &self.title
    }

    fn get_credit(&self) -> &str {
        &self.host
    }

    fn get_file_url(&self) -> &str {
        &self.file_url
    }

    fn get_cover_art(&self) -> Option<&str> {
        self.cover_art.as_deref()
    }

    fn get_duration(&self) -> Option<Duration> {
        None
    }
}
