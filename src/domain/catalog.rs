use super::{Episode, MediaInfo, Song};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

/// Browsable content loaded from a JSON fixture or an API dump
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub songs: Vec<Song>,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogItem<'a> {
    Song(&'a Song),
    Episode(&'a Episode),
}

impl Catalog {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file_str = std::fs::read_to_string(path)
            .with_context(|| format!("reading catalog {}", path.display()))?;

        Self::from_json(&file_str).with_context(|| format!("parsing catalog {}", path.display()))
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn len(&self) -> usize {
        self.songs.len() + self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Songs first, then episodes
    pub fn get(&self, idx: usize) -> Option<CatalogItem<'_>> {
        match idx.checked_sub(self.songs.len()) {
            None => self.songs.get(idx).map(CatalogItem::Song),
            Some(ep_idx) => self.episodes.get(ep_idx).map(CatalogItem::Episode),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = CatalogItem<'_>> {
        self.songs
            .iter()
            .map(CatalogItem::Song)
            .chain(self.episodes.iter().map(CatalogItem::Episode))
    }
}

impl MediaInfo for CatalogItem<'_> {
    fn get_title(&self) -> &str {
        match self {
            CatalogItem::Song(s) => s.get_title(),
            CatalogItem::Episode(e) => e.get_title(),
        }
    }

    fn get_credit(&self) -> &str {
        match self {
            CatalogItem::Song(s) => s.get_credit(),
            CatalogItem::Episode(e) => e.get_credit(),
        }
    }

    fn get_file_url(&self) -> &str {
        match self {
            CatalogItem::Song(s) => s.get_file_url(),
            CatalogItem::Episode(e) => e.get_file_url(),
        }
    }

    fn get_cover_art(&self) -> Option<&str> {
        match self {
            CatalogItem::Song(s) => s.get_cover_art(),
            CatalogItem::Episode(e) => e.get_cover_art(),
        }
    }

    fn get_duration(&self) -> Option<Duration> {
        match self {
            CatalogItem::Song(s) => s.get_duration(),
            CatalogItem::Episode(e) => e.get_duration(),
        }
    }
}
