mod catalog;
mod episode;
mod song;

pub use catalog::{Catalog, CatalogItem};
pub use episode::Episode;
pub use song::Song;

use crate::player::NowPlaying;
use std::time::Duration;

/// Common view over anything the player can load on demand
pub trait MediaInfo {
    fn get_title(&self) -> &str;
    fn get_credit(&self) -> &str;
    fn get_file_url(&self) -> &str;
    fn get_cover_art(&self) -> Option<&str>;
    fn get_duration(&self) -> Option<Duration>;

    fn to_now_playing(&self, default_artwork: &str) -> NowPlaying {
        let artwork = self
            .get_cover_art()
            .filter(|art| !art.trim().is_empty())
            .unwrap_or(default_artwork);

        NowPlaying::new(self.get_title(), self.get_credit(), artwork)
    }
}
