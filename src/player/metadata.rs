use super::{NowPlaying, SignalSender, SourceToken};
use anyhow::{Context, Result};
use crossbeam_channel::{Sender, select};
use rand::Rng;
use serde::Deserialize;
use std::{
    sync::Arc,
    thread::{self, JoinHandle},
    time::Duration,
};
use tracing::{debug, warn};

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Where live "now playing" information comes from
pub trait MetadataSource: Send + Sync {
    fn fetch(&self) -> Result<NowPlaying>;
}

/// Polls an Icecast/Shoutcast style JSON endpoint
pub struct HttpMetadata {
    client: reqwest::blocking::Client,
    url: String,
    default_artwork: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StreamMetadata {
    title: String,
    #[serde(default)]
    artist: String,
    #[serde(default)]
    cover_art: Option<String>,
}

impl HttpMetadata {
    pub fn new(url: impl Into<String>, default_artwork: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()?;

        Ok(HttpMetadata {
            client,
            url: url.into(),
            default_artwork: default_artwork.into(),
        })
    }
}

impl MetadataSource for HttpMetadata {
    fn fetch(&self) -> Result<NowPlaying> {
        let meta = self
            .client
            .get(&self.url)
            .send()
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("requesting {}", self.url))?
            .json::<StreamMetadata>()
            .context("decoding stream metadata")?;

        Ok(with_artwork_fallback(
            NowPlaying::new(meta.title, meta.artist, meta.cover_art.unwrap_or_default()),
            &self.default_artwork,
        ))
    }
}

/// Stand-in for stations without a metadata endpoint: picks one of a fixed
/// set of entries at random on every fetch.
pub struct RotatingMetadata {
    entries: Vec<NowPlaying>,
    default_artwork: String,
}

impl RotatingMetadata {
    pub fn new(entries: Vec<NowPlaying>, default_artwork: impl Into<String>) -> Self {
        RotatingMetadata {
            entries,
            default_artwork: default_artwork.into(),
        }
    }

    pub fn with_default_rotation(default_artwork: impl Into<String>) -> Self {
        let entries = vec![
            NowPlaying::new(
                "Midnight Drive",
                "SynthWave Collective",
                "https://example.com/cover1.jpg",
            ),
            NowPlaying::new(
                "Summer Dreams",
                "Coastal Vibes",
                "https://example.com/cover2.jpg",
            ),
            NowPlaying::new("Urban Rhythm", "City Sounds", "https://example.com/cover3.jpg"),
        ];
        Self::new(entries, default_artwork)
    }
}

impl MetadataSource for RotatingMetadata {
    fn fetch(&self) -> Result<NowPlaying> {
        anyhow::ensure!(!self.entries.is_empty(), "no metadata entries to rotate");

        let idx = rand::rng().random_range(0..self.entries.len());
        Ok(with_artwork_fallback(
            self.entries[idx].clone(),
            &self.default_artwork,
        ))
    }
}

fn with_artwork_fallback(mut now_playing: NowPlaying, default_artwork: &str) -> NowPlaying {
    if now_playing.artwork_url.trim().is_empty() {
        now_playing.artwork_url = default_artwork.to_string();
    }
    now_playing
}

/// Periodic metadata fetch for one live source.
///
/// Fetches once immediately, then every `interval`. Dropping the poller
/// disconnects the cancel channel, which wakes the thread and ends it.
pub(crate) struct MetadataPoller {
    token: SourceToken,
    _cancel: Sender<()>,
    _handle: JoinHandle<()>,
}

impl MetadataPoller {
    pub(crate) fn spawn(
        source: Arc<dyn MetadataSource>,
        token: SourceToken,
        signals: SignalSender,
        interval: Duration,
    ) -> Self {
        let (cancel_tx, cancel_rx) = crossbeam_channel::bounded::<()>(0);

        let handle = thread::spawn(move || {
            let ticker = crossbeam_channel::tick(interval);
            debug!(%token, "metadata polling started");

            loop {
                match source.fetch() {
                    Ok(now_playing) => signals.now_playing(token, now_playing),
                    Err(e) => warn!(%token, error = %e, "failed to fetch stream metadata"),
                }

                select! {
                    recv(cancel_rx) -> _ => break,
                    recv(ticker) -> _ => {}
                }
            }
            debug!(%token, "metadata polling stopped");
        });

        MetadataPoller {
            token,
            _cancel: cancel_tx,
            _handle: handle,
        }
    }

    pub(crate) fn token(&self) -> SourceToken {
        self.token
    }
}
