mod reconnect;

pub use reconnect::Reconnect;

use crate::{
    config::StreamConfig,
    domain::{Episode, MediaInfo, Song},
    player::{NowPlaying, PlaybackController, PlayerError, PlayerEvent, SourceKind, Subscription},
};
use std::time::Instant;
use tracing::{info, warn};

const LIVE_TITLE: &str = "Live Radio";

/// Radio station front for a `PlaybackController`.
///
/// Knows the configured stream urls, turns catalog records into sources and
/// reconnects a failed live stream to the fallback url.
pub struct Station {
    player: PlaybackController,
    config: StreamConfig,
    events: Subscription,
    reconnect: Reconnect,
}

impl Station {
    pub fn new(mut player: PlaybackController, config: StreamConfig) -> Self {
        let events = player.subscribe();
        let reconnect = Reconnect::new(config.max_retry_attempts, config.retry_delay());

        Station {
            player,
            config,
            events,
            reconnect,
        }
    }

    pub fn player(&self) -> &PlaybackController {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlaybackController {
        &mut self.player
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn reconnect_due_at(&self) -> Option<Instant> {
        self.reconnect.due_at()
    }

    pub fn live_now_playing(&self) -> NowPlaying {
        NowPlaying::new(
            LIVE_TITLE,
            &self.config.station_name,
            &self.config.default_artwork,
        )
    }

    pub fn play_live(&mut self) -> Result<(), PlayerError> {
        self.reconnect.cancel();
        let url = self.config.station_stream_url.clone();
        let now_playing = self.live_now_playing();
        self.start(&url, SourceKind::Live, now_playing)
    }

    pub fn play_song(&mut self, song: &Song) -> Result<(), PlayerError> {
        self.play_media(song)
    }

    pub fn play_episode(&mut self, episode: &Episode) -> Result<(), PlayerError> {
        self.play_media(episode)
    }

    pub fn play_media(&mut self, media: &impl MediaInfo) -> Result<(), PlayerError> {
        self.reconnect.cancel();
        let now_playing = media.to_now_playing(&self.config.default_artwork);
        self.start(media.get_file_url(), SourceKind::OnDemand, now_playing)
    }

    pub fn stop(&mut self) {
        self.reconnect.cancel();
        self.player.stop();
    }

    /// Applies pending player signals, runs the reconnect schedule and hands
    /// back every event the player published since the last call.
    pub fn pump(&mut self, now: Instant) -> Vec<PlayerEvent> {
        self.player.pump();

        let mut events: Vec<PlayerEvent> = self.events.events.try_iter().collect();
        for event in &events {
            self.observe(event, now);
        }

        if self.reconnect.take_due(now) {
            self.reconnect_live();
            events.extend(self.events.events.try_iter());
        }

        events
    }

    fn start(
        &mut self,
        url: &str,
        kind: SourceKind,
        now_playing: NowPlaying,
    ) -> Result<(), PlayerError> {
        self.player.switch_source(url, kind, now_playing)?;
        self.player.play();
        Ok(())
    }

    fn observe(&mut self, event: &PlayerEvent, now: Instant) {
        match event {
            PlayerEvent::SourceFailed {
                kind: SourceKind::Live,
                error,
            } if self.config.auto_reconnect => match self.reconnect.schedule(now) {
                true => info!(
                    attempt = self.reconnect.attempts(),
                    delay_ms = self.config.retry_delay_ms,
                    %error,
                    "scheduling stream reconnect"
                ),
                false => warn!(
                    attempts = self.reconnect.attempts(),
                    %error,
                    "giving up on live stream"
                ),
            },
            PlayerEvent::SourceReady {
                kind: SourceKind::Live,
            } => self.reconnect.succeeded(),
            _ => (),
        }
    }

    fn reconnect_live(&mut self) {
        let url = self.config.reconnect_url().to_string();
        info!(url, attempt = self.reconnect.attempts(), "reconnecting live stream");

        let now_playing = self.live_now_playing();
        if let Err(e) = self.start(&url, SourceKind::Live, now_playing) {
            warn!(error = %e, "could not start reconnect");
        }
    }
}
