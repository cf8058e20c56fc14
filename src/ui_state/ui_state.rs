use super::Mode;
use crate::{
    DurationStyle,
    config::StreamConfig,
    domain::{Catalog, CatalogItem},
    get_readable_duration,
    key_handler::Director,
    player::{MediaDuration, PlaybackState, PlaybackStatus, PlayerError, PlayerEvent, SourceKind},
};
use ratatui::widgets::ListState;
use std::{
    fmt::Display,
    time::{Duration, Instant},
};

/// A failure shown until the listener dismisses it
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorNotice {
    pub reason: String,
    pub source_url: Option<String>,
    pub live: bool,
}

impl ErrorNotice {
    fn from_failure(kind: SourceKind, error: PlayerError) -> Self {
        let live = kind == SourceKind::Live;
        match error {
            PlayerError::SourceLoad { url, reason } => ErrorNotice {
                reason,
                source_url: Some(url),
                live,
            },
            other => ErrorNotice {
                reason: other.to_string(),
                source_url: None,
                live,
            },
        }
    }
}

pub struct UiState {
    pub(crate) station_name: String,
    pub(crate) station_slogan: String,

    pub(crate) catalog: Catalog,
    pub(crate) catalog_pos: ListState,

    playback: PlaybackState,
    error: Option<ErrorNotice>,
    reconnect_due: Option<Instant>,
    mode: Mode,
}

impl UiState {
    pub fn new(config: &StreamConfig, catalog: Catalog, playback: PlaybackState) -> Self {
        let selected = (!catalog.is_empty()).then_some(0);

        UiState {
            station_name: config.station_name.clone(),
            station_slogan: config.station_slogan.clone(),

            catalog,
            catalog_pos: ListState::default().with_selected(selected),

            playback,
            error: None,
            reconnect_due: None,
            mode: Mode::default(),
        }
    }

    /// Folds player events into the view. A source that becomes ready
    /// dismisses the notice of an earlier playback failure.
    pub fn apply_events(&mut self, events: impl IntoIterator<Item = PlayerEvent>) {
        for event in events {
            match event {
                PlayerEvent::StateChanged(state) => self.playback = state,
                PlayerEvent::SourceReady { .. } => {
                    if self.error.as_ref().is_some_and(|e| e.source_url.is_some()) {
                        self.error = None;
                    }
                }
                PlayerEvent::SourceFailed { kind, error } => {
                    self.error = Some(ErrorNotice::from_failure(kind, error))
                }
            }
        }
    }

    pub fn set_reconnect_due(&mut self, due: Option<Instant>) {
        self.reconnect_due = due;
    }

    /// Time left until the next reconnect attempt, if one is scheduled
    pub fn reconnect_in(&self, now: Instant) -> Option<Duration> {
        self.reconnect_due
            .map(|at| at.saturating_duration_since(now))
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    pub fn set_error(&mut self, e: impl Display) {
        self.error = Some(ErrorNotice {
            reason: e.to_string(),
            source_url: None,
            live: false,
        });
    }

    pub fn get_error(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.reason.as_str())
    }

    pub fn get_notice(&self) -> Option<&ErrorNotice> {
        self.error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn get_mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn toggle_fullscreen(&mut self) {
        self.mode = match self.mode {
            Mode::Fullscreen => Mode::Browse,
            _ => Mode::Fullscreen,
        }
    }
}

// ==============
//    PLAYBACK
// ==============
impl UiState {
    pub fn is_idle(&self) -> bool {
        self.playback.is_idle()
    }

    pub fn is_paused(&self) -> bool {
        self.playback.status == PlaybackStatus::Paused
    }

    pub fn is_live(&self) -> bool {
        self.playback.is_live()
    }

    pub fn status_label(&self) -> &'static str {
        match (self.playback.status, self.playback.is_buffering) {
            (PlaybackStatus::Idle, _) => "Stopped",
            (PlaybackStatus::Loading, _) | (PlaybackStatus::Playing, true) => "Buffering",
            (PlaybackStatus::Playing, false) => "Playing",
            (PlaybackStatus::Paused, _) => "Paused",
        }
    }

    pub fn elapsed_display(&self) -> String {
        get_readable_duration(self.playback.position, DurationStyle::Compact)
    }

    pub fn duration_display(&self) -> String {
        match self.playback.duration {
            MediaDuration::Finite(d) => get_readable_duration(d, DurationStyle::Compact),
            MediaDuration::Unbounded => "LIVE".to_string(),
            MediaDuration::Unknown => "--:--".to_string(),
        }
    }

    pub fn volume_percent(&self) -> u16 {
        (self.playback.volume * 100.0).round() as u16
    }
}

// =============
//    CATALOG
// =============
impl UiState {
    pub fn get_selected_item(&self) -> Option<CatalogItem<'_>> {
        self.catalog_pos
            .selected()
            .and_then(|idx| self.catalog.get(idx))
    }

    pub fn scroll(&mut self, director: Director) {
        let len = self.catalog.len();
        if len == 0 {
            return;
        }

        let current = self.catalog_pos.selected().unwrap_or(0);
        let new_pos = match director {
            Director::Up(x) => (current + len - (x % len)) % len,
            Director::Down(x) => (current + x) % len,
            Director::Top => 0,
            Director::Bottom => len - 1,
        };

        self.catalog_pos.select(Some(new_pos));
    }
}
