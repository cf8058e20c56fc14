use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackStatus {
    #[default]
    Idle,
    Loading,
    Playing,
    Paused,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Live,
    #[default]
    OnDemand,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MediaDuration {
    /// Not reported by the output yet
    #[default]
    Unknown,
    Finite(Duration),
    Unbounded,
}

impl MediaDuration {
    pub fn finite(&self) -> Option<Duration> {
        match self {
            MediaDuration::Finite(d) => Some(*d),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NowPlaying {
    pub title: String,
    pub subtitle: String,
    pub artwork_url: String,
}

impl NowPlaying {
    pub fn new(
        title: impl Into<String>,
        subtitle: impl Into<String>,
        artwork_url: impl Into<String>,
    ) -> Self {
        NowPlaying {
            title: title.into(),
            subtitle: subtitle.into(),
            artwork_url: artwork_url.into(),
        }
    }
}

/// Snapshot of everything the controller knows about playback.
///
/// Only `PlaybackController` mutates the live instance; everyone else
/// receives clones through `state()` or a subscription.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackState {
    pub status: PlaybackStatus,
    pub source_url: Option<String>,
    pub source_kind: SourceKind,
    pub is_playing: bool,
    pub is_buffering: bool,
    pub volume: f32,
    pub position: Duration,
    pub duration: MediaDuration,
    pub now_playing: NowPlaying,
}

impl PlaybackState {
    pub(crate) fn idle(volume: f32) -> Self {
        PlaybackState {
            status: PlaybackStatus::Idle,
            source_url: None,
            source_kind: SourceKind::default(),
            is_playing: false,
            is_buffering: false,
            volume: clamp_volume(volume),
            position: Duration::ZERO,
            duration: MediaDuration::Unknown,
            now_playing: NowPlaying::default(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.status == PlaybackStatus::Idle
    }

    pub fn is_live(&self) -> bool {
        self.source_kind == SourceKind::Live
    }

    /// Seek control is only offered for loaded on-demand sources
    pub fn can_seek(&self) -> bool {
        !self.is_idle() && !self.is_live()
    }

    /// Fraction of the source already played, when the duration is known
    pub fn progress_ratio(&self) -> Option<f64> {
        let duration = self.duration.finite()?.as_secs_f64();
        match duration > 0.0 {
            true => Some((self.position.as_secs_f64() / duration).clamp(0.0, 1.0)),
            false => None,
        }
    }
}

pub(crate) fn clamp_volume(volume: f32) -> f32 {
    match volume.is_nan() {
        true => 0.0,
        false => volume.clamp(0.0, 1.0),
    }
}
