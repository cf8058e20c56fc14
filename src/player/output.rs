use super::NowPlaying;
use anyhow::Result;
use crossbeam_channel::Sender;
use std::{fmt, time::Duration};

/// Identifies one `switch_source` call.
///
/// Every signal an output emits is tagged with the token of the load it
/// belongs to, so completions from a superseded load can be told apart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceToken(u64);

impl SourceToken {
    pub(crate) fn next(self) -> Self {
        SourceToken(self.0 + 1)
    }
}

impl fmt::Display for SourceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle signals reported by an output primitive
#[derive(Clone, Debug, PartialEq)]
pub enum OutputSignal {
    MetadataLoaded { duration: Option<Duration> },
    CanPlay,
    Waiting,
    TimeUpdate(Duration),
    Ended,
    Error(String),
}

pub(crate) enum Inbound {
    Output(SourceToken, OutputSignal),
    NowPlaying(SourceToken, NowPlaying),
}

/// Handle given to an output (and to background tasks) for reporting back
/// to the controller. Messages are applied on the next `pump`.
#[derive(Clone)]
pub struct SignalSender {
    tx: Sender<Inbound>,
}

impl SignalSender {
    pub(crate) fn new(tx: Sender<Inbound>) -> Self {
        SignalSender { tx }
    }

    pub fn send(&self, token: SourceToken, signal: OutputSignal) {
        let _ = self.tx.send(Inbound::Output(token, signal));
    }

    pub(crate) fn now_playing(&self, token: SourceToken, now_playing: NowPlaying) {
        let _ = self.tx.send(Inbound::NowPlaying(token, now_playing));
    }
}

/// The platform audio facility driven by `PlaybackController`.
///
/// `load` returns immediately; whether the source opened is reported later
/// through `OutputSignal`s carrying the same token. `play` issued before the
/// load completes must take effect once it does.
pub trait AudioOutput {
    fn load(&mut self, token: SourceToken, url: &str);
    fn play(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    fn seek(&mut self, position: Duration) -> Result<()>;
    fn set_volume(&mut self, volume: f32);

    /// Called at the start of every `pump`. Outputs without native callbacks
    /// use it to emit progress and end-of-stream signals.
    fn poll(&mut self) {}
}
