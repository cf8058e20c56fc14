use super::{PlaybackState, PlayerError, SourceKind};

#[derive(Clone, Debug)]
pub enum PlayerEvent {
    StateChanged(PlaybackState),
    /// The output has buffered enough of the current source to play it
    SourceReady { kind: SourceKind },
    SourceFailed { kind: SourceKind, error: PlayerError },
}
