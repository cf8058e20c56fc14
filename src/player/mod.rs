mod backend_rodio;
mod controller;
mod error;
mod metadata;
mod output;
mod player_event;
mod state;
mod subscribers;
mod tapped_source;

#[cfg(test)]
pub(crate) mod fake_output;

pub use backend_rodio::RodioOutput;
pub use controller::PlaybackController;
pub use error::PlayerError;
pub use metadata::{HttpMetadata, MetadataSource, RotatingMetadata};
pub use output::{AudioOutput, OutputSignal, SignalSender, SourceToken};
pub use player_event::PlayerEvent;
pub use state::{MediaDuration, NowPlaying, PlaybackState, PlaybackStatus, SourceKind};
pub use subscribers::{Subscription, SubscriptionId};
