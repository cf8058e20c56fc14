use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PlayerError {
    #[error("could not play {url}: {reason}")]
    SourceLoad { url: String, reason: String },

    #[error("a source url is required")]
    EmptySource,
}
