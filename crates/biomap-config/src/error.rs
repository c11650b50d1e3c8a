//! Failures around `config.ron`.

/// A problem reading, writing, or decoding the biomap settings file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `config.ron` exists but could not be read.
    #[error("cannot read biomap settings: {0}")]
    ReadError(#[source] std::io::Error),

    /// The config directory or `config.ron` could not be written.
    #[error("cannot write biomap settings: {0}")]
    WriteError(#[source] std::io::Error),

    /// `config.ron` is not valid RON for [`Config`](crate::Config).
    #[error("biomap settings are malformed: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    #[error("cannot encode biomap settings: {0}")]
    SerializeError(#[source] ron::Error),
}
