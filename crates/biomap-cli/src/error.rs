//! Errors surfaced by the `biomap` commands.

use std::path::PathBuf;

use biomap_config::ConfigError;
use biomap_preview::{ExportError, PreviewError, ProfileError};
use biomap_world::WorldTypeParseError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Preview(#[from] PreviewError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    WorldType(#[from] WorldTypeParseError),

    #[error("failed to save preview image: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to start preview thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("preview thread stopped before accepting the request")]
    WorkerStopped,

    /// The preview did not finish in time.
    #[error("preview did not finish within {0} seconds")]
    PreviewTimeout(u64),

    /// The destination exists and overwriting was not requested.
    #[error("{} already exists (pass --force to replace it)", .0.display())]
    DestinationExists(PathBuf),
}
