use std::path::PathBuf;

use thiserror::Error;

/// Library error type for slideshow operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested image directory is missing or not a directory.
    #[error("invalid image directory: {0}")]
    BadDir(String),

    /// Underlying IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The image file could not be decoded.
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
