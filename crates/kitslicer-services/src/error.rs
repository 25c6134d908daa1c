//! Error types for the service layer

use kitslicer_core::SlicerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Config write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),
    #[error(transparent)]
    Audio(#[from] SlicerError),
    #[error("Detection worker has shut down")]
    WorkerClosed,
}
