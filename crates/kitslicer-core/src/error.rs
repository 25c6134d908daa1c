//! Error types for kitslicer

use thiserror::Error;

use crate::slice::SliceId;

#[derive(Debug, Error)]
pub enum SlicerError {
    #[error("Slice {start:.3}s-{end:.3}s overlaps existing slice {existing}")]
    SliceOverlap {
        start: f64,
        end: f64,
        existing: SliceId,
    },
    #[error("Position {position:.3}s is outside the audio (0-{duration:.3}s)")]
    OutOfBounds { position: f64, duration: f64 },
    #[error("Invalid audio: {0}")]
    InvalidAudio(String),
}

pub type Result<T> = std::result::Result<T, SlicerError>;
