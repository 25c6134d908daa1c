//! kitslicer-services: Audio decoding, configuration, rendering and editing session

pub mod config;
pub mod detection_worker;
mod error;
pub mod render;
pub mod session;
pub mod wav_reader;

pub use config::{AppConfig, KitConfig, SessionConfig};
pub use detection_worker::{DetectionJob, DetectionResult, DetectionWorker};
pub use error::ServiceError;
pub use render::{render_selected, render_slice, RenderedSlice};
pub use session::SlicingSession;
pub use wav_reader::{read_wav, read_wav_from};
