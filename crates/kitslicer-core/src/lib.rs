//! kitslicer-core: Transient detection, drum classification and slice management

mod audio;
pub mod classifier;
mod drum_type;
pub mod envelope;
mod error;
mod kit;
mod slice;
pub mod slice_set;
pub mod transient;

pub use audio::AudioSamples;
pub use classifier::{classify_window, window_features, WindowFeatures};
pub use drum_type::DrumType;
pub use envelope::fade_gain;
pub use error::{SlicerError, Result};
pub use kit::{kit_prefix_from_name, DEFAULT_KIT_PREFIX};
pub use slice::{Slice, SliceId, SliceUpdate, FADE_IN_RANGE_MS, FADE_OUT_RANGE_MS};
pub use slice_set::{generate_slice_name, SliceSet};
pub use transient::{detect_transients, potential_slices, DetectionSettings, PotentialSlice};
