//! RMS / zero-crossing drum classification
//!
//! A cheap single-pass heuristic, fast enough to re-run while a slice
//! boundary is being dragged. Not a spectral classifier.

use crate::drum_type::DrumType;

/// Measurements taken over a classification window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowFeatures {
    /// Root-mean-square amplitude
    pub rms: f64,
    /// Sign changes per sample
    pub zcr: f64,
}

/// Measure RMS and zero-crossing rate between `start` and `end` seconds.
/// Returns `None` when the window covers no samples.
pub fn window_features(samples: &[f32], sample_rate: u32, start: f64, end: f64) -> Option<WindowFeatures> {
    let (from, to) = sample_range(samples.len(), sample_rate, start, end)?;
    let window = &samples[from..to];
    let length = window.len() as f64;

    let sum_sq: f64 = window.iter().map(|&s| (s as f64) * (s as f64)).sum();
    let rms = (sum_sq / length).sqrt();

    let crossings = window
        .windows(2)
        .filter(|pair| (pair[0] >= 0.0) != (pair[1] >= 0.0))
        .count();
    let zcr = crossings as f64 / length;

    Some(WindowFeatures { rms, zcr })
}

/// Label the window `[start, end)` seconds. Degenerate windows are `Perc`.
pub fn classify_window(samples: &[f32], sample_rate: u32, start: f64, end: f64) -> DrumType {
    let Some(features) = window_features(samples, sample_rate, start, end) else {
        return DrumType::Perc;
    };
    classify_features(features, end - start)
}

/// Decision order matters: the first matching rule wins.
pub fn classify_features(features: WindowFeatures, duration: f64) -> DrumType {
    let WindowFeatures { rms, zcr } = features;

    if zcr < 0.05 && rms > 0.1 {
        DrumType::Kick
    } else if zcr > 0.1 && zcr < 0.2 {
        DrumType::Snare
    } else if zcr > 0.2 {
        DrumType::Hat
    } else if zcr > 0.15 && duration > 0.15 {
        DrumType::Tom
    } else if zcr > 0.2 && duration > 0.2 {
        // Shadowed by the hat rule above; kept so the rule table stays as tuned.
        DrumType::Cymb
    } else {
        DrumType::Perc
    }
}

fn sample_range(len: usize, sample_rate: u32, start: f64, end: f64) -> Option<(usize, usize)> {
    if sample_rate == 0 || !(end > start) {
        return None;
    }
    let to_index = |secs: f64| ((secs * sample_rate as f64).floor().max(0.0) as usize).min(len);
    let from = to_index(start);
    let to = to_index(end);
    (to > from).then_some((from, to))
}
