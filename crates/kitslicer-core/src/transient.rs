//! Energy-derivative onset detection

use serde::{Deserialize, Serialize};

/// Analysis window length in samples
pub const WINDOW_SIZE: usize = 1024;
/// Hop between consecutive windows (50% overlap)
pub const HOP_SIZE: usize = 512;

const THRESHOLD_SCALE: f64 = 0.1;

/// Detection parameters supplied by the editing UI
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionSettings {
    /// Fraction of the strongest energy rise an onset must exceed (0.01-0.5)
    pub sensitivity: f64,
    /// Minimum spacing between onsets in seconds (0.01-0.5)
    pub min_distance: f64,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            sensitivity: 0.15,
            min_distance: 0.1,
        }
    }
}

impl DetectionSettings {
    pub const SENSITIVITY_RANGE: (f64, f64) = (0.01, 0.5);
    pub const MIN_DISTANCE_RANGE: (f64, f64) = (0.01, 0.5);

    pub fn new(sensitivity: f64, min_distance: f64) -> Self {
        Self { sensitivity, min_distance }
    }

    /// Clamp both parameters into the ranges the slider UI exposes
    pub fn clamped(self) -> Self {
        let (s_min, s_max) = Self::SENSITIVITY_RANGE;
        let (d_min, d_max) = Self::MIN_DISTANCE_RANGE;
        Self {
            sensitivity: self.sensitivity.clamp(s_min, s_max),
            min_distance: self.min_distance.clamp(d_min, d_max),
        }
    }
}

/// Onset position shown as a preview marker before slices are committed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PotentialSlice {
    /// Position in seconds
    pub position: f64,
}

/// Find percussive onsets in a mono signal.
///
/// Energy is measured over 1024-sample windows with a 512-sample hop. A window
/// is an onset when its energy rise is a strict local maximum above
/// `sensitivity * max_rise * 0.1` and lies at least `min_distance` seconds
/// after the previously accepted onset.
///
/// Returns ascending positions in seconds. Silent or too-short input yields an
/// empty list.
pub fn detect_transients(
    samples: &[f32],
    sample_rate: u32,
    sensitivity: f64,
    min_distance: f64,
) -> Vec<f64> {
    if sample_rate == 0 || samples.len() < WINDOW_SIZE {
        return Vec::new();
    }

    let energy: Vec<f64> = (0..=(samples.len() - WINDOW_SIZE) / HOP_SIZE)
        .map(|i| {
            let start = i * HOP_SIZE;
            let sum: f64 = samples[start..start + WINDOW_SIZE]
                .iter()
                .map(|&s| (s as f64) * (s as f64))
                .sum();
            sum / WINDOW_SIZE as f64
        })
        .collect();

    let mut derivative = vec![0.0; energy.len()];
    for i in 1..energy.len() {
        derivative[i] = energy[i] - energy[i - 1];
    }

    let max_derivative = derivative.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if derivative.len() < 3 || max_derivative <= 0.0 {
        return Vec::new();
    }

    let threshold = sensitivity * max_derivative * THRESHOLD_SCALE;
    let min_distance_samples = min_distance * sample_rate as f64;

    let mut onsets = Vec::new();
    let mut last_peak: Option<usize> = None;

    for i in 1..derivative.len() - 1 {
        let d = derivative[i];
        if d <= threshold || d <= derivative[i - 1] || d <= derivative[i + 1] {
            continue;
        }
        let far_enough = last_peak
            .map_or(true, |last| ((i - last) * HOP_SIZE) as f64 >= min_distance_samples);
        if !far_enough {
            continue;
        }
        last_peak = Some(i);
        onsets.push((i * HOP_SIZE) as f64 / sample_rate as f64);
    }

    tracing::debug!(onsets = onsets.len(), threshold, "Transient detection finished");
    onsets
}

/// Onset positions wrapped for preview rendering
pub fn potential_slices(samples: &[f32], sample_rate: u32, settings: DetectionSettings) -> Vec<PotentialSlice> {
    detect_transients(samples, sample_rate, settings.sensitivity, settings.min_distance)
        .into_iter()
        .map(|position| PotentialSlice { position })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::test_signals::{click_bursts, decaying_hits};
    use super::*;

    const SR: u32 = 44100;

    #[test]
    fn test_single_impulse() {
        let samples = click_bursts(1.0, SR, &[(0.3, 0.05)], 0.8);
        let onsets = detect_transients(&samples, SR, 0.15, 0.1);
        assert_eq!(onsets.len(), 1);
        let hop_secs = HOP_SIZE as f64 / SR as f64;
        assert!((onsets[0] - 0.3).abs() <= hop_secs, "onset at {}", onsets[0]);
    }

    #[test]
    fn test_min_distance_suppresses_second_hit() {
        let samples = click_bursts(1.0, SR, &[(0.1, 0.02), (0.15, 0.02)], 0.8);
        let onsets = detect_transients(&samples, SR, 0.15, 0.1);
        assert_eq!(onsets.len(), 1);
        assert!(onsets[0] < 0.12);
    }

    #[test]
    fn test_spacing_and_determinism() {
        let times: Vec<f64> = (0..8).map(|i| 0.05 + i as f64 * 0.25).collect();
        let samples = decaying_hits(2.2, SR, &times);
        let min_distance = 0.3;

        let first = detect_transients(&samples, SR, 0.15, min_distance);
        let second = detect_transients(&samples, SR, 0.15, min_distance);
        assert_eq!(first, second);
        assert!(!first.is_empty());

        for pair in first.windows(2) {
            assert!(pair[1] > pair[0]);
            assert!(pair[1] - pair[0] >= min_distance - 1e-9);
        }
    }

    #[test]
    fn test_silence_and_short_input() {
        assert!(detect_transients(&[], SR, 0.15, 0.1).is_empty());
        assert!(detect_transients(&[0.0; 500], SR, 0.15, 0.1).is_empty());
        assert!(detect_transients(&vec![0.0; SR as usize], SR, 0.15, 0.1).is_empty());
    }

    #[test]
    fn test_potential_slices_match_detector() {
        let samples = click_bursts(1.0, SR, &[(0.3, 0.05)], 0.8);
        let preview = potential_slices(&samples, SR, DetectionSettings::default());
        let onsets = detect_transients(&samples, SR, 0.15, 0.1);
        assert_eq!(preview.iter().map(|p| p.position).collect::<Vec<_>>(), onsets);
    }

    #[test]
    fn test_settings_clamped() {
        let s = DetectionSettings::new(2.0, 0.0).clamped();
        assert_eq!(s, DetectionSettings::new(0.5, 0.01));
    }
}
