//! Slice collection with per-type naming
//!
//! Slice names follow `{prefix}_{Type}_{n}`. Bulk detection and type changes
//! compact the numbering of the affected types (ordered by start time);
//! single creations take the smallest free number; removals leave gaps.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::audio::AudioSamples;
use crate::classifier::classify_window;
use crate::drum_type::DrumType;
use crate::error::{Result, SlicerError};
use crate::kit::DEFAULT_KIT_PREFIX;
use crate::slice::{Slice, SliceId, SliceUpdate};
use crate::transient::{detect_transients, DetectionSettings};

/// Longest slice produced by detection or click-creation, in seconds
pub const MAX_AUTO_SLICE_SECS: f64 = 0.2;
/// Gap left before the next slice when click-creating
const CLICK_GAP_SECS: f64 = 0.001;
/// Shortest slice click-creation will produce
pub const MIN_SLICE_SECS: f64 = 0.01;

/// Ordered set of slices for one editing session
#[derive(Debug, Clone)]
pub struct SliceSet {
    kit_prefix: String,
    slices: Vec<Slice>,
}

impl Default for SliceSet {
    fn default() -> Self {
        Self::new(DEFAULT_KIT_PREFIX)
    }
}

impl SliceSet {
    pub fn new(kit_prefix: impl Into<String>) -> Self {
        Self {
            kit_prefix: kit_prefix.into(),
            slices: Vec::new(),
        }
    }

    /// Restore a previously saved set as-is (names are not touched)
    pub fn from_slices(kit_prefix: impl Into<String>, slices: Vec<Slice>) -> Self {
        Self {
            kit_prefix: kit_prefix.into(),
            slices,
        }
    }

    pub fn kit_prefix(&self) -> &str {
        &self.kit_prefix
    }

    /// Change the prefix and rewrite it in every name that carries the old one.
    pub fn set_kit_prefix(&mut self, prefix: impl Into<String>) {
        let prefix = prefix.into();
        let old = format!("{}_", self.kit_prefix);
        for slice in &mut self.slices {
            if let Some(rest) = slice.name.strip_prefix(&old) {
                slice.name = format!("{prefix}_{rest}");
            }
        }
        self.kit_prefix = prefix;
    }

    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn get(&self, id: &SliceId) -> Option<&Slice> {
        self.slices.iter().find(|s| &s.id == id)
    }

    /// Slices flagged for export
    pub fn selected(&self) -> impl Iterator<Item = &Slice> {
        self.slices.iter().filter(|s| s.selected)
    }

    pub fn select_all(&mut self, selected: bool) {
        for slice in &mut self.slices {
            slice.selected = selected;
        }
    }

    /// Slices ordered by start time
    pub fn sorted_by_start(&self) -> Vec<&Slice> {
        let mut sorted: Vec<&Slice> = self.slices.iter().collect();
        sorted.sort_by(|a, b| compare_start(a, b));
        sorted
    }

    /// Replace the whole set with one slice per detected onset.
    ///
    /// Each slice runs until the next onset, at most 200ms, and never past the
    /// end of the audio.
    pub fn detect_all(&mut self, audio: &AudioSamples, settings: DetectionSettings) -> &[Slice] {
        let mono = audio.mono();
        let sample_rate = audio.sample_rate();
        let duration = audio.duration();
        let onsets = detect_transients(mono, sample_rate, settings.sensitivity, settings.min_distance);

        let mut counters: HashMap<DrumType, u32> = HashMap::new();
        let slices = onsets
            .iter()
            .enumerate()
            .map(|(i, &start)| {
                let capped = start + MAX_AUTO_SLICE_SECS;
                let end = onsets
                    .get(i + 1)
                    .map_or(capped, |&next| next.min(capped))
                    .min(duration);
                let drum_type = classify_window(mono, sample_rate, start, end);
                let n = counters.entry(drum_type).or_insert(0);
                *n += 1;
                let name = format_name(&self.kit_prefix, drum_type, *n);
                Slice::new(SliceId(format!("slice-{i}")), start, end, drum_type, name)
            })
            .collect();

        self.slices = slices;
        tracing::info!(
            slices = self.slices.len(),
            sensitivity = settings.sensitivity,
            min_distance = settings.min_distance,
            "Detected slices"
        );
        &self.slices
    }

    /// Add a slice covering `[start, end]` seconds.
    ///
    /// Fails with [`SlicerError::SliceOverlap`] if the range touches an
    /// existing slice; the set is left unchanged in that case. Bounds are
    /// otherwise taken as given.
    pub fn create_at(&mut self, audio: &AudioSamples, start: f64, end: f64) -> Result<&Slice> {
        if let Some(existing) = self.slices.iter().find(|s| s.overlaps(start, end)) {
            tracing::warn!(start, end, existing = %existing.id, "Rejected overlapping slice");
            return Err(SlicerError::SliceOverlap {
                start,
                end,
                existing: existing.id.clone(),
            });
        }

        let drum_type = classify_window(audio.mono(), audio.sample_rate(), start, end);
        let name = generate_slice_name(&self.kit_prefix, drum_type, &self.slices, None);
        let id = self.next_interactive_id();
        tracing::debug!(%id, %name, start, end, "Created slice");

        self.slices.push(Slice::new(id, start, end, drum_type, name));
        let idx = self.slices.len() - 1;
        Ok(&self.slices[idx])
    }

    /// Create a slice at a single clicked position, running up to 200ms or
    /// until just before the next slice.
    pub fn create_at_position(&mut self, audio: &AudioSamples, position: f64) -> Result<&Slice> {
        let duration = audio.duration();
        if !(0.0..duration).contains(&position) {
            return Err(SlicerError::OutOfBounds { position, duration });
        }

        let next = self
            .slices
            .iter()
            .filter(|s| s.start > position)
            .min_by(|a, b| compare_start(a, b));

        let mut end = (position + MAX_AUTO_SLICE_SECS).min(duration);
        if let Some(next) = next {
            end = end.min(next.start - CLICK_GAP_SECS);
        }
        if end - position < MIN_SLICE_SECS {
            return Err(match next {
                Some(next) => SlicerError::SliceOverlap {
                    start: position,
                    end,
                    existing: next.id.clone(),
                },
                None => SlicerError::OutOfBounds { position, duration },
            });
        }

        self.create_at(audio, position, end)
    }

    /// Apply a partial update. Returns `false` (and changes nothing) for an
    /// unknown id.
    ///
    /// A type change renumbers every slice of the old and new type. Bounds are
    /// not validated here; callers keep `start < end` and avoid neighbours.
    pub fn update(&mut self, id: &SliceId, update: SliceUpdate) -> bool {
        let Some(slice) = self.slices.iter_mut().find(|s| &s.id == id) else {
            return false;
        };

        let old_type = slice.drum_type;
        update.apply_to(slice);
        let new_type = slice.drum_type;

        if new_type != old_type {
            tracing::debug!(%id, from = %old_type, to = %new_type, "Slice type changed");
            self.renumber_types(&[old_type, new_type]);
        }
        true
    }

    /// Move a slice's bounds and re-run the classifier on the new window.
    pub fn resize(&mut self, audio: &AudioSamples, id: &SliceId, start: f64, end: f64) -> bool {
        let drum_type = classify_window(audio.mono(), audio.sample_rate(), start, end);
        self.update(
            id,
            SliceUpdate {
                drum_type: Some(drum_type),
                ..SliceUpdate::bounds(start, end)
            },
        )
    }

    /// Remove a slice. Remaining names keep their numbers.
    pub fn remove(&mut self, id: &SliceId) -> Option<Slice> {
        let pos = self.slices.iter().position(|s| &s.id == id)?;
        let removed = self.slices.remove(pos);
        tracing::debug!(%id, name = %removed.name, "Removed slice");
        Some(removed)
    }

    /// Rename every slice so each type is numbered 1..k in start order.
    pub fn renumber_by_type(&mut self) {
        self.renumber_types(&DrumType::ALL);
    }

    fn renumber_types(&mut self, types: &[DrumType]) {
        for &drum_type in types {
            let mut indices: Vec<usize> = (0..self.slices.len())
                .filter(|&i| self.slices[i].drum_type == drum_type)
                .collect();
            indices.sort_by(|&a, &b| compare_start(&self.slices[a], &self.slices[b]));

            for (n, idx) in indices.into_iter().enumerate() {
                self.slices[idx].name = format_name(&self.kit_prefix, drum_type, n as u32 + 1);
            }
        }
    }

    fn next_interactive_id(&self) -> SliceId {
        let mut stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        loop {
            let id = SliceId(format!("slice-{stamp}"));
            if self.get(&id).is_none() {
                return id;
            }
            stamp += 1;
        }
    }
}

/// Name for a slice of `drum_type` using the smallest number not taken by
/// another slice of that type. `exclude` skips the slice being renamed.
pub fn generate_slice_name(
    prefix: &str,
    drum_type: DrumType,
    slices: &[Slice],
    exclude: Option<&SliceId>,
) -> String {
    let mut used: Vec<u32> = slices
        .iter()
        .filter(|s| s.drum_type == drum_type)
        .filter(|s| exclude != Some(&s.id))
        .filter_map(Slice::sequence_number)
        .collect();
    used.sort_unstable();
    used.dedup();

    let mut n = 1;
    for &taken in &used {
        if taken == n {
            n += 1;
        } else if taken > n {
            break;
        }
    }
    format_name(prefix, drum_type, n)
}

fn format_name(prefix: &str, drum_type: DrumType, n: u32) -> String {
    format!("{prefix}_{}_{n}", drum_type.display_name())
}

fn compare_start(a: &Slice, b: &Slice) -> Ordering {
    a.start.partial_cmp(&b.start).unwrap_or(Ordering::Equal)
}
