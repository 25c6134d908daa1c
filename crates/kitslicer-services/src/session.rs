//! Single-user slicing session: audio, detection settings and the slice set
//!
//! Slider changes mark detection as pending; `poll` re-runs it once the
//! debounce delay has passed without further changes.

use std::sync::Arc;
use std::time::{Duration, Instant};

use kitslicer_core::{
    kit_prefix_from_name, potential_slices, AudioSamples, DetectionSettings, PotentialSlice, Result,
    Slice, SliceId, SliceSet, SliceUpdate,
};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::detection_worker::{DetectionResult, DetectionWorker};
use crate::error::ServiceError;
use crate::render::{render_selected, RenderedSlice};

pub struct SlicingSession {
    audio: Arc<AudioSamples>,
    settings: DetectionSettings,
    slices: SliceSet,
    debounce: Duration,
    pending_since: Option<Instant>,
}

impl SlicingSession {
    pub fn new(audio: AudioSamples, config: &AppConfig) -> Self {
        Self {
            audio: Arc::new(audio),
            settings: config.detection.clamped(),
            slices: SliceSet::new(config.kit_prefix()),
            debounce: config.session.debounce(),
            pending_since: None,
        }
    }

    pub fn audio(&self) -> &AudioSamples {
        &self.audio
    }

    pub fn settings(&self) -> DetectionSettings {
        self.settings
    }

    pub fn slices(&self) -> &SliceSet {
        &self.slices
    }

    pub fn is_detection_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    pub fn set_sensitivity(&mut self, sensitivity: f64, now: Instant) {
        self.change_settings(DetectionSettings { sensitivity, ..self.settings }, now);
    }

    pub fn set_min_distance(&mut self, min_distance: f64, now: Instant) {
        self.change_settings(DetectionSettings { min_distance, ..self.settings }, now);
    }

    fn change_settings(&mut self, settings: DetectionSettings, now: Instant) {
        let settings = settings.clamped();
        if settings == self.settings {
            return;
        }
        self.settings = settings;
        self.pending_since = Some(now);
        debug!(sensitivity = settings.sensitivity, min_distance = settings.min_distance, "Detection scheduled");
    }

    /// Run a pending detection once the debounce delay has elapsed.
    /// Returns true when the slice set was replaced.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(since) = self.pending_since else {
            return false;
        };
        if now.saturating_duration_since(since) < self.debounce {
            return false;
        }
        self.detect_now();
        true
    }

    /// Detect immediately, replacing all slices.
    pub fn detect_now(&mut self) -> &[Slice] {
        self.pending_since = None;
        self.slices.detect_all(&self.audio, self.settings)
    }

    /// Onset markers for the current settings, without touching the slices
    pub fn preview(&self) -> Vec<PotentialSlice> {
        potential_slices(self.audio.mono(), self.audio.sample_rate(), self.settings)
    }

    /// Hand the pending detection to a background worker instead of `poll`.
    pub fn submit_detection(&mut self, worker: &mut DetectionWorker) -> std::result::Result<u64, ServiceError> {
        self.pending_since = None;
        worker.submit(Arc::clone(&self.audio), self.settings, self.slices.kit_prefix())
    }

    /// Adopt a worker result if it was computed for the current settings.
    pub fn apply_detection(&mut self, result: DetectionResult) -> bool {
        if result.settings != self.settings || result.slices.kit_prefix() != self.slices.kit_prefix() {
            debug!(generation = result.generation, "Ignoring detection for outdated settings");
            return false;
        }
        self.slices = result.slices;
        true
    }

    pub fn set_kit_name(&mut self, name: &str) {
        let prefix = kit_prefix_from_name(name);
        info!(name, %prefix, "Kit renamed");
        self.slices.set_kit_prefix(prefix);
    }

    pub fn create_at(&mut self, start: f64, end: f64) -> Result<&Slice> {
        self.slices.create_at(&self.audio, start, end)
    }

    pub fn create_at_position(&mut self, position: f64) -> Result<&Slice> {
        self.slices.create_at_position(&self.audio, position)
    }

    pub fn update(&mut self, id: &SliceId, update: SliceUpdate) -> bool {
        self.slices.update(id, update)
    }

    pub fn resize(&mut self, id: &SliceId, start: f64, end: f64) -> bool {
        self.slices.resize(&self.audio, id, start, end)
    }

    pub fn remove(&mut self, id: &SliceId) -> Option<Slice> {
        self.slices.remove(id)
    }

    pub fn render_selected(&self) -> Vec<RenderedSlice> {
        render_selected(&self.audio, &self.slices)
    }
}
