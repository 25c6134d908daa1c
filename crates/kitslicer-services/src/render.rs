//! Carve slice audio out of the source buffer with fades and gain applied

use kitslicer_core::envelope::envelope_gain;
use kitslicer_core::{AudioSamples, Slice, SliceSet, FADE_IN_RANGE_MS, FADE_OUT_RANGE_MS};

/// Audio for one slice, ready for an encoder
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSlice {
    pub name: String,
    pub sample_rate: u32,
    /// One buffer per source channel
    pub channels: Vec<Vec<f32>>,
}

impl RenderedSlice {
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }
}

/// Copy `slice`'s range from every channel and apply its envelope and volume.
pub fn render_slice(audio: &AudioSamples, slice: &Slice) -> RenderedSlice {
    let sample_rate = audio.sample_rate();
    let frames = audio.frames();
    let to_index = |secs: f64| ((secs * sample_rate as f64).floor().max(0.0) as usize).min(frames);
    let from = to_index(slice.start);
    let to = to_index(slice.end).max(from);
    let len = to - from;

    let ms_to_samples = |ms: f32, (min, max): (f32, f32)| {
        let secs = ms.clamp(min, max) as f64 / 1000.0;
        ((secs * sample_rate as f64).round() as usize).min(len)
    };
    let fade_in = ms_to_samples(slice.fade_in, FADE_IN_RANGE_MS);
    let fade_out = ms_to_samples(slice.fade_out, FADE_OUT_RANGE_MS);
    let volume = slice.volume.max(0.0) / 100.0;

    let gains: Vec<f32> = (0..len)
        .map(|i| volume * envelope_gain(i, len, fade_in, fade_out, slice.fade_in_shape, slice.fade_out_shape))
        .collect();

    let channels = audio
        .channels()
        .iter()
        .map(|ch| ch[from..to].iter().zip(&gains).map(|(s, g)| s * g).collect())
        .collect();

    RenderedSlice {
        name: slice.name.clone(),
        sample_rate,
        channels,
    }
}

/// Render every selected slice in start order.
pub fn render_selected(audio: &AudioSamples, slices: &SliceSet) -> Vec<RenderedSlice> {
    let rendered: Vec<RenderedSlice> = slices
        .sorted_by_start()
        .into_iter()
        .filter(|s| s.selected)
        .map(|s| render_slice(audio, s))
        .collect();
    tracing::debug!(count = rendered.len(), "Rendered selected slices");
    rendered
}
