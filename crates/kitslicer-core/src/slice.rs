//! Slice records produced by detection and interactive editing

use serde::{Deserialize, Serialize};

use crate::drum_type::DrumType;

pub const DEFAULT_FADE_IN_MS: f32 = 5.0;
pub const DEFAULT_FADE_OUT_MS: f32 = 10.0;
pub const DEFAULT_VOLUME: f32 = 100.0;
/// Allowed fade-in length in milliseconds
pub const FADE_IN_RANGE_MS: (f32, f32) = (0.0, 100.0);
/// Allowed fade-out length in milliseconds
pub const FADE_OUT_RANGE_MS: (f32, f32) = (0.0, 500.0);

/// Opaque, stable slice identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SliceId(pub String);

impl SliceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SliceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A labeled region of the source audio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slice {
    pub id: SliceId,
    /// Start in seconds
    pub start: f64,
    /// End in seconds
    pub end: f64,
    #[serde(rename = "type")]
    pub drum_type: DrumType,
    /// `{prefix}_{Type}_{n}`
    pub name: String,
    /// Include in export
    pub selected: bool,
    /// Fade-in length in milliseconds
    pub fade_in: f32,
    /// Fade-out length in milliseconds
    pub fade_out: f32,
    /// Curve shape in [-1, 1], 0 = linear
    pub fade_in_shape: f32,
    pub fade_out_shape: f32,
    /// Playback gain in percent
    #[serde(default = "default_volume")]
    pub volume: f32,
}

fn default_volume() -> f32 {
    DEFAULT_VOLUME
}

impl Slice {
    /// New slice with the default envelope, selected for export
    pub fn new(id: SliceId, start: f64, end: f64, drum_type: DrumType, name: String) -> Self {
        Self {
            id,
            start,
            end,
            drum_type,
            name,
            selected: true,
            fade_in: DEFAULT_FADE_IN_MS,
            fade_out: DEFAULT_FADE_OUT_MS,
            fade_in_shape: 0.0,
            fade_out_shape: 0.0,
            volume: DEFAULT_VOLUME,
        }
    }

    /// Length in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// True when `[start, end]` touches this slice, endpoints included.
    pub fn overlaps(&self, start: f64, end: f64) -> bool {
        let start_inside = start >= self.start && start <= self.end;
        let end_inside = end >= self.start && end <= self.end;
        let encloses = start <= self.start && end >= self.end;
        start_inside || end_inside || encloses
    }

    /// Numeric suffix of the name (`..._12` gives 12)
    pub fn sequence_number(&self) -> Option<u32> {
        name_suffix(&self.name)
    }
}

pub(crate) fn name_suffix(name: &str) -> Option<u32> {
    let (_, digits) = name.rsplit_once('_')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Partial update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SliceUpdate {
    pub start: Option<f64>,
    pub end: Option<f64>,
    #[serde(rename = "type")]
    pub drum_type: Option<DrumType>,
    pub name: Option<String>,
    pub selected: Option<bool>,
    pub fade_in: Option<f32>,
    pub fade_out: Option<f32>,
    pub fade_in_shape: Option<f32>,
    pub fade_out_shape: Option<f32>,
    pub volume: Option<f32>,
}

impl SliceUpdate {
    pub fn bounds(start: f64, end: f64) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Default::default()
        }
    }

    pub fn drum_type(drum_type: DrumType) -> Self {
        Self {
            drum_type: Some(drum_type),
            ..Default::default()
        }
    }

    pub fn selected(selected: bool) -> Self {
        Self {
            selected: Some(selected),
            ..Default::default()
        }
    }

    pub fn fades(fade_in: f32, fade_out: f32) -> Self {
        Self {
            fade_in: Some(fade_in),
            fade_out: Some(fade_out),
            ..Default::default()
        }
    }

    /// Copy every present field onto `slice`. Type changes are applied too;
    /// renaming after a type change is the caller's job.
    pub(crate) fn apply_to(&self, slice: &mut Slice) {
        if let Some(start) = self.start {
            slice.start = start;
        }
        if let Some(end) = self.end {
            slice.end = end;
        }
        if let Some(drum_type) = self.drum_type {
            slice.drum_type = drum_type;
        }
        if let Some(name) = &self.name {
            slice.name = name.clone();
        }
        if let Some(selected) = self.selected {
            slice.selected = selected;
        }
        if let Some(fade_in) = self.fade_in {
            slice.fade_in = fade_in;
        }
        if let Some(fade_out) = self.fade_out {
            slice.fade_out = fade_out;
        }
        if let Some(shape) = self.fade_in_shape {
            slice.fade_in_shape = shape;
        }
        if let Some(shape) = self.fade_out_shape {
            slice.fade_out_shape = shape;
        }
        if let Some(volume) = self.volume {
            slice.volume = volume;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kick(start: f64, end: f64) -> Slice {
        Slice::new(SliceId::new("a"), start, end, DrumType::Kick, "DK_Kick_1".into())
    }

    #[test]
    fn test_overlap_is_inclusive() {
        let s = kick(0.5, 0.7);
        assert!(s.overlaps(0.55, 0.75));
        assert!(s.overlaps(0.3, 0.5));
        assert!(s.overlaps(0.7, 0.9));
        assert!(s.overlaps(0.4, 0.8));
        assert!(!s.overlaps(0.1, 0.4));
        assert!(!s.overlaps(0.71, 0.9));
    }

    #[test]
    fn test_name_suffix() {
        assert_eq!(name_suffix("DK_Kick_12"), Some(12));
        assert_eq!(name_suffix("DK_Kick_"), None);
        assert_eq!(name_suffix("DK_Kick_x2"), None);
        assert_eq!(name_suffix("Kick"), None);
    }

    #[test]
    fn test_wire_format() {
        let s = kick(0.5, 0.7);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["type"], "kick");
        assert_eq!(json["fadeIn"], 5.0);
        assert_eq!(json["fadeOutShape"], 0.0);
        assert_eq!(json["id"], "a");

        let mut raw = json.clone();
        raw.as_object_mut().unwrap().remove("volume");
        let back: Slice = serde_json::from_value(raw).unwrap();
        assert_eq!(back.volume, DEFAULT_VOLUME);
    }

    #[test]
    fn test_partial_update() {
        let mut s = kick(0.5, 0.7);
        SliceUpdate::fades(20.0, 80.0).apply_to(&mut s);
        SliceUpdate::selected(false).apply_to(&mut s);
        assert_eq!(s.fade_in, 20.0);
        assert_eq!(s.fade_out, 80.0);
        assert!(!s.selected);
        assert_eq!(s.start, 0.5);
        assert_eq!(s.name, "DK_Kick_1");

        let update: SliceUpdate = serde_json::from_str(r#"{"fadeInShape": 0.5}"#).unwrap();
        update.apply_to(&mut s);
        assert_eq!(s.fade_in_shape, 0.5);
    }
}
