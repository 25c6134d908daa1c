//! Drum type labels assigned by the classifier

use serde::{Deserialize, Serialize};

/// Drum category of a slice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrumType {
    Kick,
    Snare,
    Hat,
    Tom,
    Cymb,
    Perc,
}

impl DrumType {
    pub const ALL: [DrumType; 6] = [
        Self::Kick,
        Self::Snare,
        Self::Hat,
        Self::Tom,
        Self::Cymb,
        Self::Perc,
    ];

    /// Lowercase label, as used on the wire
    pub fn label(&self) -> &'static str {
        match self {
            Self::Kick => "kick",
            Self::Snare => "snare",
            Self::Hat => "hat",
            Self::Tom => "tom",
            Self::Cymb => "cymb",
            Self::Perc => "perc",
        }
    }

    /// Capitalized label, as used in slice names
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Kick => "Kick",
            Self::Snare => "Snare",
            Self::Hat => "Hat",
            Self::Tom => "Tom",
            Self::Cymb => "Cymb",
            Self::Perc => "Perc",
        }
    }
}

impl std::fmt::Display for DrumType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
