//! Decoded audio buffer handed in by the caller

use crate::error::{Result, SlicerError};

/// De-interleaved PCM audio. Every channel has the same number of frames.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSamples {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
}

impl AudioSamples {
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(SlicerError::InvalidAudio("sample rate must be non-zero".into()));
        }
        let Some(first) = channels.first() else {
            return Err(SlicerError::InvalidAudio("no channels".into()));
        };
        let frames = first.len();
        if let Some(idx) = channels.iter().position(|c| c.len() != frames) {
            return Err(SlicerError::InvalidAudio(format!(
                "channel {idx} has {} frames, expected {frames}",
                channels[idx].len()
            )));
        }
        Ok(Self { channels, sample_rate })
    }

    /// Single-channel buffer
    pub fn from_mono(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        Self::new(vec![samples], sample_rate)
    }

    /// Split interleaved frames into one buffer per channel.
    pub fn from_interleaved(samples: &[f32], channels: u16, sample_rate: u32) -> Result<Self> {
        let count = channels.max(1) as usize;
        let mut split = vec![Vec::with_capacity(samples.len() / count); count];
        for frame in samples.chunks_exact(count) {
            for (ch, &s) in split.iter_mut().zip(frame) {
                ch.push(s);
            }
        }
        Self::new(split, sample_rate)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Channel 0, used for all analysis
    pub fn mono(&self) -> &[f32] {
        &self.channels[0]
    }

    /// Frames per channel
    pub fn frames(&self) -> usize {
        self.channels[0].len()
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_buffers() {
        assert!(AudioSamples::new(vec![], 44100).is_err());
        assert!(AudioSamples::new(vec![vec![0.0; 4]], 0).is_err());
        assert!(AudioSamples::new(vec![vec![0.0; 4], vec![0.0; 3]], 44100).is_err());
    }

    #[test]
    fn test_from_interleaved() {
        let audio = AudioSamples::from_interleaved(&[0.1, -0.1, 0.2, -0.2, 0.3, -0.3], 2, 3).unwrap();
        assert_eq!(audio.channel_count(), 2);
        assert_eq!(audio.mono(), &[0.1, 0.2, 0.3]);
        assert_eq!(audio.channel(1).unwrap(), &[-0.1, -0.2, -0.3]);
        assert!((audio.duration() - 1.0).abs() < 1e-12);
    }
}
