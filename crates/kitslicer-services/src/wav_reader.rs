//! WAV decoding into per-channel f32 buffers

use std::io::Read;
use std::path::Path;

use kitslicer_core::AudioSamples;

use crate::error::ServiceError;

/// Decode a WAV file from disk.
pub fn read_wav(path: &Path) -> Result<AudioSamples, ServiceError> {
    let reader = hound::WavReader::open(path)?;
    let audio = decode(reader)?;
    tracing::info!(
        path = %path.display(),
        channels = audio.channel_count(),
        sample_rate = audio.sample_rate(),
        duration = audio.duration(),
        "Loaded WAV"
    );
    Ok(audio)
}

/// Decode WAV data from any reader (e.g. an in-memory upload).
pub fn read_wav_from<R: Read>(source: R) -> Result<AudioSamples, ServiceError> {
    decode(hound::WavReader::new(source)?)
}

fn decode<R: Read>(reader: hound::WavReader<R>) -> Result<AudioSamples, ServiceError> {
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.into_samples::<f32>().collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let max_val = (1_i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<_, _>>()?
        }
    };

    Ok(AudioSamples::from_interleaved(&interleaved, spec.channels, spec.sample_rate)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode_i16(channels: u16, frames: &[i16]) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for &s in frames {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_decode_stereo_int() {
        let bytes = encode_i16(2, &[16384, -16384, 0, 32767, -32768, 8192]);
        let audio = read_wav_from(Cursor::new(bytes)).unwrap();

        assert_eq!(audio.sample_rate(), 22050);
        assert_eq!(audio.channel_count(), 2);
        assert_eq!(audio.frames(), 3);
        assert_eq!(audio.mono(), &[0.5, 0.0, -1.0]);
        assert_eq!(audio.channel(1).unwrap()[0], -0.5);
    }

    #[test]
    fn test_decode_float_file() {
        let path = std::env::temp_dir().join(format!("kitslicer-wav-{}.wav", std::process::id()));
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        {
            let mut writer = hound::WavWriter::create(&path, spec).unwrap();
            for s in [0.25_f32, -0.75, 1.0] {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }

        let audio = read_wav(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(audio.mono(), &[0.25, -0.75, 1.0]);
    }

    #[test]
    fn test_rejects_garbage() {
        let err = read_wav_from(Cursor::new(b"not a wav file".to_vec())).unwrap_err();
        assert!(matches!(err, ServiceError::Wav(_)));
    }
}
