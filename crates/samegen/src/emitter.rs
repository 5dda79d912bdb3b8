//! WAV container output
//!
//! Waveforms are rendered as RIFF/WAVE: one channel of signed
//! 16-bit little-endian PCM at the waveform's sampling rate.
//! Narration may be read back in the same format.

use std::io::{Cursor, Read};
use std::time::Duration;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use thiserror::Error;

use crate::assembler::Segment;
use crate::waveform::Waveform;

/// Error reading or writing a WAV container
#[derive(Error, Debug)]
pub enum EmitError {
    /// WAV serialization failed
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// Input audio is not mono 16-bit integer PCM
    #[error("unsupported WAV format: {channels} channel(s) of {bits}-bit {format}; expected mono 16-bit integer PCM")]
    UnsupportedFormat {
        /// Number of channels
        channels: u16,
        /// Bits per sample
        bits: u16,
        /// Sample format
        format: &'static str,
    },
}

/// A waveform rendered into a WAV container
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmittedAudio {
    bytes: Vec<u8>,
    sample_count: usize,
    sample_rate: u32,
}

impl EmittedAudio {
    /// WAV file contents
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of audio samples
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Sampling rate (Hz)
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Playback duration
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.sample_count as f64 / self.sample_rate as f64)
    }

    /// Release the WAV file contents
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// WAV format for a waveform
pub fn wav_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// Render a waveform as a WAV file
///
/// ```
/// use samegen::{emit_wav, silence};
///
/// let wav = emit_wav(&silence(1.0, 8000)).unwrap();
/// assert_eq!(&wav.bytes()[0..4], b"RIFF");
/// assert_eq!(wav.sample_count(), 8000);
/// assert_eq!(wav.duration().as_secs(), 1);
/// ```
pub fn emit_wav(waveform: &Waveform) -> Result<EmittedAudio, EmitError> {
    // 44-byte canonical header
    let mut bytes = Vec::with_capacity(44 + 2 * waveform.len());
    {
        let mut writer = WavWriter::new(Cursor::new(&mut bytes), wav_spec(waveform.sample_rate()))?;
        for &sa in waveform.samples() {
            writer.write_sample(sa)?;
        }
        writer.finalize()?;
    }

    Ok(EmittedAudio {
        bytes,
        sample_count: waveform.len(),
        sample_rate: waveform.sample_rate(),
    })
}

/// Read a mono 16-bit WAV file
///
/// Other formats are rejected; no resampling or mixing is
/// performed.
pub fn read_wav<R>(reader: R) -> Result<Waveform, EmitError>
where
    R: Read,
{
    let reader = WavReader::new(reader)?;
    let spec = reader.spec();
    if spec.channels != 1 || spec.bits_per_sample != 16 || spec.sample_format != SampleFormat::Int
    {
        return Err(EmitError::UnsupportedFormat {
            channels: spec.channels,
            bits: spec.bits_per_sample,
            format: match spec.sample_format {
                SampleFormat::Int => "integer",
                SampleFormat::Float => "float",
            },
        });
    }

    let samples = reader.into_samples::<i16>().collect::<Result<Vec<_>, _>>()?;
    Ok(Waveform::from_samples(samples, spec.sample_rate))
}

/// A broadcast package, rendered as WAV files
///
/// Produced by
/// [`BroadcastPackage::render()`](crate::BroadcastPackage::render).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedPackage {
    composite: EmittedAudio,
    segments: Vec<(Segment, EmittedAudio)>,
}

impl RenderedPackage {
    pub(crate) fn new(composite: EmittedAudio, segments: Vec<(Segment, EmittedAudio)>) -> Self {
        Self {
            composite,
            segments,
        }
    }

    /// The complete broadcast
    pub fn composite(&self) -> &EmittedAudio {
        &self.composite
    }

    /// One segment, if present in the package
    pub fn segment(&self, segment: Segment) -> Option<&EmittedAudio> {
        self.segments
            .iter()
            .find(|(seg, _)| *seg == segment)
            .map(|(_, audio)| audio)
    }

    /// All segments present in the package, in broadcast order
    pub fn segments(&self) -> &[(Segment, EmittedAudio)] {
        &self.segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wav_layout() {
        let wf = Waveform::from_samples(vec![0, 1, -1, i16::MAX, i16::MIN], 22050);
        let wav = emit_wav(&wf).unwrap();
        let bytes = wav.bytes();

        assert_eq!(bytes.len(), 44 + 10);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(u16::from_le_bytes([bytes[22], bytes[23]]), 1);
        assert_eq!(
            u32::from_le_bytes([bytes[24], bytes[25], bytes[26], bytes[27]]),
            22050
        );
        assert_eq!(u16::from_le_bytes([bytes[34], bytes[35]]), 16);
        assert_eq!(&bytes[44..46], &[0, 0]);
        assert_eq!(&bytes[46..48], &[1, 0]);
        assert_eq!(&bytes[48..50], &[0xff, 0xff]);
        assert_eq!(wav.sample_count(), 5);
        assert_eq!(wav.sample_rate(), 22050);
    }

    #[test]
    fn test_read_back() {
        let wf = Waveform::from_samples((0..1000).map(|i| (i * 7) as i16).collect(), 8000);
        let wav = emit_wav(&wf).unwrap();
        let back = read_wav(wav.bytes()).unwrap();
        assert_eq!(back, wf);
    }

    #[test]
    fn test_read_rejects_stereo() {
        let spec = WavSpec {
            channels: 2,
            ..wav_spec(8000)
        };
        let mut bytes = Vec::new();
        {
            let mut writer = WavWriter::new(Cursor::new(&mut bytes), spec).unwrap();
            writer.write_sample(0i16).unwrap();
            writer.write_sample(0i16).unwrap();
            writer.finalize().unwrap();
        }
        match read_wav(bytes.as_slice()) {
            Err(EmitError::UnsupportedFormat { channels, bits, .. }) => {
                assert_eq!(channels, 2);
                assert_eq!(bits, 16);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(read_wav(&b"RIFX"[..]), Err(EmitError::Wav(_))));
    }
}
