//! Waveform parameters and sample buffers for SAME

use std::time::Duration;

use num_complex::Complex;

/// Mark frequency (Hz)
pub const FSK_MARK_HZ: f32 = 2083.3;

/// Space frequency (Hz)
pub const FSK_SPACE_HZ: f32 = 1562.5;

/// Baud rate (Hz)
pub const BAUD_HZ: f32 = 520.83;

/// Preamble byte
///
/// Over-the-air SAME transmissions repeat this byte sixteen
/// times before every burst. It is only emitted with
/// [`Framing::Nwsi`](crate::Framing::Nwsi).
pub const PREAMBLE: u8 = 0xab;

/// Output amplitude, as a fraction of full scale
///
/// Every generator in this crate (AFSK bursts and attention
/// tones alike) peaks at this level. Keeping all segments at
/// the same level leaves headroom for concatenation and for
/// mixing by downstream playout equipment.
pub const AMPLITUDE: f32 = 0.5;

/// Lowest permitted output sampling rate (Hz)
///
/// Must comfortably exceed twice the mark frequency.
pub const MIN_SAMPLE_RATE: u32 = 8000;

/// Highest permitted output sampling rate (Hz)
pub const MAX_SAMPLE_RATE: u32 = 192000;

/// SAME baud rate at the given sampling frequency, in fractional samples
pub fn samples_per_symbol(fs: u32) -> f32 {
    fs as f32 / BAUD_HZ
}

/// Whole samples per transmitted bit
///
/// Every bit is rendered with exactly this many samples:
/// `round(fs / 520.83)`.
pub fn samples_per_bit(fs: u32) -> usize {
    usize::max(f32::round(samples_per_symbol(fs)) as usize, 1)
}

/// Number of samples in `secs` seconds at `fs`
///
/// Non-finite, zero, or negative durations yield zero samples.
pub fn seconds_to_samples(secs: f32, fs: u32) -> usize {
    if secs.is_finite() && secs > 0.0 {
        f64::round(secs as f64 * fs as f64) as usize
    } else {
        0
    }
}

/// Convert a normalized sample to signed 16-bit PCM
///
/// Input is nominally `[-1.0, 1.0]`; anything outside is clipped.
pub fn to_pcm(sample: f32) -> i16 {
    f32::clamp(
        f32::round(sample * i16::MAX as f32),
        i16::MIN as f32,
        i16::MAX as f32,
    ) as i16
}

/// Generate mark and space matched filter taps for SAME
///
/// Generates a tuple of (`mark_taps`,`space_taps`), which are
/// the matched filter for the mark tone and the space tone,
/// respectively. Each filter spans exactly one transmitted bit
/// ([`samples_per_bit()`]) at the sampling rate `fs`.
pub fn matched_filter(fs: u32) -> (Vec<Complex<f32>>, Vec<Complex<f32>>) {
    let ntaps = samples_per_bit(fs);
    let mark = cisoid_matched_filter(ntaps, FSK_MARK_HZ / fs as f32);
    let space = cisoid_matched_filter(ntaps, FSK_SPACE_HZ / fs as f32);
    (mark, space)
}

// Generate matched filter taps
//
// These taps correlate against a complex exponential cisoid
// at a fixed frequency, `freq_fs`, given as a fraction of the
// sampling rate. Taps are in time order, so the filter output
// for a window is the plain dot product of taps and samples.
fn cisoid_matched_filter(points: usize, freq_fs: f32) -> Vec<Complex<f32>> {
    (0..points)
        .map(|n| {
            let arg = Complex::new(0.0f32, 2.0 * std::f32::consts::PI * freq_fs * n as f32);
            2.0f32 * arg.exp().conj() / points as f32
        })
        .collect()
}

/// A buffer of signed 16-bit audio samples
///
/// The `Waveform` is the unit of output of every generator in
/// this crate and the unit of concatenation for the
/// [assembler](crate::assemble). Samples are mono at
/// [`sample_rate()`](Waveform::sample_rate).
///
/// ```
/// use samegen::Waveform;
///
/// let mut wf = Waveform::with_capacity(8000, 8000);
/// wf.push_silence(4000);
/// assert_eq!(wf.len(), 4000);
/// assert_eq!(wf.duration_secs(), 0.5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Waveform {
    samples: Vec<i16>,
    sample_rate: u32,
}

impl Waveform {
    /// Empty waveform at the given sampling rate
    pub fn new(sample_rate: u32) -> Self {
        Self::with_capacity(sample_rate, 0)
    }

    /// Empty waveform with room for `capacity` samples
    pub fn with_capacity(sample_rate: u32, capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
            sample_rate,
        }
    }

    /// Wrap existing samples
    pub fn from_samples(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Sampling rate (Hz)
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Audio samples
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if there are no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Playback duration, in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.samples.len() as f64 / self.sample_rate as f64
        }
    }

    /// Playback duration
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.duration_secs())
    }

    /// Append another waveform
    ///
    /// # Panics
    ///
    /// Panics if the two waveforms have different sampling
    /// rates. Callers which accept audio from outside this crate
    /// must check this first.
    pub fn append(&mut self, other: &Waveform) {
        assert_eq!(
            self.sample_rate, other.sample_rate,
            "cannot append waveforms with different sampling rates"
        );
        self.samples.extend_from_slice(&other.samples);
    }

    /// Append `count` samples of silence
    pub fn push_silence(&mut self, count: usize) {
        self.samples.resize(self.samples.len() + count, 0);
    }

    pub(crate) fn samples_mut(&mut self) -> &mut Vec<i16> {
        &mut self.samples
    }

    /// Release the sample buffer
    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }
}

impl AsRef<[i16]> for Waveform {
    fn as_ref(&self) -> &[i16] {
        self.samples()
    }
}
