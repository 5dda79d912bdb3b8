//! Continuous-phase AFSK modulation
//!
//! SAME data is sent with two-level frequency-shift keying at
//! 520.83 baud: a one bit ("mark") is a 2083.3 Hz tone, and a
//! zero bit ("space") is a 1562.5 Hz tone. Each bit lasts for
//! exactly one baud, which is four cycles of mark or three
//! cycles of space.
//!
//! The tone changes frequency at every bit transition, but its
//! phase must *not* jump. The oscillator's phase is carried from
//! the last sample of one bit into the first sample of the next,
//! across character boundaries, for the whole burst. Resetting
//! phase at a bit boundary produces clicks which receivers will
//! report as bit errors.

use std::f64::consts::TAU;

use log::trace;

use crate::framing::Framing;
use crate::waveform::{self, Waveform, AMPLITUDE, FSK_MARK_HZ, FSK_SPACE_HZ};

/// SAME AFSK modulator
///
/// Converts text (a SAME header or the `NNNN` end-of-message
/// marker) into one burst of audio. The modulator holds no
/// state between calls: every burst starts at zero phase.
///
/// ```
/// use samegen::{AfskModulator, Framing};
///
/// let modulator = AfskModulator::new(22050, Framing::Asynchronous);
/// let burst = modulator.modulate("NNNN");
/// assert_eq!(burst.len(), modulator.burst_len(4));
/// assert_eq!(burst.sample_rate(), 22050);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct AfskModulator {
    sample_rate: u32,
    samples_per_bit: usize,
    framing: Framing,
    mark_rad_per_sa: f64,
    space_rad_per_sa: f64,
}

impl AfskModulator {
    /// Modulator for the given output rate and character framing
    pub fn new(sample_rate: u32, framing: Framing) -> Self {
        Self {
            sample_rate,
            samples_per_bit: waveform::samples_per_bit(sample_rate),
            framing,
            mark_rad_per_sa: TAU * FSK_MARK_HZ as f64 / sample_rate as f64,
            space_rad_per_sa: TAU * FSK_SPACE_HZ as f64 / sample_rate as f64,
        }
    }

    /// Modulate one burst of `text`
    ///
    /// Every character of `text` is framed according to the
    /// configured [`Framing`] and rendered at the SAME baud rate.
    pub fn modulate<S>(&self, text: S) -> Waveform
    where
        S: AsRef<[u8]>,
    {
        let text = text.as_ref();
        let bits = self.framing.framed_bits(text);
        trace!(
            "modulating {} characters as {} bits ({})",
            text.len(),
            bits.len(),
            self.framing
        );
        self.modulate_bits(&bits)
    }

    /// Modulate raw bits
    ///
    /// Each bit becomes [`samples_per_bit()`](Self::samples_per_bit)
    /// samples of mark (`true`) or space (`false`) tone, with
    /// continuous phase.
    pub fn modulate_bits(&self, bits: &[bool]) -> Waveform {
        let mut out = Waveform::with_capacity(self.sample_rate, bits.len() * self.samples_per_bit);
        let mut osc = Oscillator::default();
        for &bit in bits {
            osc.render(
                self.rad_per_sample(bit),
                self.samples_per_bit,
                out.samples_mut(),
            );
        }
        out
    }

    /// Length of a burst of `text_len` characters, in samples
    pub fn burst_len(&self, text_len: usize) -> usize {
        self.framing.bit_count(text_len) * self.samples_per_bit
    }

    /// Output sampling rate (Hz)
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Samples per transmitted bit
    pub fn samples_per_bit(&self) -> usize {
        self.samples_per_bit
    }

    /// Character framing
    pub fn framing(&self) -> Framing {
        self.framing
    }

    // phase increment for the tone that represents `bit`
    fn rad_per_sample(&self, bit: bool) -> f64 {
        if bit {
            self.mark_rad_per_sa
        } else {
            self.space_rad_per_sa
        }
    }
}

/// Phase-continuous sine oscillator
///
/// Frequency may change between calls to
/// [`render()`](Oscillator::render); phase never does.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Oscillator {
    phase: f64,
}

impl Oscillator {
    /// Current phase, in radians `[0, 2π)`
    pub(crate) fn phase(&self) -> f64 {
        self.phase
    }

    /// Emit `count` samples, advancing `rad_per_sa` per sample
    pub(crate) fn render(&mut self, rad_per_sa: f64, count: usize, out: &mut Vec<i16>) {
        for _i in 0..count {
            out.push(waveform::to_pcm(AMPLITUDE * self.phase.sin() as f32));
            self.phase = (self.phase + rad_per_sa).rem_euclid(TAU);
        }
    }
}
