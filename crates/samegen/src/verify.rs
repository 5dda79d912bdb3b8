//! Loopback check of generated bursts
//!
//! The modulator's own output is perfectly timed: every bit
//! starts exactly [`samples_per_bit()`](crate::waveform::samples_per_bit)
//! samples after the last, and there is no noise. This makes
//! decoding it simple. Each bit window is correlated against the
//! mark and space [matched filters](crate::waveform::matched_filter),
//! and the stronger of the two decides the bit. No
//! synchronization or error correction is attempted: any error
//! means the modulator is broken.
//!
//! This is *not* a receiver for off-air SAME audio.

use num_complex::Complex;
use thiserror::Error;

#[cfg(not(test))]
use log::debug;

#[cfg(test)]
use std::println as debug;

use crate::framing::{
    bits_to_byte, BitFrame, Framing, FRAME_BITS, FRAME_TERMINATOR, PREAMBLE_LEN,
};
use crate::waveform::{self, Waveform, PREAMBLE};

/// Error decoding a generated burst
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum VerifyError {
    /// The burst is not a whole number of characters
    #[error("burst of {samples} samples is not a whole number of {framing} characters")]
    Length {
        /// Samples in the burst
        samples: usize,
        /// Expected framing
        framing: Framing,
    },

    /// A character had a bad start or stop bit
    #[error("bad start or stop bit in character {0}")]
    Framing(usize),

    /// The burst did not end with a carriage return
    #[error("burst does not end with a carriage return (last character {0})")]
    Terminator(usize),

    /// The preamble is missing or damaged
    #[error("preamble is damaged")]
    Preamble,

    /// The decoded burst contains non-ASCII bytes
    #[error("decoded burst contains non-ASCII bytes")]
    NotAscii,

    /// The burst decoded correctly, but to the wrong text
    #[error("burst decodes as \"{decoded}\" instead of \"{expected}\"")]
    Mismatch {
        /// Text which should have been sent
        expected: String,
        /// Text which was decoded
        decoded: String,
    },
}

/// Decode one burst of the modulator's output
///
/// The `burst` must contain exactly one modulated burst, with
/// no leading or trailing silence, framed with `framing`.
///
/// ```
/// use samegen::{decode_burst, AfskModulator, Framing};
///
/// let modulator = AfskModulator::new(22050, Framing::Asynchronous);
/// let burst = modulator.modulate("NNNN");
/// assert_eq!(decode_burst(&burst, Framing::Asynchronous).unwrap(), "NNNN");
/// ```
pub fn decode_burst(burst: &Waveform, framing: Framing) -> Result<String, VerifyError> {
    let bits = demodulate(burst);
    let length_err = || VerifyError::Length {
        samples: burst.len(),
        framing,
    };
    if burst.len() % waveform::samples_per_bit(burst.sample_rate()) != 0 {
        return Err(length_err());
    }

    let bytes = match framing {
        Framing::Asynchronous => {
            if bits.is_empty() || bits.len() % FRAME_BITS != 0 {
                return Err(length_err());
            }
            deframe_async(&bits)?
        }
        Framing::Nwsi => {
            if bits.len() % 8 != 0 || bits.len() < 8 * PREAMBLE_LEN {
                return Err(length_err());
            }
            deframe_nwsi(&bits)?
        }
    };

    if !bytes.is_ascii() {
        return Err(VerifyError::NotAscii);
    }
    let out = String::from_utf8(bytes).map_err(|_e| VerifyError::NotAscii)?;
    debug!("verify: decoded \"{}\"", out);
    Ok(out)
}

/// Decode one burst and compare it to the `expected` text
pub fn verify_burst(burst: &Waveform, framing: Framing, expected: &str) -> Result<(), VerifyError> {
    let decoded = decode_burst(burst, framing)?;
    if decoded == expected {
        Ok(())
    } else {
        Err(VerifyError::Mismatch {
            expected: expected.to_owned(),
            decoded,
        })
    }
}

// Hard bit decisions, one per whole bit window
fn demodulate(burst: &Waveform) -> Vec<bool> {
    let (mark, space) = waveform::matched_filter(burst.sample_rate());
    burst
        .samples()
        .chunks_exact(mark.len())
        .map(|window| {
            // non-coherently compare matched filter powers
            let m = correlate(window, &mark).norm();
            let s = correlate(window, &space).norm();
            m > s
        })
        .collect()
}

fn correlate(window: &[i16], taps: &[Complex<f32>]) -> Complex<f32> {
    window
        .iter()
        .zip(taps.iter())
        .map(|(&sa, &tap)| tap * (sa as f32 / i16::MAX as f32))
        .sum()
}

fn deframe_async(bits: &[bool]) -> Result<Vec<u8>, VerifyError> {
    let mut out = bits
        .chunks_exact(FRAME_BITS)
        .enumerate()
        .map(|(i, frame)| {
            BitFrame::from_bits(frame)
                .map(|frame| frame.byte())
                .ok_or(VerifyError::Framing(i))
        })
        .collect::<Result<Vec<u8>, _>>()?;

    // exactly one terminator, at the end
    match out.pop() {
        Some(FRAME_TERMINATOR) => Ok(out),
        _ => Err(VerifyError::Terminator(bits.len() / FRAME_BITS - 1)),
    }
}

fn deframe_nwsi(bits: &[bool]) -> Result<Vec<u8>, VerifyError> {
    let mut bytes = bits.chunks_exact(8).map(bits_to_byte);
    if !bytes.by_ref().take(PREAMBLE_LEN).all(|b| b == PREAMBLE) {
        return Err(VerifyError::Preamble);
    }
    Ok(bytes.collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::modulator::AfskModulator;

    const HEADER: &str = "ZCZC-WXR-TOR-039137-039003+0030-1231405-KXYZ/FM -";

    #[test]
    fn test_loopback_all_rates() {
        for rate in [8000, 11025, 22050, 44100, 48000, 96000, 192000] {
            for framing in [Framing::Asynchronous, Framing::Nwsi] {
                let modulator = AfskModulator::new(rate, framing);
                let burst = modulator.modulate(HEADER);
                assert_eq!(
                    decode_burst(&burst, framing).as_deref(),
                    Ok(HEADER),
                    "at {} Hz, {}",
                    rate,
                    framing
                );
                assert_eq!(verify_burst(&burst, framing, HEADER), Ok(()));
            }
        }
    }

    #[test]
    fn test_every_byte_survives() {
        let text: Vec<u8> = (0x20..0x7f).collect();
        let modulator = AfskModulator::new(22050, Framing::Asynchronous);
        let burst = modulator.modulate(&text);
        let decoded = decode_burst(&burst, Framing::Asynchronous).unwrap();
        assert_eq!(decoded.as_bytes(), text.as_slice());
    }

    #[test]
    fn test_mismatch() {
        let modulator = AfskModulator::new(22050, Framing::Asynchronous);
        let burst = modulator.modulate("NNNN");
        assert_eq!(
            verify_burst(&burst, Framing::Asynchronous, "NNNM"),
            Err(VerifyError::Mismatch {
                expected: "NNNM".to_owned(),
                decoded: "NNNN".to_owned()
            })
        );

        // wrong framing is detected
        assert!(decode_burst(&burst, Framing::Nwsi).is_err());
    }

    #[test]
    fn test_damaged_bursts() {
        let modulator = AfskModulator::new(22050, Framing::Asynchronous);
        let spb = modulator.samples_per_bit();

        // truncated
        let burst = modulator.modulate("NNNN");
        let short = Waveform::from_samples(burst.samples()[0..burst.len() - spb].to_vec(), 22050);
        assert!(matches!(
            decode_burst(&short, Framing::Asynchronous),
            Err(VerifyError::Length { .. })
        ));

        // missing carriage return: frame 'N' 'N' back to back
        let mut bits = Vec::new();
        bits.extend_from_slice(&BitFrame::new(b'N').bits());
        bits.extend_from_slice(&BitFrame::new(b'N').bits());
        let burst = modulator.modulate_bits(&bits);
        assert_eq!(
            decode_burst(&burst, Framing::Asynchronous),
            Err(VerifyError::Terminator(1))
        );

        // a carriage return after every character is not a header
        let mut bits = Vec::new();
        for &byte in b"NNNN" {
            bits.extend_from_slice(&BitFrame::new(byte).bits());
            bits.extend_from_slice(&BitFrame::new(FRAME_TERMINATOR).bits());
        }
        let burst = modulator.modulate_bits(&bits);
        assert!(verify_burst(&burst, Framing::Asynchronous, "NNNN").is_err());

        // bad stop bit
        let mut bits = Framing::Asynchronous.framed_bits(b"N");
        bits[10] = false;
        let burst = modulator.modulate_bits(&bits);
        assert_eq!(
            decode_burst(&burst, Framing::Asynchronous),
            Err(VerifyError::Framing(0))
        );

        // damaged preamble
        let mut bits = Framing::Nwsi.framed_bits(b"NNNN");
        bits[3] = !bits[3];
        let burst = modulator.modulate_bits(&bits);
        assert_eq!(
            decode_burst(&burst, Framing::Nwsi),
            Err(VerifyError::Preamble)
        );

        // high bit set
        let burst = modulator.modulate([0xC0u8]);
        assert_eq!(
            decode_burst(&burst, Framing::Asynchronous),
            Err(VerifyError::NotAscii)
        );
    }
}
