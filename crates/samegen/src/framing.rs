//! Character framing for SAME bursts
//!
//! Before it can be modulated, every character of a SAME burst
//! is converted into a sequence of bits. Two layouts are
//! available:
//!
//! * [`Framing::Asynchronous`] (the default): each character,
//!   then a single carriage return at the end of the burst, is
//!   sent as an 11-bit [`BitFrame`]: one start bit (`0`), eight
//!   data bits least-significant bit first, and two stop bits
//!   (`1`).
//!
//! * [`Framing::Nwsi`]: the over-the-air layout of NWSI 10-172.
//!   Sixteen [preamble](crate::waveform::PREAMBLE) bytes, then
//!   eight data bits per character, least-significant bit first,
//!   with no start or stop bits.

use std::fmt;
use std::str::FromStr;

use strum::EnumMessage;
use thiserror::Error;

use crate::waveform::PREAMBLE;

/// Character which ends every burst in asynchronous framing
pub const FRAME_TERMINATOR: u8 = b'\r';

/// Number of bits in one asynchronous [`BitFrame`]
pub const FRAME_BITS: usize = 11;

/// Number of preamble bytes sent with [`Framing::Nwsi`]
pub const PREAMBLE_LEN: usize = 16;

/// Asynchronous character frame
///
/// One start bit (logic `0`), the eight data bits of the
/// character least-significant bit first, and two stop bits
/// (logic `1`).
///
/// ```
/// use samegen::BitFrame;
///
/// let frame = BitFrame::new(b'A');
/// let bits = frame.bits();
/// assert_eq!(bits.len(), 11);
/// assert!(!bits[0]);
/// assert!(bits[9] && bits[10]);
/// assert_eq!(BitFrame::from_bits(&bits), Some(frame));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BitFrame {
    byte: u8,
}

impl BitFrame {
    /// Frame the given character
    pub fn new(byte: u8) -> Self {
        Self { byte }
    }

    /// The framed character
    pub fn byte(&self) -> u8 {
        self.byte
    }

    /// Data bits, least-significant bit first
    pub fn data_bits(&self) -> [bool; 8] {
        byte_to_bits(self.byte)
    }

    /// All bits of the frame, in transmission order
    pub fn bits(&self) -> [bool; FRAME_BITS] {
        let mut out = [true; FRAME_BITS];
        out[0] = false;
        out[1..9].copy_from_slice(&self.data_bits());
        out
    }

    /// Recover a frame from received bits
    ///
    /// Returns `None` unless `bits` has exactly [`FRAME_BITS`]
    /// bits with a valid start bit and two valid stop bits.
    pub fn from_bits(bits: &[bool]) -> Option<Self> {
        if bits.len() != FRAME_BITS || bits[0] || !bits[9] || !bits[10] {
            return None;
        }
        Some(Self::new(bits_to_byte(&bits[1..9])))
    }
}

/// Character framing layout
///
/// Selects how characters become bits. See the
/// [module documentation](self) for the two layouts.
///
/// ```
/// use samegen::Framing;
///
/// assert_eq!(Framing::default(), Framing::Asynchronous);
/// assert_eq!("nwsi".parse::<Framing>().unwrap(), Framing::Nwsi);
/// assert_eq!(Framing::Asynchronous.bit_count(4), 55);
/// assert_eq!(Framing::Nwsi.bit_count(4), 160);
/// ```
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum_macros::EnumMessage,
    strum_macros::EnumIter,
)]
pub enum Framing {
    /// Start bit, eight data bits, two stop bits, and a trailing CR
    #[default]
    #[strum(
        serialize = "async",
        detailed_message = "1 start + 8 data + 2 stop bits per character, CR-terminated"
    )]
    Asynchronous,

    /// Sixteen preamble bytes, then eight bits per character
    #[strum(
        serialize = "nwsi",
        detailed_message = "NWSI 10-172: 16-byte preamble, 8 data bits per character"
    )]
    Nwsi,
}

impl Framing {
    /// Short name, like "`async`"
    pub fn as_str(&self) -> &'static str {
        self.get_serializations()[0]
    }

    /// Human-readable description
    pub fn as_display_str(&self) -> &'static str {
        self.get_detailed_message().expect("missing definition")
    }

    /// Number of bits needed to send `text_len` characters
    pub fn bit_count(&self, text_len: usize) -> usize {
        match self {
            Framing::Asynchronous => FRAME_BITS * (text_len + 1),
            Framing::Nwsi => 8 * (PREAMBLE_LEN + text_len),
        }
    }

    /// Convert `text` into bits, in transmission order
    pub fn framed_bits(&self, text: &[u8]) -> Vec<bool> {
        let mut out = Vec::with_capacity(self.bit_count(text.len()));
        match self {
            Framing::Asynchronous => {
                for &byte in text.iter().chain(std::iter::once(&FRAME_TERMINATOR)) {
                    out.extend_from_slice(&BitFrame::new(byte).bits());
                }
            }
            Framing::Nwsi => {
                for _i in 0..PREAMBLE_LEN {
                    out.extend_from_slice(&byte_to_bits(PREAMBLE));
                }
                for &byte in text {
                    out.extend_from_slice(&byte_to_bits(byte));
                }
            }
        }
        out
    }
}

impl fmt::Display for Framing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

impl FromStr for Framing {
    type Err = UnknownFraming;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "async" | "asynchronous" => Ok(Framing::Asynchronous),
            "nwsi" | "raw" => Ok(Framing::Nwsi),
            _ => Err(UnknownFraming(s.to_owned())),
        }
    }
}

/// An unrecognized framing name
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("unknown framing \"{0}\": expected one of \"async\" or \"nwsi\"")]
pub struct UnknownFraming(pub String);

/// Bits of `byte`, least-significant bit first
pub(crate) fn byte_to_bits(byte: u8) -> [bool; 8] {
    let mut out = [false; 8];
    for (i, bit) in out.iter_mut().enumerate() {
        *bit = (byte >> i) & 0x01 == 1;
    }
    out
}

/// Rebuild a byte from bits, least-significant bit first
pub(crate) fn bits_to_byte(bits: &[bool]) -> u8 {
    bits.iter()
        .take(8)
        .enumerate()
        .fold(0u8, |acc, (i, &bit)| acc | ((bit as u8) << i))
}

#[cfg(test)]
mod tests {
    use super::*;

    use strum::IntoEnumIterator;

    #[test]
    fn test_bit_frame() {
        // 'A' = 0x41 = 0b0100_0001
        let frame = BitFrame::new(b'A');
        assert_eq!(
            frame.bits(),
            [false, true, false, false, false, false, false, true, false, true, true]
        );
        assert_eq!(bits_to_byte(&frame.data_bits()), 0x41);
        assert_eq!(BitFrame::from_bits(&frame.bits()).unwrap().byte(), b'A');
    }

    #[test]
    fn test_bit_frame_rejects_bad_framing() {
        let mut bits = BitFrame::new(b'Z').bits();
        bits[0] = true;
        assert_eq!(BitFrame::from_bits(&bits), None);

        let mut bits = BitFrame::new(b'Z').bits();
        bits[10] = false;
        assert_eq!(BitFrame::from_bits(&bits), None);

        assert_eq!(BitFrame::from_bits(&bits[0..10]), None);
    }

    #[test]
    fn test_all_bytes_survive_framing() {
        for byte in 0..=255u8 {
            let frame = BitFrame::new(byte);
            assert_eq!(BitFrame::from_bits(&frame.bits()), Some(frame));
        }
    }

    #[test]
    fn test_async_framing() {
        let bits = Framing::Asynchronous.framed_bits(b"A");
        assert_eq!(bits.len(), 2 * FRAME_BITS);
        assert_eq!(&bits[0..FRAME_BITS], &BitFrame::new(b'A').bits());
        assert_eq!(
            &bits[FRAME_BITS..],
            &BitFrame::new(FRAME_TERMINATOR).bits()
        );
    }

    #[test]
    fn test_async_framing_single_terminator() {
        let bits = Framing::Asynchronous.framed_bits(b"NNNN");
        assert_eq!(bits.len(), Framing::Asynchronous.bit_count(4));
        assert_eq!(bits.len(), 5 * FRAME_BITS);

        let bytes: Vec<u8> = bits
            .chunks(FRAME_BITS)
            .map(|chunk| BitFrame::from_bits(chunk).unwrap().byte())
            .collect();
        assert_eq!(bytes, b"NNNN\r");
    }

    #[test]
    fn test_nwsi_framing() {
        let bits = Framing::Nwsi.framed_bits(b"NNNN");
        assert_eq!(bits.len(), Framing::Nwsi.bit_count(4));

        // preamble 0xAB, LSB first
        assert_eq!(
            &bits[0..8],
            &[true, true, false, true, false, true, false, true]
        );
        let first = bits_to_byte(&bits[8 * PREAMBLE_LEN..8 * PREAMBLE_LEN + 8]);
        assert_eq!(first, b'N');
    }

    #[test]
    fn test_framing_names() {
        for framing in Framing::iter() {
            assert_eq!(framing.as_str().parse::<Framing>(), Ok(framing));
            assert!(!framing.as_display_str().is_empty());
        }
        assert_eq!("ASYNC".parse::<Framing>(), Ok(Framing::Asynchronous));
        assert_eq!(
            "parity".parse::<Framing>(),
            Err(UnknownFraming("parity".to_owned()))
        );
    }
}
