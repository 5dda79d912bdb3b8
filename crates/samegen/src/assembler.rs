//! Broadcast package assembly
//!
//! A SAME broadcast is laid out as
//!
//! 1. the header burst, three times, each followed by one
//!    second of silence;
//! 2. the attention tone, unless the tone profile is
//!    [`ToneProfile::None`];
//! 3. narration, if any;
//! 4. half a second of silence; and
//! 5. the end-of-message burst `NNNN`, three times, each
//!    followed by one second of silence.
//!
//! All of the pieces are rendered at one sampling rate into a
//! single composite [`Waveform`]. The pieces are also kept
//! separately, as named [`Segment`]s.

use std::fmt;
use std::time::Duration;

use log::debug;
use thiserror::Error;

use crate::builder::MAX_ATTENTION_SECS;
use crate::emitter::{emit_wav, EmitError, RenderedPackage};
use crate::encoder::Degradation;
use crate::framing::Framing;
use crate::message::{EventCode, LocationCode, SameHeader, END_OF_MESSAGE};
use crate::modulator::AfskModulator;
use crate::tone::{ToneError, ToneProfile};
use crate::verify::{verify_burst, VerifyError};
use crate::waveform::{self, Waveform, MAX_SAMPLE_RATE, MIN_SAMPLE_RATE};

/// Number of times each burst is sent
pub const HEADER_REPEATS: usize = 3;

/// Silence after every burst (s)
pub const BURST_GAP_SECS: f32 = 1.0;

/// Silence between the voice message and the first EOM (s)
pub const PRE_EOM_GAP_SECS: f32 = 0.5;

/// A named piece of a broadcast package
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum_macros::IntoStaticStr,
    strum_macros::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum Segment {
    /// Header bursts and the silence which follows each
    Header,

    /// Attention tone
    Tone,

    /// Voice message
    Narration,

    /// End-of-message bursts and the silence which follows each
    Eom,
}

impl Segment {
    /// Lowercase name, like "`header`"
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

/// Error assembling a package
#[derive(Error, Clone, Debug, PartialEq)]
pub enum AssemblyError {
    /// Sampling rate out of range
    #[error("sample rate {0} Hz is outside the supported range of 8000 to 192000 Hz")]
    SampleRate(u32),

    /// Attention tone duration out of range
    #[error("attention tone of {0} s is outside the permitted range of 0 to 60 s")]
    AttentionDuration(f32),

    /// Narration does not match the output sampling rate
    #[error("narration is sampled at {found} Hz, but the output rate is {expected} Hz")]
    NarrationRate {
        /// Output sampling rate
        expected: u32,
        /// Narration sampling rate
        found: u32,
    },

    /// Attention tone could not be generated
    #[error(transparent)]
    Tone(#[from] ToneError),
}

/// How to assemble a package
#[derive(Clone, Debug, PartialEq)]
pub struct AssemblyOptions {
    /// Output sampling rate (Hz)
    pub sample_rate: u32,

    /// Character framing of the bursts
    pub framing: Framing,

    /// Attention tone to send
    pub tone_profile: ToneProfile,

    /// Attention tone duration (s)
    pub attention_secs: f32,

    /// Voice message, which must be sampled at `sample_rate`
    pub narration: Option<Waveform>,
}

impl AssemblyOptions {
    /// Default options at the given sampling rate
    ///
    /// Eight seconds of the two-tone attention signal, with
    /// asynchronous framing and no narration.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            framing: Framing::default(),
            tone_profile: ToneProfile::default(),
            attention_secs: 8.0,
            narration: None,
        }
    }
}

/// Assemble a broadcast package for `header`
///
/// ```
/// use samegen::{assemble, AssemblyOptions, Segment, SameHeader, ToneProfile};
///
/// let header = SameHeader::parse("ZCZC-WXR-RWT-039137+0015-1231405-EASNODES-").unwrap();
/// let mut options = AssemblyOptions::new(8000);
/// options.tone_profile = ToneProfile::None;
///
/// let package = assemble(header, &options).unwrap();
/// assert!(package.segment(Segment::Tone).is_none());
/// assert!(package.self_check().is_ok());
/// ```
pub fn assemble(
    header: SameHeader,
    options: &AssemblyOptions,
) -> Result<BroadcastPackage, AssemblyError> {
    let fs = options.sample_rate;
    if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&fs) {
        return Err(AssemblyError::SampleRate(fs));
    }
    if !options.attention_secs.is_finite()
        || !(0.0..=MAX_ATTENTION_SECS).contains(&options.attention_secs)
    {
        return Err(AssemblyError::AttentionDuration(options.attention_secs));
    }
    if let Some(narration) = &options.narration {
        if narration.sample_rate() != fs {
            return Err(AssemblyError::NarrationRate {
                expected: fs,
                found: narration.sample_rate(),
            });
        }
    }

    let modulator = AfskModulator::new(fs, options.framing);
    let header_burst = modulator.modulate(header.as_str());
    let eom_burst = modulator.modulate(END_OF_MESSAGE);
    let gap = waveform::seconds_to_samples(BURST_GAP_SECS, fs);
    let pre_eom = waveform::seconds_to_samples(PRE_EOM_GAP_SECS, fs);

    let attention = match options.tone_profile {
        ToneProfile::None => None,
        profile => Some(profile.render(options.attention_secs, fs)?),
    };

    let header_block = repeat_burst(&header_burst, gap);
    let eom_block = repeat_burst(&eom_burst, gap);

    let total = header_block.len()
        + attention.as_ref().map_or(0, Waveform::len)
        + options.narration.as_ref().map_or(0, Waveform::len)
        + pre_eom
        + eom_block.len();
    debug!(
        "assembler: {} samples ({:.1} s) at {} Hz, tone {}",
        total,
        total as f64 / fs as f64,
        fs,
        options.tone_profile
    );

    let mut composite = Waveform::with_capacity(fs, total);
    let mut segments = Vec::with_capacity(4);

    composite.append(&header_block);
    segments.push((Segment::Header, header_block));

    if let Some(attention) = attention {
        composite.append(&attention);
        segments.push((Segment::Tone, attention));
    }

    if let Some(narration) = &options.narration {
        composite.append(narration);
        segments.push((Segment::Narration, narration.clone()));
    }

    composite.push_silence(pre_eom);
    composite.append(&eom_block);
    segments.push((Segment::Eom, eom_block));

    debug_assert_eq!(composite.len(), total);

    Ok(BroadcastPackage {
        header,
        composite,
        segments,
        framing: options.framing,
        tone_profile: options.tone_profile,
        header_burst_samples: header_burst.len(),
        eom_burst_samples: eom_burst.len(),
        degradations: Vec::new(),
    })
}

// HEADER_REPEATS copies of `burst`, each followed by `gap` samples of silence
fn repeat_burst(burst: &Waveform, gap: usize) -> Waveform {
    let mut out = Waveform::with_capacity(burst.sample_rate(), HEADER_REPEATS * (burst.len() + gap));
    for _i in 0..HEADER_REPEATS {
        out.append(burst);
        out.push_silence(gap);
    }
    out
}

/// A complete SAME broadcast
///
/// Packages are created by [`assemble()`] or, more often, by
/// the [encoder](crate::SameEncoder). The header is always
/// grammar-valid. The package owns the composite audio and
/// each of its [`Segment`]s.
#[derive(Clone, Debug, PartialEq)]
pub struct BroadcastPackage {
    header: SameHeader,
    composite: Waveform,
    segments: Vec<(Segment, Waveform)>,
    framing: Framing,
    tone_profile: ToneProfile,
    header_burst_samples: usize,
    eom_burst_samples: usize,
    degradations: Vec<Degradation>,
}

impl BroadcastPackage {
    /// The SAME header
    pub fn header(&self) -> &SameHeader {
        &self.header
    }

    /// The SAME header, as text
    pub fn header_str(&self) -> &str {
        self.header.as_str()
    }

    /// Location codes, in the order they are sent
    pub fn locations(&self) -> &[LocationCode] {
        self.header.locations()
    }

    /// Event code
    pub fn event(&self) -> EventCode {
        self.header.event()
    }

    /// The complete broadcast
    pub fn composite(&self) -> &Waveform {
        &self.composite
    }

    /// One segment, if present
    ///
    /// The header and EOM segments are always present. The tone
    /// is absent for [`ToneProfile::None`], and narration is
    /// absent if none was supplied.
    pub fn segment(&self, segment: Segment) -> Option<&Waveform> {
        self.segments
            .iter()
            .find(|(seg, _)| *seg == segment)
            .map(|(_, wf)| wf)
    }

    /// All segments present, in broadcast order
    ///
    /// Segments do not include the silence before the first
    /// EOM burst.
    pub fn segments(&self) -> &[(Segment, Waveform)] {
        &self.segments
    }

    /// Sampling rate (Hz)
    pub fn sample_rate(&self) -> u32 {
        self.composite.sample_rate()
    }

    /// Total playback duration
    pub fn duration(&self) -> Duration {
        self.composite.duration()
    }

    /// Character framing of the bursts
    pub fn framing(&self) -> Framing {
        self.framing
    }

    /// Attention tone which was sent
    pub fn tone_profile(&self) -> ToneProfile {
        self.tone_profile
    }

    /// Length of one header burst, in samples
    pub fn header_burst_samples(&self) -> usize {
        self.header_burst_samples
    }

    /// Length of one EOM burst, in samples
    pub fn eom_burst_samples(&self) -> usize {
        self.eom_burst_samples
    }

    /// Defaults which were substituted for bad or missing input
    ///
    /// Empty if the alert was complete.
    pub fn degradations(&self) -> &[Degradation] {
        &self.degradations
    }

    /// Render the composite and every segment as WAV files
    pub fn render(&self) -> Result<RenderedPackage, EmitError> {
        let composite = emit_wav(&self.composite)?;
        let segments = self
            .segments
            .iter()
            .map(|(seg, wf)| Ok((*seg, emit_wav(wf)?)))
            .collect::<Result<Vec<_>, EmitError>>()?;
        Ok(RenderedPackage::new(composite, segments))
    }

    /// Decode the first header and EOM bursts
    ///
    /// Succeeds if both decode to exactly the text which was
    /// meant to be sent.
    pub fn self_check(&self) -> Result<(), VerifyError> {
        let fs = self.sample_rate();

        let first_header = &self.composite.samples()[0..self.header_burst_samples];
        verify_burst(
            &Waveform::from_samples(first_header.to_vec(), fs),
            self.framing,
            self.header.as_str(),
        )?;

        let eom_start = self.composite.len() - self.eom_block_len();
        let first_eom = &self.composite.samples()[eom_start..eom_start + self.eom_burst_samples];
        verify_burst(
            &Waveform::from_samples(first_eom.to_vec(), fs),
            self.framing,
            END_OF_MESSAGE,
        )?;

        debug!("assembler: loopback check passed for \"{}\"", self.header);
        Ok(())
    }

    /// Release the composite audio
    pub fn into_composite(self) -> Waveform {
        self.composite
    }

    pub(crate) fn with_degradations(mut self, degradations: Vec<Degradation>) -> Self {
        self.degradations = degradations;
        self
    }

    fn eom_block_len(&self) -> usize {
        self.segment(Segment::Eom).map_or(0, Waveform::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use strum::IntoEnumIterator;

    use crate::message::{Originator, SameHeader};

    fn tornado() -> SameHeader {
        SameHeader::new(
            Originator::WeatherService,
            EventCode::lookup("TOR").unwrap(),
            &[LocationCode::new("039137").unwrap()],
            "0030",
            "1231405",
            "EASNODES",
        )
        .unwrap()
    }

    #[test]
    fn test_layout() {
        const FS: u32 = 22050;
        let package = assemble(tornado(), &AssemblyOptions::new(FS)).unwrap();

        let spb = waveform::samples_per_bit(FS);
        let header_burst = spb * 11 * (package.header_str().len() + 1);
        let eom_burst = spb * 11 * (4 + 1);
        assert_eq!(package.header_burst_samples(), header_burst);
        assert_eq!(package.eom_burst_samples(), eom_burst);

        // 3x(burst + 1 s) + tone + 0.5 s + 3x(EOM burst + 1 s)
        let expect = 3 * (header_burst + FS as usize)
            + 8 * FS as usize
            + FS as usize / 2
            + 3 * (eom_burst + FS as usize);
        assert_eq!(package.composite().len(), expect);
        assert_eq!(
            package.duration(),
            Duration::from_secs_f64(expect as f64 / FS as f64)
        );
        assert_eq!(package.sample_rate(), FS);
        assert_eq!(package.locations()[0].as_str(), "039137");
        assert_eq!(package.event().as_str(), "TOR");
        assert!(package.degradations().is_empty());

        let order: Vec<Segment> = package.segments().iter().map(|(s, _)| *s).collect();
        assert_eq!(order, vec![Segment::Header, Segment::Tone, Segment::Eom]);
        assert_eq!(
            package.segment(Segment::Tone).unwrap().len(),
            8 * FS as usize
        );

        // silence follows each burst
        let samples = package.composite().samples();
        assert!(samples[header_burst..header_burst + FS as usize]
            .iter()
            .all(|&s| s == 0));

        assert!(package.self_check().is_ok());
    }

    #[test]
    fn test_segments_rebuild_composite() {
        const FS: u32 = 8000;
        let mut options = AssemblyOptions::new(FS);
        options.narration = Some(Waveform::from_samples(vec![100; 4000], FS));
        options.tone_profile = ToneProfile::Single;
        options.attention_secs = 2.0;
        let package = assemble(tornado(), &options).unwrap();

        let mut rebuilt = Waveform::new(FS);
        for (seg, wf) in package.segments() {
            if *seg == Segment::Eom {
                rebuilt.push_silence(FS as usize / 2);
            }
            rebuilt.append(wf);
        }
        assert_eq!(&rebuilt, package.composite());
        assert_eq!(package.segments().len(), Segment::iter().count());
        assert_eq!(package.tone_profile(), ToneProfile::Single);
    }

    #[test]
    fn test_no_tone() {
        let mut options = AssemblyOptions::new(8000);
        options.tone_profile = ToneProfile::None;
        options.attention_secs = 60.0;
        let package = assemble(tornado(), &options).unwrap();
        assert!(package.segment(Segment::Tone).is_none());

        let with_tone = assemble(tornado(), &AssemblyOptions::new(8000)).unwrap();
        assert_eq!(
            with_tone.composite().len() - package.composite().len(),
            8 * 8000
        );
    }

    #[test]
    fn test_rejects() {
        let mut options = AssemblyOptions::new(22050);
        options.narration = Some(Waveform::from_samples(vec![0; 10], 44100));
        assert_eq!(
            assemble(tornado(), &options),
            Err(AssemblyError::NarrationRate {
                expected: 22050,
                found: 44100
            })
        );

        assert_eq!(
            assemble(tornado(), &AssemblyOptions::new(4000)),
            Err(AssemblyError::SampleRate(4000))
        );

        for secs in [-1.0, 60.5, 1.0e9, f32::INFINITY] {
            let mut options = AssemblyOptions::new(8000);
            options.attention_secs = secs;
            assert_eq!(
                assemble(tornado(), &options),
                Err(AssemblyError::AttentionDuration(secs))
            );
        }
        let mut options = AssemblyOptions::new(8000);
        options.attention_secs = f32::NAN;
        assert!(matches!(
            assemble(tornado(), &options),
            Err(AssemblyError::AttentionDuration(_))
        ));
    }

    #[test]
    fn test_nwsi_self_check() {
        let mut options = AssemblyOptions::new(48000);
        options.framing = Framing::Nwsi;
        let package = assemble(tornado(), &options).unwrap();
        assert_eq!(package.framing(), Framing::Nwsi);
        assert_eq!(
            package.eom_burst_samples(),
            waveform::samples_per_bit(48000) * 8 * (16 + 4)
        );
        assert!(package.self_check().is_ok());
    }

    #[test]
    fn test_render() {
        let mut options = AssemblyOptions::new(8000);
        options.tone_profile = ToneProfile::None;
        let package = assemble(tornado(), &options).unwrap();
        let rendered = package.render().unwrap();

        assert_eq!(
            rendered.composite().sample_count(),
            package.composite().len()
        );
        assert_eq!(rendered.segments().len(), 2);
        assert_eq!(
            rendered.segment(Segment::Header).unwrap().sample_count(),
            package.segment(Segment::Header).unwrap().len()
        );
        assert!(rendered.segment(Segment::Narration).is_none());
    }

    #[test]
    fn test_segment_names() {
        let names: Vec<&str> = Segment::iter().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["header", "tone", "narration", "eom"]);
        assert_eq!(Segment::Eom.to_string(), "eom");
    }
}
