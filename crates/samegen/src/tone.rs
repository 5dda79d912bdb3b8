//! Attention tones and silence

use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;

use strum::EnumMessage;
use thiserror::Error;

use crate::message::{EventCode, SignificanceLevel};
use crate::waveform::{self, Waveform, AMPLITUDE};

/// Two-tone attention signal frequencies (Hz)
pub const ATTENTION_TONE_HZ: [f32; 2] = [853.0, 960.0];

/// Single attention tone frequency (Hz)
///
/// This is the NOAA Weather Radio warning alarm tone.
pub const WEATHER_TONE_HZ: f32 = 1050.0;

/// Error generating a tone
#[derive(Error, Clone, Debug, PartialEq)]
pub enum ToneError {
    /// One or two frequencies are required
    #[error("a tone needs one or two frequencies, not {0}")]
    ComponentCount(usize),

    /// A frequency is not positive or is above Nyquist
    #[error("tone frequency {0} Hz cannot be represented at {1} Hz")]
    Frequency(f32, u32),
}

/// Generate a tone
///
/// Sums one or two sine waves at the given `frequencies`,
/// normalized by the number of components, at the fixed
/// [output amplitude](crate::waveform::AMPLITUDE). Zero,
/// negative, and non-finite durations produce an empty
/// waveform.
///
/// Output depends only on the arguments: every call with the
/// same arguments produces identical samples.
///
/// ```
/// use samegen::{tone, ATTENTION_TONE_HZ};
///
/// let wf = tone(&ATTENTION_TONE_HZ, 8.0, 22050).unwrap();
/// assert_eq!(wf.len(), 8 * 22050);
/// assert!(tone(&[], 8.0, 22050).is_err());
/// ```
pub fn tone(frequencies: &[f32], duration_secs: f32, sample_rate: u32) -> Result<Waveform, ToneError> {
    if frequencies.is_empty() || frequencies.len() > 2 {
        return Err(ToneError::ComponentCount(frequencies.len()));
    }
    let nyquist = sample_rate as f32 / 2.0;
    if let Some(&bad) = frequencies
        .iter()
        .find(|&&f| !f.is_finite() || f <= 0.0 || f >= nyquist)
    {
        return Err(ToneError::Frequency(bad, sample_rate));
    }

    let count = waveform::seconds_to_samples(duration_secs, sample_rate);
    let rad_per_sa: Vec<f64> = frequencies
        .iter()
        .map(|&f| TAU * f as f64 / sample_rate as f64)
        .collect();
    let scale = AMPLITUDE as f64 / frequencies.len() as f64;

    let mut out = Waveform::with_capacity(sample_rate, count);
    out.samples_mut().extend((0..count).map(|n| {
        let sum: f64 = rad_per_sa.iter().map(|w| f64::sin(w * n as f64)).sum();
        waveform::to_pcm((scale * sum) as f32)
    }));
    Ok(out)
}

/// Generate silence
///
/// Zero, negative, and non-finite durations produce an empty
/// waveform.
pub fn silence(duration_secs: f32, sample_rate: u32) -> Waveform {
    let mut out = Waveform::new(sample_rate);
    out.push_silence(waveform::seconds_to_samples(duration_secs, sample_rate));
    out
}

/// Attention tone profile
///
/// ```
/// use samegen::ToneProfile;
///
/// let prof: ToneProfile = "dual".parse().unwrap();
/// assert_eq!(prof, ToneProfile::Dual);
/// assert_eq!(prof.frequencies(), &[853.0f32, 960.0f32]);
/// assert!("loud".parse::<ToneProfile>().is_err());
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
pub enum ToneProfile {
    /// No attention tone
    #[strum(serialize = "none", detailed_message = "no attention tone")]
    None,

    /// Single 1050 Hz tone
    #[strum(serialize = "single", detailed_message = "1050 Hz single tone")]
    Single,

    /// Two-tone 853 + 960 Hz attention signal
    #[default]
    #[strum(serialize = "dual", detailed_message = "853 + 960 Hz two-tone attention signal")]
    Dual,
}

impl ToneProfile {
    /// Tone frequencies, which are empty for `None`
    pub fn frequencies(&self) -> &'static [f32] {
        match self {
            ToneProfile::None => &[],
            ToneProfile::Single => &[WEATHER_TONE_HZ],
            ToneProfile::Dual => &ATTENTION_TONE_HZ,
        }
    }

    /// Generate `secs` seconds of this profile's tone
    ///
    /// The `None` profile always gives an empty waveform.
    pub fn render(&self, secs: f32, sample_rate: u32) -> Result<Waveform, ToneError> {
        match self {
            ToneProfile::None => Ok(Waveform::new(sample_rate)),
            _ => tone(self.frequencies(), secs, sample_rate),
        }
    }

    /// Recommended profile for an event
    ///
    /// Tests get no tone. Statements and messages get the
    /// single tone. Everything else gets the two-tone attention
    /// signal.
    ///
    /// ```
    /// use samegen::{EventCode, ToneProfile};
    ///
    /// let rec = |code: &str| ToneProfile::recommended_for(&EventCode::lookup(code).unwrap());
    /// assert_eq!(rec("RWT"), ToneProfile::None);
    /// assert_eq!(rec("SVS"), ToneProfile::Single);
    /// assert_eq!(rec("TOR"), ToneProfile::Dual);
    /// ```
    pub fn recommended_for(event: &EventCode) -> Self {
        match event.significance() {
            SignificanceLevel::Test => ToneProfile::None,
            SignificanceLevel::Statement | SignificanceLevel::Message => ToneProfile::Single,
            _ => ToneProfile::Dual,
        }
    }

    /// Short name, like "`dual`"
    pub fn as_str(&self) -> &'static str {
        self.get_serializations()[0]
    }

    /// Human-readable description
    pub fn as_display_str(&self) -> &'static str {
        self.get_detailed_message().expect("missing definition")
    }
}

impl fmt::Display for ToneProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

impl FromStr for ToneProfile {
    type Err = UnknownToneProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(ToneProfile::None),
            "single" | "single-tone" => Ok(ToneProfile::Single),
            "dual" | "dual-tone" | "attention" => Ok(ToneProfile::Dual),
            _ => Err(UnknownToneProfile(s.to_owned())),
        }
    }
}

/// Attention tone selection
///
/// Either a fixed [`ToneProfile`] or `auto`, which picks the
/// [recommended](ToneProfile::recommended_for) profile for each
/// event.
///
/// ```
/// use samegen::{TonePolicy, ToneProfile};
///
/// assert_eq!("auto".parse::<TonePolicy>().unwrap(), TonePolicy::Automatic);
/// assert_eq!(
///     "single".parse::<TonePolicy>().unwrap(),
///     TonePolicy::Fixed(ToneProfile::Single)
/// );
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TonePolicy {
    /// Choose by event significance
    Automatic,

    /// Always use this profile
    Fixed(ToneProfile),
}

impl TonePolicy {
    /// Profile to use for `event`
    pub fn profile_for(&self, event: &EventCode) -> ToneProfile {
        match self {
            TonePolicy::Automatic => ToneProfile::recommended_for(event),
            TonePolicy::Fixed(prof) => *prof,
        }
    }
}

impl Default for TonePolicy {
    fn default() -> Self {
        TonePolicy::Fixed(ToneProfile::default())
    }
}

impl From<ToneProfile> for TonePolicy {
    fn from(prof: ToneProfile) -> Self {
        TonePolicy::Fixed(prof)
    }
}

impl fmt::Display for TonePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TonePolicy::Automatic => "auto".fmt(f),
            TonePolicy::Fixed(prof) => prof.fmt(f),
        }
    }
}

impl FromStr for TonePolicy {
    type Err = UnknownToneProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            Ok(TonePolicy::Automatic)
        } else {
            s.parse().map(TonePolicy::Fixed)
        }
    }
}

/// An unrecognized tone profile name
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("unknown tone profile \"{0}\": expected one of \"auto\", \"none\", \"single\", or \"dual\"")]
pub struct UnknownToneProfile(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    use assert_approx_eq::assert_approx_eq;
    use strum::IntoEnumIterator;

    #[test]
    fn test_tone_level() {
        for freqs in [&ATTENTION_TONE_HZ[..], &[WEATHER_TONE_HZ][..]] {
            let wf = tone(freqs, 1.0, 22050).unwrap();
            assert_eq!(wf.len(), 22050);
            assert_eq!(wf.samples()[0], 0);

            let peak = wf.samples().iter().map(|s| (*s as i32).abs()).max().unwrap();
            let limit = (AMPLITUDE * i16::MAX as f32).round() as i32;
            assert!(peak <= limit, "peak {} over {}", peak, limit);
            assert!(peak > limit * 9 / 10, "peak {} too quiet", peak);
        }
    }

    #[test]
    fn test_tone_frequency() {
        // 1050 Hz for one second has 1050 rising zero crossings
        let wf = tone(&[WEATHER_TONE_HZ], 1.0, 48000).unwrap();
        let rising = wf
            .samples()
            .windows(2)
            .filter(|w| w[0] < 0 && w[1] >= 0)
            .count();
        assert!((1049..=1050).contains(&rising), "{} crossings", rising);

        // mean power of a unit sine is 1/2
        let power: f64 = wf
            .samples()
            .iter()
            .map(|&s| (s as f64 / i16::MAX as f64).powi(2))
            .sum::<f64>()
            / wf.len() as f64;
        assert_approx_eq!(power, 0.5 * (AMPLITUDE as f64).powi(2), 1.0e-3);
    }

    #[test]
    fn test_tone_is_pure() {
        let a = tone(&ATTENTION_TONE_HZ, 2.5, 44100).unwrap();
        let b = tone(&ATTENTION_TONE_HZ, 2.5, 44100).unwrap();
        assert_eq!(a, b);
        assert_eq!(silence(0.5, 44100), silence(0.5, 44100));
    }

    #[test]
    fn test_tone_rejects() {
        assert_eq!(
            tone(&[1.0, 2.0, 3.0], 1.0, 8000),
            Err(ToneError::ComponentCount(3))
        );
        assert_eq!(
            tone(&[853.0, 4000.0], 1.0, 8000),
            Err(ToneError::Frequency(4000.0, 8000))
        );
        assert_eq!(
            tone(&[-1.0], 1.0, 8000),
            Err(ToneError::Frequency(-1.0, 8000))
        );
    }

    #[test]
    fn test_degenerate_durations() {
        assert!(tone(&[WEATHER_TONE_HZ], 0.0, 8000).unwrap().is_empty());
        assert!(tone(&[WEATHER_TONE_HZ], -1.0, 8000).unwrap().is_empty());
        assert!(tone(&[WEATHER_TONE_HZ], f32::INFINITY, 8000).unwrap().is_empty());
        assert!(silence(f32::NAN, 8000).is_empty());

        let quiet = silence(0.25, 8000);
        assert_eq!(quiet.len(), 2000);
        assert!(quiet.samples().iter().all(|&s| s == 0));
    }

    #[test]
    fn test_profiles() {
        for prof in ToneProfile::iter() {
            assert_eq!(prof.as_str().parse::<ToneProfile>(), Ok(prof));
            assert!(!prof.as_display_str().is_empty());
            assert_eq!(prof.to_string().parse::<TonePolicy>(), Ok(TonePolicy::Fixed(prof)));
        }
        assert!(ToneProfile::None.render(8.0, 8000).unwrap().is_empty());
        assert_eq!(ToneProfile::Single.render(1.0, 8000).unwrap().len(), 8000);
        assert_eq!(
            "Loud".parse::<ToneProfile>(),
            Err(UnknownToneProfile("Loud".to_owned()))
        );
        assert!(" AUTO ".parse::<TonePolicy>().is_ok());
        assert_eq!(TonePolicy::default(), TonePolicy::Fixed(ToneProfile::Dual));

        let rwt = EventCode::lookup("RWT").unwrap();
        assert_eq!(TonePolicy::Automatic.profile_for(&rwt), ToneProfile::None);
        assert_eq!(
            TonePolicy::Fixed(ToneProfile::Dual).profile_for(&rwt),
            ToneProfile::Dual
        );
    }
}
