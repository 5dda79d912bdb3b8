use thiserror::Error;

use crate::framing::{Framing, UnknownFraming};
use crate::message::{normalize_station, Originator, UnknownOriginator};
use crate::tone::{TonePolicy, ToneProfile, UnknownToneProfile};
use crate::waveform::{MAX_SAMPLE_RATE, MIN_SAMPLE_RATE};

/// Longest permitted attention tone, in seconds
pub const MAX_ATTENTION_SECS: f32 = 60.0;

/// Error building an [`EncoderConfig`]
#[derive(Error, Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Sampling rate out of range
    #[error("sample rate {0} Hz is outside the supported range of 8000 to 192000 Hz")]
    SampleRate(u32),

    /// Attention tone duration out of range
    #[error("attention tone of {0} s is outside the permitted range of 0 to 60 s")]
    AttentionDuration(f32),

    /// Originator is not a known code
    #[error(transparent)]
    Originator(#[from] UnknownOriginator),

    /// Station identifier contains illegal characters
    #[error("invalid station id \"{0}\": only printable ASCII is permitted")]
    Station(String),

    /// Tone profile name not recognized
    #[error(transparent)]
    ToneProfile(#[from] UnknownToneProfile),

    /// Framing name not recognized
    #[error(transparent)]
    Framing(#[from] UnknownFraming),
}

/// Builds an encoder configuration
///
/// The builder comes with a sensible set of default options.
/// All you really need to provide is the output sampling
/// rate. Settings are checked by [`build()`](EncoderBuilder::build),
/// which returns an immutable [`EncoderConfig`].
///
/// ```
/// use samegen::{EncoderBuilder, Framing, ToneProfile};
///
/// let config = EncoderBuilder::new(44100)
///     .with_originator("civ")
///     .with_station("KXYZ-FM")
///     .with_attention_secs(10.0)
///     .with_tone_profile(ToneProfile::Single)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.sample_rate(), 44100);
/// assert_eq!(config.originator().as_str(), "CIV");
/// assert_eq!(config.station(), "KXYZ/FM ");
/// assert_eq!(config.framing(), Framing::Asynchronous);
///
/// assert!(EncoderBuilder::new(1000).build().is_err());
/// ```
///
/// The API specified by the builder is part of this crate's
/// API. The actual default values are *not*, however, and
/// are subject to revision in any minor release. If you
/// care very strongly about a setting, be sure to configure
/// it here.
#[derive(Clone, Debug, PartialEq)]
pub struct EncoderBuilder {
    sample_rate: u32,
    originator: String,
    station: String,
    attention_secs: f32,
    tone_policy: TonePolicy,
    framing: Framing,
    loopback_check: bool,
}

impl EncoderBuilder {
    /// New encoder configuration with "sensible" defaults
    ///
    /// The only mandatory parameter is the output sampling
    /// rate, in Hz. It must be between 8000 and 192000 Hz.
    /// 22050 Hz is a popular choice.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            originator: Originator::default().as_str().to_owned(),
            station: "NOCALL00".to_owned(),
            attention_secs: 8.0,
            tone_policy: TonePolicy::default(),
            framing: Framing::default(),
            loopback_check: true,
        }
    }

    /// Build an encoder configuration
    ///
    /// Fails if any setting is out of range.
    pub fn build(&self) -> Result<EncoderConfig, ConfigError> {
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&self.sample_rate) {
            return Err(ConfigError::SampleRate(self.sample_rate));
        }
        if !self.attention_secs.is_finite()
            || !(0.0..=MAX_ATTENTION_SECS).contains(&self.attention_secs)
        {
            return Err(ConfigError::AttentionDuration(self.attention_secs));
        }
        let originator = Originator::normalize(&self.originator)?;
        let station = normalize_station(&self.station)
            .map_err(|_e| ConfigError::Station(self.station.clone()))?;

        Ok(EncoderConfig {
            sample_rate: self.sample_rate,
            originator,
            station,
            attention_secs: self.attention_secs,
            tone_policy: self.tone_policy,
            framing: self.framing,
            loopback_check: self.loopback_check,
        })
    }

    /// Output sampling rate (Hz)
    pub fn with_sample_rate(&mut self, sample_rate: u32) -> &mut Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Default originator code
    ///
    /// One of `PEP`, `CIV`, `WXR`, or `EAS`. Alerts may
    /// override it.
    pub fn with_originator<S>(&mut self, originator: S) -> &mut Self
    where
        S: Into<String>,
    {
        self.originator = originator.into();
        self
    }

    /// Default station identifier
    ///
    /// This is usually the station callsign. It is normalized
    /// to eight characters. Alerts may override it.
    pub fn with_station<S>(&mut self, station: S) -> &mut Self
    where
        S: Into<String>,
    {
        self.station = station.into();
        self
    }

    /// Attention tone duration (s)
    ///
    /// Must be between zero and sixty seconds. The tone is
    /// omitted entirely when the tone profile is
    /// [`ToneProfile::None`].
    pub fn with_attention_secs(&mut self, secs: f32) -> &mut Self {
        self.attention_secs = secs;
        self
    }

    /// Attention tone policy
    pub fn with_tone_policy(&mut self, policy: TonePolicy) -> &mut Self {
        self.tone_policy = policy;
        self
    }

    /// Attention tone profile for every alert
    pub fn with_tone_profile(&mut self, profile: ToneProfile) -> &mut Self {
        self.tone_policy = TonePolicy::Fixed(profile);
        self
    }

    /// Character framing
    pub fn with_framing(&mut self, framing: Framing) -> &mut Self {
        self.framing = framing;
        self
    }

    /// Decode each package after it is generated
    ///
    /// When enabled, the first header burst and the first
    /// end-of-message burst of every package are demodulated
    /// and compared against what was meant to be sent.
    pub fn with_loopback_check(&mut self, enable: bool) -> &mut Self {
        self.loopback_check = enable;
        self
    }

    /// Output sampling rate (Hz)
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Default originator, as given
    pub fn originator(&self) -> &str {
        &self.originator
    }

    /// Default station identifier, as given
    pub fn station(&self) -> &str {
        &self.station
    }

    /// Attention tone duration (s)
    pub fn attention_secs(&self) -> f32 {
        self.attention_secs
    }

    /// Attention tone policy
    pub fn tone_policy(&self) -> TonePolicy {
        self.tone_policy
    }

    /// Character framing
    pub fn framing(&self) -> Framing {
        self.framing
    }

    /// Loopback check
    pub fn loopback_check(&self) -> bool {
        self.loopback_check
    }
}

impl std::default::Default for EncoderBuilder {
    fn default() -> Self {
        Self::new(22050)
    }
}

/// A validated encoder configuration
///
/// Created by [`EncoderBuilder::build()`]. Every setting is in
/// range.
#[derive(Clone, Debug, PartialEq)]
pub struct EncoderConfig {
    sample_rate: u32,
    originator: Originator,
    station: String,
    attention_secs: f32,
    tone_policy: TonePolicy,
    framing: Framing,
    loopback_check: bool,
}

impl EncoderConfig {
    /// Output sampling rate (Hz)
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Default originator
    pub fn originator(&self) -> Originator {
        self.originator
    }

    /// Default station identifier, exactly eight characters
    pub fn station(&self) -> &str {
        &self.station
    }

    /// Attention tone duration (s)
    pub fn attention_secs(&self) -> f32 {
        self.attention_secs
    }

    /// Attention tone policy
    pub fn tone_policy(&self) -> TonePolicy {
        self.tone_policy
    }

    /// Character framing
    pub fn framing(&self) -> Framing {
        self.framing
    }

    /// True if packages are decoded after generation
    pub fn loopback_check(&self) -> bool {
        self.loopback_check
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EncoderBuilder::default().build().unwrap();
        assert_eq!(config.sample_rate(), 22050);
        assert_eq!(config.originator(), Originator::BroadcastStation);
        assert_eq!(config.station(), "NOCALL00");
        assert_eq!(config.attention_secs(), 8.0);
        assert_eq!(config.tone_policy(), TonePolicy::Fixed(ToneProfile::Dual));
        assert_eq!(config.framing(), Framing::Asynchronous);
        assert!(config.loopback_check());
    }

    #[test]
    fn test_ranges() {
        let mut builder = EncoderBuilder::default();
        assert_eq!(
            builder.with_sample_rate(7999).build(),
            Err(ConfigError::SampleRate(7999))
        );
        assert!(builder.with_sample_rate(8000).build().is_ok());
        assert!(builder.with_sample_rate(192000).build().is_ok());
        assert_eq!(
            builder.with_sample_rate(192001).build(),
            Err(ConfigError::SampleRate(192001))
        );

        builder.with_sample_rate(48000);
        assert!(builder.with_attention_secs(0.0).build().is_ok());
        assert!(builder.with_attention_secs(60.0).build().is_ok());
        assert_eq!(
            builder.with_attention_secs(60.5).build(),
            Err(ConfigError::AttentionDuration(60.5))
        );
        assert!(builder.with_attention_secs(-1.0).build().is_err());
        assert!(builder.with_attention_secs(f32::NAN).build().is_err());
    }

    #[test]
    fn test_identity() {
        let mut builder = EncoderBuilder::default();
        assert_eq!(
            builder.with_originator("XYZ").build(),
            Err(ConfigError::Originator(UnknownOriginator("XYZ".to_owned())))
        );
        builder.with_originator(" wxr ");
        assert_eq!(
            builder.build().unwrap().originator(),
            Originator::WeatherService
        );

        assert_eq!(
            builder.with_station("K\u{7f}XYZ").build(),
            Err(ConfigError::Station("K\u{7f}XYZ".to_owned()))
        );
        assert_eq!(
            builder.with_station("kxyz/am1234").build().unwrap().station(),
            "KXYZ/AM1"
        );
    }

    #[test]
    fn test_parse_errors() {
        let err: ConfigError = "loud".parse::<TonePolicy>().unwrap_err().into();
        assert!(err.to_string().contains("\"loud\""));
        let err: ConfigError = "parity".parse::<Framing>().unwrap_err().into();
        assert!(err.to_string().contains("nwsi"));
    }
}
