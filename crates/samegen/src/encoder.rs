//! The encoding pipeline

use std::fmt;

use chrono::{DateTime, Utc};
use log::{info, warn};
use thiserror::Error;

use crate::alert::AlertContext;
use crate::assembler::{assemble, AssemblyError, AssemblyOptions, BroadcastPackage};
use crate::builder::EncoderConfig;
use crate::message::{
    normalize_station, HeaderError, Originator, SameHeader, UnknownOriginator, MAX_LOCATIONS,
};
use crate::resolver::{resolve_event, resolve_locations};
use crate::timing::{duration_code, julian_timestamp, DEFAULT_DURATION_CODE};
use crate::verify::VerifyError;
use crate::waveform::Waveform;

/// A default substituted for bad or missing alert data
///
/// Degradations are not errors: the package is still safe to
/// transmit. Each one is logged as a warning when it happens
/// and is listed in
/// [`BroadcastPackage::degradations()`](crate::BroadcastPackage::degradations).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Degradation {
    /// No event code could be resolved; `CEM` was sent
    DefaultEventCode,

    /// No usable location codes; `000000` was sent
    SentinelLocation,

    /// Location codes beyond the limit were dropped
    LocationsTruncated {
        /// Number of codes dropped
        dropped: usize,
    },

    /// Validity window unknown; the minimum purge time was sent
    MissingExpiration,

    /// Issuance time unknown; the time of encoding was sent
    MissingIssueTime,
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degradation::DefaultEventCode => write!(f, "event not recognized; sent CEM"),
            Degradation::SentinelLocation => write!(f, "no usable locations; sent 000000"),
            Degradation::LocationsTruncated { dropped } => write!(
                f,
                "dropped {} location(s) beyond the limit of {}",
                dropped, MAX_LOCATIONS
            ),
            Degradation::MissingExpiration => {
                write!(f, "no expiration time; sent purge time {}", DEFAULT_DURATION_CODE)
            }
            Degradation::MissingIssueTime => {
                write!(f, "no issuance time; sent the time of encoding")
            }
        }
    }
}

/// Error encoding an alert
///
/// No audio is returned when encoding fails.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum EncodeError {
    /// The alert's originator is not a known code
    #[error(transparent)]
    Originator(#[from] UnknownOriginator),

    /// The alert's station identifier contains illegal characters
    #[error("invalid station id \"{0}\": only printable ASCII is permitted")]
    Station(String),

    /// The header could not be built
    #[error(transparent)]
    Header(#[from] HeaderError),

    /// The package could not be assembled
    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    /// The generated audio does not decode to what was sent
    #[error("loopback check failed: {0}")]
    Verify(#[from] VerifyError),
}

/// Build the SAME header for an alert
///
/// Event and location codes are [resolved](crate::resolve_event),
/// with defaults for anything that cannot be. The originator
/// and station identifier come from the alert if it has them,
/// or from the `config` if it does not. An originator or station
/// which cannot be normalized is an error.
///
/// Alerts without an issuance time are stamped with the current
/// time.
pub fn build_header(ctx: &AlertContext, config: &EncoderConfig) -> Result<SameHeader, EncodeError> {
    build_header_at(ctx, config, Utc::now()).map(|(header, _)| header)
}

// Build the header, reporting every default which was substituted
pub(crate) fn build_header_at(
    ctx: &AlertContext,
    config: &EncoderConfig,
    now: DateTime<Utc>,
) -> Result<(SameHeader, Vec<Degradation>), EncodeError> {
    let mut degradations = Vec::new();

    let originator = match ctx.originator() {
        Some(org) => Originator::normalize(org)?,
        None => config.originator(),
    };
    let station = match ctx.station() {
        Some(station) => {
            normalize_station(station).map_err(|_e| EncodeError::Station(station.to_owned()))?
        }
        None => config.station().to_owned(),
    };

    let event = resolve_event(ctx.event_name(), ctx.event_codes());
    if event.is_default() {
        degradations.push(Degradation::DefaultEventCode);
    }

    let locations = resolve_locations(ctx.geocodes());
    if locations.is_sentinel() {
        degradations.push(Degradation::SentinelLocation);
    }
    if locations.dropped() > 0 {
        degradations.push(Degradation::LocationsTruncated {
            dropped: locations.dropped(),
        });
    }

    let issued = match ctx.sent() {
        Some(sent) => *sent,
        None => {
            warn!("encoder: alert has no issuance time; using {}", now);
            degradations.push(Degradation::MissingIssueTime);
            now
        }
    };
    if ctx.expires().is_none() {
        warn!(
            "encoder: alert has no expiration time; sending purge time {}",
            DEFAULT_DURATION_CODE
        );
        degradations.push(Degradation::MissingExpiration);
    }

    let header = SameHeader::new(
        originator,
        event.code(),
        locations.codes(),
        &duration_code(ctx.sent(), ctx.expires()),
        &julian_timestamp(&issued),
        &station,
    )?;
    Ok((header, degradations))
}

/// SAME encoder
///
/// The encoder turns an [`AlertContext`] into a complete
/// [`BroadcastPackage`]: header bursts, attention tone, optional
/// narration, and end-of-message bursts.
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use samegen::{AlertContext, EncoderBuilder, SameEncoder};
///
/// let config = EncoderBuilder::new(22050)
///     .with_station("EASNODES")
///     .build()
///     .unwrap();
/// let encoder = SameEncoder::new(config);
///
/// let sent = Utc.with_ymd_and_hms(2024, 5, 2, 14, 5, 0).unwrap();
/// let alert = AlertContext::new("Tornado Warning")
///     .with_originator("WXR")
///     .with_sent(sent)
///     .with_expires(sent + Duration::minutes(30))
///     .with_geocode("039137");
///
/// let package = encoder.encode(&alert, None).unwrap();
/// assert_eq!(
///     package.header_str(),
///     "ZCZC-WXR-TOR-039137+0030-1231405-EASNODES-"
/// );
/// assert!(package.degradations().is_empty());
/// ```
///
/// The encoder holds only its configuration. It may be shared
/// between threads, and each call to
/// [`encode()`](SameEncoder::encode) is independent.
#[derive(Clone, Debug, PartialEq)]
pub struct SameEncoder {
    config: EncoderConfig,
}

impl SameEncoder {
    /// Create an encoder
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// Encoder configuration
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Encode an alert
    ///
    /// Optional `narration` is sent between the attention tone
    /// and the end-of-message bursts. It must be sampled at the
    /// configured rate.
    ///
    /// Missing or malformed alert data is replaced with safe
    /// defaults, which are reported in
    /// [`BroadcastPackage::degradations()`]. Errors are
    /// returned only when the alert cannot be sent at all or
    /// when the loopback check fails.
    pub fn encode(
        &self,
        ctx: &AlertContext,
        narration: Option<Waveform>,
    ) -> Result<BroadcastPackage, EncodeError> {
        self.encode_at(ctx, narration, Utc::now())
    }

    /// Encode an alert, with a fixed current time
    ///
    /// As [`encode()`](SameEncoder::encode), but `now` stands in
    /// for the system clock when the alert has no issuance
    /// time.
    pub fn encode_at(
        &self,
        ctx: &AlertContext,
        narration: Option<Waveform>,
        now: DateTime<Utc>,
    ) -> Result<BroadcastPackage, EncodeError> {
        let (header, degradations) = build_header_at(ctx, &self.config, now)?;

        let options = AssemblyOptions {
            sample_rate: self.config.sample_rate(),
            framing: self.config.framing(),
            tone_profile: self.config.tone_policy().profile_for(&header.event()),
            attention_secs: self.config.attention_secs(),
            narration,
        };
        let package = assemble(header, &options)?.with_degradations(degradations);

        if self.config.loopback_check() {
            package.self_check()?;
        }

        info!(
            "encoder: {} ({:.1} s, {} tone, {} degradation(s))",
            package.header(),
            package.duration().as_secs_f32(),
            package.tone_profile(),
            package.degradations().len()
        );
        Ok(package)
    }
}

impl From<EncoderConfig> for SameEncoder {
    fn from(config: EncoderConfig) -> Self {
        Self::new(config)
    }
}
