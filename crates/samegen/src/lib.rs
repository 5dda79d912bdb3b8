//! # samegen: SAME/EAS Encoding
//!
//! This crate provides an encoder for
//! [Specific Area Message Encoding](https://en.wikipedia.org/wiki/Specific_Area_Message_Encoding)
//! (SAME). It turns a parsed alert into a byte-exact SAME header
//! and a complete broadcast activation: header bursts, attention
//! tone, optional voice narration, and end-of-message bursts,
//! ready to be played out or archived.
//!
//! ## Disclaimer
//!
//! Licensed under either MIT or Apache 2.0, at your option.
//!
//! This crate has not been certified as an EAS encoder or for any
//! other purpose. Transmitting SAME headers over the air is
//! regulated in most places. Be sure you are permitted to do so
//! before connecting this crate to a transmitter.
//!
//! ## Example
//!
//! Configure an encoder with your output sampling rate and
//! station identity. Then describe each alert with an
//! [`AlertContext`] and encode it.
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use samegen::{AlertContext, EncoderBuilder, SameEncoder, Segment};
//!
//! // create a SameEncoder with your audio sampling rate
//! let config = EncoderBuilder::new(22050)
//!     .with_station("KXYZ/FM")       // station id, up to eight characters
//!     .with_attention_secs(8.0)      // attention tone, 0 to 60 seconds
//!     .build()
//!     .expect("bad configuration");
//! let encoder = SameEncoder::new(config);
//!
//! // describe the alert
//! let sent = Utc.with_ymd_and_hms(2024, 5, 2, 14, 5, 0).unwrap();
//! let alert = AlertContext::new("Severe Thunderstorm Warning")
//!     .with_event_code("SVR")
//!     .with_originator("WXR")
//!     .with_sent(sent)
//!     .with_expires(sent + Duration::minutes(45))
//!     .with_geocodes(["039137", "039003"]);
//!
//! // encode it
//! let package = encoder.encode(&alert, None).expect("encoding failed");
//! assert_eq!(
//!     package.header_str(),
//!     "ZCZC-WXR-SVR-039137-039003+0045-1231405-KXYZ/FM -"
//! );
//!
//! // render WAV files for playout or archival
//! let wav = package.render().expect("WAV error");
//! assert_eq!(&wav.composite().bytes()[0..4], b"RIFF");
//! assert!(wav.segment(Segment::Header).is_some());
//! ```
//!
//! Encoding does not fail because an alert is incomplete.
//! Unknown events are sent as `CEM` (Civil Emergency Message),
//! alerts without usable locations are sent to `000000`, and
//! alerts without an expiration are given the minimum fifteen
//! minute purge time. Every such substitution is logged and is
//! listed in
//! [`BroadcastPackage::degradations()`](BroadcastPackage::degradations).
//!
//! Encoding *does* fail if the configured or overridden
//! originator or station identifier is unusable, or if the
//! narration is sampled at the wrong rate. When the
//! [loopback check](EncoderBuilder::with_loopback_check) is on,
//! encoding also fails if the generated audio does not decode
//! back to the header which was meant to be sent.
//!
//! ## Headers
//!
//! An example header, in ASCII format, is:
//!
//! ```txt
//! ZCZC-WXR-RWT-039035-039093+0015-0321115-KCLE/NWS-
//! ```
//!
//! Existing headers may be validated and broken down into their
//! fields:
//!
//! ```
//! use samegen::{Originator, SameHeader, SignificanceLevel};
//!
//! let hdr = SameHeader::parse(
//!     "ZCZC-WXR-RWT-039035-039093+0015-0321115-KCLE/NWS-"
//! ).expect("invalid header");
//!
//! assert_eq!(hdr.originator(), Originator::WeatherService);
//! assert_eq!(hdr.event().name(), "Required Weekly Test");
//! assert_eq!(hdr.event().significance(), SignificanceLevel::Test);
//!
//! let areas: Vec<&str> = hdr.location_str_iter().collect();
//! assert_eq!(areas, ["039035", "039093"]);
//!
//! // print a field-by-field breakdown
//! println!("{}", hdr.describe());
//! ```
//!
//! ## Lower-level interfaces
//!
//! Each stage of the encoder is also available on its own:
//!
//! * [`resolve_event()`] and [`resolve_locations()`] reduce
//!   loosely-formatted alert data to transmittable codes;
//! * [`julian_timestamp()`] and [`duration_code()`] compute the
//!   header's time fields;
//! * [`AfskModulator`] renders text as AFSK bursts;
//! * [`tone()`] and [`silence()`] generate attention tones and
//!   gaps;
//! * [`assemble()`] lays out a complete broadcast; and
//! * [`emit_wav()`] renders any [`Waveform`] as a WAV file.
//!
//! ## Background
//!
//! A SAME activation interrupts a station's regular audio. NOAA
//! Weather Radio transmitters, along with the radio, television,
//! and cable participants of the
//! [Emergency Alert System](https://en.wikipedia.org/wiki/Emergency_Alert_System),
//! relay these activations to the public.
//!
//! The header travels in-band with the program audio as
//! two-tone FSK at 520.83 baud: a mark of 2083.3 Hz for each one
//! bit and a space of 1562.5 Hz for each zero. Receivers need
//! three copies of the header to trust it, so each one is sent
//! three times. The end-of-message marker `NNNN` is sent the
//! same way.

#![deny(unsafe_code)]

mod alert;
mod assembler;
mod builder;
mod emitter;
mod encoder;
pub mod eventcodes;
mod framing;
mod geocode;
mod message;
mod modulator;
mod relay;
mod resolver;
mod timing;
mod tone;
mod verify;
mod waveform;

pub use alert::AlertContext;
pub use assembler::{
    assemble, AssemblyError, AssemblyOptions, BroadcastPackage, Segment, BURST_GAP_SECS,
    HEADER_REPEATS, PRE_EOM_GAP_SECS,
};
pub use builder::{ConfigError, EncoderBuilder, EncoderConfig, MAX_ATTENTION_SECS};
pub use emitter::{emit_wav, read_wav, wav_spec, EmitError, EmittedAudio, RenderedPackage};
pub use encoder::{build_header, Degradation, EncodeError, SameEncoder};
pub use framing::{BitFrame, Framing, UnknownFraming, FRAME_BITS, FRAME_TERMINATOR, PREAMBLE_LEN};
pub use geocode::{select_geocodes, state_fips, ugc_to_same, GeocodeKey};
pub use message::{
    normalize_station, EventCode, HeaderBreakdown, HeaderError, InvalidLocationCode, LocationCode,
    Originator, SameHeader, SignificanceLevel, UnknownOriginator, UnrecognizedEventCode,
    END_OF_MESSAGE, HEADER_PREFIX, LOCATION_CODE_LEN, MAX_LOCATIONS, STATION_ID_LEN,
};
pub use modulator::AfskModulator;
pub use relay::{keyed, NoRelay, Relay};
pub use resolver::{
    resolve_event, resolve_event_code, resolve_location_codes, resolve_locations, EventSource,
    ResolvedEvent, ResolvedLocations,
};
pub use timing::{
    duration_code, format_purge_time, julian_timestamp, parse_julian_timestamp, parse_purge_time,
    quantize_duration, DEFAULT_DURATION_CODE, DURATION_STEP_MINUTES, MAX_DURATION_MINUTES,
    MIN_DURATION_MINUTES,
};
pub use tone::{
    silence, tone, ToneError, TonePolicy, ToneProfile, UnknownToneProfile, ATTENTION_TONE_HZ,
    WEATHER_TONE_HZ,
};
pub use verify::{decode_burst, verify_burst, VerifyError};
pub use waveform::{
    Waveform, AMPLITUDE, BAUD_HZ, FSK_MARK_HZ, FSK_SPACE_HZ, MAX_SAMPLE_RATE, MIN_SAMPLE_RATE,
};
