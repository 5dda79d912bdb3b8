//! The SAME header

use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use arrayvec::ArrayVec;
use chrono::Duration;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use super::{EventCode, LocationCode, Originator, UnknownOriginator, UnrecognizedEventCode};
use crate::timing;

/// Prefix of every SAME header
pub const HEADER_PREFIX: &str = "ZCZC-";

/// End-of-message marker
pub const END_OF_MESSAGE: &str = "NNNN";

/// Maximum number of location codes in one header
pub const MAX_LOCATIONS: usize = 31;

/// Length of the station identifier field
pub const STATION_ID_LEN: usize = 8;

/// Error constructing or parsing a [`SameHeader`]
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum HeaderError {
    /// Header contains non-ASCII characters
    #[error("invalid SAME header: message contains non-ASCII characters")]
    NotAscii,

    /// Header does not match the SAME grammar
    #[error("invalid SAME header: message text does not match required pattern")]
    Malformed,

    /// Originator is not a known code
    #[error(transparent)]
    Originator(#[from] UnknownOriginator),

    /// Event code is not in the registry
    #[error(transparent)]
    Event(#[from] UnrecognizedEventCode),

    /// No location codes were given
    #[error("invalid SAME header: at least one location code is required")]
    NoLocations,

    /// More than [`MAX_LOCATIONS`] location codes were given
    #[error("invalid SAME header: {0} location codes exceeds the maximum of 31")]
    TooManyLocations(usize),

    /// The purge time is not `HHMM`, in fifteen-minute steps
    /// from `0015` to `0600`
    #[error("invalid SAME header: purge time \"{0}\" is not HHMM from 0015 to 0600 in 15-minute steps")]
    InvalidDuration(String),

    /// The issuance time is not `JJJHHMM`
    #[error("invalid SAME header: issue time \"{0}\" is not JJJHHMM")]
    InvalidIssueTime(String),

    /// The station identifier contains illegal characters
    #[error("invalid station id \"{0}\": only printable ASCII is permitted")]
    InvalidStation(String),
}

/// A validated SAME header
///
/// The header summarizes the alert which follows it: who sent
/// it, what the event is, where it applies, and when. It is
/// always valid ASCII of the form
///
/// ```txt
/// ZCZC-ORG-EEE-LLLLLL[-LLLLLL...]+TTTT-JJJHHMM-STATION-
/// ```
///
/// Headers are built from their fields with
/// [`new()`](SameHeader::new) or checked and parsed from text
/// with [`parse()`](SameHeader::parse). They are never modified
/// afterwards.
///
/// ```
/// use samegen::{EventCode, LocationCode, Originator, SameHeader};
///
/// let hdr = SameHeader::new(
///     Originator::WeatherService,
///     EventCode::lookup("TOR").unwrap(),
///     &[LocationCode::new("039137").unwrap()],
///     "0030",
///     "1231405",
///     "EASNODES",
/// ).unwrap();
/// assert_eq!(hdr.as_str(), "ZCZC-WXR-TOR-039137+0030-1231405-EASNODES-");
///
/// let parsed = SameHeader::parse(hdr.as_str()).unwrap();
/// assert_eq!(parsed, hdr);
/// assert_eq!(parsed.station(), "EASNODES");
/// assert_eq!(parsed.valid_duration_minutes(), 30);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SameHeader {
    // message content, including the leading `ZCZC-`
    message: String,

    // where does the time field begin?
    // includes the leading plus character (`+`)
    offset_time: usize,

    originator: Originator,
    event: EventCode,
    locations: ArrayVec<LocationCode, MAX_LOCATIONS>,
}

impl SameHeader {
    /// Build a header from its fields
    ///
    /// * `locations`: between 1 and 31 codes, sent in order
    /// * `duration_code`: purge time, like `0130`
    /// * `issue_time`: issuance `JJJHHMM`
    /// * `station`: station identifier, which is
    ///   [normalized](normalize_station)
    pub fn new(
        originator: Originator,
        event: EventCode,
        locations: &[LocationCode],
        duration_code: &str,
        issue_time: &str,
        station: &str,
    ) -> Result<Self, HeaderError> {
        if locations.is_empty() {
            return Err(HeaderError::NoLocations);
        }
        let locations: ArrayVec<LocationCode, MAX_LOCATIONS> = locations
            .try_into()
            .map_err(|_e| HeaderError::TooManyLocations(locations.len()))?;
        if !timing::parse_purge_time(duration_code).map_or(false, is_valid_purge_minutes) {
            return Err(HeaderError::InvalidDuration(duration_code.to_owned()));
        }
        if timing::parse_julian_timestamp(issue_time).is_none() {
            return Err(HeaderError::InvalidIssueTime(issue_time.to_owned()));
        }
        let station = normalize_station(station)?;

        let mut message = String::with_capacity(Self::encoded_len(locations.len()));
        message.push_str(HEADER_PREFIX);
        message.push_str(originator.as_str());
        message.push('-');
        message.push_str(event.as_str());
        for loc in &locations {
            message.push('-');
            message.push_str(loc.as_str());
        }
        let offset_time = message.len();
        message.push('+');
        message.push_str(duration_code);
        message.push('-');
        message.push_str(issue_time);
        message.push('-');
        message.push_str(&station);
        message.push('-');

        debug_assert!(check_header(&message).is_some());
        debug_assert_eq!(message.len(), Self::encoded_len(locations.len()));

        Ok(Self {
            message,
            offset_time,
            originator,
            event,
            locations,
        })
    }

    /// Parse and validate an existing header
    ///
    /// The text must match the SAME header grammar exactly,
    /// apart from surrounding whitespace. Every field is
    /// checked: the originator and event code must be known,
    /// and the times must be in range.
    pub fn parse<S>(text: S) -> Result<Self, HeaderError>
    where
        S: AsRef<str>,
    {
        let text = text.as_ref().trim();
        if !text.is_ascii() {
            return Err(HeaderError::NotAscii);
        }

        let caps = check_header(text).ok_or(HeaderError::Malformed)?;
        let field = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or_default();

        let originator = Originator::normalize(field(1))?;
        let event = EventCode::lookup(field(2))?;
        let locations: Vec<LocationCode> = field(3)
            .split('-')
            .filter(|s| !s.is_empty())
            .map(LocationCode::new)
            .collect::<Result<_, _>>()
            .map_err(|_e| HeaderError::Malformed)?;

        let station = field(6);
        if normalize_station(station)? != station {
            return Err(HeaderError::InvalidStation(station.to_owned()));
        }

        Self::new(
            originator,
            event,
            &locations,
            field(4),
            field(5),
            station,
        )
    }

    /// Message text
    pub fn as_str(&self) -> &str {
        &self.message
    }

    /// Originator
    pub fn originator(&self) -> Originator {
        self.originator
    }

    /// Originator code (as string), like "`WXR`"
    pub fn originator_str(&self) -> &str {
        &self.message[Self::OFFSET_ORG..Self::OFFSET_ORG + 3]
    }

    /// Event code
    pub fn event(&self) -> EventCode {
        self.event
    }

    /// Event code (as string), like "`TOR`"
    pub fn event_str(&self) -> &str {
        &self.message[Self::OFFSET_EVT..Self::OFFSET_EVT + 3]
    }

    /// Location codes, in the order they are sent
    pub fn locations(&self) -> &[LocationCode] {
        &self.locations
    }

    /// Iterator over location codes (as strings)
    pub fn location_str_iter<'m>(&'m self) -> std::str::Split<'m, char> {
        let locations = &self.message[Self::OFFSET_AREA_START..self.offset_time];
        locations.split('-')
    }

    /// Purge time (as string), like "`0130`"
    pub fn duration_str(&self) -> &str {
        &self.message[self.offset_time + Self::OFFSET_FROMPLUS_VALIDTIME
            ..self.offset_time + Self::OFFSET_FROMPLUS_VALIDTIME + 4]
    }

    /// Purge time, in minutes
    pub fn valid_duration_minutes(&self) -> u32 {
        timing::parse_purge_time(self.duration_str()).expect(Self::PANIC_MSG)
    }

    /// Purge time
    ///
    /// The message is valid for this long after its issuance
    /// time.
    pub fn valid_duration(&self) -> Duration {
        Duration::minutes(self.valid_duration_minutes() as i64)
    }

    /// Issuance time (as string), `JJJHHMM`
    pub fn issue_time_str(&self) -> &str {
        &self.message[self.offset_time + Self::OFFSET_FROMPLUS_ISSUETIME
            ..self.offset_time + Self::OFFSET_FROMPLUS_ISSUETIME + 7]
    }

    /// Issuance time fields (`day`, `hour`, `minute`)
    ///
    /// `day` is the ordinal day of the year; times are UTC.
    pub fn issue_daytime_fields(&self) -> (u16, u8, u8) {
        timing::parse_julian_timestamp(self.issue_time_str()).expect(Self::PANIC_MSG)
    }

    /// Station identifier, always eight characters
    pub fn station(&self) -> &str {
        &self.message[self.offset_time + Self::OFFSET_FROMPLUS_CALLSIGN
            ..self.message.len() - Self::OFFSET_FROMEND_CALLSIGN_END]
    }

    /// Field-by-field breakdown, for display
    pub fn describe(&self) -> HeaderBreakdown {
        HeaderBreakdown::new(self)
    }

    /// Obtain the owned message String
    pub fn release(self) -> String {
        self.message
    }

    /// Length of an encoded header with `num_locations` locations
    pub fn encoded_len(num_locations: usize) -> usize {
        Self::OFFSET_AREA_START + 7 * num_locations - 1 + 23
    }

    const OFFSET_ORG: usize = 5;
    const OFFSET_EVT: usize = 9;
    const OFFSET_AREA_START: usize = 13;
    const OFFSET_FROMPLUS_VALIDTIME: usize = 1;
    const OFFSET_FROMPLUS_ISSUETIME: usize = 6;
    const OFFSET_FROMPLUS_CALLSIGN: usize = 14;
    const OFFSET_FROMEND_CALLSIGN_END: usize = 1;
    const PANIC_MSG: &'static str = "SameHeader validity check admitted a malformed message";
}

impl fmt::Display for SameHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.message.fmt(f)
    }
}

impl AsRef<str> for SameHeader {
    #[inline]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<[u8]> for SameHeader {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_str().as_bytes()
    }
}

impl From<SameHeader> for String {
    #[inline]
    fn from(hdr: SameHeader) -> String {
        hdr.release()
    }
}

impl TryFrom<&str> for SameHeader {
    type Error = HeaderError;

    #[inline]
    fn try_from(inp: &str) -> Result<Self, Self::Error> {
        Self::parse(inp)
    }
}

impl FromStr for SameHeader {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Normalize a station identifier
///
/// The identifier is upper-cased, and minus signs (`-`), which
/// would break the header grammar, are replaced with slashes
/// (`/`). It is then padded with spaces or truncated to exactly
/// eight characters. Identifiers with characters other than
/// printable ASCII, or which are blank, are rejected.
///
/// ```
/// use samegen::normalize_station;
///
/// assert_eq!(normalize_station("kxyz-fm").unwrap(), "KXYZ/FM ");
/// assert_eq!(normalize_station("WXYZ/TV/NEWS").unwrap(), "WXYZ/TV/");
/// assert!(normalize_station("KÖLN").is_err());
/// ```
pub fn normalize_station(station: &str) -> Result<String, HeaderError> {
    let printable = station.chars().all(|c| c == ' ' || c.is_ascii_graphic());
    if !printable || station.trim().is_empty() {
        return Err(HeaderError::InvalidStation(station.to_owned()));
    }

    let mut out: String = station
        .chars()
        .take(STATION_ID_LEN)
        .map(|c| match c {
            '-' => '/',
            c => c.to_ascii_uppercase(),
        })
        .collect();
    while out.len() < STATION_ID_LEN {
        out.push(' ');
    }
    Ok(out)
}

/// Human-readable breakdown of a [`SameHeader`]
///
/// Lists each field of the header with its raw text and its
/// meaning. The `Display` form is suitable for print and audit
/// views.
///
/// ```
/// use samegen::SameHeader;
///
/// let hdr = SameHeader::parse("ZCZC-WXR-TOR-039137+0030-1231405-EASNODES-").unwrap();
/// let text = hdr.describe().to_string();
/// assert!(text.contains("Tornado Warning"));
/// assert!(text.contains("039137"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderBreakdown {
    fields: Vec<(&'static str, String)>,
}

impl HeaderBreakdown {
    fn new(hdr: &SameHeader) -> Self {
        let (day, hour, minute) = hdr.issue_daytime_fields();
        let minutes = hdr.valid_duration_minutes();
        let locations: Vec<String> = hdr
            .locations()
            .iter()
            .map(|loc| {
                if loc.is_sentinel() {
                    format!("{} (unspecified)", loc)
                } else {
                    format!(
                        "{} (part {}, state {}, county {})",
                        loc,
                        loc.part(),
                        loc.state(),
                        loc.county()
                    )
                }
            })
            .collect();

        let fields = vec![
            (
                "Originator",
                format!("{} ({})", hdr.originator_str(), hdr.originator()),
            ),
            (
                "Event",
                format!(
                    "{} ({}, {})",
                    hdr.event_str(),
                    hdr.event(),
                    hdr.event().significance()
                ),
            ),
            ("Locations", locations.join(", ")),
            (
                "Valid for",
                format!(
                    "{} ({} h {:02} min)",
                    hdr.duration_str(),
                    minutes / 60,
                    minutes % 60
                ),
            ),
            (
                "Issued",
                format!(
                    "{} (day {}, {:02}:{:02} UTC)",
                    hdr.issue_time_str(),
                    day,
                    hour,
                    minute
                ),
            ),
            ("Station", format!("\"{}\"", hdr.station())),
        ];
        Self { fields }
    }

    /// Labelled fields, in header order
    pub fn fields(&self) -> &[(&'static str, String)] {
        &self.fields
    }
}

impl fmt::Display for HeaderBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, value) in &self.fields {
            writeln!(f, "{:<12}{}", format!("{}:", label), value)?;
        }
        Ok(())
    }
}

// Check header for grammar compliance
//
// Returns the capture groups for originator, event, locations
// (with leading `-`), purge time, issue time, and station.
fn check_header(hdr: &str) -> Option<regex::Captures<'_>> {
    lazy_static! {
        static ref RE: Regex = Regex::new(
            r"^ZCZC-([A-Z]{3})-([A-Z0-9]{3})((?:-[0-9]{6}){1,31})\+([0-9]{4})-([0-9]{7})-([^-]{8})-$"
        )
        .expect("bad SAME regexp");
    }

    RE.captures(hdr)
}

fn is_valid_purge_minutes(minutes: u32) -> bool {
    (timing::MIN_DURATION_MINUTES..=timing::MAX_DURATION_MINUTES).contains(&minutes)
        && minutes % timing::DURATION_STEP_MINUTES == 0
}
