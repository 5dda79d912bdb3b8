//! Event and location resolution
//!
//! Alerts arrive with loosely-formatted codes. These functions
//! reduce them to values which are always safe to transmit,
//! degrading to protocol-safe defaults instead of failing.

use std::collections::HashSet;

use log::{debug, warn};

use crate::{EventCode, LocationCode, MAX_LOCATIONS};

/// How an event code was chosen
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::IntoStaticStr)]
pub enum EventSource {
    /// One of the candidate codes was in the registry
    #[strum(serialize = "candidate code")]
    Candidate,

    /// The event name matched a registry name or alias
    #[strum(serialize = "event name")]
    Name,

    /// Nothing matched; the generic default was used
    #[strum(serialize = "default")]
    Default,
}

/// A resolved event code, with its provenance
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResolvedEvent {
    code: EventCode,
    source: EventSource,
}

impl ResolvedEvent {
    /// The event code
    pub fn code(&self) -> EventCode {
        self.code
    }

    /// How the code was chosen
    pub fn source(&self) -> EventSource {
        self.source
    }

    /// True if the generic default was used
    pub fn is_default(&self) -> bool {
        self.source == EventSource::Default
    }
}

/// Resolve an alert's event code
///
/// 1. Each of the `candidates` is trimmed and upper-cased. The
///    first which is three alphanumeric characters and is in
///    the registry wins.
///
/// 2. Otherwise, the `event_name` is matched against registry
///    names and aliases, ignoring case and punctuation.
///
/// 3. Otherwise, the result is `CEM`, a Civil Emergency Message.
///    A warning is logged.
///
/// ```
/// use samegen::{resolve_event, EventSource};
///
/// let evt = resolve_event("Tornado Warning", ["xyz", " tor "]);
/// assert_eq!(evt.code().as_str(), "TOR");
/// assert_eq!(evt.source(), EventSource::Candidate);
///
/// let evt = resolve_event("Severe Thunderstorm Warning", Vec::<String>::new());
/// assert_eq!(evt.code().as_str(), "SVR");
/// assert_eq!(evt.source(), EventSource::Name);
///
/// let evt = resolve_event("Rain of Frogs", ["FRG"]);
/// assert_eq!(evt.code().as_str(), "CEM");
/// assert!(evt.is_default());
/// ```
pub fn resolve_event<I, S>(event_name: &str, candidates: I) -> ResolvedEvent
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for cand in candidates {
        let tidy = cand.as_ref().trim().to_ascii_uppercase();
        if tidy.len() != 3 || !tidy.bytes().all(|c| c.is_ascii_alphanumeric()) {
            debug!("resolver: ignoring malformed event code \"{}\"", cand.as_ref());
            continue;
        }
        match EventCode::lookup(&tidy) {
            Ok(code) => {
                return ResolvedEvent {
                    code,
                    source: EventSource::Candidate,
                }
            }
            Err(e) => debug!("resolver: {}", e),
        }
    }

    if let Some(code) = EventCode::by_name(event_name) {
        debug!(
            "resolver: event name \"{}\" is {}",
            event_name,
            code.as_str()
        );
        return ResolvedEvent {
            code,
            source: EventSource::Name,
        };
    }

    let code = EventCode::default();
    warn!(
        "resolver: no known event code for \"{}\"; sending {} ({})",
        event_name,
        code.as_str(),
        code
    );
    ResolvedEvent {
        code,
        source: EventSource::Default,
    }
}

/// Resolve an alert's event code
///
/// Like [`resolve_event()`], but discards the provenance.
pub fn resolve_event_code<I, S>(event_name: &str, candidates: I) -> EventCode
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    resolve_event(event_name, candidates).code()
}

/// Resolved location codes
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResolvedLocations {
    codes: Vec<LocationCode>,
    sentinel: bool,
    dropped: usize,
}

impl ResolvedLocations {
    /// Location codes, in output order
    ///
    /// There is always at least one, and never more than
    /// [`MAX_LOCATIONS`].
    pub fn codes(&self) -> &[LocationCode] {
        &self.codes
    }

    /// True if no usable codes were given and the `000000`
    /// sentinel was substituted
    pub fn is_sentinel(&self) -> bool {
        self.sentinel
    }

    /// Number of usable codes which exceeded [`MAX_LOCATIONS`]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Release the codes
    pub fn into_codes(self) -> Vec<LocationCode> {
        self.codes
    }
}

/// Resolve an alert's location codes
///
/// Each raw code is [normalized](LocationCode::normalize):
/// non-digits are removed, and the result is zero-padded or
/// truncated to six digits. Codes with no digits are dropped.
/// Duplicates are removed, keeping the first. If nothing is
/// left, the `000000` sentinel is used. At most
/// [`MAX_LOCATIONS`] codes are kept; the rest are dropped with a
/// warning.
///
/// ```
/// use samegen::resolve_locations;
///
/// let locs = resolve_locations(["39137", "039-137", "OH 039003", "none"]);
/// let codes: Vec<&str> = locs.codes().iter().map(|c| c.as_str()).collect();
/// assert_eq!(codes, vec!["039137", "039003"]);
///
/// let locs = resolve_locations(Vec::<String>::new());
/// assert!(locs.is_sentinel());
/// assert_eq!(locs.codes()[0].as_str(), "000000");
/// ```
pub fn resolve_locations<I, S>(raw_codes: I) -> ResolvedLocations
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut codes = Vec::new();
    for raw in raw_codes {
        match LocationCode::normalize(raw.as_ref()) {
            Some(loc) => {
                if seen.insert(loc) {
                    codes.push(loc);
                }
            }
            None => debug!("resolver: ignoring location \"{}\"", raw.as_ref()),
        }
    }

    let mut dropped = 0;
    if codes.len() > MAX_LOCATIONS {
        dropped = codes.len() - MAX_LOCATIONS;
        warn!(
            "resolver: {} location codes exceeds the limit of {}; dropping the last {}",
            codes.len(),
            MAX_LOCATIONS,
            dropped
        );
        codes.truncate(MAX_LOCATIONS);
    }

    let sentinel = codes.is_empty();
    if sentinel {
        warn!("resolver: no usable location codes; sending 000000");
        codes.push(LocationCode::sentinel());
    }

    ResolvedLocations {
        codes,
        sentinel,
        dropped,
    }
}

/// Resolve an alert's location codes
///
/// Like [`resolve_locations()`], but returns only the codes.
pub fn resolve_location_codes<I, S>(raw_codes: I) -> Vec<LocationCode>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    resolve_locations(raw_codes).into_codes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(codes: &[LocationCode]) -> Vec<&str> {
        codes.iter().map(|c| c.as_str()).collect()
    }

    #[test]
    fn test_resolve_event() {
        // first valid candidate wins, in order
        let evt = resolve_event("Tornado Warning", ["SVR", "TOR"]);
        assert_eq!(evt.code().as_str(), "SVR");

        // malformed and unknown candidates are skipped
        let evt = resolve_event("", ["TORNADO", "T-R", "ZZZ", "rwt"]);
        assert_eq!(evt.code().as_str(), "RWT");
        assert_eq!(evt.source(), EventSource::Candidate);

        // names are case and punctuation insensitive
        let evt = resolve_event("  SHELTER-IN-PLACE warning", Vec::<&str>::new());
        assert_eq!(evt.code().as_str(), "SPW");
        assert_eq!(evt.source(), EventSource::Name);

        let evt = resolve_event("", Vec::<&str>::new());
        assert_eq!(evt.source(), EventSource::Default);
        assert_eq!(
            resolve_event_code("unheard-of", ["???"]),
            EventCode::default()
        );
        let src: &'static str = EventSource::Default.into();
        assert_eq!(src, "default");
    }

    #[test]
    fn test_resolve_locations() {
        let locs = resolve_locations(["1", "12345678", "039137", "39137"]);
        assert_eq!(strs(locs.codes()), vec!["000001", "123456", "039137"]);
        assert!(!locs.is_sentinel());
        assert_eq!(locs.dropped(), 0);

        let locs = resolve_locations(["", "OHZ", "---"]);
        assert!(locs.is_sentinel());
        assert_eq!(strs(locs.codes()), vec!["000000"]);
    }

    #[test]
    fn test_location_cap() {
        let raw: Vec<String> = (1..=40).map(|i| format!("039{:03}", i)).collect();
        let locs = resolve_locations(&raw);
        assert_eq!(locs.codes().len(), MAX_LOCATIONS);
        assert_eq!(locs.dropped(), 9);
        assert_eq!(locs.codes()[0].as_str(), "039001");
        assert_eq!(locs.codes()[30].as_str(), "039031");

        // duplicates do not count against the cap
        let mut raw: Vec<String> = (1..=31).map(|i| format!("039{:03}", i)).collect();
        raw.extend(raw.clone());
        let locs = resolve_locations(&raw);
        assert_eq!(locs.codes().len(), MAX_LOCATIONS);
        assert_eq!(locs.dropped(), 0);
        assert_eq!(resolve_location_codes(&raw).len(), MAX_LOCATIONS);
    }
}
