//! The alert to be encoded

use chrono::{DateTime, Utc};

use crate::geocode::select_geocodes;

/// Facts about an alert, as received from upstream
///
/// An `AlertContext` holds everything the
/// [encoder](crate::SameEncoder) needs to know about one alert.
/// The values are raw: event codes and locations are resolved
/// during encoding, and malformed values degrade to safe
/// defaults.
///
/// Contexts are built with consuming `with_*()` methods and are
/// read-only afterwards.
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use samegen::AlertContext;
///
/// let sent = Utc.with_ymd_and_hms(2024, 5, 2, 14, 5, 0).unwrap();
/// let ctx = AlertContext::new("Tornado Warning")
///     .with_event_code("TOR")
///     .with_originator("WXR")
///     .with_sent(sent)
///     .with_expires(sent + Duration::minutes(30))
///     .with_geocode("039137");
///
/// assert_eq!(ctx.event_name(), "Tornado Warning");
/// assert_eq!(ctx.event_codes(), &["TOR"]);
/// assert_eq!(ctx.originator(), Some("WXR"));
/// assert_eq!(ctx.station(), None);
/// assert_eq!(ctx.geocodes(), &["039137"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AlertContext {
    event_name: String,
    event_codes: Vec<String>,
    originator: Option<String>,
    station: Option<String>,
    sent: Option<DateTime<Utc>>,
    expires: Option<DateTime<Utc>>,
    geocodes: Vec<String>,
}

impl AlertContext {
    /// New alert with a free-text event name
    pub fn new<S>(event_name: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            event_name: event_name.into(),
            ..Self::default()
        }
    }

    /// Add a candidate event code
    ///
    /// Candidates are tried in the order they are added.
    pub fn with_event_code<S>(mut self, code: S) -> Self
    where
        S: Into<String>,
    {
        self.event_codes.push(code.into());
        self
    }

    /// Add several candidate event codes
    pub fn with_event_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.event_codes.extend(codes.into_iter().map(Into::into));
        self
    }

    /// Override the configured originator
    pub fn with_originator<S>(mut self, originator: S) -> Self
    where
        S: Into<String>,
    {
        self.originator = Some(originator.into());
        self
    }

    /// Override the configured station identifier
    pub fn with_station<S>(mut self, station: S) -> Self
    where
        S: Into<String>,
    {
        self.station = Some(station.into());
        self
    }

    /// Issuance time
    ///
    /// If unset, the time of encoding is used.
    pub fn with_sent(mut self, sent: DateTime<Utc>) -> Self {
        self.sent = Some(sent);
        self
    }

    /// Expiration time
    pub fn with_expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Add a raw geographic code
    pub fn with_geocode<S>(mut self, code: S) -> Self
    where
        S: Into<String>,
    {
        self.geocodes.push(code.into());
        self
    }

    /// Add several raw geographic codes
    pub fn with_geocodes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.geocodes.extend(codes.into_iter().map(Into::into));
        self
    }

    /// Add geographic codes from CAP `(valueName, value)` pairs
    ///
    /// One geocode scheme is chosen with
    /// [`select_geocodes()`](crate::select_geocodes).
    pub fn with_cap_geocodes<I, K, V>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.with_geocodes(select_geocodes(pairs))
    }

    /// Free-text event name
    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    /// Candidate event codes, in order of preference
    pub fn event_codes(&self) -> &[String] {
        &self.event_codes
    }

    /// Originator override
    pub fn originator(&self) -> Option<&str> {
        self.originator.as_deref()
    }

    /// Station identifier override
    pub fn station(&self) -> Option<&str> {
        self.station.as_deref()
    }

    /// Issuance time
    pub fn sent(&self) -> Option<&DateTime<Utc>> {
        self.sent.as_ref()
    }

    /// Expiration time
    pub fn expires(&self) -> Option<&DateTime<Utc>> {
        self.expires.as_ref()
    }

    /// Raw geographic codes
    pub fn geocodes(&self) -> &[String] {
        &self.geocodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cap_geocodes() {
        let ctx = AlertContext::new("Flood Warning")
            .with_event_codes(["FLW", "FLS"])
            .with_cap_geocodes([("UGC", "OHC049"), ("SAME", "039049")])
            .with_geocode("039041");
        assert_eq!(ctx.event_codes(), &["FLW", "FLS"]);
        assert_eq!(ctx.geocodes(), &["039049", "039041"]);
        assert!(ctx.sent().is_none());
        assert!(ctx.expires().is_none());
    }
}
