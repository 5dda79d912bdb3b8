//! Significance level

use std::fmt;

use strum::EnumMessage;

/// How urgent an event is
///
/// Each [`EventCode`](crate::EventCode) in the registry has a
/// significance level, which the encoder uses to pick an
/// [attention tone](crate::ToneProfile::recommended_for). Levels
/// are ordered from least to most urgent.
///
/// | Code | Level     | Attention tone (`auto`) |
/// |------|-----------|-------------------------|
/// | `T`  | Test      | none                    |
/// | `M`  | Message   | single                  |
/// | `S`  | Statement | single                  |
/// | `E`  | Emergency | dual                    |
/// | `A`  | Watch     | dual                    |
/// | `W`  | Warning   | dual                    |
///
/// The last letter of an event code is often, but not always,
/// its level: `TOA` is a watch, but `EVI` is a warning.
///
/// ```
/// use samegen::SignificanceLevel;
///
/// let sig = SignificanceLevel::from_code("A").unwrap();
/// assert_eq!(sig, SignificanceLevel::Watch);
/// assert_eq!(sig.to_string(), "Watch");
/// assert_eq!(format!("{:#}", sig), "A");
/// assert!(SignificanceLevel::from_code("Q").is_none());
///
/// assert!(SignificanceLevel::Test < SignificanceLevel::Statement);
/// assert!(SignificanceLevel::Watch < SignificanceLevel::Warning);
/// ```
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum_macros::EnumMessage,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[repr(u8)]
pub enum SignificanceLevel {
    /// Routine test of the alerting chain
    #[strum(serialize = "T", detailed_message = "Test")]
    Test,

    /// Administrative or non-emergency message
    #[strum(serialize = "M", detailed_message = "Message")]
    Message,

    /// Follow-up to an earlier watch, warning, or emergency
    #[strum(serialize = "S", detailed_message = "Statement")]
    Statement,

    /// Situation which may lead to a hazard
    #[strum(serialize = "E", detailed_message = "Emergency")]
    Emergency,

    /// Hazard is possible, but its timing or location is uncertain
    #[strum(serialize = "A", detailed_message = "Watch")]
    Watch,

    /// Hazard is imminent or occurring
    #[strum(serialize = "W", detailed_message = "Warning")]
    Warning,
}

impl SignificanceLevel {
    /// Parse from a one-character code like "`T`"
    pub fn from_code<S>(code: S) -> Option<Self>
    where
        S: AsRef<str>,
    {
        str::parse(code.as_ref()).ok()
    }

    /// Level name, like "`Warning`"
    pub fn as_display_str(&self) -> &'static str {
        self.get_detailed_message().expect("missing definition")
    }

    /// One-character code, like "`W`"
    pub fn as_code_str(&self) -> &'static str {
        self.get_serializations()[0]
    }
}

impl AsRef<str> for SignificanceLevel {
    fn as_ref(&self) -> &'static str {
        self.as_code_str()
    }
}

impl fmt::Display for SignificanceLevel {
    // alternate form prints the code
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            self.as_code_str().fmt(f)
        } else {
            self.as_display_str().fmt(f)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use strum::IntoEnumIterator;

    #[test]
    fn test_codes_round_trip() {
        for sig in SignificanceLevel::iter() {
            assert_eq!(SignificanceLevel::from_code(sig.as_code_str()), Some(sig));
            assert_eq!(sig.as_code_str().len(), 1);
        }
        assert_eq!(SignificanceLevel::from_code(""), None);
    }
}
