//! Event codes

use std::fmt;
use std::hash::{Hash, Hasher};

use thiserror::Error;

use crate::eventcodes::{self, EventEntry};
use crate::SignificanceLevel;

/// A SAME event code from the registry
///
/// Every `EventCode` is known to the
/// [event registry](crate::eventcodes), so it is always safe to
/// transmit. Codes may be looked up by their three-character
/// representation or by name.
///
/// ```
/// use samegen::{EventCode, SignificanceLevel};
///
/// let evt = EventCode::lookup("TOR").unwrap();
/// assert_eq!("TOR", evt.as_str());
/// assert_eq!("Tornado Warning", evt.name());
/// assert_eq!(SignificanceLevel::Warning, evt.significance());
/// assert_eq!("Tornado Warning", format!("{}", evt));
/// assert_eq!("TOR", format!("{:#}", evt));
///
/// assert_eq!(evt, EventCode::by_name("TORNADO").unwrap());
/// assert!(EventCode::lookup("XYZ").is_err());
/// ```
///
/// The default event code is `CEM`, a Civil Emergency Message.
///
/// ```
/// # use samegen::EventCode;
/// assert_eq!("CEM", EventCode::default().as_str());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct EventCode {
    code: &'static str,
    entry: &'static EventEntry,
}

impl EventCode {
    /// Lookup a three-character code like "`RWT`"
    ///
    /// The code must match a registry entry exactly.
    pub fn lookup<S>(code: S) -> Result<Self, UnrecognizedEventCode>
    where
        S: AsRef<str>,
    {
        eventcodes::lookup_code(code.as_ref())
            .map(|(code, entry)| Self { code, entry })
            .ok_or_else(|| UnrecognizedEventCode(code.as_ref().to_owned()))
    }

    /// Lookup an event by name, like "`Tornado Warning`"
    ///
    /// Matching ignores case and punctuation. Aliases, like
    /// "`Amber Alert`", are also accepted.
    pub fn by_name<S>(name: S) -> Option<Self>
    where
        S: AsRef<str>,
    {
        eventcodes::lookup_name(name).map(|(code, entry)| Self { code, entry })
    }

    /// Iterate over all known event codes
    ///
    /// Ordering is unspecified.
    pub fn iter() -> impl Iterator<Item = EventCode> {
        eventcodes::entries().map(|(code, entry)| Self { code, entry })
    }

    /// Three-character SAME code, like "`TOR`"
    pub fn as_str(&self) -> &'static str {
        self.code
    }

    /// Human-readable name, like "`Tornado Warning`"
    pub fn name(&self) -> &'static str {
        self.entry.name
    }

    /// Significance level
    pub fn significance(&self) -> SignificanceLevel {
        self.entry.significance
    }

    /// Alternate names for this event
    pub fn aliases(&self) -> &'static [&'static str] {
        self.entry.aliases
    }
}

impl Default for EventCode {
    fn default() -> Self {
        Self::lookup(eventcodes::DEFAULT_EVENT_CODE).expect("default event code not in registry")
    }
}

impl PartialEq for EventCode {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for EventCode {}

impl Hash for EventCode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state)
    }
}

impl AsRef<str> for EventCode {
    fn as_ref(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for EventCode {
    /// Printable string
    ///
    /// * The normal form is a human-readable string like "`Tornado Warning`"
    /// * The alternate form is the three-character code like "`TOR`"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            self.as_str().fmt(f)
        } else {
            self.name().fmt(f)
        }
    }
}

/// An event code which is not in the registry
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("event code \"{0}\" is not a known SAME event")]
pub struct UnrecognizedEventCode(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    #[test]
    fn test_event_code() {
        let rwt = EventCode::lookup("RWT").unwrap();
        assert_eq!(rwt.significance(), SignificanceLevel::Test);
        assert_eq!(rwt.name(), "Required Weekly Test");
        assert!(rwt.aliases().contains(&"Weekly Test"));

        assert_eq!(
            EventCode::lookup("rwt"),
            Err(UnrecognizedEventCode("rwt".to_owned()))
        );

        let all: HashSet<EventCode> = EventCode::iter().collect();
        assert_eq!(all.len(), 61);
        assert!(all.contains(&rwt));
        assert!(all.contains(&EventCode::default()));
    }
}
