//! Originator code

use std::fmt;
use std::str::FromStr;

use strum::{EnumMessage, IntoEnumIterator};
use thiserror::Error;

/// Who is sending the activation
///
/// Identifies who is responsible for the activation. Originator
/// identity carries regulatory meaning, so only the four codes
/// defined for the United States may be sent. There is no
/// "unknown" originator.
///
/// Originators are parsed with [`Originator::normalize()`],
/// which tolerates surrounding whitespace and lowercase input.
/// Using them `.as_ref()` gives the three-character code, and
/// `Display` shows a human-readable string.
///
/// ```
/// use samegen::Originator;
///
/// let orig = Originator::normalize(" wxr ").unwrap();
/// assert_eq!(orig, Originator::WeatherService);
/// assert_eq!(orig.as_ref(), "WXR");
/// assert_eq!(orig.to_string(), "National Weather Service");
///
/// assert!(Originator::normalize("HUH").is_err());
/// assert!(Originator::normalize("WX").is_err());
/// ```
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum_macros::EnumMessage,
    strum_macros::EnumIter,
)]
pub enum Originator {
    /// National-level activation, relayed from a Primary Entry Point
    ///
    /// Preempts every other message.
    #[strum(serialize = "PEP", detailed_message = "Primary Entry Point System")]
    PrimaryEntryPoint,

    /// State or local government
    #[strum(serialize = "CIV", detailed_message = "Civil authorities")]
    CivilAuthority,

    /// Weather forecast office
    #[strum(serialize = "WXR", detailed_message = "National Weather Service")]
    WeatherService,

    /// A participating broadcaster or cable operator
    #[strum(
        serialize = "EAS",
        detailed_message = "Broadcast station or cable system"
    )]
    BroadcastStation,
}

impl Originator {
    /// Parse a possibly-untidy originator code
    ///
    /// The input is trimmed and upper-cased. It must then be
    /// exactly three characters long and name a known
    /// originator.
    pub fn normalize<S>(code: S) -> Result<Self, UnknownOriginator>
    where
        S: AsRef<str>,
    {
        let tidy = code.as_ref().trim().to_ascii_uppercase();
        Originator::iter()
            .find(|orig| orig.as_str() == tidy)
            .ok_or_else(|| UnknownOriginator(code.as_ref().to_owned()))
    }

    /// Who the originator is, like "`Civil authorities`"
    pub fn as_display_str(&self) -> &'static str {
        self.get_detailed_message().expect("missing definition")
    }

    /// Three-letter code, like "`CIV`"
    pub fn as_str(&self) -> &'static str {
        self.get_serializations()[0]
    }
}

impl Default for Originator {
    fn default() -> Self {
        Originator::BroadcastStation
    }
}

impl TryFrom<&str> for Originator {
    type Error = UnknownOriginator;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Originator::normalize(s)
    }
}

impl FromStr for Originator {
    type Err = UnknownOriginator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Originator::normalize(s)
    }
}

impl AsRef<str> for Originator {
    fn as_ref(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for Originator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_display_str().fmt(f)
    }
}

/// An originator code which is not `PEP`, `CIV`, `WXR`, or `EAS`
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("unknown originator \"{0}\": expected one of PEP, CIV, WXR, or EAS")]
pub struct UnknownOriginator(pub String);
