//! Location codes

use std::fmt;
use std::str::FromStr;

use arrayvec::ArrayString;
use thiserror::Error;

/// Number of digits in a location code
pub const LOCATION_CODE_LEN: usize = 6;

/// A six-digit SAME location code
///
/// Location codes are six-digit strings of the form `PSSCCC`:
///
/// - `P`: part of county, or zero for entire county
/// - `SS`: FIPS State code
/// - `CCC`: FIPS County code
///
/// The code `000000` is a sentinel which addresses no particular
/// place. It is sent when an alert has no usable locations.
///
/// ```
/// use samegen::LocationCode;
///
/// let loc: LocationCode = "039137".parse().unwrap();
/// assert_eq!(loc.part(), 0);
/// assert_eq!(loc.state(), "39");
/// assert_eq!(loc.county(), "137");
///
/// // lenient form for vendor data
/// assert_eq!(LocationCode::normalize("FIPS 39137"), Some(loc));
/// assert_eq!(LocationCode::normalize("n/a"), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocationCode(ArrayString<LOCATION_CODE_LEN>);

impl LocationCode {
    /// The `000000` sentinel
    pub fn sentinel() -> Self {
        Self::from_digits("000000")
    }

    /// Parse an exact six-digit code
    pub fn new<S>(code: S) -> Result<Self, InvalidLocationCode>
    where
        S: AsRef<str>,
    {
        let code = code.as_ref();
        if code.len() != LOCATION_CODE_LEN || !code.bytes().all(|c| c.is_ascii_digit()) {
            return Err(InvalidLocationCode(code.to_owned()));
        }
        Ok(Self::from_digits(code))
    }

    /// Coerce an arbitrary string into a location code
    ///
    /// All non-digit characters are discarded. Shorter results
    /// are left-padded with zeros, and longer results keep only
    /// their first six digits. Returns `None` if `raw` contains
    /// no digits at all.
    pub fn normalize<S>(raw: S) -> Option<Self>
    where
        S: AsRef<str>,
    {
        let digits: String = raw
            .as_ref()
            .chars()
            .filter(|c| c.is_ascii_digit())
            .take(LOCATION_CODE_LEN)
            .collect();
        if digits.is_empty() {
            return None;
        }
        Some(Self::from_digits(&format!(
            "{:0>width$}",
            digits,
            width = LOCATION_CODE_LEN
        )))
    }

    /// Six-digit string representation
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Part-of-county digit, or zero for the entire county
    pub fn part(&self) -> u8 {
        self.0.as_bytes()[0] - b'0'
    }

    /// Two-digit FIPS state code
    pub fn state(&self) -> &str {
        &self.0.as_str()[1..3]
    }

    /// Three-digit FIPS county code
    pub fn county(&self) -> &str {
        &self.0.as_str()[3..6]
    }

    /// True for the `000000` sentinel
    pub fn is_sentinel(&self) -> bool {
        self.0.as_str() == "000000"
    }

    // caller guarantees six ASCII digits
    fn from_digits(digits: &str) -> Self {
        Self(ArrayString::from(digits).expect("location code must be six digits"))
    }
}

impl FromStr for LocationCode {
    type Err = InvalidLocationCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for LocationCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for LocationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

/// A string which is not exactly six digits
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("location code \"{0}\" is not six digits")]
pub struct InvalidLocationCode(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        assert_eq!(LocationCode::new("039137").unwrap().as_str(), "039137");
        assert!(LocationCode::new("39137").is_err());
        assert!(LocationCode::new("0391370").is_err());
        assert!(LocationCode::new("03913A").is_err());
        assert!(LocationCode::sentinel().is_sentinel());
        assert!(!LocationCode::new("139137").unwrap().is_sentinel());
        assert_eq!(LocationCode::new("139137").unwrap().part(), 1);
    }

    #[test]
    fn test_normalize() {
        let norm = |s: &str| LocationCode::normalize(s).map(|l| l.as_str().to_owned());

        assert_eq!(norm("39137").as_deref(), Some("039137"));
        assert_eq!(norm("1").as_deref(), Some("000001"));
        assert_eq!(norm("0391370001").as_deref(), Some("039137"));
        assert_eq!(norm("OH-039-137").as_deref(), Some("039137"));
        assert_eq!(norm(" 0 3 9 1 3 7 ").as_deref(), Some("039137"));
        assert_eq!(norm("OHZ"), None);
        assert_eq!(norm(""), None);
    }
}
