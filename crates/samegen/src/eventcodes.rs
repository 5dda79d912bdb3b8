//! # List of SAME Events Codes Known to `samegen`
//!
//! | `XYZ` | Description                            |
//! |-------|----------------------------------------|
//! | `ADR` | Administrative Message                 |
//! | `AVA` | Avalanche Watch                        |
//! | `AVW` | Avalanche Warning                      |
//! | `BLU` | Blue Alert                             |
//! | `BZW` | Blizzard Warning                       |
//! | `CAE` | Child Abduction Emergency              |
//! | `CDW` | Civil Danger Warning                   |
//! | `CEM` | Civil Emergency Message                |
//! | `CFA` | Coastal Flood Watch                    |
//! | `CFW` | Coastal Flood Warning                  |
//! | `DMO` | Practice/Demo Warning                  |
//! | `DSW` | Dust Storm Warning                     |
//! | `EAN` | National Emergency Message             |
//! | `EQW` | Earthquake Warning                     |
//! | `EVI` | Evacuation Immediate                   |
//! | `EWW` | Extreme Wind Warning                   |
//! | `FFA` | Flash Flood Watch                      |
//! | `FFS` | Flash Flood Statement                  |
//! | `FFW` | Flash Flood Warning                    |
//! | `FLA` | Flood Watch                            |
//! | `FLS` | Flood Statement                        |
//! | `FLW` | Flood Warning                          |
//! | `FRW` | Fire Warning                           |
//! | `FSW` | Flash Freeze Warning                   |
//! | `FZW` | Freeze Warning                         |
//! | `HLS` | Hurricane Local Statement              |
//! | `HMW` | Hazardous Materials Warning            |
//! | `HUA` | Hurricane Watch                        |
//! | `HUW` | Hurricane Warning                      |
//! | `HWA` | High Wind Watch                        |
//! | `HWW` | High Wind Warning                      |
//! | `LAE` | Local Area Emergency                   |
//! | `LEW` | Law Enforcement Warning                |
//! | `NAT` | National Audible Test                  |
//! | `NIC` | National Information Center            |
//! | `NMN` | Network Notification Message           |
//! | `NPT` | National Periodic Test                 |
//! | `NST` | National Silent Test                   |
//! | `NUW` | Nuclear Power Plant Warning            |
//! | `RHW` | Radiological Hazard Warning            |
//! | `RMT` | Required Monthly Test                  |
//! | `RWT` | Required Weekly Test                   |
//! | `SMW` | Special Marine Warning                 |
//! | `SPS` | Special Weather Statement              |
//! | `SPW` | Shelter In-Place Warning               |
//! | `SQW` | Snow Squall Warning                    |
//! | `SSA` | Storm Surge Watch                      |
//! | `SSW` | Storm Surge Warning                    |
//! | `SVA` | Severe Thunderstorm Watch              |
//! | `SVR` | Severe Thunderstorm Warning            |
//! | `SVS` | Severe Weather Statement               |
//! | `TOA` | Tornado Watch                          |
//! | `TOE` | 911 Telephone Outage Emergency         |
//! | `TOR` | Tornado Warning                        |
//! | `TRA` | Tropical Storm Watch                   |
//! | `TRW` | Tropical Storm Warning                 |
//! | `TSA` | Tsunami Watch                          |
//! | `TSW` | Tsunami Warning                        |
//! | `VOW` | Volcano Warning                        |
//! | `WSA` | Winter Storm Watch                     |
//! | `WSW` | Winter Storm Warning                   |
//!
//! SAME event codes for the United States are given in
//! [NWSI 10-1712](https://www.nws.noaa.gov/directives/sym/pd01017012curr.pdf).
//!
//! Only codes in this table are ever transmitted. Alerts which
//! name some other hazard are sent as `CEM`; see
//! [`resolve_event()`](crate::resolve_event).
//!
//! ## See Also
//!
//! * [`EventCode`](crate::EventCode)

use std::collections::HashMap;

use lazy_static::lazy_static;
use phf::phf_map;

use crate::SignificanceLevel;

/// An entry in the event code registry
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventEntry {
    /// Canonical human-readable name, like "`Tornado Warning`"
    pub name: &'static str,

    /// Significance level implied by the code
    pub significance: SignificanceLevel,

    /// Other names by which alerting authorities know this event
    pub aliases: &'static [&'static str],
}

/// Event code used when no other code can be determined
pub const DEFAULT_EVENT_CODE: &str = "CEM";

/// Lookup a three-character SAME event code in the registry
///
/// The `code` must match exactly: no trimming or case folding
/// is performed.
pub fn lookup_code<S>(code: S) -> Option<(&'static str, &'static EventEntry)>
where
    S: AsRef<str>,
{
    CODEBOOK.get_entry(code.as_ref()).map(|(k, v)| (*k, v))
}

/// Lookup an event by its name or one of its aliases
///
/// Names are compared after [normalization](normalize_name), so
/// "`TORNADO WARNING`" and "`tornado-warning`" both find `TOR`.
pub fn lookup_name<S>(name: S) -> Option<(&'static str, &'static EventEntry)>
where
    S: AsRef<str>,
{
    let key = normalize_name(name.as_ref());
    if key.is_empty() {
        return None;
    }
    let code = NAME_INDEX.get(key.as_str())?;
    lookup_code(code)
}

/// Iterate over every registered code and its entry
///
/// Ordering is unspecified.
pub fn entries() -> impl Iterator<Item = (&'static str, &'static EventEntry)> {
    CODEBOOK.entries().map(|(k, v)| (*k, v))
}

/// Reduce an event name to lowercase ASCII alphanumerics
///
/// Case, whitespace, and punctuation carry no meaning in event
/// names.
///
/// ```
/// use samegen::eventcodes::normalize_name;
///
/// assert_eq!(normalize_name(" Shelter In-Place Warning "), "shelterinplacewarning");
/// ```
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

lazy_static! {
    // normalized name or alias → code
    static ref NAME_INDEX: HashMap<String, &'static str> = {
        let mut index = HashMap::with_capacity(4 * CODEBOOK.len());
        for (code, entry) in CODEBOOK.entries() {
            let names = std::iter::once(&entry.name).chain(entry.aliases.iter());
            for name in names {
                index.insert(normalize_name(name), *code);
            }
        }
        index
    };
}

macro_rules! event {
    ($name:expr, $sig:ident) => {
        event!($name, $sig, [])
    };
    ($name:expr, $sig:ident, [$($alias:expr),* $(,)?]) => {
        EventEntry {
            name: $name,
            significance: SignificanceLevel::$sig,
            aliases: &[$($alias),*],
        }
    };
}

/// Database of three-character SAME event codes.
///
/// All codes imply a significance level: the `RWT` will always
/// have a significance of `Test`.
static CODEBOOK: phf::Map<&'static str, EventEntry> = phf_map! {
    // national activations
    "EAN" => event!("National Emergency Message", Warning,
        ["Emergency Action Notification", "National Emergency"]),
    "NIC" => event!("National Information Center", Statement),

    // tests
    "DMO" => event!("Practice/Demo Warning", Warning, ["Practice Warning", "Demo Warning"]),
    "NAT" => event!("National Audible Test", Test),
    "NPT" => event!("National Periodic Test", Test),
    "NST" => event!("National Silent Test", Test),
    "RMT" => event!("Required Monthly Test", Test, ["Monthly Test"]),
    "RWT" => event!("Required Weekly Test", Test, ["Weekly Test"]),

    // civil authority codes
    "ADR" => event!("Administrative Message", Statement),
    "AVA" => event!("Avalanche Watch", Watch),
    "AVW" => event!("Avalanche Warning", Warning),
    "BLU" => event!("Blue Alert", Warning),
    "CAE" => event!("Child Abduction Emergency", Emergency, ["Amber Alert"]),
    "CDW" => event!("Civil Danger Warning", Warning),
    "CEM" => event!("Civil Emergency Message", Warning),
    "EQW" => event!("Earthquake Warning", Warning),
    "EVI" => event!("Evacuation Immediate", Warning, ["Evacuation Order"]),
    "FRW" => event!("Fire Warning", Warning),
    "HMW" => event!("Hazardous Materials Warning", Warning, ["Hazmat Warning"]),
    "LAE" => event!("Local Area Emergency", Emergency),
    "LEW" => event!("Law Enforcement Warning", Warning),
    "NMN" => event!("Network Notification Message", Statement),
    "NUW" => event!("Nuclear Power Plant Warning", Warning),
    "RHW" => event!("Radiological Hazard Warning", Warning),
    "SPW" => event!("Shelter In-Place Warning", Warning),
    "TOE" => event!("911 Telephone Outage Emergency", Emergency, ["Telephone Outage"]),
    "VOW" => event!("Volcano Warning", Warning),

    // weather codes
    "BZW" => event!("Blizzard Warning", Warning),
    "CFA" => event!("Coastal Flood Watch", Watch),
    "CFW" => event!("Coastal Flood Warning", Warning),
    "DSW" => event!("Dust Storm Warning", Warning),
    "EWW" => event!("Extreme Wind Warning", Warning),
    "FFA" => event!("Flash Flood Watch", Watch),
    "FFS" => event!("Flash Flood Statement", Statement),
    "FFW" => event!("Flash Flood Warning", Warning),
    "FLA" => event!("Flood Watch", Watch),
    "FLS" => event!("Flood Statement", Statement, ["Flood Advisory"]),
    "FLW" => event!("Flood Warning", Warning),
    "FZW" => event!("Freeze Warning", Warning, ["Hard Freeze Warning"]),
    "HLS" => event!("Hurricane Local Statement", Statement, ["Tropical Cyclone Statement"]),
    "HUA" => event!("Hurricane Watch", Watch),
    "HUW" => event!("Hurricane Warning", Warning),
    "HWA" => event!("High Wind Watch", Watch),
    "HWW" => event!("High Wind Warning", Warning),
    "SMW" => event!("Special Marine Warning", Warning),
    "SPS" => event!("Special Weather Statement", Statement),
    "SQW" => event!("Snow Squall Warning", Warning),
    "SSA" => event!("Storm Surge Watch", Watch),
    "SSW" => event!("Storm Surge Warning", Warning),
    "SVA" => event!("Severe Thunderstorm Watch", Watch),
    "SVR" => event!("Severe Thunderstorm Warning", Warning, ["Severe Thunderstorm"]),
    "SVS" => event!("Severe Weather Statement", Statement),
    "TOA" => event!("Tornado Watch", Watch),
    "TOR" => event!("Tornado Warning", Warning, ["Tornado", "Tornado Emergency"]),
    "TRA" => event!("Tropical Storm Watch", Watch),
    "TRW" => event!("Tropical Storm Warning", Warning),
    "TSA" => event!("Tsunami Watch", Watch),
    "TSW" => event!("Tsunami Warning", Warning),
    "WSA" => event!("Winter Storm Watch", Watch),
    "WSW" => event!("Winter Storm Warning", Warning),

    //   "flash freeze warning" is Canada-only and not a NWS VTEC code
    "FSW" => event!("Flash Freeze Warning", Warning),
};

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    use lazy_static::lazy_static;
    use regex::Regex;

    /// ensure we have populated our codebook correctly
    #[test]
    fn check_codebook() {
        lazy_static! {
            static ref ASCII_UPPER: Regex = Regex::new(r"^[A-Z]{3}$").expect("bad test regexp");
        }

        assert_eq!(CODEBOOK.len(), 61);
        for (key, val) in CODEBOOK.entries() {
            assert!(ASCII_UPPER.is_match(key), "bad code {}", key);
            assert!(!val.name.is_empty());
        }
    }

    #[test]
    fn check_names_are_unambiguous() {
        // no name or alias may lead to two different codes
        let mut seen = HashMap::new();
        for (code, entry) in CODEBOOK.entries() {
            let mut own = HashSet::new();
            for name in std::iter::once(&entry.name).chain(entry.aliases.iter()) {
                let key = normalize_name(name);
                assert!(!key.is_empty());
                assert!(own.insert(key.clone()), "{} repeats a name", code);
                if let Some(other) = seen.insert(key.clone(), *code) {
                    panic!("\"{}\" names both {} and {}", key, other, code);
                }
            }
        }
        assert_eq!(seen.len(), NAME_INDEX.len());
    }

    #[test]
    fn test_lookup() {
        let (code, entry) = lookup_code("TOR").unwrap();
        assert_eq!(code, "TOR");
        assert_eq!(entry.name, "Tornado Warning");
        assert_eq!(entry.significance, SignificanceLevel::Warning);
        assert!(lookup_code("tor").is_none());
        assert!(lookup_code("XYZ").is_none());

        assert_eq!(lookup_name("tornado warning").unwrap().0, "TOR");
        assert_eq!(lookup_name("TORNADO").unwrap().0, "TOR");
        assert_eq!(lookup_name("Amber Alert!").unwrap().0, "CAE");
        assert_eq!(lookup_name("practice / demo warning").unwrap().0, "DMO");
        assert!(lookup_name("Rain of Frogs").is_none());
        assert!(lookup_name("  -- ").is_none());

        assert!(lookup_code(DEFAULT_EVENT_CODE).is_some());
        assert_eq!(entries().count(), 61);
    }
}
