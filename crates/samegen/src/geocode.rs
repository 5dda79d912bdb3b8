//! CAP geocode selection
//!
//! CAP alerts carry their areas as `(valueName, value)` pairs.
//! Feeds disagree on the spelling of `valueName`, and many list
//! the same area under several schemes. This module picks one
//! scheme per alert and turns its values into raw location
//! codes for [`resolve_locations()`](crate::resolve_locations).

use std::fmt;

use log::{debug, warn};
use phf::phf_map;

use crate::LocationCode;

/// A geocode scheme
///
/// Schemes are listed in order of preference: a `SAME` code
/// is used as-is, a `FIPS6` code is nearly so, and `UGC` codes
/// must be converted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GeocodeKey {
    /// Six-digit SAME code
    Same,

    /// Six-digit FIPS code
    Fips6,

    /// NWS Universal Geographic Code, like `OHC137` or `OHZ042`
    Ugc,
}

impl GeocodeKey {
    /// All schemes, most preferred first
    pub const PREFERENCE: [GeocodeKey; 3] = [GeocodeKey::Same, GeocodeKey::Fips6, GeocodeKey::Ugc];

    /// Recognize a CAP `valueName`
    ///
    /// Matching ignores case and surrounding whitespace.
    ///
    /// ```
    /// use samegen::GeocodeKey;
    ///
    /// assert_eq!(GeocodeKey::from_value_name("same"), Some(GeocodeKey::Same));
    /// assert_eq!(GeocodeKey::from_value_name(" FIPS6 "), Some(GeocodeKey::Fips6));
    /// assert_eq!(GeocodeKey::from_value_name("Ugc"), Some(GeocodeKey::Ugc));
    /// assert_eq!(GeocodeKey::from_value_name("ZIP"), None);
    /// ```
    pub fn from_value_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "SAME" => Some(GeocodeKey::Same),
            "FIPS6" => Some(GeocodeKey::Fips6),
            "UGC" => Some(GeocodeKey::Ugc),
            _ => None,
        }
    }

    /// Canonical `valueName`
    pub fn as_str(&self) -> &'static str {
        match self {
            GeocodeKey::Same => "SAME",
            GeocodeKey::Fips6 => "FIPS6",
            GeocodeKey::Ugc => "UGC",
        }
    }
}

impl fmt::Display for GeocodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

/// Select raw location codes from CAP geocode pairs
///
/// The most-preferred [`GeocodeKey`] which has any values wins;
/// pairs with other keys, or with unrecognized keys, are
/// ignored. Values may hold several codes separated by
/// whitespace.
///
/// UGC county codes are converted to SAME codes. UGC zone codes
/// have no SAME equivalent; they are passed through unconverted
/// (with a warning) and will be reduced to their digits.
///
/// ```
/// use samegen::select_geocodes;
///
/// let pairs = [("UGC", "OHC137"), ("same", "039137"), ("SAME", "039003")];
/// assert_eq!(select_geocodes(pairs), vec!["039137", "039003"]);
///
/// let pairs = [("UGC", "OHC137 OHC003")];
/// assert_eq!(select_geocodes(pairs), vec!["039137", "039003"]);
/// ```
pub fn select_geocodes<I, K, V>(pairs: I) -> Vec<String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut by_key: [Vec<String>; 3] = Default::default();
    for (key, value) in pairs {
        let Some(key) = GeocodeKey::from_value_name(key.as_ref()) else {
            continue;
        };
        let slot = &mut by_key[key as usize];
        slot.extend(value.as_ref().split_whitespace().map(str::to_owned));
    }

    for key in GeocodeKey::PREFERENCE {
        let values = std::mem::take(&mut by_key[key as usize]);
        if values.is_empty() {
            continue;
        }

        debug!("geocode: using {} {} codes", values.len(), key);
        return match key {
            GeocodeKey::Ugc => values.into_iter().map(convert_ugc).collect(),
            _ => values,
        };
    }

    debug!("geocode: no usable geocodes");
    Vec::new()
}

/// Convert a UGC county code to a SAME location code
///
/// County codes have the form `SSCnnn`, where `SS` is a postal
/// abbreviation and `nnn` is the FIPS county. Zone codes
/// (`SSZnnn`) and unknown states give `None`.
///
/// ```
/// use samegen::ugc_to_same;
///
/// assert_eq!(ugc_to_same("OHC137").unwrap().as_str(), "039137");
/// assert_eq!(ugc_to_same("prc001").unwrap().as_str(), "072001");
/// assert!(ugc_to_same("OHZ042").is_none());
/// ```
pub fn ugc_to_same(ugc: &str) -> Option<LocationCode> {
    let ugc = ugc.trim().to_ascii_uppercase();
    if ugc.len() != 6 || !ugc.is_ascii() {
        return None;
    }

    let fips = STATE_FIPS.get(&ugc[0..2])?;
    if &ugc[2..3] != "C" || !ugc[3..6].bytes().all(|c| c.is_ascii_digit()) {
        return None;
    }

    LocationCode::new(format!("0{}{}", fips, &ugc[3..6])).ok()
}

/// FIPS state code for a postal abbreviation, like `OH` → `39`
pub fn state_fips(abbreviation: &str) -> Option<&'static str> {
    STATE_FIPS
        .get(abbreviation.trim().to_ascii_uppercase().as_str())
        .copied()
}

// convert a UGC county, or pass through anything else
fn convert_ugc(ugc: String) -> String {
    match ugc_to_same(&ugc) {
        Some(loc) => loc.as_str().to_owned(),
        None => {
            warn!(
                "geocode: UGC \"{}\" is not a county code; its digits will be used as-is",
                ugc
            );
            ugc
        }
    }
}

/// Postal abbreviation → FIPS state code
static STATE_FIPS: phf::Map<&'static str, &'static str> = phf_map! {
    "AL" => "01", "AK" => "02", "AZ" => "04", "AR" => "05", "CA" => "06",
    "CO" => "08", "CT" => "09", "DE" => "10", "DC" => "11", "FL" => "12",
    "GA" => "13", "HI" => "15", "ID" => "16", "IL" => "17", "IN" => "18",
    "IA" => "19", "KS" => "20", "KY" => "21", "LA" => "22", "ME" => "23",
    "MD" => "24", "MA" => "25", "MI" => "26", "MN" => "27", "MS" => "28",
    "MO" => "29", "MT" => "30", "NE" => "31", "NV" => "32", "NH" => "33",
    "NJ" => "34", "NM" => "35", "NY" => "36", "NC" => "37", "ND" => "38",
    "OH" => "39", "OK" => "40", "OR" => "41", "PA" => "42", "RI" => "44",
    "SC" => "45", "SD" => "46", "TN" => "47", "TX" => "48", "UT" => "49",
    "VT" => "50", "VA" => "51", "WA" => "53", "WV" => "54", "WI" => "55",
    "WY" => "56",

    // territories
    "AS" => "60", "GU" => "66", "MP" => "69", "PR" => "72", "VI" => "78",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_table() {
        assert_eq!(STATE_FIPS.len(), 56);
        for (abbr, fips) in STATE_FIPS.entries() {
            assert_eq!(abbr.len(), 2);
            assert_eq!(fips.len(), 2);
            assert!(fips.bytes().all(|c| c.is_ascii_digit()));
        }
        assert_eq!(state_fips("oh"), Some("39"));
        assert_eq!(state_fips("XX"), None);
    }

    #[test]
    fn test_key_preference() {
        // FIPS6 beats UGC
        let pairs = vec![("UGC", "OHC001"), ("FIPS6", "039137")];
        assert_eq!(select_geocodes(pairs), vec!["039137"]);

        // empty SAME values do not count
        let pairs = vec![("SAME", "  "), ("ugc", "OHC001")];
        assert_eq!(select_geocodes(pairs), vec!["039001"]);

        // unknown keys are ignored
        let pairs = vec![("ZIP", "43215"), ("county", "Franklin")];
        assert!(select_geocodes(pairs).is_empty());

        let none: Vec<(String, String)> = vec![];
        assert!(select_geocodes(none).is_empty());
    }

    #[test]
    fn test_ugc_conversion() {
        assert_eq!(ugc_to_same(" ohc049 ").unwrap().as_str(), "039049");
        assert_eq!(ugc_to_same("DCC001").unwrap().as_str(), "011001");
        assert!(ugc_to_same("XXC001").is_none());
        assert!(ugc_to_same("OHC01").is_none());
        assert!(ugc_to_same("OHC0A1").is_none());

        // zones pass through for digit stripping
        let pairs = [("UGC", "OHC049 OHZ055")];
        assert_eq!(select_geocodes(pairs), vec!["039049", "OHZ055"]);
    }
}
