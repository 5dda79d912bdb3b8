//! Issuance timestamps and purge times
//!
//! Two fields of the SAME header carry time:
//!
//! * `JJJHHMM`, the issuance time: ordinal day of the year and
//!   24-hour UTC time of day. The year is not sent.
//!
//! * `TTTT`, the purge time or validity duration: hours and
//!   minutes `HHMM` relative to the issuance time.
//!
//! Purge times are always quantized *up*, to a multiple of
//! fifteen minutes, and never exceed six hours.

use chrono::{DateTime, Datelike, Timelike, Utc};

/// Shortest purge time, in minutes
pub const MIN_DURATION_MINUTES: u32 = 15;

/// Longest purge time, in minutes
///
/// Renders as `0600`.
pub const MAX_DURATION_MINUTES: u32 = 360;

/// Purge time quantum, in minutes
pub const DURATION_STEP_MINUTES: u32 = 15;

/// Purge time used when the validity window is unknown
pub const DEFAULT_DURATION_CODE: &str = "0015";

/// Format the `JJJHHMM` issuance time
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use samegen::julian_timestamp;
///
/// let sent = Utc.with_ymd_and_hms(2021, 3, 24, 2, 53, 41).unwrap();
/// assert_eq!(julian_timestamp(&sent), "0830253");
/// ```
pub fn julian_timestamp(sent: &DateTime<Utc>) -> String {
    format!(
        "{:03}{:02}{:02}",
        sent.ordinal(),
        sent.hour(),
        sent.minute()
    )
}

/// Format the `TTTT` purge time for a validity window
///
/// If either timestamp is missing, the result is `0015`.
/// Otherwise the time remaining from `sent` to `expires` is
/// [quantized](quantize_duration) and rendered as `HHMM`.
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use samegen::duration_code;
///
/// let sent = Utc.with_ymd_and_hms(2021, 3, 24, 2, 53, 0).unwrap();
/// assert_eq!(duration_code(Some(&sent), Some(&(sent + Duration::minutes(16)))), "0030");
/// assert_eq!(duration_code(Some(&sent), Some(&(sent + Duration::minutes(90)))), "0130");
/// assert_eq!(duration_code(Some(&sent), None), "0015");
/// ```
pub fn duration_code(sent: Option<&DateTime<Utc>>, expires: Option<&DateTime<Utc>>) -> String {
    match (sent, expires) {
        (Some(sent), Some(expires)) => {
            let secs = expires.signed_duration_since(*sent).num_seconds();
            format_purge_time(quantize_duration(secs))
        }
        _ => DEFAULT_DURATION_CODE.to_owned(),
    }
}

/// Quantize a validity window to a purge time, in minutes
///
/// `secs` is rounded up to the next multiple of fifteen
/// minutes and then clamped to
/// [`MIN_DURATION_MINUTES`]`..=`[`MAX_DURATION_MINUTES`].
/// Zero or negative windows give the minimum.
pub fn quantize_duration(secs: i64) -> u32 {
    let step_secs = DURATION_STEP_MINUTES as i64 * 60;
    let max_steps = (MAX_DURATION_MINUTES / DURATION_STEP_MINUTES) as i64;

    let secs = secs.max(0);
    let steps = (secs / step_secs + (secs % step_secs != 0) as i64).min(max_steps);
    u32::max(steps as u32 * DURATION_STEP_MINUTES, MIN_DURATION_MINUTES)
}

/// Render a purge time in minutes as `HHMM`
pub fn format_purge_time(minutes: u32) -> String {
    format!("{:02}{:02}", minutes / 60, minutes % 60)
}

/// Parse an `HHMM` purge time into minutes
///
/// Returns `None` unless `code` is four digits with a minutes
/// field below 60.
pub fn parse_purge_time(code: &str) -> Option<u32> {
    if code.len() != 4 || !code.bytes().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: u32 = code[0..2].parse().ok()?;
    let mins: u32 = code[2..4].parse().ok()?;
    if mins >= 60 {
        return None;
    }
    Some(hours * 60 + mins)
}

/// Parse a `JJJHHMM` issuance time into (`day`, `hour`, `minute`)
///
/// Returns `None` if any field is out of range.
pub fn parse_julian_timestamp(stamp: &str) -> Option<(u16, u8, u8)> {
    if stamp.len() != 7 || !stamp.bytes().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let day: u16 = stamp[0..3].parse().ok()?;
    let hour: u8 = stamp[3..5].parse().ok()?;
    let minute: u8 = stamp[5..7].parse().ok()?;
    if day == 0 || day > 366 || hour > 23 || minute > 59 {
        return None;
    }
    Some((day, hour, minute))
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Duration, TimeZone};

    fn sent() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 31, 23, 5, 12).unwrap()
    }

    fn code_after(delta: Duration) -> String {
        let sent = sent();
        duration_code(Some(&sent), Some(&(sent + delta)))
    }

    #[test]
    fn test_julian_timestamp() {
        // leap year
        assert_eq!(julian_timestamp(&sent()), "3662305");

        let sent = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 59).unwrap();
        assert_eq!(julian_timestamp(&sent), "0010000");
        assert_eq!(parse_julian_timestamp("0010000"), Some((1, 0, 0)));
        assert_eq!(parse_julian_timestamp("3662305"), Some((366, 23, 5)));
        assert_eq!(parse_julian_timestamp("0002305"), None);
        assert_eq!(parse_julian_timestamp("0012400"), None);
        assert_eq!(parse_julian_timestamp("001230"), None);
    }

    #[test]
    fn test_duration_code() {
        assert_eq!(code_after(Duration::minutes(1)), "0015");
        assert_eq!(code_after(Duration::minutes(15)), "0015");
        assert_eq!(code_after(Duration::seconds(15 * 60 + 1)), "0030");
        assert_eq!(code_after(Duration::minutes(16)), "0030");
        assert_eq!(code_after(Duration::minutes(30)), "0030");
        assert_eq!(code_after(Duration::minutes(59)), "0100");
        assert_eq!(code_after(Duration::minutes(61)), "0115");
        assert_eq!(code_after(Duration::minutes(359)), "0600");
        assert_eq!(code_after(Duration::minutes(10000)), "0600");

        // degenerate windows
        assert_eq!(code_after(Duration::zero()), "0015");
        assert_eq!(code_after(Duration::minutes(-45)), "0015");
        assert_eq!(duration_code(None, Some(&sent())), "0015");
        assert_eq!(duration_code(Some(&sent()), None), "0015");
        assert_eq!(duration_code(None, None), DEFAULT_DURATION_CODE);
    }

    #[test]
    fn test_quantize_duration() {
        for secs in (-600..30000).step_by(37) {
            let mins = quantize_duration(secs);
            assert_eq!(mins % DURATION_STEP_MINUTES, 0);
            assert!(mins >= MIN_DURATION_MINUTES);
            assert!(mins <= MAX_DURATION_MINUTES);
            if secs > 0 && secs <= MAX_DURATION_MINUTES as i64 * 60 {
                // never understates the window
                assert!(mins as i64 * 60 >= secs);
                assert!((mins as i64 * 60 - secs) < 15 * 60);
            }
        }
    }

    #[test]
    fn test_purge_time_format() {
        assert_eq!(format_purge_time(15), "0015");
        assert_eq!(format_purge_time(90), "0130");
        assert_eq!(format_purge_time(360), "0600");
        assert_eq!(parse_purge_time("0130"), Some(90));
        assert_eq!(parse_purge_time("0600"), Some(360));
        assert_eq!(parse_purge_time("0075"), None);
        assert_eq!(parse_purge_time("+015"), None);
    }
}
