//! Timezone correction for observation times.
//!
//! The archive's "latest" timestamp is interpreted relative to the
//! provider's zone. Correcting it shifts the time by the difference between
//! the host's UTC offset and the provider's (Australia/Sydney), mirroring
//! how the public viewer lines images up with the viewer's clock. Both
//! offsets are taken at the current instant, so daylight saving on either
//! side is honoured.

use chrono::{DateTime, Duration, FixedOffset, Local, Offset, TimeZone, Utc};
use chrono_tz::Tz;

/// Zone the archive's timestamps are lined up against.
pub const REFERENCE_ZONE: Tz = chrono_tz::Australia::Sydney;

/// UTC offset of the host at this moment.
pub fn local_offset() -> FixedOffset {
    *Local::now().offset()
}

/// Shifts `time` by `local - reference`.
///
/// ```
/// use chrono::{FixedOffset, TimeZone, Utc};
/// use himawari::time::apply_offset;
///
/// let t = Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap();
/// let local = FixedOffset::east_opt(3600).unwrap();
/// let reference = FixedOffset::east_opt(10 * 3600).unwrap();
/// assert_eq!(apply_offset(t, local, reference), Utc.with_ymd_and_hms(2023, 1, 1, 3, 0, 0).unwrap());
/// ```
pub fn apply_offset(
    time: DateTime<Utc>,
    local: FixedOffset,
    reference: FixedOffset,
) -> DateTime<Utc> {
    let delta = i64::from(local.local_minus_utc()) - i64::from(reference.local_minus_utc());
    time + Duration::seconds(delta)
}

/// Parses an offset like `+10:00`, `-03:30` or `+0930`.
pub fn parse_offset(value: &str) -> Option<FixedOffset> {
    let value = value.trim();
    let (sign, rest) = match value.as_bytes().first()? {
        b'+' => (1, &value[1..]),
        b'-' => (-1, &value[1..]),
        _ => (1, value),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// UTC offset of [`REFERENCE_ZONE`] at `at`, daylight saving included.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use himawari::time::reference_offset_at;
///
/// let summer = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
/// assert_eq!(reference_offset_at(summer).local_minus_utc(), 11 * 3600);
/// ```
pub fn reference_offset_at(at: DateTime<Utc>) -> FixedOffset {
    REFERENCE_ZONE
        .offset_from_utc_datetime(&at.naive_utc())
        .fix()
}
