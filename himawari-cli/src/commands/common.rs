//! Argument parsers shared by several commands.

use chrono::{DateTime, Utc};
use himawari::latest::{parse_timestamp, LATEST_DATE_FORMAT};
use himawari::level::ZoomLevel;

/// Parses `--level`; `0` selects the default level.
pub fn parse_level(value: &str) -> Result<ZoomLevel, String> {
    let level: u32 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    ZoomLevel::or_default(level).map_err(|e| e.to_string())
}

/// Parses `--time` as either RFC 3339 or the archive's own UTC format.
pub fn parse_time(value: &str) -> Result<DateTime<Utc>, String> {
    let value = value.trim();
    if let Ok(time) = DateTime::parse_from_rfc3339(value) {
        return Ok(time.with_timezone(&Utc));
    }
    parse_timestamp(value).map_err(|_| {
        format!(
            "'{}' is neither RFC 3339 nor '{}' (UTC)",
            value, LATEST_DATE_FORMAT
        )
    })
}
