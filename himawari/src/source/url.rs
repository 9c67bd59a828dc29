//! Tile URL template.

use crate::level::ZoomLevel;
use chrono::{DateTime, TimeZone, Utc};

/// Base address of the full-disk tile archive.
pub const DEFAULT_TILE_BASE_URL: &str = "http://himawari8.nict.go.jp/img/D531106";

/// Builds the address of tile `(x, y)` at `time`.
///
/// The time is converted to UTC before formatting; the template is
/// `{base}/{level}d/{width}/{YYYY}/{MM}/{DD}/{hhmmss}_{x}_{y}.png`.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use himawari::level::ZoomLevel;
/// use himawari::source::{tile_url, DEFAULT_TILE_BASE_URL};
///
/// let time = Utc.with_ymd_and_hms(2016, 1, 2, 3, 40, 0).unwrap();
/// let url = tile_url(DEFAULT_TILE_BASE_URL, &time, ZoomLevel::new(4).unwrap(), 550, 1, 2);
/// assert_eq!(
///     url,
///     "http://himawari8.nict.go.jp/img/D531106/4d/550/2016/01/02/034000_1_2.png"
/// );
/// ```
pub fn tile_url<Tz: TimeZone>(
    base: &str,
    time: &DateTime<Tz>,
    level: ZoomLevel,
    width: u32,
    x: u32,
    y: u32,
) -> String {
    let utc = time.with_timezone(&Utc);
    format!(
        "{}/{}d/{}/{}_{}_{}.png",
        base.trim_end_matches('/'),
        level,
        width,
        utc.format("%Y/%m/%d/%H%M%S"),
        x,
        y
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn level(n: u32) -> ZoomLevel {
        ZoomLevel::new(n).unwrap()
    }

    #[test]
    fn test_template() {
        let time = Utc.with_ymd_and_hms(2023, 11, 5, 14, 20, 0).unwrap();
        assert_eq!(
            tile_url(DEFAULT_TILE_BASE_URL, &time, level(8), 550, 7, 0),
            "http://himawari8.nict.go.jp/img/D531106/8d/550/2023/11/05/142000_7_0.png"
        );
    }

    #[test]
    fn test_non_utc_time_is_converted() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let time = tokyo.with_ymd_and_hms(2023, 11, 6, 0, 10, 0).unwrap();
        assert_eq!(
            tile_url(DEFAULT_TILE_BASE_URL, &time, level(1), 550, 0, 0),
            "http://himawari8.nict.go.jp/img/D531106/1d/550/2023/11/05/151000_0_0.png"
        );
    }

    #[test]
    fn test_trailing_slash_in_base() {
        let time = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            tile_url("http://localhost:8080/tiles/", &time, level(2), 16, 1, 1),
            "http://localhost:8080/tiles/2d/16/2020/01/01/000000_1_1.png"
        );
    }
}
