//! CF-convention time decoding for dataset date variables.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Unit of a CF numeric time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CfUnit {
    Days,
    Hours,
    Minutes,
    Seconds,
    Milliseconds,
}

impl CfUnit {
    fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "days" | "day" | "d" => Some(CfUnit::Days),
            "hours" | "hour" | "h" => Some(CfUnit::Hours),
            "minutes" | "minute" | "min" => Some(CfUnit::Minutes),
            "seconds" | "second" | "s" => Some(CfUnit::Seconds),
            "milliseconds" | "millisecond" | "ms" => Some(CfUnit::Milliseconds),
            _ => None,
        }
    }

    fn millis(&self) -> f64 {
        match self {
            CfUnit::Days => 86_400_000.0,
            CfUnit::Hours => 3_600_000.0,
            CfUnit::Minutes => 60_000.0,
            CfUnit::Seconds => 1_000.0,
            CfUnit::Milliseconds => 1.0,
        }
    }
}

/// CF `calendar` attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CfCalendar {
    /// `standard`, `gregorian`, `proleptic_gregorian` (decoded proleptically)
    #[default]
    Gregorian,
    /// `noleap` / `365_day`
    NoLeap,
    /// `all_leap` / `366_day`
    AllLeap,
    /// `360_day`: twelve 30-day months
    Day360,
}

const MS_PER_DAY: i64 = 86_400_000;

impl CfCalendar {
    /// Parse a `calendar` attribute value. Calendars that cannot be decoded
    /// (e.g. `julian`) are an error rather than a silent Gregorian fallback.
    pub fn parse(s: &str) -> Result<Self, TimeParseError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "standard" | "gregorian" | "proleptic_gregorian" => Ok(CfCalendar::Gregorian),
            "noleap" | "365_day" => Ok(CfCalendar::NoLeap),
            "all_leap" | "366_day" => Ok(CfCalendar::AllLeap),
            "360_day" => Ok(CfCalendar::Day360),
            _ => Err(TimeParseError::UnsupportedCalendar(s.to_string())),
        }
    }

    /// Month lengths of a fixed-length calendar; `None` for Gregorian.
    fn month_lengths(&self) -> Option<[i64; 12]> {
        match self {
            CfCalendar::Gregorian => None,
            CfCalendar::NoLeap => Some([31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]),
            CfCalendar::AllLeap => Some([31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]),
            CfCalendar::Day360 => Some([30; 12]),
        }
    }
}

/// Add `offset_ms` to `epoch` counting days in a fixed-length calendar.
///
/// Returns `None` when the epoch is not a valid date of that calendar or the
/// result has no Gregorian equivalent (e.g. 30 February in `360_day`).
fn add_fixed_calendar(epoch: NaiveDateTime, offset_ms: i64, lengths: &[i64; 12]) -> Option<NaiveDateTime> {
    let year_len: i64 = lengths.iter().sum();

    let month0 = epoch.month0() as usize;
    let day0 = i64::from(epoch.day0());
    if day0 >= lengths[month0] {
        return None;
    }
    let epoch_days =
        i64::from(epoch.year()) * year_len + lengths[..month0].iter().sum::<i64>() + day0;
    let epoch_ms = epoch_days
        .checked_mul(MS_PER_DAY)?
        .checked_add(i64::from(epoch.num_seconds_from_midnight()) * 1000)?;

    let total_ms = epoch_ms.checked_add(offset_ms)?;
    let days = total_ms.div_euclid(MS_PER_DAY);
    let ms_of_day = total_ms.rem_euclid(MS_PER_DAY);

    let year = i32::try_from(days.div_euclid(year_len)).ok()?;
    let mut day_of_year = days.rem_euclid(year_len);
    let mut month = 0;
    while day_of_year >= lengths[month] {
        day_of_year -= lengths[month];
        month += 1;
    }

    let date = NaiveDate::from_ymd_opt(year, month as u32 + 1, day_of_year as u32 + 1)?;
    let time = NaiveTime::from_num_seconds_from_midnight_opt(
        (ms_of_day / 1000) as u32,
        ((ms_of_day % 1000) * 1_000_000) as u32,
    )?;
    Some(date.and_time(time))
}

/// Parsed `units` attribute of the form `"<unit> since <epoch>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CfTimeUnits {
    pub unit: CfUnit,
    pub epoch: NaiveDateTime,
    pub calendar: CfCalendar,
}

impl CfTimeUnits {
    /// Parse a CF units string such as `"days since 1970-01-01"`.
    pub fn parse(units: &str) -> Result<Self, TimeParseError> {
        let (unit_str, epoch_str) = units
            .split_once(" since ")
            .ok_or_else(|| TimeParseError::InvalidUnits(units.to_string()))?;

        let unit = CfUnit::from_str(unit_str.trim())
            .ok_or_else(|| TimeParseError::InvalidUnits(units.to_string()))?;
        let epoch = parse_epoch(epoch_str.trim())
            .ok_or_else(|| TimeParseError::InvalidFormat(epoch_str.trim().to_string()))?;

        Ok(Self {
            unit,
            epoch,
            calendar: CfCalendar::Gregorian,
        })
    }

    /// Use `calendar` when counting offsets from the epoch.
    pub fn with_calendar(mut self, calendar: CfCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// Convert an offset to a timestamp. Non-finite offsets are treated as missing.
    pub fn decode(&self, value: f64) -> Option<NaiveDateTime> {
        if !value.is_finite() {
            return None;
        }
        let millis = (value * self.unit.millis()).round();
        if millis.abs() >= i64::MAX as f64 {
            return None;
        }
        let offset_ms = millis as i64;

        match self.calendar.month_lengths() {
            None => self
                .epoch
                .checked_add_signed(Duration::milliseconds(offset_ms)),
            Some(lengths) => add_fixed_calendar(self.epoch, offset_ms, &lengths),
        }
    }

    /// Convert an offset to a calendar date.
    pub fn decode_date(&self, value: f64) -> Option<NaiveDate> {
        self.decode(value).map(|dt| dt.date())
    }
}

/// Parse a date stored as text (e.g. `"2000-07-14"` or `"2000-07-14T00:00:00"`).
pub fn parse_date_label(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("nat") {
        return None;
    }
    parse_epoch(s).map(|dt| dt.date())
}

fn parse_epoch(s: &str) -> Option<NaiveDateTime> {
    // Trailing zone markers are UTC in every file we read
    let s = s
        .trim_end_matches(" UTC")
        .trim_end_matches('Z')
        .trim();

    // Drop fractional seconds
    let s = match s.split_once('.') {
        Some((head, _)) if head.contains(':') => head,
        _ => s,
    };

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[derive(Debug, thiserror::Error)]
pub enum TimeParseError {
    #[error("Invalid time units: {0}")]
    InvalidUnits(String),

    #[error("Invalid time format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported calendar: {0}")]
    UnsupportedCalendar(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_days_since_epoch() {
        let units = CfTimeUnits::parse("days since 1970-01-01").unwrap();
        assert_eq!(units.unit, CfUnit::Days);
        assert_eq!(
            units.decode_date(0.0),
            NaiveDate::from_ymd_opt(1970, 1, 1)
        );
        assert_eq!(
            units.decode_date(31.0),
            NaiveDate::from_ymd_opt(1970, 2, 1)
        );
    }

    #[test]
    fn test_parse_hours_with_time_of_day() {
        let units = CfTimeUnits::parse("hours since 1995-01-01 00:00:00").unwrap();
        assert_eq!(units.unit, CfUnit::Hours);
        assert_eq!(
            units.decode_date(48.0),
            NaiveDate::from_ymd_opt(1995, 1, 3)
        );
    }

    #[test]
    fn test_nan_is_missing() {
        let units = CfTimeUnits::parse("days since 1970-01-01").unwrap();
        assert_eq!(units.decode(f64::NAN), None);
    }

    #[test]
    fn test_invalid_units() {
        assert!(CfTimeUnits::parse("kelvin").is_err());
        assert!(CfTimeUnits::parse("fortnights since 1970-01-01").is_err());
    }

    fn days_since_2000(calendar: CfCalendar) -> CfTimeUnits {
        CfTimeUnits::parse("days since 2000-01-01")
            .unwrap()
            .with_calendar(calendar)
    }

    #[test]
    fn test_360_day_calendar() {
        let units = CfTimeUnits::parse("days since 1970-01-01")
            .unwrap()
            .with_calendar(CfCalendar::Day360);
        // 30 years, 6 months and 13 days of 360-day time
        let offset = (30 * 360 + 6 * 30 + 13) as f64;
        assert_eq!(units.decode_date(offset), NaiveDate::from_ymd_opt(2000, 7, 14));
        assert_eq!(
            days_since_2000(CfCalendar::Day360).decode_date(-1.0),
            NaiveDate::from_ymd_opt(1999, 12, 30)
        );
    }

    #[test]
    fn test_360_day_february_30_is_absent() {
        assert_eq!(days_since_2000(CfCalendar::Day360).decode_date(59.0), None);
    }

    #[test]
    fn test_noleap_skips_february_29() {
        assert_eq!(
            days_since_2000(CfCalendar::NoLeap).decode_date(59.0),
            NaiveDate::from_ymd_opt(2000, 3, 1)
        );
        assert_eq!(
            days_since_2000(CfCalendar::Gregorian).decode_date(59.0),
            NaiveDate::from_ymd_opt(2000, 2, 29)
        );
    }

    #[test]
    fn test_all_leap_non_gregorian_date_is_absent() {
        let units = CfTimeUnits::parse("days since 2001-01-01")
            .unwrap()
            .with_calendar(CfCalendar::AllLeap);
        assert_eq!(units.decode_date(59.0), None);
        assert_eq!(units.decode_date(60.0), NaiveDate::from_ymd_opt(2001, 3, 1));
    }

    #[test]
    fn test_fixed_calendar_keeps_time_of_day() {
        let units = CfTimeUnits::parse("hours since 2000-01-01 06:00:00")
            .unwrap()
            .with_calendar(CfCalendar::Day360);
        let dt = units.decode(30.0 * 24.0 + 3.0).unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2000, 2, 1).unwrap());
        assert_eq!(dt.hour(), 9);
    }

    #[test]
    fn test_parse_calendar() {
        assert_eq!(CfCalendar::parse("360_day").unwrap(), CfCalendar::Day360);
        assert_eq!(CfCalendar::parse("365_day").unwrap(), CfCalendar::NoLeap);
        assert_eq!(CfCalendar::parse("NOLEAP").unwrap(), CfCalendar::NoLeap);
        assert_eq!(CfCalendar::parse("366_day").unwrap(), CfCalendar::AllLeap);
        assert_eq!(CfCalendar::parse("standard").unwrap(), CfCalendar::Gregorian);
        assert_eq!(
            CfCalendar::parse("proleptic_gregorian").unwrap(),
            CfCalendar::Gregorian
        );
        assert!(matches!(
            CfCalendar::parse("julian"),
            Err(TimeParseError::UnsupportedCalendar(_))
        ));
    }

    #[test]
    fn test_parse_date_label() {
        assert_eq!(
            parse_date_label("2000-07-14T00:00:00.000000000"),
            NaiveDate::from_ymd_opt(2000, 7, 14)
        );
        assert_eq!(parse_date_label("NaT"), None);
    }
}
