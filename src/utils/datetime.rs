//! Decoded date/time utilities
//!
//! This module provides the discrete timestamp value used by the pattern
//! builders, plus parsing of the textual forms the metadata collaborator
//! hands back:
//!
//! - `YYYY:MM:DD HH:MM:SS` (EXIF/QuickTime style)
//! - `YYYY-MM-DDTHH:MM:SS` (XMP style)
//!
//! Either form may carry fractional seconds (ignored), a `Z` or `±HH:MM`
//! offset, and a trailing ` DST` marker.

use crate::core::error::{StampError, StampResult};
use crate::core::timezone::UtcOffset;
use std::fmt;

/// Decoded date/time
///
/// A plain (year, month, day, hour, minute, second) tuple. The date portion is
/// never validated against the days of its month, so the value produced by
/// [`StampDateTime::next_second`] across midnight may name a day that does not
/// exist (e.g. day 32).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StampDateTime {
    /// Four-digit year
    pub year: u16,
    /// Month (1-12)
    pub month: u8,
    /// Day (1-31)
    pub day: u8,
    /// Hour (0-23)
    pub hour: u8,
    /// Minute (0-59)
    pub minute: u8,
    /// Second (0-59)
    pub second: u8,
}

/// A decoded date/time with the zone information that accompanied it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZonedDateTime {
    /// The wall-clock value
    pub datetime: StampDateTime,
    /// Offset from UTC, if the text carried one
    pub offset: Option<UtcOffset>,
    /// Whether the text was tagged ` DST`
    pub daylight_saving: bool,
}

impl StampDateTime {
    /// Create a date/time from its components
    ///
    /// Ranges are checked (month 1-12, day 1-31, hour 0-23, minute and
    /// second 0-59) but the day is not checked against the month.
    pub fn new(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> StampResult<Self> {
        let dt = Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        };
        dt.validate()?;
        Ok(dt)
    }

    /// Parse a date/time, discarding any zone information
    ///
    /// # Example
    ///
    /// ```rust
    /// use movdate::utils::datetime::StampDateTime;
    ///
    /// let dt = StampDateTime::parse("2019:05:01 10:00:00").unwrap();
    /// assert_eq!(dt.hour, 10);
    /// assert_eq!(dt.format_exif(), "2019:05:01 10:00:00");
    /// ```
    pub fn parse(s: &str) -> StampResult<Self> {
        ZonedDateTime::parse(s).map(|z| z.datetime)
    }

    /// Check that all components are within range
    pub fn validate(&self) -> StampResult<()> {
        if self.year > 9999 {
            return Err(StampError::BadValue("Year is out of range".to_string()));
        }
        if !(1..=12).contains(&self.month) {
            return Err(StampError::BadValue("Month is out of range".to_string()));
        }
        if !(1..=31).contains(&self.day) {
            return Err(StampError::BadValue("Day is out of range".to_string()));
        }
        if self.hour > 23 {
            return Err(StampError::BadValue("Hour is out of range".to_string()));
        }
        if self.minute > 59 {
            return Err(StampError::BadValue("Minute is out of range".to_string()));
        }
        if self.second > 59 {
            return Err(StampError::BadValue("Second is out of range".to_string()));
        }
        Ok(())
    }

    /// Advance by one second
    ///
    /// Seconds carry into minutes and minutes into hours. Crossing midnight
    /// resets the hour to 0 and bumps the day without consulting the
    /// calendar; that case is logged at warn level and the value is returned
    /// anyway.
    pub fn next_second(&self) -> Self {
        let (next, rolled_over) = self.next_second_checked();
        if rolled_over {
            tracing::warn!(
                "Timestamp {} rolled over a day boundary to {}; the date is not re-validated",
                self,
                next
            );
        }
        next
    }

    /// Advance by one second, reporting whether a day boundary was crossed
    pub fn next_second_checked(&self) -> (Self, bool) {
        let mut next = *self;
        next.second = next.second.wrapping_add(1);
        if next.second < 60 {
            return (next, false);
        }
        next.second = 0;
        next.minute = next.minute.wrapping_add(1);
        if next.minute < 60 {
            return (next, false);
        }
        next.minute = 0;
        next.hour = next.hour.wrapping_add(1);
        if next.hour < 24 {
            return (next, false);
        }
        next.hour = 0;
        next.day = next.day.wrapping_add(1);
        (next, true)
    }

    /// Format as `YYYY:MM:DD HH:MM:SS`
    pub fn format_exif(&self) -> String {
        format!(
            "{:04}:{:02}:{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }

    /// Format as `YYYY-MM-DDTHH:MM:SS`
    pub fn format_iso(&self) -> String {
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

impl fmt::Display for StampDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_exif())
    }
}

impl ZonedDateTime {
    /// Wrap a bare date/time with no zone information
    pub fn naive(datetime: StampDateTime) -> Self {
        Self {
            datetime,
            offset: None,
            daylight_saving: false,
        }
    }

    /// Parse a date/time with optional offset and ` DST` marker
    ///
    /// # Example
    ///
    /// ```rust
    /// use movdate::utils::datetime::ZonedDateTime;
    ///
    /// let z = ZonedDateTime::parse("2019-05-01T10:00:00+02:00").unwrap();
    /// assert_eq!(z.datetime.day, 1);
    /// assert_eq!(z.offset.unwrap().minutes(), 120);
    /// ```
    pub fn parse(s: &str) -> StampResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(StampError::BadValue("Empty date/time string".to_string()));
        }

        let (body, daylight_saving) = match s.strip_suffix("DST") {
            Some(rest) => (rest.trim_end(), true),
            None => (s, false),
        };
        let bytes = body.as_bytes();
        let mut pos = 0;

        let year = read_number(bytes, &mut pos, 4, "year")?;
        expect_one_of(bytes, &mut pos, b":-", "after year")?;
        let month = read_number(bytes, &mut pos, 2, "month")?;
        expect_one_of(bytes, &mut pos, b":-", "after month")?;
        let day = read_number(bytes, &mut pos, 2, "day")?;
        expect_one_of(bytes, &mut pos, b" T", "between date and time")?;
        let hour = read_number(bytes, &mut pos, 2, "hour")?;
        expect_one_of(bytes, &mut pos, b":", "after hour")?;
        let minute = read_number(bytes, &mut pos, 2, "minute")?;
        expect_one_of(bytes, &mut pos, b":", "after minute")?;
        let second = read_number(bytes, &mut pos, 2, "second")?;

        // Fractional seconds carry no weight in either encoding
        if pos < bytes.len() && bytes[pos] == b'.' {
            pos += 1;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
        }

        let offset = if pos < bytes.len() {
            Some(UtcOffset::parse(&body[pos..])?)
        } else {
            None
        };

        let datetime = StampDateTime::new(
            year as u16,
            month as u8,
            day as u8,
            hour as u8,
            minute as u8,
            second as u8,
        )?;

        Ok(Self {
            datetime,
            offset,
            daylight_saving,
        })
    }
}

fn read_number(bytes: &[u8], pos: &mut usize, width: usize, what: &str) -> StampResult<u32> {
    let end = *pos + width;
    if end > bytes.len() || !bytes[*pos..end].iter().all(u8::is_ascii_digit) {
        return Err(StampError::BadValue(format!(
            "Invalid {} in date string",
            what
        )));
    }
    let value = bytes[*pos..end]
        .iter()
        .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'));
    *pos = end;
    Ok(value)
}

fn expect_one_of(bytes: &[u8], pos: &mut usize, allowed: &[u8], what: &str) -> StampResult<()> {
    match bytes.get(*pos) {
        Some(b) if allowed.contains(b) => {
            *pos += 1;
            Ok(())
        }
        _ => Err(StampError::BadValue(format!(
            "Invalid date string, expected separator {}",
            what
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(h: u8, m: u8, s: u8) -> StampDateTime {
        StampDateTime::new(2019, 5, 1, h, m, s).unwrap()
    }

    #[test]
    fn test_parse_exif() {
        let dt = StampDateTime::parse("2019:05:01 10:20:30").unwrap();
        assert_eq!(dt.year, 2019);
        assert_eq!(dt.month, 5);
        assert_eq!(dt.day, 1);
        assert_eq!(dt.hour, 10);
        assert_eq!(dt.minute, 20);
        assert_eq!(dt.second, 30);
    }

    #[test]
    fn test_parse_iso_with_offset() {
        let z = ZonedDateTime::parse("2019-05-01T10:20:30-09:30").unwrap();
        assert_eq!(z.datetime, StampDateTime::parse("2019:05:01 10:20:30").unwrap());
        assert_eq!(z.offset.unwrap().minutes(), -570);
        assert!(!z.daylight_saving);
    }

    #[test]
    fn test_parse_dst_marker() {
        let z = ZonedDateTime::parse("2019:05:01 10:20:30+02:00 DST").unwrap();
        assert!(z.daylight_saving);
        assert_eq!(z.offset.unwrap().minutes(), 120);
    }

    #[test]
    fn test_parse_utc_and_fraction() {
        let z = ZonedDateTime::parse("2019:05:01 10:20:30.25Z").unwrap();
        assert_eq!(z.datetime.second, 30);
        assert_eq!(z.offset.unwrap().minutes(), 0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(StampDateTime::parse("").is_err());
        assert!(StampDateTime::parse("2019:05:01").is_err());
        assert!(StampDateTime::parse("2019/05/01 10:00:00").is_err());
        assert!(StampDateTime::parse("2019:13:01 10:00:00").is_err());
        assert!(StampDateTime::parse("2019:05:01 10:00:00 junk").is_err());
    }

    #[test]
    fn test_format() {
        let d = dt(9, 5, 7);
        assert_eq!(d.format_exif(), "2019:05:01 09:05:07");
        assert_eq!(d.format_iso(), "2019-05-01T09:05:07");
        assert_eq!(d.to_string(), "2019:05:01 09:05:07");
    }

    #[test]
    fn test_next_second_plain() {
        for s in 0..59 {
            let (next, rolled) = dt(12, 34, s).next_second_checked();
            assert_eq!(next, dt(12, 34, s + 1));
            assert!(!rolled);
        }
    }

    #[test]
    fn test_next_second_carries() {
        assert_eq!(dt(12, 34, 59).next_second(), dt(12, 35, 0));
        assert_eq!(dt(12, 59, 59).next_second(), dt(13, 0, 0));
    }

    #[test]
    fn test_next_second_out_of_range_fields() {
        let odd = StampDateTime {
            year: 2019,
            month: 5,
            day: 255,
            hour: 255,
            minute: 255,
            second: 255,
        };
        let (next, _) = odd.next_second_checked();
        assert_eq!(next.second, 0);

        let carry = StampDateTime {
            second: 200,
            minute: 200,
            hour: 200,
            ..odd
        };
        let (next, rolled) = carry.next_second_checked();
        assert_eq!((next.hour, next.minute, next.second), (0, 0, 0));
        assert!(rolled);
        assert_eq!(next.day, 0);
    }

    #[test]
    fn test_next_second_day_rollover() {
        let last = StampDateTime::new(2019, 5, 31, 23, 59, 59).unwrap();
        let (next, rolled) = last.next_second_checked();
        assert!(rolled);
        assert_eq!(next.hour, 0);
        assert_eq!(next.minute, 0);
        assert_eq!(next.second, 0);
        // Not normalized into June
        assert_eq!(next.day, 32);
        assert_eq!(next.month, 5);
        assert!(next.validate().is_err());
    }
}
