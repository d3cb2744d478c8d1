//! Timezone codecs
//!
//! Two representations are handled here:
//!
//! - [`UtcOffset`]: the textual `±HH:MM` / `Z` suffix found in XMP values and
//!   in the collaborator's decoded timestamps.
//! - [`PackedTimeZone`]: the single byte that precedes the date in a packed
//!   timestamp record. Bit 5 (`0x20`) is the sign, bit 6 (`0x40`) the
//!   daylight-saving flag, and bits 0-4 the magnitude in half hours.

use crate::core::error::{StampError, StampResult};
use std::fmt;

const TZ_SIGN_BIT: u8 = 0x20;
const TZ_DST_BIT: u8 = 0x40;
const TZ_MAGNITUDE_MASK: u8 = 0x1F;

/// Largest offset the packed byte can carry, in hours
pub const MAX_PACKED_OFFSET_HOURS: f64 = 15.5;

/// Decode a packed timezone byte into (offset hours, daylight saving)
pub fn decode_packed_tz(byte: u8) -> (f64, bool) {
    let magnitude = f64::from(byte & TZ_MAGNITUDE_MASK) / 2.0;
    let hours = if byte & TZ_SIGN_BIT != 0 {
        -magnitude
    } else {
        magnitude
    };
    (hours, byte & TZ_DST_BIT != 0)
}

/// Encode (offset hours, daylight saving) into a packed timezone byte
///
/// The magnitude is floored to half hours and masked to five bits. Inputs
/// outside ±15.5h or off the half-hour grid are not representable; go through
/// [`PackedTimeZone::new`] to have them rejected instead of truncated.
pub fn encode_packed_tz(offset_hours: f64, daylight_saving: bool) -> u8 {
    let magnitude = ((offset_hours.abs() * 2.0).floor() as u8) & TZ_MAGNITUDE_MASK;
    let mut byte = magnitude;
    if daylight_saving {
        byte |= TZ_DST_BIT;
    }
    if offset_hours < 0.0 {
        byte |= TZ_SIGN_BIT;
    }
    byte
}

/// A timezone the packed byte can represent exactly
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackedTimeZone {
    hours: f64,
    daylight_saving: bool,
}

impl PackedTimeZone {
    /// Create a packed timezone, rejecting values the byte cannot hold
    ///
    /// # Example
    ///
    /// ```rust
    /// use movdate::core::timezone::PackedTimeZone;
    ///
    /// let tz = PackedTimeZone::new(-9.5, true).unwrap();
    /// assert_eq!(tz.to_byte(), 0x73);
    /// assert!(PackedTimeZone::new(5.75, false).is_err());
    /// ```
    pub fn new(hours: f64, daylight_saving: bool) -> StampResult<Self> {
        if !hours.is_finite() {
            return Err(StampError::DomainViolation(format!(
                "{} is not a finite offset",
                hours
            )));
        }
        if hours.abs() > MAX_PACKED_OFFSET_HOURS {
            return Err(StampError::DomainViolation(format!(
                "{}h exceeds ±{}h",
                hours, MAX_PACKED_OFFSET_HOURS
            )));
        }
        if (hours * 2.0).fract() != 0.0 {
            return Err(StampError::DomainViolation(format!(
                "{}h is not a multiple of half an hour",
                hours
            )));
        }
        Ok(Self {
            hours,
            daylight_saving,
        })
    }

    /// Decode a packed timezone byte
    pub fn from_byte(byte: u8) -> Self {
        let (hours, daylight_saving) = decode_packed_tz(byte);
        Self {
            hours,
            daylight_saving,
        }
    }

    /// Convert a textual offset, rejecting quarter-hour zones
    pub fn from_offset(offset: UtcOffset, daylight_saving: bool) -> StampResult<Self> {
        Self::new(offset.hours(), daylight_saving)
    }

    /// Encode to the packed byte
    pub fn to_byte(&self) -> u8 {
        encode_packed_tz(self.hours, self.daylight_saving)
    }

    /// Offset in hours
    pub fn hours(&self) -> f64 {
        self.hours
    }

    /// Daylight-saving flag
    pub fn daylight_saving(&self) -> bool {
        self.daylight_saving
    }

    /// Same flag, different offset
    pub fn with_hours(self, hours: f64) -> StampResult<Self> {
        Self::new(hours, self.daylight_saving)
    }

    /// Same offset, different flag
    pub fn with_daylight_saving(self, daylight_saving: bool) -> Self {
        Self {
            daylight_saving,
            ..self
        }
    }
}

impl fmt::Display for PackedTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}h", self.hours)?;
        if self.daylight_saving {
            f.write_str(" DST")?;
        }
        Ok(())
    }
}

/// Textual UTC offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtcOffset {
    minutes: i16,
    /// Written as `Z` rather than `+00:00`
    zulu: bool,
}

impl UtcOffset {
    /// Offset from signed minutes east of UTC
    pub fn from_minutes(minutes: i16) -> StampResult<Self> {
        if minutes.unsigned_abs() >= 24 * 60 {
            return Err(StampError::BadValue(
                "Timezone offset is out of range".to_string(),
            ));
        }
        Ok(Self {
            minutes,
            zulu: false,
        })
    }

    /// The `Z` designator
    pub fn utc() -> Self {
        Self {
            minutes: 0,
            zulu: true,
        }
    }

    /// Parse `Z`, `±HH:MM` or `±HHMM`
    pub fn parse(s: &str) -> StampResult<Self> {
        if s == "Z" {
            return Ok(Self::utc());
        }
        let bytes = s.as_bytes();
        let sign: i16 = match bytes.first() {
            Some(b'+') => 1,
            Some(b'-') => -1,
            _ => {
                return Err(StampError::BadValue(format!(
                    "Invalid timezone offset '{}'",
                    s
                )))
            }
        };
        let digits: Vec<u8> = bytes[1..].iter().copied().filter(|b| *b != b':').collect();
        let colon_ok = bytes.len() == 4 + 1 || (bytes.len() == 6 && bytes[3] == b':');
        if digits.len() != 4 || !colon_ok || !digits.iter().all(u8::is_ascii_digit) {
            return Err(StampError::BadValue(format!(
                "Invalid timezone offset '{}'",
                s
            )));
        }
        let num = |i: usize| i16::from(digits[i] - b'0') * 10 + i16::from(digits[i + 1] - b'0');
        let (hours, minutes) = (num(0), num(2));
        if hours > 23 || minutes > 59 {
            return Err(StampError::BadValue(
                "Timezone offset is out of range".to_string(),
            ));
        }
        Self::from_minutes(sign * (hours * 60 + minutes))
    }

    /// Signed minutes east of UTC
    pub fn minutes(&self) -> i16 {
        self.minutes
    }

    /// Signed hours east of UTC
    pub fn hours(&self) -> f64 {
        f64::from(self.minutes) / 60.0
    }
}

impl fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.zulu {
            return f.write_str("Z");
        }
        let sign = if self.minutes < 0 { '-' } else { '+' };
        let abs = self.minutes.abs();
        write!(f, "{}{:02}:{:02}", sign, abs / 60, abs % 60)
    }
}
