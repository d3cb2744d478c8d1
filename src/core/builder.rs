//! Timestamp pattern builders
//!
//! Byte layouts produced here:
//!
//! - Text field: `0x14` (length, 20) + `YYYY:MM:DD HH:MM:SS` + `0x00`.
//! - XML field: `YYYY-MM-DDTHH:MM:SS` followed by the offset, if any.
//! - Packed record: `0x18 tz CC YY MM 0x19 DD hh mm ss`, each date/time pair
//!   packed one decimal digit per nibble.
//!
//! Search patterns for the packed record may leave the timezone byte as a
//! wildcard; replacement records are always fully literal.

use crate::core::pattern::BytePattern;
use crate::core::timezone::UtcOffset;
use crate::utils::datetime::StampDateTime;

/// Leading byte of a text field (the field length including the terminator)
pub const TEXT_FIELD_LENGTH: u8 = 20;
/// Trailing byte of a text field
pub const TEXT_FIELD_TERMINATOR: u8 = 0;

/// Marker opening the timezone/date half of a packed record
pub const PACKED_DATE_MARKER: u8 = 0x18;
/// Marker opening the day/time half of a packed record
pub const PACKED_TIME_MARKER: u8 = 0x19;
/// Total length of a packed record
pub const PACKED_RECORD_LEN: usize = 10;

/// Pack a two-digit value one decimal digit per nibble
pub fn pack_digits(value: u8) -> u8 {
    16 * (value / 10) + value % 10
}

/// Inverse of [`pack_digits`]
pub fn unpack_digits(byte: u8) -> u8 {
    (byte >> 4) * 10 + (byte & 0x0F)
}

/// Build the framed text field for `ts`
///
/// # Example
///
/// ```rust
/// use movdate::core::builder::text_field;
/// use movdate::utils::datetime::StampDateTime;
///
/// let ts = StampDateTime::parse("2019:05:01 10:00:00").unwrap();
/// let field = text_field(&ts);
/// assert_eq!(field.len(), 21);
/// assert_eq!(field[0], 20);
/// assert_eq!(&field[1..20], b"2019:05:01 10:00:00");
/// assert_eq!(field[20], 0);
/// ```
pub fn text_field(ts: &StampDateTime) -> Vec<u8> {
    let text = ts.format_exif();
    let mut bytes = Vec::with_capacity(text.len() + 2);
    bytes.push(TEXT_FIELD_LENGTH);
    bytes.extend_from_slice(text.as_bytes());
    bytes.push(TEXT_FIELD_TERMINATOR);
    bytes
}

/// Build the XML date text for `ts` with an optional offset suffix
pub fn xml_field(ts: &StampDateTime, offset: Option<UtcOffset>) -> Vec<u8> {
    let mut text = ts.format_iso();
    if let Some(offset) = offset {
        text.push_str(&offset.to_string());
    }
    text.into_bytes()
}

fn packed_date_digits(ts: &StampDateTime) -> [u8; 3] {
    [
        pack_digits((ts.year / 100) as u8),
        pack_digits((ts.year % 100) as u8),
        pack_digits(ts.month),
    ]
}

fn packed_time_digits(ts: &StampDateTime) -> [u8; 4] {
    [
        pack_digits(ts.day),
        pack_digits(ts.hour),
        pack_digits(ts.minute),
        pack_digits(ts.second),
    ]
}

/// Build the search pattern for a packed record
///
/// With `tz == None` the timezone byte is a wildcard, leaving nine literal
/// bytes; with a known timezone all ten bytes are literal.
pub fn packed_search_pattern(ts: &StampDateTime, tz: Option<u8>) -> BytePattern {
    let mut pattern = BytePattern::new();
    pattern.push_literal(PACKED_DATE_MARKER);
    match tz {
        Some(byte) => pattern.push_literal(byte),
        None => pattern.push_any(),
    };
    pattern
        .extend_literal(&packed_date_digits(ts))
        .push_literal(PACKED_TIME_MARKER)
        .extend_literal(&packed_time_digits(ts));
    pattern
}

/// Build the literal packed record for `ts` in timezone `tz`
pub fn packed_record(ts: &StampDateTime, tz: u8) -> Vec<u8> {
    let mut record = Vec::with_capacity(PACKED_RECORD_LEN);
    record.push(PACKED_DATE_MARKER);
    record.push(tz);
    record.extend_from_slice(&packed_date_digits(ts));
    record.push(PACKED_TIME_MARKER);
    record.extend_from_slice(&packed_time_digits(ts));
    record
}
