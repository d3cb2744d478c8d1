//! Core timestamp patching
//!
//! This module contains the byte-level machinery: the packed timezone codec,
//! byte patterns and their builders, and the substitution engine. Nothing
//! here touches the filesystem.

pub mod builder;
pub mod error;
pub mod pattern;
pub mod substitute;
pub mod timezone;

pub use builder::{packed_record, packed_search_pattern, text_field, xml_field};
pub use error::{StampError, StampResult};
pub use pattern::{BytePattern, PatternByte, PatternMatch};
pub use substitute::{
    replace_all, substitute_all, substitute_sequential, FieldCount, FieldPatterns,
    SequentialPlan, SubstitutionResult, TimezoneOverride,
};
pub use timezone::{decode_packed_tz, encode_packed_tz, PackedTimeZone, UtcOffset};
