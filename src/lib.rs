//! # movdate
//!
//! Patch the date/time values embedded in movie files so that they agree with
//! an authoritative reference timestamp, without re-encoding the file or
//! parsing its container.
//!
//! Two encodings are supported:
//!
//! - **Text fields**: a length byte, `YYYY:MM:DD HH:MM:SS` and a NUL, plus XMP
//!   `YYYY-MM-DDTHH:MM:SS±HH:MM` dates. Each is replaced in one global pass.
//! - **Packed records**: per-frame `0x18 tz CC YY MM 0x19 DD hh mm ss` records
//!   with a packed timezone byte. Runs of consecutive seconds are rewritten
//!   pass by pass until no record is left.
//!
//! ```rust
//! use movdate::core::substitute::{substitute_sequential, SequentialPlan};
//! use movdate::core::builder::packed_record;
//! use movdate::StampDateTime;
//!
//! let start = StampDateTime::parse("2019:05:01 10:00:00").unwrap();
//! let mut buffer = packed_record(&start, 0x04);
//! buffer.extend(packed_record(&start.next_second(), 0x04));
//!
//! let target = StampDateTime::parse("2019:05:01 09:00:00").unwrap();
//! let result = substitute_sequential(&mut buffer, &SequentialPlan::new(start, target)).unwrap();
//! assert_eq!(result.match_count, 2);
//! ```

pub mod core;
pub mod files;
pub mod utils;

pub use crate::core::{
    BytePattern, PackedTimeZone, PatternByte, StampError, StampResult, SubstitutionResult,
    TimezoneOverride, UtcOffset,
};
#[cfg(feature = "exiftool")]
pub use files::Exiftool;
pub use files::{
    collect_movie_files, patch_file, FileTimestamps, MetadataSource, MovieFamily, MovieFile,
    PatchOptions, PatchReport,
};
pub use utils::{StampDateTime, ZonedDateTime};
