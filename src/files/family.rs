//! Movie file families
//!
//! A file's family decides which timestamp encoding is patched. Detection is by
//! extension only; container contents are never inspected.

use std::fmt;
use std::path::Path;

/// File family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovieFamily {
    /// QuickTime-style containers with framed text timestamps and XMP dates
    Text,
    /// AVCHD/MPEG-TS streams with per-frame packed timestamp records
    Packed,
}

const TEXT_EXTENSIONS: &[&str] = &["mov", "mp4", "m4v", "3gp"];
const PACKED_EXTENSIONS: &[&str] = &["mts", "m2ts", "m2t", "ts"];

impl MovieFamily {
    /// Detect the family from the path's extension (case-insensitive)
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())?
            .to_lowercase();
        Self::from_extension(&ext)
    }

    /// Detect the family from a lowercase extension without the dot
    pub fn from_extension(ext: &str) -> Option<Self> {
        if TEXT_EXTENSIONS.contains(&ext) {
            Some(MovieFamily::Text)
        } else if PACKED_EXTENSIONS.contains(&ext) {
            Some(MovieFamily::Packed)
        } else {
            None
        }
    }

    /// Extensions belonging to this family
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            MovieFamily::Text => TEXT_EXTENSIONS,
            MovieFamily::Packed => PACKED_EXTENSIONS,
        }
    }

    /// Tag holding the authoritative timestamp for this family
    pub fn reference_tag(&self) -> &'static str {
        match self {
            MovieFamily::Text => "CreateDate",
            MovieFamily::Packed => "FileModifyDate",
        }
    }
}

impl fmt::Display for MovieFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovieFamily::Text => f.write_str("text"),
            MovieFamily::Packed => f.write_str("packed"),
        }
    }
}
