//! Patch options and the metadata collaborator interface
//!
//! Reading decoded tag values out of a movie container is delegated to a
//! [`MetadataSource`]. The patcher only needs the handful of timestamps in
//! [`FileTimestamps`].

use crate::core::error::StampResult;
use crate::core::substitute::{TimezoneOverride, DEFAULT_MAX_PASSES};
use crate::files::family::MovieFamily;
use crate::utils::datetime::ZonedDateTime;
use std::path::Path;

/// Options for patching files.
///
/// Use the builder pattern to configure options.
///
/// # Example
///
/// ```rust
/// use movdate::PatchOptions;
///
/// let options = PatchOptions::default()
///     .timezone(-9.5)
///     .daylight_saving(true)
///     .keep_backup();
/// assert!(options.keep_backup);
/// assert_eq!(options.timezone_override().hours, Some(-9.5));
/// ```
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct PatchOptions {
    /// Target offset in hours for packed records (default: keep the source offset)
    pub timezone: Option<f64>,
    /// Target daylight-saving flag for packed records (default: keep the source flag)
    pub daylight_saving: Option<bool>,
    /// Copy the original bytes to `<name>_original` before writing
    pub keep_backup: bool,
    /// Count substitutions without writing anything
    pub dry_run: bool,
    /// Pass limit for packed runs (default: [`DEFAULT_MAX_PASSES`])
    pub max_passes: Option<usize>,
    /// Descend into subdirectories
    pub recursive: bool,
}

impl PatchOptions {
    /// Rewrite packed records into this offset.
    pub fn timezone(mut self, hours: f64) -> Self {
        self.timezone = Some(hours);
        self
    }

    /// Rewrite packed records with this daylight-saving flag.
    pub fn daylight_saving(mut self, dst: bool) -> Self {
        self.daylight_saving = Some(dst);
        self
    }

    /// Keep a copy of the original file.
    pub fn keep_backup(mut self) -> Self {
        self.keep_backup = true;
        self
    }

    /// Report what would change, but write nothing.
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Bound the number of passes over a packed run.
    pub fn max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = Some(max_passes);
        self
    }

    /// Descend into subdirectories.
    pub fn recursive(mut self) -> Self {
        self.recursive = true;
        self
    }

    /// The timezone part of these options
    pub fn timezone_override(&self) -> TimezoneOverride {
        TimezoneOverride {
            hours: self.timezone,
            daylight_saving: self.daylight_saving,
        }
    }

    /// Effective pass limit
    pub fn pass_limit(&self) -> usize {
        self.max_passes.unwrap_or(DEFAULT_MAX_PASSES)
    }
}

/// Decoded timestamps read from one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTimestamps {
    /// Container creation date (text family reference)
    pub create_date: Option<ZonedDateTime>,
    /// File modification date (packed family reference)
    pub file_modify_date: Option<ZonedDateTime>,
    /// Maker-note or stream original date/time
    pub date_time_original: Option<ZonedDateTime>,
    /// XMP last-update date
    pub last_update: Option<ZonedDateTime>,
    /// XMP creation date
    pub creation_date_value: Option<ZonedDateTime>,
}

impl FileTimestamps {
    /// The authoritative timestamp for `family`
    pub fn reference(&self, family: MovieFamily) -> Option<&ZonedDateTime> {
        match family {
            MovieFamily::Text => self.create_date.as_ref(),
            MovieFamily::Packed => self.file_modify_date.as_ref(),
        }
    }
}

/// Source of decoded timestamps for a file
pub trait MetadataSource {
    /// Read the timestamps relevant to `family` from the file at `path`
    fn read_timestamps(&self, path: &Path, family: MovieFamily) -> StampResult<FileTimestamps>;
}

impl<S: MetadataSource + ?Sized> MetadataSource for &S {
    fn read_timestamps(&self, path: &Path, family: MovieFamily) -> StampResult<FileTimestamps> {
        (**self).read_timestamps(path, family)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::datetime::StampDateTime;

    #[test]
    fn test_defaults() {
        let options = PatchOptions::default();
        assert!(options.timezone_override().is_empty());
        assert_eq!(options.pass_limit(), DEFAULT_MAX_PASSES);
        assert!(!options.dry_run);
    }

    #[test]
    fn test_builder() {
        let options = PatchOptions::default()
            .daylight_saving(false)
            .max_passes(10)
            .dry_run()
            .recursive();
        assert_eq!(options.timezone_override().daylight_saving, Some(false));
        assert_eq!(options.timezone_override().hours, None);
        assert_eq!(options.pass_limit(), 10);
        assert!(options.dry_run && options.recursive);
    }

    #[test]
    fn test_reference_by_family() {
        let create = ZonedDateTime::naive(StampDateTime::parse("2019:05:02 11:30:00").unwrap());
        let modify = ZonedDateTime::naive(StampDateTime::parse("2019:05:01 09:00:00").unwrap());
        let ts = FileTimestamps {
            create_date: Some(create),
            file_modify_date: Some(modify),
            ..Default::default()
        };
        assert_eq!(ts.reference(MovieFamily::Text), Some(&create));
        assert_eq!(ts.reference(MovieFamily::Packed), Some(&modify));
    }
}
