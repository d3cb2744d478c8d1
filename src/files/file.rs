//! Movie file API
//!
//! [`MovieFile`] holds a whole file in memory, chooses the encoding for its
//! family, runs the substitution engine, and writes the result back only when
//! something changed.

use crate::core::builder::{text_field, xml_field};
use crate::core::error::{StampError, StampResult};
use crate::core::substitute::{
    substitute_all, substitute_sequential, FieldPatterns, SequentialPlan, SubstitutionResult,
};
use crate::files::family::MovieFamily;
use crate::files::handler::{FileTimestamps, MetadataSource, PatchOptions};
use crate::utils::datetime::ZonedDateTime;
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix appended to the file name of a backup copy
pub const BACKUP_SUFFIX: &str = "_original";

/// What happened to one file
#[derive(Debug, Clone, PartialEq)]
pub struct PatchReport {
    /// File path, when the buffer came from disk
    pub path: Option<PathBuf>,
    /// Family the file was handled as
    pub family: MovieFamily,
    /// Substitution counts
    pub result: SubstitutionResult,
    /// Fields that were not touched, with the reason
    pub skipped: Vec<(String, String)>,
    /// Whether the file on disk was rewritten
    pub written: bool,
}

impl PatchReport {
    /// Total substitutions
    pub fn total(&self) -> usize {
        self.result.match_count
    }
}

/// An in-memory movie file
///
/// # Example
///
/// ```rust
/// use movdate::{FileTimestamps, MovieFamily, MovieFile, PatchOptions, ZonedDateTime};
///
/// let mut data = vec![20u8];
/// data.extend_from_slice(b"2019:05:01 10:00:00");
/// data.push(0);
///
/// let timestamps = FileTimestamps {
///     create_date: Some(ZonedDateTime::parse("2019:05:02 11:30:00").unwrap()),
///     date_time_original: Some(ZonedDateTime::parse("2019:05:01 10:00:00").unwrap()),
///     ..Default::default()
/// };
///
/// let mut file = MovieFile::from_bytes(data, MovieFamily::Text);
/// let report = file.apply(&timestamps, &PatchOptions::default()).unwrap();
/// assert_eq!(report.total(), 1);
/// assert_eq!(&file.data()[1..20], b"2019:05:02 11:30:00");
/// ```
#[derive(Debug, Clone)]
pub struct MovieFile {
    path: Option<PathBuf>,
    family: MovieFamily,
    data: Vec<u8>,
}

impl MovieFile {
    /// Read a file from disk, detecting its family by extension
    pub fn open<P: AsRef<Path>>(path: P) -> StampResult<Self> {
        let path = path.as_ref();
        let family = MovieFamily::from_path(path).ok_or_else(|| {
            StampError::NotApplicable(format!("{} is not a known movie type", path.display()))
        })?;
        let data = fs::read(path)?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            family,
            data,
        })
    }

    /// Wrap an in-memory buffer
    pub fn from_bytes(data: Vec<u8>, family: MovieFamily) -> Self {
        Self {
            path: None,
            family,
            data,
        }
    }

    /// The current buffer
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the file, returning its buffer
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// The file family
    pub fn family(&self) -> MovieFamily {
        self.family
    }

    /// The file path, if opened from disk
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Patch the in-memory buffer to agree with the reference timestamp
    ///
    /// Nothing is written to disk; see [`MovieFile::save`].
    ///
    /// # Errors
    ///
    /// `NotApplicable` when the reference is missing or every field already
    /// agrees, `PatternNotFound` when a packed file holds no record at the
    /// field timestamp. Both leave the buffer untouched.
    pub fn apply(
        &mut self,
        timestamps: &FileTimestamps,
        options: &PatchOptions,
    ) -> StampResult<PatchReport> {
        let reference = timestamps.reference(self.family).ok_or_else(|| {
            StampError::NotApplicable(format!("no {}", self.family.reference_tag()))
        })?;

        let (result, skipped) = match self.family {
            MovieFamily::Text => self.apply_text(reference, timestamps)?,
            MovieFamily::Packed => (self.apply_packed(reference, timestamps, options)?, Vec::new()),
        };

        for (field, reason) in &skipped {
            tracing::debug!("{}: skipped: {}", field, reason);
        }

        Ok(PatchReport {
            path: self.path.clone(),
            family: self.family,
            result,
            skipped,
            written: false,
        })
    }

    fn apply_text(
        &mut self,
        reference: &ZonedDateTime,
        timestamps: &FileTimestamps,
    ) -> StampResult<(SubstitutionResult, Vec<(String, String)>)> {
        let (fields, skipped) = text_fields(reference, timestamps);
        if fields.iter().all(FieldPatterns::is_noop) {
            return Err(StampError::NotApplicable(format!(
                "all fields already match {}",
                reference.datetime
            )));
        }
        Ok((substitute_all(&mut self.data, &fields), skipped))
    }

    fn apply_packed(
        &mut self,
        reference: &ZonedDateTime,
        timestamps: &FileTimestamps,
        options: &PatchOptions,
    ) -> StampResult<SubstitutionResult> {
        let original = timestamps
            .date_time_original
            .as_ref()
            .ok_or_else(|| StampError::NotApplicable("no DateTimeOriginal".to_string()))?;

        let target = options.timezone_override();
        if original.datetime == reference.datetime && target.is_empty() {
            return Err(StampError::NotApplicable(format!(
                "DateTimeOriginal already matches {}",
                reference.datetime
            )));
        }

        let plan = SequentialPlan::new(original.datetime, reference.datetime)
            .target_tz(target)
            .max_passes(options.pass_limit());
        substitute_sequential(&mut self.data, &plan)
    }

    /// Write the buffer back to its path
    ///
    /// With [`PatchOptions::keep_backup`] the untouched file is first copied
    /// to `<name>_original` (an existing backup is kept as is). The file's
    /// modification time is restored after the write.
    pub fn save(&self, options: &PatchOptions) -> StampResult<()> {
        let path = self
            .path
            .as_deref()
            .ok_or_else(|| StampError::BadParam("buffer has no file path".to_string()))?;

        let modified = fs::metadata(path)?.modified()?;

        if options.keep_backup {
            let backup = backup_path(path);
            if backup.exists() {
                tracing::debug!("Keeping existing backup {}", backup.display());
            } else {
                fs::copy(path, &backup)?;
            }
        }

        fs::write(path, &self.data)?;
        fs::File::options()
            .write(true)
            .open(path)?
            .set_modified(modified)?;
        Ok(())
    }
}

/// Path of the backup copy for `path`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(BACKUP_SUFFIX);
    path.with_file_name(name)
}

/// Build the text-family field patterns for `reference`
///
/// Returns the patterns to apply and the fields that were absent.
pub fn text_fields(
    reference: &ZonedDateTime,
    timestamps: &FileTimestamps,
) -> (Vec<FieldPatterns>, Vec<(String, String)>) {
    let mut fields = Vec::new();
    let mut skipped = Vec::new();

    match &timestamps.date_time_original {
        Some(original) => fields.push(FieldPatterns::new(
            "DateTimeOriginal",
            text_field(&original.datetime),
            text_field(&reference.datetime),
        )),
        None => skipped.push(("DateTimeOriginal".to_string(), "absent".to_string())),
    }

    let xml = [
        ("LastUpdate", &timestamps.last_update),
        ("CreationDateValue", &timestamps.creation_date_value),
    ];
    for (name, value) in xml {
        match value {
            Some(value) => fields.push(FieldPatterns::new(
                name,
                xml_field(&value.datetime, value.offset),
                xml_field(&reference.datetime, reference.offset.or(value.offset)),
            )),
            None => skipped.push((name.to_string(), "absent".to_string())),
        }
    }

    (fields, skipped)
}

/// Read, patch and (unless dry-running) write one file
///
/// The file is written only when at least one substitution was made.
pub fn patch_file<P, S>(path: P, source: &S, options: &PatchOptions) -> StampResult<PatchReport>
where
    P: AsRef<Path>,
    S: MetadataSource + ?Sized,
{
    let mut file = MovieFile::open(path)?;
    let path = file.path.clone().unwrap_or_default();
    let timestamps = source.read_timestamps(&path, file.family)?;
    let mut report = file.apply(&timestamps, options)?;

    if report.total() == 0 {
        tracing::info!("{}: no changes", path.display());
        return Ok(report);
    }

    if options.dry_run {
        tracing::info!(
            "{}: would make {} substitution(s)",
            path.display(),
            report.total()
        );
        return Ok(report);
    }

    file.save(options)?;
    report.written = true;
    tracing::info!(
        "{}: {} substitution(s) written",
        path.display(),
        report.total()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::timezone::UtcOffset;

    fn zoned(s: &str) -> ZonedDateTime {
        ZonedDateTime::parse(s).unwrap()
    }

    #[test]
    fn test_backup_path() {
        assert_eq!(
            backup_path(Path::new("/tmp/clip.mov")),
            PathBuf::from("/tmp/clip.mov_original")
        );
    }

    #[test]
    fn test_text_fields_offsets() {
        let reference = zoned("2019:05:02 11:30:00");
        let timestamps = FileTimestamps {
            last_update: Some(zoned("2019:05:01 10:00:00+02:00")),
            ..Default::default()
        };
        let (fields, skipped) = text_fields(&reference, &timestamps);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].from, b"2019-05-01T10:00:00+02:00".to_vec());
        assert_eq!(fields[0].to, b"2019-05-02T11:30:00+02:00".to_vec());
        assert_eq!(skipped.len(), 2);

        let reference = ZonedDateTime {
            offset: Some(UtcOffset::utc()),
            ..reference
        };
        let (fields, _) = text_fields(&reference, &timestamps);
        assert_eq!(fields[0].to, b"2019-05-02T11:30:00Z".to_vec());
    }

    #[test]
    fn test_apply_without_reference() {
        let mut file = MovieFile::from_bytes(vec![1, 2, 3], MovieFamily::Packed);
        let err = file
            .apply(&FileTimestamps::default(), &PatchOptions::default())
            .unwrap_err();
        assert!(matches!(err, StampError::NotApplicable(_)));
    }

    #[test]
    fn test_save_without_path() {
        let file = MovieFile::from_bytes(vec![1, 2, 3], MovieFamily::Text);
        assert!(matches!(
            file.save(&PatchOptions::default()),
            Err(StampError::BadParam(_))
        ));
    }
}
