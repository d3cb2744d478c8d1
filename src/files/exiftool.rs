//! Metadata source backed by the `exiftool` program
//!
//! Runs `exiftool -j` on one file and decodes the JSON it prints. Tags that
//! are missing, zeroed (`0000:00:00 00:00:00`) or unparsable are reported as
//! absent.

use crate::core::error::{StampError, StampResult};
use crate::files::family::MovieFamily;
use crate::files::handler::{FileTimestamps, MetadataSource};
use crate::utils::datetime::ZonedDateTime;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;

const REQUESTED_TAGS: &[&str] = &[
    "-CreateDate",
    "-FileModifyDate",
    "-DateTimeOriginal",
    "-LastUpdate",
    "-CreationDateValue",
];

/// One element of `exiftool -j` output
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExiftoolRecord {
    /// Container creation date
    pub create_date: Option<String>,
    /// Filesystem modification date
    pub file_modify_date: Option<String>,
    /// Maker-note or stream original date/time
    pub date_time_original: Option<String>,
    /// XMP last-update date
    pub last_update: Option<String>,
    /// XMP creation date
    pub creation_date_value: Option<String>,
}

impl ExiftoolRecord {
    /// Decode the record into timestamps
    pub fn into_timestamps(self) -> FileTimestamps {
        FileTimestamps {
            create_date: decode_tag("CreateDate", self.create_date),
            file_modify_date: decode_tag("FileModifyDate", self.file_modify_date),
            date_time_original: decode_tag("DateTimeOriginal", self.date_time_original),
            last_update: decode_tag("LastUpdate", self.last_update),
            creation_date_value: decode_tag("CreationDateValue", self.creation_date_value),
        }
    }
}

fn decode_tag(tag: &str, value: Option<String>) -> Option<ZonedDateTime> {
    let value = value?;
    match ZonedDateTime::parse(&value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::debug!("Ignoring {} = {:?}: {}", tag, value, e);
            None
        }
    }
}

/// Parse the JSON printed by `exiftool -j` for a single file
pub fn parse_exiftool_json(json: &[u8]) -> StampResult<FileTimestamps> {
    let records: Vec<ExiftoolRecord> = serde_json::from_slice(json)?;
    records
        .into_iter()
        .next()
        .map(ExiftoolRecord::into_timestamps)
        .ok_or_else(|| StampError::Metadata("exiftool returned no records".to_string()))
}

/// [`MetadataSource`] that shells out to exiftool
#[derive(Debug, Clone)]
pub struct Exiftool {
    program: PathBuf,
}

impl Default for Exiftool {
    fn default() -> Self {
        Self::new("exiftool")
    }
}

impl Exiftool {
    /// Use the exiftool binary at `program`
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, path: &Path, family: MovieFamily) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-j").arg("-api").arg("LargeFileSupport=1");
        // Packed records live in the video stream, not the container header
        if family == MovieFamily::Packed {
            cmd.arg("-ee");
        }
        cmd.args(REQUESTED_TAGS).arg(path);
        cmd
    }
}

impl MetadataSource for Exiftool {
    fn read_timestamps(&self, path: &Path, family: MovieFamily) -> StampResult<FileTimestamps> {
        let output = self.command(path, family).output()?;
        if !output.status.success() {
            return Err(StampError::Metadata(format!(
                "exiftool failed on {}: {}",
                path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        parse_exiftool_json(&output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json() {
        let json = br#"[{
            "SourceFile": "clip.mov",
            "CreateDate": "2019:05:02 11:30:00",
            "FileModifyDate": "2019:05:01 09:00:00+02:00",
            "DateTimeOriginal": "2019:05:01 10:00:00+02:00 DST",
            "LastUpdate": "0000:00:00 00:00:00"
        }]"#;
        let ts = parse_exiftool_json(json).unwrap();
        assert_eq!(ts.create_date.unwrap().datetime.hour, 11);
        assert_eq!(ts.file_modify_date.unwrap().offset.unwrap().minutes(), 120);
        assert!(ts.date_time_original.unwrap().daylight_saving);
        assert!(ts.last_update.is_none());
        assert!(ts.creation_date_value.is_none());
    }

    #[test]
    fn test_parse_empty_json() {
        assert!(matches!(
            parse_exiftool_json(b"[]"),
            Err(StampError::Metadata(_))
        ));
        assert!(matches!(
            parse_exiftool_json(b"not json"),
            Err(StampError::Json(_))
        ));
    }

    #[test]
    fn test_command_args() {
        let tool = Exiftool::default();
        let cmd = tool.command(Path::new("a.mts"), MovieFamily::Packed);
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert!(args.contains(&"-ee".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("a.mts"));

        let cmd = tool.command(Path::new("a.mov"), MovieFamily::Text);
        assert!(!cmd.get_args().any(|a| a == "-ee"));
    }
}
