//! Movie file handling
//!
//! This module connects the byte-level engine to files on disk: family
//! detection, options, the metadata collaborator, discovery and persistence.

#[cfg(feature = "exiftool")]
pub mod exiftool;
pub mod family;
pub mod file;
pub mod handler;
pub mod walk;

#[cfg(feature = "exiftool")]
pub use exiftool::Exiftool;
pub use family::MovieFamily;
pub use file::{patch_file, MovieFile, PatchReport};
pub use handler::{FileTimestamps, MetadataSource, PatchOptions};
pub use walk::collect_movie_files;
