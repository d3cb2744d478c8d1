//! Movie file discovery

use crate::core::error::StampResult;
use crate::files::family::MovieFamily;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Expand `paths` into the movie files they name
///
/// Files are kept when their extension names a [`MovieFamily`]. Directories
/// contribute their movie files, and with `recursive` those of every
/// subdirectory. Symbolic links to directories are not followed. Backup copies
/// never match because their extension ends in `_original`. Results are sorted
/// and free of duplicates.
pub fn collect_movie_files<P: AsRef<Path>>(paths: &[P], recursive: bool) -> StampResult<Vec<PathBuf>> {
    let mut found = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if path.is_dir() {
            visit_dir(path, recursive, &mut found)?;
        } else if MovieFamily::from_path(path).is_some() {
            found.push(path.to_path_buf());
        } else {
            tracing::debug!("Skipping {}: not a movie", path.display());
        }
    }
    found.sort();
    found.dedup();
    Ok(found)
}

fn visit_dir(dir: &Path, recursive: bool, found: &mut Vec<PathBuf>) -> StampResult<()> {
    let mut walker = WalkDir::new(dir).follow_links(false);
    if !recursive {
        walker = walker.max_depth(1);
    }
    for entry in walker {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_dir() {
            continue;
        }
        if MovieFamily::from_path(entry.path()).is_some() {
            found.push(entry.into_path());
        }
    }
    Ok(())
}
