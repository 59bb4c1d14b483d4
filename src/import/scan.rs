//! Directory scanning and processed-file relocation.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Collect every regular file under `dir` (recursively) whose extension matches
/// `extension` case-insensitively. A leading `.` on `extension` is ignored.
///
/// Entries are visited in file-name order. An unreadable root is an error;
/// unreadable entries below it are logged and skipped.
pub fn collect_file_paths(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let wanted = extension.trim_start_matches('.').to_lowercase();
    let mut paths = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                log::warn!("Skipping unreadable entry under {}: {e}", dir.display());
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        if has_extension(entry.path(), &wanted) {
            paths.push(entry.into_path());
        }
    }

    log::debug!("Found {} .{} file(s) under {}", paths.len(), wanted, dir.display());
    Ok(paths)
}

fn has_extension(path: &Path, wanted_lowercase: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.to_lowercase() == wanted_lowercase)
}

/// Move `src` into `dst_dir`, creating the directory if needed.
///
/// Returns the new path. Never overwrites: an existing `dst_dir/<name>` is reported
/// as `DestinationExists` and both files are left untouched.
pub fn move_file(src: &Path, dst_dir: &Path) -> Result<PathBuf> {
    let destination = destination_for(src, dst_dir)?;

    fs::create_dir_all(dst_dir)?;

    if fs::symlink_metadata(&destination).is_ok() {
        return Err(Error::DestinationExists(destination));
    }

    fs::rename(src, &destination)?;
    log::info!("Moved {} to {}", src.display(), destination.display());
    Ok(destination)
}

/// Where `move_file` would place `src` inside `dst_dir`.
pub fn destination_for(src: &Path, dst_dir: &Path) -> Result<PathBuf> {
    let file_name = src
        .file_name()
        .ok_or_else(|| Error::Parse(format!("{} has no file name", src.display())))?;
    Ok(dst_dir.join(file_name))
}

/// Whether `path` lies inside `dir`, comparing canonical forms when both exist.
pub fn is_within(path: &Path, dir: &Path) -> bool {
    if path.starts_with(dir) {
        return true;
    }
    match (path.canonicalize(), dir.canonicalize()) {
        (Ok(path), Ok(dir)) => path.starts_with(dir),
        _ => false,
    }
}
