//! Candidate file discovery.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// True if the file name contains any excluded token anywhere.
///
/// This is a plain substring test, so `.git` also excludes `foo.gitignore`.
pub fn is_excluded(file_name: &str, excluded: &[String]) -> bool {
    excluded.iter().any(|token| file_name.contains(token.as_str()))
}

/// Collect every regular file under `root`, top-down.
///
/// Each directory contributes its own files first, in the order the
/// filesystem lists them, before its subdirectories are visited. Symlinked
/// directories are not followed; symlinks to files are kept. Directories
/// that cannot be read are skipped.
pub fn collect_files(root: &Path, excluded: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    walk_dir(root, excluded, &mut files);
    files
}

fn walk_dir(dir: &Path, excluded: &[String], files: &mut Vec<PathBuf>) {
    let read_dir = match fs::read_dir(dir) {
        Ok(iter) => iter,
        Err(err) => {
            warn!(path = %dir.display(), error = %err, "skipping unreadable directory");
            return;
        }
    };

    let mut subdirs = Vec::new();
    for entry_result in read_dir {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) => {
                warn!(path = %dir.display(), error = %err, "error reading directory entry");
                continue;
            }
        };

        let entry_path = entry.path();
        let file_type = match entry.file_type() {
            Ok(ft) => ft,
            Err(err) => {
                warn!(path = %entry_path.display(), error = %err, "error reading file type");
                continue;
            }
        };

        if file_type.is_dir() {
            subdirs.push(entry_path);
            continue;
        }

        let is_file = file_type.is_file()
            || (file_type.is_symlink()
                && fs::metadata(&entry_path)
                    .map(|meta| meta.is_file())
                    .unwrap_or(false));
        if !is_file {
            continue;
        }

        if is_excluded(&entry.file_name().to_string_lossy(), excluded) {
            debug!(path = %entry_path.display(), "excluded");
            continue;
        }
        files.push(entry_path);
    }

    for subdir in subdirs {
        walk_dir(&subdir, excluded, files);
    }
}
