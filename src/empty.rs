//! Empty-file and empty-folder detection.
//!
//! A file is empty when it has zero bytes. A folder is empty when no file
//! exists anywhere below it and every subfolder is itself empty, so a chain
//! of nested folders with nothing at the bottom counts all the way up.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

/// Everything found empty under one root.
#[derive(Debug, Default)]
pub struct EmptyScan {
    pub files: Vec<PathBuf>,
    /// Bottom-up: deeper folders come before their parents.
    pub dirs: Vec<PathBuf>,
}

impl EmptyScan {
    /// Combined listing, folders first, as written to the report file.
    pub fn all_paths(&self) -> Vec<PathBuf> {
        let mut all = self.dirs.clone();
        all.extend(self.files.iter().cloned());
        all
    }

    pub fn is_clean(&self) -> bool {
        self.files.is_empty() && self.dirs.is_empty()
    }
}

/// Scan `root` for empty files and recursively-empty folders.
pub fn scan(root: &Path) -> io::Result<EmptyScan> {
    if !root.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no valid directory path provided: {}", root.display()),
        ));
    }
    let mut result = EmptyScan::default();
    visit(root, &mut result);
    Ok(result)
}

/// Post-order walk; returns whether `dir` is empty. The root itself is never
/// reported, only its content.
fn visit(dir: &Path, out: &mut EmptyScan) -> bool {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("cannot read {}: {err}", dir.display());
            // Unreadable folders are treated as non-empty: never a delete
            // candidate.
            return false;
        }
    };

    let mut empty = true;
    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(err) => {
                warn!("cannot stat {}: {err}", path.display());
                empty = false;
                continue;
            }
        };

        if file_type.is_dir() {
            if visit(&path, out) {
                out.dirs.push(path);
            } else {
                empty = false;
            }
        } else if file_type.is_file() {
            match path.metadata() {
                Ok(meta) if meta.len() == 0 => out.files.push(path),
                Ok(_) => {}
                Err(err) => warn!("cannot stat {}: {err}", path.display()),
            }
            empty = false;
        } else {
            // Symlinks and other specials make a folder non-empty but are
            // never reported themselves.
            empty = false;
        }
    }
    empty
}

/// Delete everything found: files first, then folders deepest-first so parents
/// empty out before their own removal. Failures are logged and skipped.
/// Returns (files_deleted, dirs_deleted).
pub fn delete(scan: &EmptyScan) -> (usize, usize) {
    let mut files_deleted = 0;
    for path in &scan.files {
        match fs::remove_file(path) {
            Ok(()) => {
                info!("deleted file: {}", path.display());
                files_deleted += 1;
            }
            Err(err) => warn!("error deleting file {}: {err}", path.display()),
        }
    }

    let mut dirs = scan.dirs.clone();
    dirs.sort();
    let mut dirs_deleted = 0;
    for path in dirs.iter().rev() {
        match fs::remove_dir(path) {
            Ok(()) => {
                info!("deleted folder: {}", path.display());
                dirs_deleted += 1;
            }
            Err(err) => warn!("error deleting folder {}: {err}", path.display()),
        }
    }
    (files_deleted, dirs_deleted)
}
