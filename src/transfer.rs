//! Moving or copying files by extension across a folder tree.
//!
//! Two shapes: flattened (everything lands directly in the destination, name
//! collisions get a ` (n)` suffix) or structure-preserving (the source-relative
//! path is recreated under the destination). A count summary is gathered
//! before any filesystem write; zero matches means zero writes.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

/// How matched files travel.
#[derive(Debug, Clone)]
pub struct TransferOptions {
    /// Extensions to match, with the dot, case-insensitive.
    pub extensions: Vec<String>,
    /// Copy instead of move.
    pub copy: bool,
    /// Drop the directory structure and put every file in the destination
    /// root.
    pub flatten: bool,
}

/// What one run did.
#[derive(Debug, Default)]
pub struct TransferOutcome {
    /// Files found per extension, before transferring.
    pub counts: BTreeMap<String, u64>,
    pub transferred: u64,
    pub failed: u64,
}

impl TransferOutcome {
    pub fn total_matched(&self) -> u64 {
        self.counts.values().sum()
    }
}

/// Count matching files per extension. First matching extension wins, so
/// overlapping suffixes never double-count a file.
pub fn gather_counts(root: &Path, extensions: &[String]) -> io::Result<BTreeMap<String, u64>> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for ext in extensions {
        counts.insert(ext.to_lowercase(), 0);
    }
    let mut files = Vec::new();
    collect_matches(root, extensions, &mut files);
    for (_, ext) in &files {
        *counts.entry(ext.clone()).or_default() += 1;
    }
    Ok(counts)
}

/// Run the transfer. `root` must exist; the destination is created on demand.
/// Per-file failures are logged and skipped.
pub fn run(root: &Path, dest: &Path, options: &TransferOptions) -> io::Result<TransferOutcome> {
    if !root.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no valid directory path provided: {}", root.display()),
        ));
    }

    let mut outcome = TransferOutcome {
        counts: gather_counts(root, &options.extensions)?,
        ..Default::default()
    };
    if outcome.total_matched() == 0 {
        info!("no files found with the given extensions, nothing to do");
        return Ok(outcome);
    }

    fs::create_dir_all(dest)?;

    let mut files = Vec::new();
    collect_matches(root, &options.extensions, &mut files);

    let verb = if options.copy { "copied" } else { "moved" };
    for (src, _) in files {
        let destination = match destination_for(&src, root, dest, options.flatten) {
            Ok(path) => path,
            Err(err) => {
                warn!("cannot prepare destination for {}: {err}", src.display());
                outcome.failed += 1;
                continue;
            }
        };

        let result = if options.copy {
            fs::copy(&src, &destination).map(|_| ())
        } else {
            move_file(&src, &destination)
        };
        match result {
            Ok(()) => {
                info!("{verb}: {} -> {}", src.display(), destination.display());
                outcome.transferred += 1;
            }
            Err(err) => {
                warn!("error transferring {}: {err}", src.display());
                outcome.failed += 1;
            }
        }
    }

    Ok(outcome)
}

/// Depth-first listing of files whose name ends with one of the extensions.
/// Returns (path, matched extension lowercase) pairs in traversal order.
fn collect_matches(dir: &Path, extensions: &[String], out: &mut Vec<(PathBuf, String)>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("cannot read {}: {err}", dir.display());
            return;
        }
    };

    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            collect_matches(&path, extensions, out);
        } else if file_type.is_file() {
            let name = entry.file_name().to_string_lossy().to_lowercase();
            if let Some(ext) = extensions
                .iter()
                .find(|ext| name.ends_with(&ext.to_lowercase()))
            {
                out.push((path, ext.to_lowercase()));
            }
        }
    }
}

/// Compute where `src` lands, creating parent directories. Flat mode dedupes
/// name collisions with ` (1)`, ` (2)`, ... before the extension.
fn destination_for(src: &Path, root: &Path, dest: &Path, flatten: bool) -> io::Result<PathBuf> {
    let name = src
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "file has no name"))?;

    if flatten {
        let mut candidate = dest.join(name);
        let mut counter = 1u32;
        while candidate.exists() {
            let stem = src
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            let suffix = src
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default();
            candidate = dest.join(format!("{stem} ({counter}){suffix}"));
            counter += 1;
        }
        Ok(candidate)
    } else {
        let relative = src
            .parent()
            .and_then(|parent| parent.strip_prefix(root).ok())
            .unwrap_or_else(|| Path::new(""));
        let target_dir = dest.join(relative);
        fs::create_dir_all(&target_dir)?;
        Ok(target_dir.join(name))
    }
}

/// Rename where possible, falling back to copy+remove across filesystems.
fn move_file(src: &Path, dest: &Path) -> io::Result<()> {
    match fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(src, dest)?;
            fs::remove_file(src)
        }
    }
}
