//! Sorting top-level files into subfolders matching their name prefix.
//!
//! The prefix is everything before the last underscore: `Unit_Knight_01.wav`
//! belongs in a sibling folder named `Unit_Knight`, if one exists. Files
//! without an underscore, or without a matching folder, stay put.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use tracing::{info, warn};

/// What one sort pass did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SortOutcome {
    pub moved: u64,
    /// Files left in place (no underscore or no matching folder).
    pub skipped: u64,
}

/// Move matching top-level files of `root` into their prefix folders.
/// Only the top level is considered; nothing recurses.
pub fn run(root: &Path) -> io::Result<SortOutcome> {
    if !root.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no valid directory path provided: {}", root.display()),
        ));
    }

    let mut folders: HashSet<String> = HashSet::new();
    let mut files: Vec<String> = Vec::new();
    for entry in fs::read_dir(root)?.filter_map(Result::ok) {
        let name = entry.file_name().to_string_lossy().to_string();
        match entry.file_type() {
            Ok(t) if t.is_dir() => {
                folders.insert(name);
            }
            Ok(t) if t.is_file() => files.push(name),
            _ => {}
        }
    }

    let mut outcome = SortOutcome::default();
    for name in files {
        let Some(prefix) = name.rsplit_once('_').map(|(prefix, _)| prefix) else {
            outcome.skipped += 1;
            continue;
        };
        if !folders.contains(prefix) {
            outcome.skipped += 1;
            continue;
        }
        let src = root.join(&name);
        let dest = root.join(prefix).join(&name);
        match fs::rename(&src, &dest) {
            Ok(()) => {
                info!("moved: {name} -> {prefix}/");
                outcome.moved += 1;
            }
            Err(err) => {
                warn!("error moving {name}: {err}");
                outcome.skipped += 1;
            }
        }
    }
    Ok(outcome)
}
