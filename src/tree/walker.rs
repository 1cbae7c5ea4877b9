//! Depth-first directory walker.
//!
//! The walk is a single synchronous pass: entries are collected in pre-order
//! (the order their lines appear in the tree) while per-directory stats are
//! aggregated bottom-up as each subtree completes. Rendering happens in a
//! second pass over the collected report so column alignment never needs
//! mutable state threaded through the recursion.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::disk::{DiskUsage, SizeInfo, size_info};
use crate::rules::FilterEngine;

use super::config::ScanConfig;

/// One filesystem object visited during traversal.
#[derive(Debug, Clone)]
pub struct ScanEntry {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
    /// Levels below the scan root, starting at 1 for the root's children.
    pub depth: usize,
    /// Connector prefix inherited from ancestor levels (`│   ` / spaces).
    pub prefix: String,
    /// Last sibling at its level; controls the branch connector.
    pub is_last: bool,
}

/// Aggregate over a directory subtree: selected, non-ignored files only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderStats {
    pub file_count: u64,
    pub logical_bytes: u64,
    pub allocated_bytes: u64,
}

impl std::ops::AddAssign for FolderStats {
    fn add_assign(&mut self, other: Self) {
        self.file_count += other.file_count;
        self.logical_bytes += other.logical_bytes;
        self.allocated_bytes += other.allocated_bytes;
    }
}

/// Result of one walk: ordered entries plus the size/stat maps keyed by path.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub root: PathBuf,
    pub entries: Vec<ScanEntry>,
    pub file_sizes: HashMap<PathBuf, SizeInfo>,
    pub folder_stats: HashMap<PathBuf, FolderStats>,
    pub allocation_unit: u64,
}

impl ScanReport {
    /// Stats for the whole scan root.
    pub fn root_stats(&self) -> FolderStats {
        self.folder_stats
            .get(&self.root)
            .copied()
            .unwrap_or_default()
    }

    /// Rendered directory and file entry counts.
    pub fn counts(&self) -> (usize, usize) {
        let dirs = self.entries.iter().filter(|e| e.is_dir).count();
        (dirs, self.entries.len() - dirs)
    }
}

/// The tree scanner. Holds the explicit configuration and the disk-usage
/// capability; owns no global state.
pub struct TreeWalker<'a> {
    config: &'a ScanConfig,
    filter: FilterEngine,
    disk: &'a dyn DiskUsage,
}

impl<'a> TreeWalker<'a> {
    pub fn new(config: &'a ScanConfig, disk: &'a dyn DiskUsage) -> Self {
        let filter = FilterEngine::new(&config.ignore, &config.select)
            .with_patterns(config.ignore_globs.clone());
        Self {
            config,
            filter,
            disk,
        }
    }

    /// Walk the tree rooted at `root`.
    ///
    /// Only a missing or unreadable root is an error; every failure below the
    /// root is logged and isolated to the directory it occurred in.
    pub fn scan(&self, root: &Path) -> io::Result<ScanReport> {
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no valid directory path provided: {}", root.display()),
            ));
        }

        let allocation_unit = if self.config.show_sizes {
            match self.disk.allocation_unit(root) {
                Ok(unit) if unit > 0 => unit,
                Ok(_) => 1,
                Err(err) => {
                    warn!(
                        "allocation unit query failed for {}, sizes fall back to logical: {err}",
                        root.display()
                    );
                    1
                }
            }
        } else {
            1
        };

        let mut report = ScanReport {
            root: root.to_path_buf(),
            allocation_unit,
            ..Default::default()
        };

        let root_stats = self.walk_dir(root, 1, "", &mut report);
        report.folder_stats.insert(root.to_path_buf(), root_stats);
        Ok(report)
    }

    /// Recurse into one directory. `depth` is the level its children occupy
    /// (root's children = 1). Returns the aggregated stats for the subtree.
    fn walk_dir(
        &self,
        dir: &Path,
        depth: usize,
        prefix: &str,
        report: &mut ScanReport,
    ) -> FolderStats {
        let (mut dirs, files) = match self.list_filtered(dir) {
            Ok(listing) => listing,
            Err(err) => {
                warn!("skipped {}: {err}", dir.display());
                return FolderStats::default();
            }
        };

        let mut stats = FolderStats::default();

        // Direct files always feed the stats, whether or not file lines are
        // being rendered.
        for (_, path) in &files {
            if self.config.show_sizes {
                match size_info(path, report.allocation_unit, self.disk) {
                    Ok(info) => {
                        stats.file_count += 1;
                        stats.logical_bytes += info.logical;
                        stats.allocated_bytes += info.allocated;
                        report.file_sizes.insert(path.clone(), info);
                    }
                    Err(err) => {
                        warn!("size query failed for {}: {err}", path.display());
                        stats.file_count += 1;
                    }
                }
            } else {
                stats.file_count += 1;
            }
        }

        let within_limit = self.config.max_depth.is_none_or(|max| depth <= max);
        if !within_limit {
            // Boundary directory: direct files counted above, nothing below
            // is rendered or aggregated.
            return stats;
        }

        let mut display: Vec<(String, PathBuf, bool)> = Vec::new();
        for (name, path) in dirs.drain(..) {
            display.push((name, path, true));
        }
        if self.config.include_files {
            for (name, path) in files {
                display.push((name, path, false));
            }
        }

        let total = display.len();
        for (index, (name, path, is_dir)) in display.into_iter().enumerate() {
            let is_last = index == total - 1;
            report.entries.push(ScanEntry {
                path: path.clone(),
                name,
                is_dir,
                depth,
                prefix: prefix.to_string(),
                is_last,
            });

            if is_dir {
                let child_prefix = if is_last {
                    format!("{prefix}    ")
                } else {
                    format!("{prefix}│   ")
                };
                let child_stats = self.walk_dir(&path, depth + 1, &child_prefix, report);
                report.folder_stats.insert(path, child_stats);
                stats += child_stats;
            }
        }

        stats
    }

    /// List one directory, filtered and sorted: directories and files
    /// separately, each alphabetical by name.
    #[allow(clippy::type_complexity)]
    fn list_filtered(
        &self,
        dir: &Path,
    ) -> io::Result<(Vec<(String, PathBuf)>, Vec<(String, PathBuf)>)> {
        let mut dirs = Vec::new();
        let mut files = Vec::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            let file_type = match entry.file_type() {
                Ok(t) => t,
                Err(err) => {
                    warn!("skipped {}: {err}", entry.path().display());
                    continue;
                }
            };
            // Symlinks are neither followed nor listed; a link cycle would
            // otherwise recurse forever.
            if file_type.is_symlink() {
                continue;
            }
            let is_dir = file_type.is_dir();
            if !self.filter.admits(&name, is_dir) {
                continue;
            }
            if is_dir {
                dirs.push((name, entry.path()));
            } else {
                files.push((name, entry.path()));
            }
        }

        dirs.sort_by(|a, b| a.0.cmp(&b.0));
        files.sort_by(|a, b| a.0.cmp(&b.0));
        Ok((dirs, files))
    }
}
