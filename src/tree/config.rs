//! Configuration for the tree scanner.

use crate::rules::FilterRule;

/// Everything one scan needs, passed explicitly into the walker.
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Include files in the rendered tree (directories are always shown).
    pub include_files: bool,
    /// Compute per-file sizes and per-directory stats and render the aligned
    /// stats column.
    pub show_sizes: bool,
    /// Emit a `└── name/` line for the scan root and indent the tree under it.
    pub show_root: bool,
    /// Maximum number of directory levels below the root that are traversed.
    /// `None` = unlimited. A limit caps both line emission and stats
    /// aggregation: a directory on the boundary is listed once for its direct
    /// files but its subdirectories are neither rendered nor counted.
    pub max_depth: Option<usize>,
    /// Ignore rules (typed: folder / file / extension).
    pub ignore: Vec<FilterRule>,
    /// Select rules; when any are present, only matching entries participate.
    pub select: Vec<FilterRule>,
    /// Glob patterns excluding entries of any kind by name.
    pub ignore_globs: Vec<String>,
}
