//! Arbor - tree reports with real on-disk usage, plus small file
//! housekeeping tools

pub mod disk;
pub mod empty;
pub mod extensions;
pub mod logging;
pub mod output;
pub mod rules;
pub mod sort;
pub mod transfer;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use disk::{DiskUsage, LogicalDisk, PlatformDisk, SizeInfo};
pub use rules::{FilterEngine, FilterRule};
pub use tree::{FolderStats, ScanConfig, ScanReport, TreeWalker, print_json, render};
