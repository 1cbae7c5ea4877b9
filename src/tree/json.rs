//! JSON output for a scan report.

use std::io;
use std::path::PathBuf;

use serde::Serialize;

use super::walker::ScanReport;

/// Serializable view of one scan.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub root: PathBuf,
    pub allocation_unit: u64,
    pub entries: Vec<JsonEntry>,
}

#[derive(Debug, Serialize)]
pub struct JsonEntry {
    pub path: PathBuf,
    pub name: String,
    pub kind: &'static str,
    pub depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logical_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocated_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_count: Option<u64>,
}

impl JsonReport {
    pub fn from_report(report: &ScanReport) -> Self {
        let entries = report
            .entries
            .iter()
            .map(|entry| {
                if entry.is_dir {
                    let stats = report.folder_stats.get(&entry.path);
                    JsonEntry {
                        path: entry.path.clone(),
                        name: entry.name.clone(),
                        kind: "dir",
                        depth: entry.depth,
                        logical_bytes: stats.map(|s| s.logical_bytes),
                        allocated_bytes: stats.map(|s| s.allocated_bytes),
                        file_count: stats.map(|s| s.file_count),
                    }
                } else {
                    let info = report.file_sizes.get(&entry.path);
                    JsonEntry {
                        path: entry.path.clone(),
                        name: entry.name.clone(),
                        kind: "file",
                        depth: entry.depth,
                        logical_bytes: info.map(|i| i.logical),
                        allocated_bytes: info.map(|i| i.allocated),
                        file_count: None,
                    }
                }
            })
            .collect();

        JsonReport {
            root: report.root.clone(),
            allocation_unit: report.allocation_unit,
            entries,
        }
    }
}

/// Print the report as pretty-printed JSON to stdout.
pub fn print_json(report: &ScanReport) -> io::Result<()> {
    let json = serde_json::to_string_pretty(&JsonReport::from_report(report))
        .map_err(io::Error::other)?;
    println!("{json}");
    Ok(())
}
