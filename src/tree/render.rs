//! Rendering a [`ScanReport`] into aligned tree text.
//!
//! Two passes over the collected entries: the first measures line widths and
//! the digit width of file counts, the second pads every line so the stats
//! suffixes line up in one column.

use std::path::Path;

use super::config::ScanConfig;
use super::walker::{ScanEntry, ScanReport};

const LAST_CONNECTOR: &str = "└── ";
const MID_CONNECTOR: &str = "├── ";
/// Indentation applied under the optional root line.
const ROOT_INDENT: &str = "    ";

/// Render the report as a complete tree document, one trailing newline per
/// line. With `show_sizes` off this is the plain connector tree.
pub fn render(report: &ScanReport, config: &ScanConfig) -> String {
    let lines = if config.show_sizes {
        render_sized(report)
    } else {
        report.entries.iter().map(base_line).collect()
    };

    let mut out = String::new();
    if config.show_root {
        let name = root_display_name(&report.root);
        out.push_str(LAST_CONNECTOR);
        out.push_str(&name);
        out.push_str("/\n");
    }
    let indent = if config.show_root { ROOT_INDENT } else { "" };
    for line in lines {
        out.push_str(indent);
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// The connector line for one entry, without any stats suffix.
fn base_line(entry: &ScanEntry) -> String {
    let connector = if entry.is_last {
        LAST_CONNECTOR
    } else {
        MID_CONNECTOR
    };
    let slash = if entry.is_dir { "/" } else { "" };
    format!("{}{}{}{}", entry.prefix, connector, entry.name, slash)
}

fn render_sized(report: &ScanReport) -> Vec<String> {
    let bases: Vec<String> = report.entries.iter().map(base_line).collect();
    let max_width = bases.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    // Width of the widest thousands-grouped file count, for left-aligning the
    // count column across directory rows.
    let max_count_width = report
        .entries
        .iter()
        .filter(|e| e.is_dir)
        .filter_map(|e| report.folder_stats.get(&e.path))
        .map(|s| group_digits(s.file_count).len())
        .max()
        .unwrap_or(0);

    // File rows skip the `<count> Files,` part; pad them past it so their
    // `Disk:` column matches the directories'.
    let label_width = "Files,".len();
    let file_lead = if max_count_width > 0 {
        " ".repeat(max_count_width + 1 + label_width + 1)
    } else {
        String::new()
    };

    report
        .entries
        .iter()
        .zip(bases)
        .map(|(entry, base)| {
            let padding = " ".repeat(max_width - base.chars().count());
            if entry.is_dir {
                match report.folder_stats.get(&entry.path) {
                    Some(stats) => {
                        let count = group_digits(stats.file_count);
                        let label = if stats.file_count == 1 {
                            "File, "
                        } else {
                            "Files,"
                        };
                        format!(
                            "{base}{padding}  -  {count:<width$} {label} Disk: {} ({} B) Actual: {} ({} B)",
                            format_size(stats.allocated_bytes),
                            group_digits(stats.allocated_bytes),
                            format_size(stats.logical_bytes),
                            group_digits(stats.logical_bytes),
                            width = max_count_width,
                        )
                    }
                    None => base,
                }
            } else {
                match report.file_sizes.get(&entry.path) {
                    Some(info) => format!(
                        "{base}{padding}  -  {file_lead}Disk: {} ({} B) Actual: {} ({} B)",
                        format_size(info.allocated),
                        group_digits(info.allocated),
                        format_size(info.logical),
                        group_digits(info.logical),
                    ),
                    None => base,
                }
            }
        })
        .collect()
}

fn root_display_name(root: &Path) -> String {
    root.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| root.display().to_string())
}

/// Human-readable size: bytes below 1 KB, then two-decimal binary units.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    let bytes_f = bytes as f64;
    if bytes_f < KB {
        format!("{bytes} B")
    } else if bytes_f < MB {
        format!("{:.2} KB", bytes_f / KB)
    } else if bytes_f < GB {
        format!("{:.2} MB", bytes_f / MB)
    } else {
        format!("{:.2} GB", bytes_f / GB)
    }
}

/// Decimal digits grouped in threes: `1234567` → `1,234,567`.
pub fn group_digits(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk::LogicalDisk;
    use crate::test_utils::TestTree;
    use crate::tree::walker::TreeWalker;

    fn report_for(tree: &TestTree, config: &ScanConfig) -> ScanReport {
        TreeWalker::new(config, &LogicalDisk)
            .scan(tree.path())
            .unwrap()
    }

    #[test]
    fn test_format_size_units() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1024 * 1024), "1.00 MB");
        assert_eq!(format_size(10 * 1024 * 1024 + 512 * 1024), "10.50 MB");
        assert_eq!(format_size(1024 * 1024 * 1024), "1.00 GB");
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits(0), "0");
        assert_eq!(group_digits(999), "999");
        assert_eq!(group_digits(1000), "1,000");
        assert_eq!(group_digits(1234567), "1,234,567");
    }

    #[test]
    fn test_plain_tree_connectors() {
        let tree = TestTree::new();
        tree.add_file("sub/inner.txt", "x");
        tree.add_file("z.txt", "y");

        let config = ScanConfig {
            include_files: true,
            ..Default::default()
        };
        let report = report_for(&tree, &config);
        let text = render(&report, &config);

        assert_eq!(
            text,
            "├── sub/\n│   └── inner.txt\n└── z.txt\n"
        );
    }

    #[test]
    fn test_root_line_indents_tree() {
        let tree = TestTree::new();
        tree.add_dir("only");

        let config = ScanConfig {
            show_root: true,
            ..Default::default()
        };
        let report = report_for(&tree, &config);
        let text = render(&report, &config);

        let mut lines = text.lines();
        let root_line = lines.next().unwrap();
        assert!(root_line.starts_with("└── "));
        assert!(root_line.ends_with('/'));
        assert_eq!(lines.next().unwrap(), "    └── only/");
    }

    #[test]
    fn test_sized_suffixes_align() {
        let tree = TestTree::new();
        tree.add_file("a/one.txt", &"x".repeat(700));
        tree.add_file("a/long-name-here.txt", &"y".repeat(700));
        tree.add_file("b.txt", &"z".repeat(700));

        let config = ScanConfig {
            include_files: true,
            show_sizes: true,
            ..Default::default()
        };
        let report = report_for(&tree, &config);
        let text = render(&report, &config);

        // Every stats suffix starts at the same column.
        let columns: Vec<usize> = text
            .lines()
            .filter_map(|l| l.find("  -  "))
            .collect();
        assert!(columns.len() >= 3);
        assert!(columns.windows(2).all(|w| w[0] == w[1]));

        // And Disk columns line up between dir and file rows.
        let disk_columns: Vec<usize> = text.lines().filter_map(|l| l.find("Disk:")).collect();
        assert!(disk_columns.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_singular_file_label() {
        let tree = TestTree::new();
        tree.add_file("a/only.txt", &"x".repeat(700));

        let config = ScanConfig {
            show_sizes: true,
            ..Default::default()
        };
        let report = report_for(&tree, &config);
        let text = render(&report, &config);

        assert!(text.contains("1 File, "), "got: {text}");
        assert!(text.contains("Disk: 700 B (700 B) Actual: 700 B (700 B)"));
    }

    #[test]
    fn test_folders_only_sized_tree_has_dir_stats() {
        let tree = TestTree::new();
        tree.add_file("docs/readme.md", &"m".repeat(2048));

        let config = ScanConfig {
            include_files: false,
            show_sizes: true,
            ..Default::default()
        };
        let report = report_for(&tree, &config);
        let text = render(&report, &config);

        assert!(text.contains("└── docs/"));
        assert!(text.contains("1 File, "));
        assert!(text.contains("2.00 KB (2,048 B)"));
        assert!(!text.contains("readme.md"));
    }
}
