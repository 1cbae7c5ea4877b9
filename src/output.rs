//! Report-file writing and the colored console summary.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::tree::{FolderStats, format_size, group_digits};

/// First free `<base>_<n><ext>` path inside `folder`, creating the folder.
///
/// `name_1.txt`, `name_2.txt`, ... — never overwrites an existing file.
pub fn next_numbered_path(folder: &Path, file_name: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(folder)?;
    let (base, ext) = split_name(file_name);
    let mut number = 1u32;
    loop {
        let candidate = folder.join(format!("{base}_{number}{ext}"));
        if !candidate.exists() {
            return Ok(candidate);
        }
        number += 1;
    }
}

/// The companion file name for the folders+files tree:
/// `TreeStructure.txt` → `TreeStructureAndFiles.txt`.
pub fn with_files_name(file_name: &str) -> String {
    let (base, ext) = split_name(file_name);
    format!("{base}AndFiles{ext}")
}

/// Split `name.ext` into (`name`, `.ext`); no-extension names get `""`.
fn split_name(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(dot) if dot > 0 => file_name.split_at(dot),
        _ => (file_name, ""),
    }
}

/// Write one rendered tree document to `folder/file_name` (overwriting), and
/// return the full path.
pub fn write_tree_file(folder: &Path, file_name: &str, document: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(folder)?;
    let path = folder.join(file_name);
    fs::write(&path, document)?;
    Ok(path)
}

/// Write a numbered report listing one path per line (forward slashes).
pub fn write_listing_report(
    folder: &Path,
    file_name: &str,
    paths: &[PathBuf],
) -> io::Result<PathBuf> {
    let report_path = next_numbered_path(folder, file_name)?;
    let mut body = String::new();
    for path in paths {
        body.push_str(&path.display().to_string().replace('\\', "/"));
        body.push('\n');
    }
    fs::write(&report_path, body)?;
    Ok(report_path)
}

/// Console summary after a tree run: saved paths plus totals.
pub fn print_tree_summary(
    saved: &[&Path],
    dirs: usize,
    files: usize,
    stats: Option<FolderStats>,
    use_color: bool,
) -> io::Result<()> {
    let choice = if use_color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);

    for path in saved {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(stdout, "Saved tree: ")?;
        stdout.reset()?;
        writeln!(stdout, "{}", path.display())?;
    }

    writeln!(stdout)?;
    write!(stdout, "{dirs} directories, {files} files")?;
    if let Some(stats) = stats {
        write!(
            stdout,
            ", Disk: {} ({} B) Actual: {} ({} B)",
            format_size(stats.allocated_bytes),
            group_digits(stats.allocated_bytes),
            format_size(stats.logical_bytes),
            group_digits(stats.logical_bytes),
        )?;
    }
    writeln!(stdout)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTree;

    #[test]
    fn test_numbered_paths_increment() {
        let tree = TestTree::new();
        let first = next_numbered_path(tree.path(), "run.log").unwrap();
        assert_eq!(first.file_name().unwrap(), "run_1.log");

        fs::write(&first, "x").unwrap();
        let second = next_numbered_path(tree.path(), "run.log").unwrap();
        assert_eq!(second.file_name().unwrap(), "run_2.log");
    }

    #[test]
    fn test_numbered_path_without_extension() {
        let tree = TestTree::new();
        let path = next_numbered_path(tree.path(), "report").unwrap();
        assert_eq!(path.file_name().unwrap(), "report_1");
    }

    #[test]
    fn test_with_files_name() {
        assert_eq!(with_files_name("TreeStructure.txt"), "TreeStructureAndFiles.txt");
        assert_eq!(with_files_name("tree"), "treeAndFiles");
    }

    #[test]
    fn test_write_tree_file_creates_folder() {
        let tree = TestTree::new();
        let out = tree.path().join("Output");
        let path = write_tree_file(&out, "TreeStructure.txt", "└── a/\n").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "└── a/\n");
    }

    #[test]
    fn test_listing_report_is_numbered() {
        let tree = TestTree::new();
        let out = tree.path().join("Output");
        let paths = vec![PathBuf::from("/a/b"), PathBuf::from("/c")];
        let first = write_listing_report(&out, "Empty.txt", &paths).unwrap();
        let second = write_listing_report(&out, "Empty.txt", &paths).unwrap();
        assert_eq!(first.file_name().unwrap(), "Empty_1.txt");
        assert_eq!(second.file_name().unwrap(), "Empty_2.txt");
        assert_eq!(fs::read_to_string(first).unwrap(), "/a/b\n/c\n");
    }
}
