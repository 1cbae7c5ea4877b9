//! Unique file-extension sweep.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;

use tracing::warn;

/// Recursively collect every distinct file extension under `root`, lowercase
/// with the leading dot. Files without an extension are skipped.
pub fn collect(root: &Path) -> io::Result<BTreeSet<String>> {
    if !root.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no valid directory path provided: {}", root.display()),
        ));
    }
    let mut extensions = BTreeSet::new();
    visit(root, &mut extensions);
    Ok(extensions)
}

fn visit(dir: &Path, extensions: &mut BTreeSet<String>) {
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
            visit(&path, extensions);
        } else if file_type.is_file() {
            if let Some(ext) = path.extension() {
                extensions.insert(format!(".{}", ext.to_string_lossy().to_lowercase()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTree;

    #[test]
    fn test_collects_unique_lowercase_extensions() {
        let tree = TestTree::new();
        tree.add_file("a.TXT", "x");
        tree.add_file("b.txt", "x");
        tree.add_file("sub/c.wav", "x");
        tree.add_file("sub/deep/d.PNG", "x");
        tree.add_file("noext", "x");

        let extensions = collect(tree.path()).unwrap();
        let listed: Vec<&str> = extensions.iter().map(String::as_str).collect();
        assert_eq!(listed, vec![".png", ".txt", ".wav"]);
    }

    #[test]
    fn test_empty_tree_has_no_extensions() {
        let tree = TestTree::new();
        tree.add_dir("just/folders");
        assert!(collect(tree.path()).unwrap().is_empty());
    }
}
