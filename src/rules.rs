//! Ignore/select rule parsing and the filter engine.
//!
//! Rules are typed: a folder rule only ever applies to directories, and
//! file/extension rules only ever apply to files. Folder and file names match
//! by exact equality; extensions match as a case-insensitive suffix.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use glob::Pattern;

/// One ignore or select rule, as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterRule {
    /// Matches a directory by exact name.
    Folder(String),
    /// Matches a file by exact name (with or without extension).
    File(String),
    /// Matches a file whose name ends with this suffix, case-insensitively.
    /// Stored lowercase.
    Ext(String),
}

impl FromStr for FilterRule {
    type Err = String;

    /// Parse `folder:<name>`, `file:<name>`, or `ext:<suffix>`
    /// (`extension:<suffix>` is accepted as an alias).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, value) = s
            .split_once(':')
            .ok_or_else(|| format!("expected <kind>:<value>, got '{s}'"))?;
        if value.is_empty() {
            return Err(format!("empty value in rule '{s}'"));
        }
        match kind {
            "folder" => Ok(FilterRule::Folder(value.to_string())),
            "file" => Ok(FilterRule::File(value.to_string())),
            "ext" | "extension" => Ok(FilterRule::Ext(value.to_lowercase())),
            _ => Err(format!(
                "unknown rule kind '{kind}' (expected folder, file, or ext)"
            )),
        }
    }
}

impl fmt::Display for FilterRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterRule::Folder(name) => write!(f, "folder:{name}"),
            FilterRule::File(name) => write!(f, "file:{name}"),
            FilterRule::Ext(suffix) => write!(f, "ext:{suffix}"),
        }
    }
}

/// A rule list split into its constituent name/extension sets.
#[derive(Debug, Clone, Default)]
struct RuleSet {
    folders: HashSet<String>,
    files: HashSet<String>,
    exts: Vec<String>,
}

impl RuleSet {
    fn from_rules(rules: &[FilterRule]) -> Self {
        let mut set = RuleSet::default();
        for rule in rules {
            match rule {
                FilterRule::Folder(name) => {
                    set.folders.insert(name.clone());
                }
                FilterRule::File(name) => {
                    set.files.insert(name.clone());
                }
                FilterRule::Ext(suffix) => set.exts.push(suffix.clone()),
            }
        }
        set
    }

    fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty() && self.exts.is_empty()
    }

    fn matches_ext(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.exts.iter().any(|ext| lower.ends_with(ext.as_str()))
    }
}

/// Decides membership in the ignored and selected sets for each entry name.
///
/// Both checks are pure and infallible: any name resolves to a boolean.
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    ignore: RuleSet,
    select: RuleSet,
    /// Extra glob patterns that exclude any entry (file or directory) by name.
    patterns: Vec<String>,
}

impl FilterEngine {
    pub fn new(ignore: &[FilterRule], select: &[FilterRule]) -> Self {
        Self {
            ignore: RuleSet::from_rules(ignore),
            select: RuleSet::from_rules(select),
            patterns: Vec::new(),
        }
    }

    /// Add glob patterns that exclude matching names outright.
    pub fn with_patterns(mut self, patterns: Vec<String>) -> Self {
        self.patterns = patterns;
        self
    }

    /// True if the entry matches an ignore rule of its kind.
    pub fn is_ignored(&self, name: &str, is_dir: bool) -> bool {
        if self
            .patterns
            .iter()
            .any(|p| name == p || glob_match(p, name))
        {
            return true;
        }

        if is_dir {
            return self.ignore.folders.contains(name);
        }

        self.ignore.files.contains(name) || self.ignore.matches_ext(name)
    }

    /// True if the entry survives the select rules.
    ///
    /// With no select rules at all, everything is selected. Directories pass
    /// unless folder-select rules exist and the name is absent from them;
    /// because selection is checked at every path segment, content under a
    /// non-selected folder never becomes visible.
    pub fn is_selected(&self, name: &str, is_dir: bool) -> bool {
        if self.select.is_empty() {
            return true;
        }

        if is_dir {
            return self.select.folders.is_empty() || self.select.folders.contains(name);
        }

        self.select.files.contains(name) || self.select.matches_ext(name)
    }

    /// Combined check: entry participates in the scan.
    pub fn admits(&self, name: &str, is_dir: bool) -> bool {
        self.is_selected(name, is_dir) && !self.is_ignored(name, is_dir)
    }
}

/// Match a glob pattern against a name.
fn glob_match(pattern: &str, name: &str) -> bool {
    Pattern::new(pattern)
        .map(|p| p.matches(name))
        .unwrap_or(false)
}
