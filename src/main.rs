//! CLI entry point for arbor

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};

use arbor::tree::{ScanConfig, TreeWalker, print_json, render};
use arbor::{FilterRule, LogicalDisk, PlatformDisk, empty, extensions, logging, output, sort, transfer};

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "arbor")]
#[command(about = "Tree reports with real on-disk usage, plus small file housekeeping tools")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory for the numbered per-run log files
    #[arg(long = "log-dir", global = true, default_value = "Logs")]
    log_dir: PathBuf,

    /// Don't write a log file for this run
    #[arg(long = "no-log", global = true)]
    no_log: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", global = true, value_name = "WHEN", default_value = "auto")]
    color: ColorMode,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a directory tree with optional per-entry disk usage
    Tree(TreeArgs),
    /// Find (and optionally delete) empty files and folders
    Empty(EmptyArgs),
    /// List the unique file extensions under a directory
    Exts(ExtsArgs),
    /// Move or copy files by extension to another directory
    Transfer(TransferArgs),
    /// Move top-level files into subfolders matching their name prefix
    Sort(SortArgs),
}

#[derive(clap::Args, Debug)]
struct TreeArgs {
    /// Directory to scan
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Directory the tree files are written to
    #[arg(short = 'o', long = "output", default_value = "Output")]
    output: PathBuf,

    /// Name of the folders-only tree file; the folders+files variant gets
    /// "AndFiles" inserted before the extension
    #[arg(long = "name", default_value = "TreeStructure.txt")]
    name: String,

    /// Also write the folders+files tree
    #[arg(short = 'f', long = "files")]
    files: bool,

    /// Compute and render per-entry disk usage
    #[arg(short = 's', long = "sizes")]
    sizes: bool,

    /// Show the root folder as the first line of the tree
    #[arg(long = "show-root")]
    show_root: bool,

    /// Descend only N levels deep (0 = unlimited)
    #[arg(short = 'L', long = "level", default_value = "0")]
    level: usize,

    /// Ignore rule: folder:<name>, file:<name>, or ext:<suffix>
    /// (can be used multiple times)
    #[arg(short = 'I', long = "ignore", value_name = "RULE")]
    ignore: Vec<FilterRule>,

    /// Select rule of the same form; when given, only matching entries
    /// participate in the scan
    #[arg(long = "select", value_name = "RULE")]
    select: Vec<FilterRule>,

    /// Glob pattern excluding entries of any kind by name
    /// (can be used multiple times)
    #[arg(long = "ignore-glob", value_name = "PATTERN")]
    ignore_glob: Vec<String>,

    /// Print the scan as JSON to stdout instead of writing tree files
    #[arg(long = "json")]
    json: bool,

    /// Ignore on-disk size metadata and account logical sizes only
    #[arg(long = "logical-only")]
    logical_only: bool,
}

#[derive(clap::Args, Debug)]
struct EmptyArgs {
    /// Directory to scan
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Directory the report is written to
    #[arg(short = 'o', long = "output", default_value = "Output")]
    output: PathBuf,

    /// Report file name (numbered per run)
    #[arg(long = "name", default_value = "EmptyFilesAndFolders.txt")]
    name: String,

    /// Delete everything found (files first, then folders deepest-first)
    #[arg(long = "delete")]
    delete: bool,
}

#[derive(clap::Args, Debug)]
struct ExtsArgs {
    /// Directory to scan
    #[arg(default_value = ".")]
    path: PathBuf,
}

#[derive(clap::Args, Debug)]
struct TransferArgs {
    /// Directory to search
    path: PathBuf,

    /// Destination directory
    #[arg(long = "to", value_name = "DIR")]
    to: PathBuf,

    /// Extension to match, with the dot (can be used multiple times)
    #[arg(long = "ext", value_name = "EXT", required = true)]
    ext: Vec<String>,

    /// Copy instead of move
    #[arg(long = "copy")]
    copy: bool,

    /// Put every file directly in the destination instead of preserving
    /// the source folder structure
    #[arg(long = "flatten")]
    flatten: bool,
}

#[derive(clap::Args, Debug)]
struct SortArgs {
    /// Directory whose top-level files are sorted
    #[arg(default_value = ".")]
    path: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_dir = if cli.no_log {
        None
    } else {
        Some(cli.log_dir.clone())
    };
    // The guard flushes buffered log lines when main returns; returning an
    // ExitCode (rather than process::exit) keeps that drop on the error path.
    let (log_path, _guard) = match logging::init(log_dir.as_deref(), "arbor.log") {
        Ok(pair) => pair,
        Err(err) => {
            eprintln!("arbor: cannot create log file: {err}");
            return ExitCode::FAILURE;
        }
    };

    let stamp = |label: &str| {
        info!(
            "[{label}] {}",
            Local::now().format("%m/%d/%y %I:%M:%S %p")
        );
    };

    stamp("START");
    let result = run(&cli);
    let code = match result {
        Ok(()) => {
            if let Some(path) = log_path {
                info!("log saved to {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    };
    stamp("END");
    code
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Command::Tree(args) => run_tree(args, should_use_color(cli.color)),
        Command::Empty(args) => run_empty(args),
        Command::Exts(args) => run_exts(args),
        Command::Transfer(args) => run_transfer(args),
        Command::Sort(args) => run_sort(args),
    }
}

fn check_root(path: &Path) -> anyhow::Result<()> {
    if !path.is_dir() {
        bail!("no valid directory path provided: {}", path.display());
    }
    Ok(())
}

fn run_tree(args: &TreeArgs, use_color: bool) -> anyhow::Result<()> {
    check_root(&args.path)?;

    let base_config = ScanConfig {
        include_files: args.files,
        show_sizes: args.sizes,
        show_root: args.show_root,
        max_depth: if args.level == 0 {
            None
        } else {
            Some(args.level)
        },
        ignore: args.ignore.clone(),
        select: args.select.clone(),
        ignore_globs: args.ignore_glob.clone(),
    };

    let platform = PlatformDisk;
    let logical = LogicalDisk;
    let disk: &dyn arbor::DiskUsage = if args.logical_only {
        &logical
    } else {
        &platform
    };

    if args.json {
        let report = TreeWalker::new(&base_config, disk).scan(&args.path)?;
        print_json(&report)?;
        return Ok(());
    }

    // Folders-only document is always written; the folders+files variant is
    // a second walk so its connectors account for the interleaved files.
    let folders_config = ScanConfig {
        include_files: false,
        ..base_config.clone()
    };
    let folders_report = TreeWalker::new(&folders_config, disk).scan(&args.path)?;
    let folders_doc = render(&folders_report, &folders_config);
    let folders_path = output::write_tree_file(&args.output, &args.name, &folders_doc)
        .with_context(|| format!("cannot write tree file in {}", args.output.display()))?;

    let mut saved = vec![folders_path];
    let (mut dirs, mut files) = folders_report.counts();
    let mut stats = args.sizes.then(|| folders_report.root_stats());

    if args.files {
        let with_files_report = TreeWalker::new(&base_config, disk).scan(&args.path)?;
        let with_files_doc = render(&with_files_report, &base_config);
        let name = output::with_files_name(&args.name);
        let path = output::write_tree_file(&args.output, &name, &with_files_doc)
            .with_context(|| format!("cannot write tree file in {}", args.output.display()))?;
        (dirs, files) = with_files_report.counts();
        stats = args.sizes.then(|| with_files_report.root_stats());
        saved.push(path);
    }

    let saved_refs: Vec<&Path> = saved.iter().map(PathBuf::as_path).collect();
    output::print_tree_summary(&saved_refs, dirs, files, stats, use_color)?;
    Ok(())
}

fn run_empty(args: &EmptyArgs) -> anyhow::Result<()> {
    let scan = empty::scan(&args.path)?;
    info!(
        "found {} empty files and {} empty folders under {}",
        scan.files.len(),
        scan.dirs.len(),
        args.path.display()
    );

    let report = output::write_listing_report(&args.output, &args.name, &scan.all_paths())
        .with_context(|| format!("cannot write report in {}", args.output.display()))?;
    println!("Saved report: {}", report.display());

    if args.delete && !scan.is_clean() {
        let (files_deleted, dirs_deleted) = empty::delete(&scan);
        println!("Deleted {files_deleted} files and {dirs_deleted} folders");
    }
    Ok(())
}

fn run_exts(args: &ExtsArgs) -> anyhow::Result<()> {
    let found = extensions::collect(&args.path)?;
    if found.is_empty() {
        println!("No file extensions found.");
        return Ok(());
    }
    println!("Unique file extensions found:");
    for ext in &found {
        println!("{ext}");
        info!("found extension: {ext}");
    }
    Ok(())
}

fn run_transfer(args: &TransferArgs) -> anyhow::Result<()> {
    let options = transfer::TransferOptions {
        extensions: args.ext.clone(),
        copy: args.copy,
        flatten: args.flatten,
    };
    let outcome = transfer::run(&args.path, &args.to, &options)?;

    println!("Extension summary:");
    for (ext, count) in &outcome.counts {
        let plural = if *count == 1 { "file" } else { "files" };
        println!("  - {ext} -- {count} {plural}");
    }
    let verb = if args.copy { "Copied" } else { "Moved" };
    println!("{verb} {} files ({} failed)", outcome.transferred, outcome.failed);
    Ok(())
}

fn run_sort(args: &SortArgs) -> anyhow::Result<()> {
    let outcome = sort::run(&args.path)?;
    println!(
        "Moved {} files into matching folders ({} left in place)",
        outcome.moved, outcome.skipped
    );
    Ok(())
}
