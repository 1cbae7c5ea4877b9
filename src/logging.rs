//! Tracing setup: a colored console layer plus a plain, incrementally
//! numbered log file per run.

use std::io;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::output::next_numbered_path;

/// Initialize the global subscriber.
///
/// With a log directory, each run writes to the first free
/// `<name>_<n>.log` in it and the file path plus the appender guard are
/// returned; keep the guard alive until exit so buffered lines flush.
/// Without one, only the console layer is installed.
pub fn init(log_dir: Option<&Path>, name: &str) -> io::Result<(Option<PathBuf>, Option<WorkerGuard>)> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .without_time();

    match log_dir {
        Some(dir) => {
            let log_path = next_numbered_path(dir, name)?;
            let file_name = log_path
                .file_name()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| name.to_string());
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::registry()
                .with(filter)
                .with(console_layer)
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .init();

            Ok((Some(log_path), Some(guard)))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(console_layer)
                .init();
            Ok((None, None))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTree;

    #[test]
    fn test_log_files_never_collide() {
        // init() itself can only run once per process, so exercise the path
        // selection it builds on.
        let tree = TestTree::new();
        let first = next_numbered_path(tree.path(), "arbor.log").unwrap();
        std::fs::write(&first, "").unwrap();
        let second = next_numbered_path(tree.path(), "arbor.log").unwrap();
        assert_ne!(first, second);
        assert_eq!(second.file_name().unwrap(), "arbor_2.log");
    }
}
