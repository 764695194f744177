//! Append-only run log.
//!
//! Every line is appended to the log file as soon as it is recorded, so the
//! file always holds the full narrative of the run so far. The file is
//! truncated when the log is opened; one file holds one run.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use debug1c_domain::{LogEvent, format_log_line};
use tracing::{info, warn};

use crate::ports::{Clock, FileSystem};

/// Timestamped log of one exchange run.
pub struct RunLog<F> {
    fs: F,
    clock: Arc<dyn Clock>,
    path: PathBuf,
    lines: Vec<String>,
}

impl<F: FileSystem> RunLog<F> {
    /// Opens the log at `path`, discarding the previous run's content.
    ///
    /// A log file that cannot be written does not stop the run; the failure
    /// is reported through `tracing` and the lines are still kept in memory.
    pub async fn open(fs: F, clock: Arc<dyn Clock>, path: PathBuf) -> Self {
        if let Err(e) = fs.write_file(&path, b"").await {
            warn!(path = %path.display(), error = %e, "Failed to reset run log");
        }

        Self {
            fs,
            clock,
            path,
            lines: Vec::new(),
        }
    }

    /// Appends one event to the log.
    pub async fn record(&mut self, event: &LogEvent) {
        let message = event.to_string();
        info!(target: "debug1c::run_log", "{message}");

        let line = format_log_line(self.clock.now().naive_local(), &message);
        if let Err(e) = self.fs.append_file(&self.path, line.as_bytes()).await {
            warn!(path = %self.path.display(), error = %e, "Failed to append to run log");
        }
        self.lines.push(line);
    }

    /// Lines recorded so far, each ending with a newline.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Location of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
