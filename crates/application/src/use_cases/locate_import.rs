//! Import file locator.

use std::path::Path;

use tracing::{debug, warn};

use crate::ports::FileSystem;

const IMPORT_EXTENSION: &str = "xml";

/// Picks the file an import run uploads.
pub struct LocateImportFile<'a, F> {
    fs: &'a F,
}

impl<'a, F: FileSystem> LocateImportFile<'a, F> {
    /// Creates a new `LocateImportFile` use case.
    #[must_use]
    pub const fn new(fs: &'a F) -> Self {
        Self { fs }
    }

    /// Returns the name of the first `*.xml` entry of `dir`, scanning names in
    /// descending order.
    ///
    /// Exchange files are named so that the latest upload sorts last. An
    /// unreadable or missing directory counts as "no file".
    pub async fn execute(&self, dir: &Path) -> Option<String> {
        let entries = match self.fs.read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Upload directory not readable");
                return None;
            }
        };

        let mut names: Vec<String> = entries
            .iter()
            .filter(|path| {
                path.extension()
                    .is_some_and(|extension| extension == IMPORT_EXTENSION)
            })
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect();
        names.sort_unstable_by(|a, b| b.cmp(a));

        let found = names.into_iter().next();
        debug!(dir = %dir.display(), file = ?found, "Import file lookup");
        found
    }
}
