//! Site collaborator port.
//!
//! The hosting site decides where the exchange endpoint lives and where the
//! debugger's artifacts are written. The core only talks to it through
//! [`ExchangeSite`].

use std::path::PathBuf;

use async_trait::async_trait;
use debug1c_domain::UploadArea;
use url::Url;

/// A file the run writes, with the path a browser would use to fetch it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPath {
    /// Location on disk.
    pub path: PathBuf,
    /// Public path, as reported in the run log.
    pub public: String,
}

impl ArtifactPath {
    /// Creates an artifact path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, public: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            public: public.into(),
        }
    }
}

/// Site-side services the exchange run depends on.
#[async_trait]
pub trait ExchangeSite: Send + Sync {
    /// Resolves a logical exchange URL to a concrete endpoint.
    ///
    /// With `requested = None` the configured default is resolved instead.
    /// Returns `None` when the URL does not map to an existing target.
    async fn resolve_exchange_url(&self, requested: Option<&str>) -> Option<Url>;

    /// Directory import files of the given area are uploaded to.
    fn upload_dir(&self, area: UploadArea) -> PathBuf;

    /// Scratch directory holding the run artifacts.
    fn scratch_dir(&self) -> PathBuf;

    /// Run log file.
    fn log_file(&self) -> ArtifactPath;

    /// File the order query response is saved to.
    fn order_file(&self) -> ArtifactPath;

    /// File the info response is saved to.
    fn info_file(&self) -> ArtifactPath;
}
