//! Site collaborator backed by a document root on disk.
//!
//! Logical exchange URLs are paths served from `site_url`; a URL resolves
//! only when the script it names exists under `document_root`.

use std::path::PathBuf;

use async_trait::async_trait;
use debug1c_application::ports::{ArtifactPath, ExchangeSite, FileSystem};
use debug1c_domain::UploadArea;
use tracing::debug;
use url::Url;

const LOG_FILE: &str = "exchange.log";
const ORDER_FILE: &str = "order.xml";
const INFO_FILE: &str = "info.xml";

/// Where the site lives and where the debugger reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLayout {
    /// On-disk root the public paths map to.
    pub document_root: PathBuf,
    /// Origin the public paths are served from.
    pub site_url: Url,
    /// Exchange script used when no URL is requested.
    pub default_exchange_path: String,
    /// Public path of the scratch directory.
    pub scratch_dir: String,
    /// Public path of the upload directory.
    pub upload_dir: String,
}

/// [`ExchangeSite`] over a [`SiteLayout`].
#[derive(Debug, Clone)]
pub struct ConfiguredSite<F> {
    fs: F,
    layout: SiteLayout,
}

impl<F: FileSystem> ConfiguredSite<F> {
    /// Creates a site collaborator.
    pub const fn new(fs: F, layout: SiteLayout) -> Self {
        Self { fs, layout }
    }

    /// Maps a public path onto the document root.
    fn local_path(&self, public: &str) -> PathBuf {
        let relative = public.trim_start_matches('/');
        if relative.is_empty() {
            return self.layout.document_root.clone();
        }
        self.layout.document_root.join(relative)
    }

    fn artifact(&self, name: &str) -> ArtifactPath {
        let public = format!("{}/{name}", self.layout.scratch_dir.trim_end_matches('/'));
        ArtifactPath::new(self.scratch_dir().join(name), public)
    }

    fn to_url(&self, requested: &str) -> Option<Url> {
        let url = Url::parse(requested)
            .or_else(|_| self.layout.site_url.join(requested))
            .ok()?;
        matches!(url.scheme(), "http" | "https").then_some(url)
    }
}

#[async_trait]
impl<F: FileSystem> ExchangeSite for ConfiguredSite<F> {
    async fn resolve_exchange_url(&self, requested: Option<&str>) -> Option<Url> {
        let requested = requested
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(self.layout.default_exchange_path.as_str());

        let url = self.to_url(requested)?;
        let target = self.local_path(url.path());

        if self.fs.is_file(&target).await {
            Some(url)
        } else {
            debug!(%url, target = %target.display(), "Exchange script not found");
            None
        }
    }

    fn upload_dir(&self, area: UploadArea) -> PathBuf {
        self.local_path(&self.layout.upload_dir).join(area.dir_name())
    }

    fn scratch_dir(&self) -> PathBuf {
        self.local_path(&self.layout.scratch_dir)
    }

    fn log_file(&self) -> ArtifactPath {
        self.artifact(LOG_FILE)
    }

    fn order_file(&self) -> ArtifactPath {
        self.artifact(ORDER_FILE)
    }

    fn info_file(&self) -> ArtifactPath {
        self.artifact(INFO_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::TokioFileSystem;
    use std::path::Path;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn site(root: &Path) -> ConfiguredSite<TokioFileSystem> {
        ConfiguredSite::new(
            TokioFileSystem::new(),
            SiteLayout {
                document_root: root.to_path_buf(),
                site_url: Url::parse("http://shop.local").expect("valid url"),
                default_exchange_path: "/bitrix/admin/1c_exchange.php".to_string(),
                scratch_dir: "/upload/tmp/debug1c".to_string(),
                upload_dir: "/upload".to_string(),
            },
        )
    }

    fn add_script(root: &Path, relative: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().expect("has parent")).expect("create dirs");
        std::fs::write(path, "<?php").expect("write script");
    }

    #[tokio::test]
    async fn test_resolves_default_script() {
        let temp = TempDir::new().expect("temp dir");
        add_script(temp.path(), "bitrix/admin/1c_exchange.php");

        let url = site(temp.path()).resolve_exchange_url(None).await;

        assert_eq!(
            url.map(String::from),
            Some("http://shop.local/bitrix/admin/1c_exchange.php".to_string())
        );
    }

    #[tokio::test]
    async fn test_resolves_explicit_script() {
        let temp = TempDir::new().expect("temp dir");
        add_script(temp.path(), "local/exchange.php");
        let site = site(temp.path());

        let relative = site.resolve_exchange_url(Some("/local/exchange.php")).await;
        let absolute = site
            .resolve_exchange_url(Some("http://other.local/local/exchange.php"))
            .await;

        assert_eq!(
            relative.map(String::from),
            Some("http://shop.local/local/exchange.php".to_string())
        );
        assert_eq!(
            absolute.map(String::from),
            Some("http://other.local/local/exchange.php".to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_script_does_not_resolve() {
        let temp = TempDir::new().expect("temp dir");
        let site = site(temp.path());

        assert!(site.resolve_exchange_url(None).await.is_none());
        assert!(site.resolve_exchange_url(Some("/nope.php")).await.is_none());
        assert!(
            site.resolve_exchange_url(Some("ftp://shop.local/x.php"))
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_directory_is_not_a_script() {
        let temp = TempDir::new().expect("temp dir");
        std::fs::create_dir_all(temp.path().join("bitrix/admin")).expect("create dirs");

        let url = site(temp.path())
            .resolve_exchange_url(Some("/bitrix/admin"))
            .await;

        assert!(url.is_none());
    }

    #[test]
    fn test_artifact_paths() {
        let site = site(Path::new("/var/www"));

        assert_eq!(
            site.log_file(),
            ArtifactPath::new(
                "/var/www/upload/tmp/debug1c/exchange.log",
                "/upload/tmp/debug1c/exchange.log"
            )
        );
        assert_eq!(site.order_file().public, "/upload/tmp/debug1c/order.xml");
        assert_eq!(site.info_file().public, "/upload/tmp/debug1c/info.xml");
        assert_eq!(
            site.upload_dir(UploadArea::Reference),
            PathBuf::from("/var/www/upload/1c_highloadblock")
        );
    }
}
