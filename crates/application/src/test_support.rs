//! In-memory port implementations for unit tests.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use debug1c_domain::{Credentials, Order, UploadArea};
use url::Url;

use crate::ports::{
    ArtifactPath, BodyDecoder, Clock, ExchangeSite, ExchangeTransport, FileSystem,
    FileSystemError, OrderStore, OrderStoreError, TransportError, TransportFactory,
};
use crate::services::ExchangeServices;
use crate::settings::DriverSettings;

pub const EXCHANGE_URL: &str = "http://shop.local/bitrix/admin/1c_exchange.php";

/// Clock stuck at 07.03.24 09:05:02 local time.
pub struct FixedClock(DateTime<Local>);

impl Default for FixedClock {
    fn default() -> Self {
        let naive = NaiveDate::from_ymd_opt(2024, 3, 7)
            .and_then(|d| d.and_hms_opt(9, 5, 2))
            .unwrap();
        Self(Local.from_local_datetime(&naive).earliest().unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// Treats bodies as UTF-8.
pub struct Utf8Decoder;

impl BodyDecoder for Utf8Decoder {
    fn decode(&self, body: &[u8]) -> String {
        String::from_utf8_lossy(body).into_owned()
    }
}

#[derive(Default)]
struct MemoryFs {
    files: BTreeMap<PathBuf, Vec<u8>>,
    dirs: Vec<PathBuf>,
}

/// Shared in-memory file system. Clones see the same files.
#[derive(Clone, Default)]
pub struct MemoryFileSystem {
    inner: Arc<Mutex<MemoryFs>>,
    read_only: bool,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn insert_file(&self, path: &Path, contents: &[u8]) {
        self.inner
            .lock()
            .unwrap()
            .files
            .insert(path.to_path_buf(), contents.to_vec());
    }

    pub fn read(&self, path: &Path) -> Option<Vec<u8>> {
        self.inner.lock().unwrap().files.get(path).cloned()
    }

    pub fn read_string(&self, path: &Path) -> String {
        String::from_utf8(self.read(path).unwrap_or_default()).unwrap()
    }

    fn check_writable(&self, path: &Path) -> Result<(), FileSystemError> {
        if self.read_only {
            return Err(FileSystemError::PermissionDenied(path.to_path_buf()));
        }
        Ok(())
    }
}

impl FileSystem for MemoryFileSystem {
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, FileSystemError> {
        self.read(path)
            .ok_or_else(|| FileSystemError::NotFound(path.to_path_buf()))
    }

    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), FileSystemError> {
        self.check_writable(path)?;
        self.insert_file(path, contents);
        Ok(())
    }

    async fn append_file(&self, path: &Path, contents: &[u8]) -> Result<(), FileSystemError> {
        self.check_writable(path)?;
        self.inner
            .lock()
            .unwrap()
            .files
            .entry(path.to_path_buf())
            .or_default()
            .extend_from_slice(contents);
        Ok(())
    }

    async fn create_dir_all(&self, path: &Path) -> Result<(), FileSystemError> {
        self.check_writable(path)?;
        self.inner.lock().unwrap().dirs.push(path.to_path_buf());
        Ok(())
    }

    async fn exists(&self, path: &Path) -> bool {
        self.is_file(path).await || self.is_dir(path).await
    }

    async fn is_dir(&self, path: &Path) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.dirs.iter().any(|d| d == path) || inner.files.keys().any(|f| f.parent() == Some(path))
    }

    async fn is_file(&self, path: &Path) -> bool {
        self.inner.lock().unwrap().files.contains_key(path)
    }

    async fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>, FileSystemError> {
        if !self.is_dir(path).await {
            return Err(FileSystemError::NotFound(path.to_path_buf()));
        }
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .files
            .keys()
            .filter(|f| f.parent() == Some(path))
            .cloned()
            .collect())
    }
}

/// Everything a [`MockTransport`] was asked to do.
#[derive(Clone, Default)]
pub struct TransportLog {
    inner: Arc<Mutex<TransportCalls>>,
}

#[derive(Default)]
struct TransportCalls {
    urls: Vec<Url>,
    headers: Vec<(String, String)>,
    cookies: Vec<(String, String)>,
    created_with: Vec<Credentials>,
}

impl TransportLog {
    pub fn urls(&self) -> Vec<Url> {
        self.inner.lock().unwrap().urls.clone()
    }

    /// `mode` of every request, `""` for requests without one.
    pub fn modes(&self) -> Vec<String> {
        self.urls()
            .iter()
            .map(|url| {
                url.query_pairs()
                    .find(|(k, _)| k == "mode")
                    .map(|(_, v)| v.into_owned())
                    .unwrap_or_default()
            })
            .collect()
    }

    pub fn headers(&self) -> Vec<(String, String)> {
        self.inner.lock().unwrap().headers.clone()
    }

    pub fn pinned_cookies(&self) -> Vec<(String, String)> {
        self.inner.lock().unwrap().cookies.clone()
    }

    pub fn created_with(&self) -> Vec<Credentials> {
        self.inner.lock().unwrap().created_with.clone()
    }
}

/// Scripted responses keyed by request `mode` (`""` for the probe).
///
/// Each mode answers with its queued bodies in order and then keeps
/// repeating the last one.
#[derive(Clone, Default)]
pub struct Script {
    responses: Arc<Mutex<HashMap<String, VecDeque<Result<Vec<u8>, TransportError>>>>>,
    session_cookie: Option<String>,
}

impl Script {
    /// A script whose probe sets `PHPSESSID=cookie-1`.
    pub fn new() -> Self {
        Self {
            session_cookie: Some("cookie-1".to_string()),
            ..Self::default()
        }
    }

    pub fn without_session_cookie(mut self) -> Self {
        self.session_cookie = None;
        self
    }

    pub fn respond(self, mode: &str, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry(mode.to_string())
            .or_default()
            .push_back(Ok(body.as_bytes().to_vec()));
        self
    }

    pub fn fail(self, mode: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry(mode.to_string())
            .or_default()
            .push_back(Err(TransportError::Request {
                url: EXCHANGE_URL.to_string(),
                message: "connection reset".to_string(),
            }));
        self
    }

    fn next(&self, mode: &str) -> Result<Vec<u8>, TransportError> {
        let mut responses = self.responses.lock().unwrap();
        let Some(queue) = responses.get_mut(mode) else {
            return Ok(Vec::new());
        };
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap_or_else(|| Ok(Vec::new()))
        }
    }
}

pub struct MockTransport {
    script: Script,
    log: TransportLog,
    session_cookie_name: String,
}

impl ExchangeTransport for MockTransport {
    async fn get(&self, url: &Url) -> Result<Vec<u8>, TransportError> {
        self.log.inner.lock().unwrap().urls.push(url.clone());
        let mode = url
            .query_pairs()
            .find(|(k, _)| k == "mode")
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default();
        self.script.next(&mode)
    }

    fn cookie(&self, _url: &Url, name: &str) -> Option<String> {
        if name == self.session_cookie_name {
            self.script.session_cookie.clone()
        } else {
            None
        }
    }

    fn pin_cookie(&mut self, _url: &Url, name: &str, value: &str) {
        self.log
            .inner
            .lock()
            .unwrap()
            .cookies
            .push((name.to_string(), value.to_string()));
    }

    fn set_header(&mut self, name: &str, value: &str) -> Result<(), TransportError> {
        if value.contains('\n') {
            return Err(TransportError::InvalidHeader {
                name: name.to_string(),
                message: "line break in value".to_string(),
            });
        }
        self.log
            .inner
            .lock()
            .unwrap()
            .headers
            .push((name.to_string(), value.to_string()));
        Ok(())
    }
}

pub struct MockTransportFactory {
    pub script: Script,
    pub log: TransportLog,
}

impl MockTransportFactory {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            log: TransportLog::default(),
        }
    }
}

impl TransportFactory for MockTransportFactory {
    type Transport = MockTransport;

    fn create(&self, credentials: &Credentials) -> Result<MockTransport, TransportError> {
        self.log
            .inner
            .lock()
            .unwrap()
            .created_with
            .push(credentials.clone());
        Ok(MockTransport {
            script: self.script.clone(),
            log: self.log.clone(),
            session_cookie_name: "PHPSESSID".to_string(),
        })
    }
}

/// Site rooted at `/site`, with one known exchange script.
pub struct MockSite {
    known: Vec<String>,
}

impl MockSite {
    pub fn new() -> Self {
        Self {
            known: vec!["/bitrix/admin/1c_exchange.php".to_string()],
        }
    }

    pub fn without_endpoints() -> Self {
        Self { known: Vec::new() }
    }
}

#[async_trait]
impl ExchangeSite for MockSite {
    async fn resolve_exchange_url(&self, requested: Option<&str>) -> Option<Url> {
        let path = requested.unwrap_or("/bitrix/admin/1c_exchange.php");
        self.known
            .iter()
            .any(|known| known == path)
            .then(|| Url::parse("http://shop.local").unwrap().join(path).unwrap())
    }

    fn upload_dir(&self, area: UploadArea) -> PathBuf {
        PathBuf::from("/site/upload").join(area.dir_name())
    }

    fn scratch_dir(&self) -> PathBuf {
        PathBuf::from("/site/upload/tmp/debug1c")
    }

    fn log_file(&self) -> ArtifactPath {
        ArtifactPath::new(
            "/site/upload/tmp/debug1c/exchange.log",
            "/upload/tmp/debug1c/exchange.log",
        )
    }

    fn order_file(&self) -> ArtifactPath {
        ArtifactPath::new(
            "/site/upload/tmp/debug1c/order.xml",
            "/upload/tmp/debug1c/order.xml",
        )
    }

    fn info_file(&self) -> ArtifactPath {
        ArtifactPath::new(
            "/site/upload/tmp/debug1c/info.xml",
            "/upload/tmp/debug1c/info.xml",
        )
    }
}

#[derive(Default)]
pub struct MemoryOrderStore {
    orders: Mutex<HashMap<u64, Order>>,
    reject_saves: bool,
}

impl MemoryOrderStore {
    pub fn with_order(self, order: Order) -> Self {
        self.orders.lock().unwrap().insert(order.id, order);
        self
    }

    pub fn rejecting_saves(mut self) -> Self {
        self.reject_saves = true;
        self
    }

    pub fn get(&self, id: u64) -> Option<Order> {
        self.orders.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn load(&self, id: u64) -> Result<Option<Order>, OrderStoreError> {
        Ok(self.get(id))
    }

    async fn save(&self, order: &Order) -> Result<(), OrderStoreError> {
        if self.reject_saves {
            return Err(OrderStoreError::Rejected(order.id, "locked".to_string()));
        }
        self.orders.lock().unwrap().insert(order.id, order.clone());
        Ok(())
    }
}

/// Services over in-memory ports.
pub fn services(
    fs: MemoryFileSystem,
    site: MockSite,
    orders: Arc<MemoryOrderStore>,
) -> ExchangeServices<MemoryFileSystem> {
    ExchangeServices {
        fs,
        site: Arc::new(site),
        orders,
        decoder: Arc::new(Utf8Decoder),
        clock: Arc::new(FixedClock::default()),
        settings: DriverSettings::default(),
    }
}

pub fn exchange_url() -> Url {
    Url::parse(EXCHANGE_URL).unwrap()
}
