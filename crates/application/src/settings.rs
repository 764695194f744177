//! Exchange driver settings.

use std::time::Duration;

/// Cookie pinned next to the session cookie for backend debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugCookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
}

/// Bounds for the import loop, which repeats while the endpoint reports
/// `progress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportLimits {
    /// Maximum number of import requests per run.
    pub max_iterations: u32,
    /// Maximum wall-clock time spent importing.
    pub timeout: Duration,
}

impl Default for ImportLimits {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            timeout: Duration::from_secs(3600),
        }
    }
}

/// Protocol knobs for one exchange run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverSettings {
    /// Cookie the endpoint sets on the probe request.
    pub session_cookie: String,
    /// Header carrying the session id after check-auth.
    pub csrf_header: String,
    /// Extra cookie pinned with the session cookie, if any.
    pub debug_cookie: Option<DebugCookie>,
    /// Import loop bounds.
    pub import: ImportLimits,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            session_cookie: "PHPSESSID".to_string(),
            csrf_header: "X-Bitrix-Csrf-Token".to_string(),
            debug_cookie: Some(DebugCookie {
                name: "XDEBUG_SESSION".to_string(),
                value: "PHPSTORM".to_string(),
            }),
            import: ImportLimits::default(),
        }
    }
}
