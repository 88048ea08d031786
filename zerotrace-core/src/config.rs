//! Client configuration

use std::path::PathBuf;
use std::time::Duration;

/// Default messaging service endpoint.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8080";

/// Configuration for a ZeroTrace client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Messaging service base URL
    pub api_base: String,

    /// Interval between polls of the active thread
    pub poll_interval: Duration,

    /// HTTP timeout for service calls
    pub request_timeout: Duration,

    /// Proxy URL (for Tor support)
    pub proxy_url: Option<String>,

    /// Local database path
    pub storage_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            poll_interval: Duration::from_secs(3),
            request_timeout: Duration::from_secs(30),
            proxy_url: None,
            storage_path: PathBuf::from("zerotrace.db"),
        }
    }
}

impl ClientConfig {
    /// Point the client at another service
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Configure the local database location
    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = path.into();
        self
    }

    /// Configure the poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Configure with Tor proxy
    ///
    /// Uses the default Tor SOCKS5 proxy at 127.0.0.1:9050 and
    /// increases the timeout to 60 seconds to account for Tor latency.
    pub fn with_tor(mut self) -> Self {
        self.proxy_url = Some("socks5h://127.0.0.1:9050".to_string());
        self.request_timeout = Duration::from_secs(60);
        self
    }

    /// Configure with custom proxy
    pub fn with_proxy(mut self, proxy_url: String) -> Self {
        self.proxy_url = Some(proxy_url);
        self
    }
}
