//! CLI Configuration

use std::path::PathBuf;
use std::time::Duration;

use zerotrace_core::ClientConfig;

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Data directory for storage.
    pub data_dir: PathBuf,
    /// Messaging service URL.
    pub api_url: String,
    /// Interval between polls in `watch`.
    pub poll_interval: Duration,
    /// Route service calls through the local Tor proxy.
    pub use_tor: bool,
}

impl CliConfig {
    /// Returns the storage path for ZeroTrace data.
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join("zerotrace.db")
    }

    /// Builds the library configuration.
    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::default()
            .with_api_base(self.api_url.clone())
            .with_storage_path(self.storage_path())
            .with_poll_interval(self.poll_interval);
        if self.use_tor {
            config.with_tor()
        } else {
            config
        }
    }
}
