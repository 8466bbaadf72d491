//! Centralized configuration for StreamShare.
//!
//! Tunable parameters live here so the server, the streaming engine and the
//! CLI agree on defaults. `ServerConfig` is the one computed at startup once
//! the listener is bound; everything else is a knob.

use std::net::IpAddr;
use std::time::Duration;

/// Central configuration for all StreamShare components.
///
/// Groups related settings into logical sections. Supports environment
/// variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct StreamShareConfig {
    pub server: ServerSettings,
    pub transfer: TransferConfig,
}

/// Listener and startup behavior.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// First port probed when binding the listener
    pub base_port: u16,
    /// Number of consecutive ports probed before giving up
    pub max_port_attempts: u16,
    /// Open the landing page in the default browser after startup
    pub open_browser: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_port: 3000,
            max_port_attempts: 100,
            open_browser: true,
        }
    }
}

/// Disk and socket I/O settings for downloads and uploads.
#[derive(Debug, Clone)]
pub struct TransferConfig {
    /// Read buffer size for streamed file bodies
    pub chunk_size: usize,
    /// Maximum silence between two upload body chunks
    pub upload_idle_timeout: Duration,
    /// Suffix of in-progress upload files
    pub temp_file_suffix: &'static str,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            chunk_size: 65536, // 64 KiB
            upload_idle_timeout: Duration::from_secs(60),
            temp_file_suffix: ".part",
        }
    }
}

impl StreamShareConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Unparseable values are ignored and the default is kept.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(port) = env_value::<u16>("STREAMSHARE_PORT") {
            config.server.base_port = port;
        }

        if let Some(attempts) = env_value::<u16>("STREAMSHARE_MAX_PORT_ATTEMPTS") {
            config.server.max_port_attempts = attempts.max(1);
        }

        if let Some(chunk_size) = env_value::<usize>("STREAMSHARE_CHUNK_SIZE") {
            config.transfer.chunk_size = chunk_size.max(1);
        }

        if let Some(seconds) = env_value::<u64>("STREAMSHARE_UPLOAD_IDLE_TIMEOUT") {
            config.transfer.upload_idle_timeout = Duration::from_secs(seconds);
        }

        config
    }

    /// Creates a configuration for tests: small chunks, no browser.
    pub fn for_testing() -> Self {
        Self {
            server: ServerSettings {
                open_browser: false,
                ..Default::default()
            },
            transfer: TransferConfig {
                chunk_size: 1024,
                upload_idle_timeout: Duration::from_secs(5),
                ..Default::default()
            },
        }
    }
}

fn env_value<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok()?.trim().parse().ok()
}

/// Addresses the running server is reachable on.
///
/// Computed once after the listener is bound, immutable afterwards. Every
/// URL rendered by the server or printed by the CLI comes from here, so the
/// port always matches the one actually bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub bind_address_local: String,
    pub bind_address_network: IpAddr,
}

impl ServerConfig {
    /// Creates the startup address set for `port`.
    pub fn new(port: u16, bind_address_network: IpAddr) -> Self {
        Self {
            port,
            bind_address_local: "localhost".to_string(),
            bind_address_network,
        }
    }

    /// URL for a browser on the host machine.
    pub fn local_url(&self) -> String {
        format!("http://{}:{}", self.bind_address_local, self.port)
    }

    /// URL for other devices on the LAN.
    pub fn network_url(&self) -> String {
        match self.bind_address_network {
            IpAddr::V4(ip) => format!("http://{ip}:{}", self.port),
            IpAddr::V6(ip) => format!("http://[{ip}]:{}", self.port),
        }
    }
}
