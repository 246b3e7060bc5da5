// ── Runtime exporter configuration ──
//
// What to poll and how. These types never touch disk: `uapx-config` parses
// and validates the YAML file, then hands an `ExporterConfig` in.

use std::time::Duration;

use uapx_api::Credentials;

/// Default listen port of the metrics endpoint.
pub const DEFAULT_LISTEN_PORT: u16 = 9130;

/// Default upper bound on one device poll.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// One access point to poll.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Display name, attached as the `name` label. Not required to be unique.
    pub name: String,
    /// Hostname or IP address.
    pub address: String,
    /// SSH port.
    pub port: u16,
    pub credentials: Credentials,
}

/// Immutable process-wide configuration, shared across scrapes.
#[derive(Debug, Clone)]
pub struct ExporterConfig {
    /// TCP port of the metrics endpoint.
    pub listen_port: u16,
    /// Budget for one complete device poll: dial, auth, command, read.
    pub timeout: Duration,
    /// Devices in configuration order.
    pub devices: Vec<DeviceConfig>,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            listen_port: DEFAULT_LISTEN_PORT,
            timeout: DEFAULT_TIMEOUT,
            devices: Vec::new(),
        }
    }
}
