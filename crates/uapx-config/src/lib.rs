// uapx-config: YAML config file, env overrides, validation, and translation to uapx-core

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use uapx_api::Credentials;
use uapx_api::ssh::DEFAULT_PORT as DEFAULT_SSH_PORT;
use uapx_core::config::{DEFAULT_LISTEN_PORT, DEFAULT_TIMEOUT};
use uapx_core::{DeviceConfig, ExporterConfig};

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "unifi-ap-exporter.yaml";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("no access points defined")]
    NoAccessPoints,

    #[error("accesspoint #{index} is missing `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("accesspoint #{index} requires either `password` or `keyfile`")]
    NoCredentials { index: usize },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── YAML config structs ─────────────────────────────────────────────

/// Top-level YAML document.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub global: Global,

    #[serde(default)]
    pub accesspoints: Vec<AccessPoint>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Global {
    /// Listen port of the metrics endpoint.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Per-device poll timeout, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Global {
    fn default() -> Self {
        Self {
            port: default_port(),
            timeout: default_timeout(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_LISTEN_PORT
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

/// One `accesspoints` entry. Required fields are checked by [`Config::validate`]
/// so that errors can name the entry.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AccessPoint {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub username: String,

    /// Plaintext SSH password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Path to an OpenSSH private key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyfile: Option<PathBuf>,

    /// SSH port, when not 22.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl AccessPoint {
    fn password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }

    fn keyfile(&self) -> Option<&Path> {
        self.keyfile
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

// ── Loading ─────────────────────────────────────────────────────────

/// Read, validate, and translate the config file at `path`.
///
/// A missing file is an error; there is no built-in fleet to fall back on.
pub fn load(path: &Path) -> Result<ExporterConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_owned(),
        source,
    })?;
    let config = parse(&text)?;
    config.validate()?;
    Ok(config.into_exporter_config())
}

/// Keys the environment may override. Any other `UAPX_*` variable is
/// ignored, including `UAPX_CONFIG`, which names the file itself.
const ENV_KEYS: &[&str] = &["global.port", "global.timeout"];

/// Parse YAML text, layering defaults underneath and the environment on
/// top (`UAPX_GLOBAL__PORT=9200`). No validation.
pub fn parse(yaml: &str) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Yaml::string(yaml))
        .merge(Env::prefixed("UAPX_").split("__").only(ENV_KEYS));

    let config: Config = figment.extract()?;
    Ok(config)
}

impl Config {
    /// Check the rules the type system cannot: a non-empty fleet, required
    /// fields present, and at least one credential per device. Entries are
    /// numbered from 1 in messages.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.global.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "global.timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }

        if self.accesspoints.is_empty() {
            return Err(ConfigError::NoAccessPoints);
        }

        for (i, ap) in self.accesspoints.iter().enumerate() {
            let index = i + 1;
            let missing = |field| ConfigError::MissingField { index, field };

            if ap.name.is_empty() {
                return Err(missing("name"));
            }
            if ap.address.is_empty() {
                return Err(missing("address"));
            }
            if ap.username.is_empty() {
                return Err(missing("username"));
            }
            if ap.password().is_none() && ap.keyfile().is_none() {
                return Err(ConfigError::NoCredentials { index });
            }
        }
        Ok(())
    }

    /// Translate into the runtime config. Call [`Config::validate`] first.
    pub fn into_exporter_config(self) -> ExporterConfig {
        let devices = self
            .accesspoints
            .iter()
            .map(|ap| DeviceConfig {
                name: ap.name.clone(),
                address: ap.address.clone(),
                port: ap.port.unwrap_or(DEFAULT_SSH_PORT),
                credentials: Credentials {
                    username: ap.username.clone(),
                    password: ap.password().map(|p| SecretString::from(p.to_owned())),
                    key_file: ap.keyfile().map(Path::to_path_buf),
                },
            })
            .collect();

        ExporterConfig {
            listen_port: self.global.port,
            timeout: Duration::from_secs(self.global.timeout),
            devices,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn global_defaults_apply() {
        let config = parse("accesspoints: []").unwrap();
        assert_eq!(config.global.port, 9130);
        assert_eq!(config.global.timeout, 30);
    }

    #[test]
    fn entries_are_numbered_from_one() {
        let config = parse(
            "accesspoints:\n  - name: a\n    address: 10.0.0.1\n    username: admin\n    password: pw\n  - name: b\n    username: admin\n    password: pw\n",
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "accesspoint #2 is missing `address`");
    }

    #[test]
    fn empty_password_counts_as_absent() {
        let config = parse(
            "accesspoints:\n  - name: a\n    address: 10.0.0.1\n    username: admin\n    password: \"\"\n",
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "accesspoint #1 requires either `password` or `keyfile`"
        );
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = parse(
            "global:\n  timeout: 0\naccesspoints:\n  - name: a\n    address: 10.0.0.1\n    username: admin\n    password: pw\n",
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn translation_keeps_order_and_secrets() {
        let config = parse(
            "global:\n  timeout: 5\naccesspoints:\n  - name: b\n    address: 10.0.0.2\n    username: admin\n    keyfile: /etc/uapx/id_ed25519\n    port: 2222\n  - name: a\n    address: 10.0.0.1\n    username: ubnt\n    password: hunter2\n",
        )
        .unwrap();
        config.validate().unwrap();
        let exporter = config.into_exporter_config();

        assert_eq!(exporter.timeout, Duration::from_secs(5));
        assert_eq!(exporter.devices.len(), 2);

        let b = &exporter.devices[0];
        assert_eq!(b.name, "b");
        assert_eq!(b.port, 2222);
        assert!(b.credentials.password.is_none());
        assert_eq!(
            b.credentials.key_file.as_deref(),
            Some(Path::new("/etc/uapx/id_ed25519"))
        );

        let a = &exporter.devices[1];
        assert_eq!(a.port, 22);
        assert_eq!(a.credentials.username, "ubnt");
        assert_eq!(
            a.credentials.password.as_ref().unwrap().expose_secret(),
            "hunter2"
        );
        assert!(!format!("{a:?}").contains("hunter2"));
    }
}
