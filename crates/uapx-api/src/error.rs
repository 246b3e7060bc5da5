use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Top-level error type for the `uapx-api` crate.
///
/// Covers every way a single device poll can fail: credential loading,
/// transport, authentication, remote command execution, and decoding of the
/// `mca-dump` document. `uapx-core` wraps these with the device address.
#[derive(Debug, Error)]
pub enum Error {
    // ── Credentials ─────────────────────────────────────────────────
    /// The configured private key file could not be read.
    #[error("cannot read key file {}: {source}", path.display())]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The private key file was read but is not a usable signing key.
    #[error("cannot parse key file {}: {source}", path.display())]
    KeyParse {
        path: PathBuf,
        #[source]
        source: russh::keys::Error,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// TCP dial or SSH handshake failed.
    #[error("SSH connection to {address} failed: {source}")]
    Connect {
        address: String,
        #[source]
        source: russh::Error,
    },

    /// Every configured authentication method was rejected.
    #[error("SSH authentication failed for user '{username}'")]
    Authentication { username: String },

    /// Protocol error after the session was established.
    #[error("SSH session error: {0}")]
    Session(#[from] russh::Error),

    /// The whole poll did not finish in time.
    #[error("poll timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    // ── Remote command ──────────────────────────────────────────────
    /// The remote command exited with a non-zero status.
    #[error("remote command exited with status {status}: {stderr}")]
    Command { status: u32, stderr: String },

    /// The channel closed without the command ever reporting an exit status.
    #[error("remote command terminated without an exit status")]
    NoExitStatus,

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Short, stable classification used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::KeyRead { .. } | Self::KeyParse { .. } => "credentials",
            Self::Connect { .. } => "connect",
            Self::Authentication { .. } => "auth",
            Self::Session(_) => "session",
            Self::Timeout { .. } => "timeout",
            Self::Command { .. } | Self::NoExitStatus => "command",
            Self::Deserialization { .. } => "decode",
        }
    }
}
