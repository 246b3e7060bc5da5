// ── Core error types ──
//
// `FetchError` is per device and never escapes the collector; it is
// logged and replaced by a placeholder record. `CoreError` covers the
// metric plumbing, which only fails on programming errors (a malformed
// descriptor) or an encoder failure.

use thiserror::Error;

/// A failed poll of one device.
#[derive(Debug, Error)]
#[error("poll of {address} failed: {source}")]
pub struct FetchError {
    /// Address of the device, as configured.
    pub address: String,
    #[source]
    pub source: uapx_api::Error,
}

impl FetchError {
    /// Classification of the underlying cause, for structured logs.
    pub fn kind(&self) -> &'static str {
        self.source.kind()
    }
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Metric plumbing ──────────────────────────────────────────────
    #[error("Invalid metric descriptor {name}: {source}")]
    Descriptor {
        name: String,
        #[source]
        source: prometheus::Error,
    },

    #[error("Metric registration failed: {0}")]
    Registry(#[source] prometheus::Error),

    #[error("Metric encoding failed: {0}")]
    Encode(#[source] prometheus::Error),

    #[error("Encoded metrics are not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_names_the_device() {
        let err = FetchError {
            address: "10.0.0.7".into(),
            source: uapx_api::Error::Timeout {
                timeout: std::time::Duration::from_secs(5),
            },
        };
        assert_eq!(err.to_string(), "poll of 10.0.0.7 failed: poll timed out after 5s");
        assert_eq!(err.kind(), "timeout");
    }
}
