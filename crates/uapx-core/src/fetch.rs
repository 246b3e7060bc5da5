// ── Device fetcher ──
//
// The seam between collection and transport. `SshFetcher` is the real
// implementation; tests drive the collector with canned records instead.

use std::future::Future;
use std::time::Duration;

use tracing::debug;
use uapx_api::{DeviceStatus, SshClient, mca};

use crate::config::DeviceConfig;
use crate::error::FetchError;

/// Produces the status record of one device.
///
/// On success the returned record carries the configured display name and
/// liveness 1. Implementations must not return partial records: any failure
/// is a `FetchError`.
pub trait Fetch: Send + Sync {
    fn fetch(
        &self,
        device: &DeviceConfig,
    ) -> impl Future<Output = Result<DeviceStatus, FetchError>> + Send;
}

/// Polls a device by running `mca-dump` over SSH.
#[derive(Debug, Clone, Copy)]
pub struct SshFetcher {
    timeout: Duration,
}

impl SshFetcher {
    /// `timeout` bounds the entire poll. On expiry the in-flight session is
    /// dropped, which closes the connection.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Fetch for SshFetcher {
    async fn fetch(&self, device: &DeviceConfig) -> Result<DeviceStatus, FetchError> {
        let result = match tokio::time::timeout(self.timeout, poll(device)).await {
            Ok(result) => result,
            Err(_) => Err(uapx_api::Error::Timeout { timeout: self.timeout }),
        };

        match result {
            Ok(mut status) => {
                status.name.clone_from(&device.name);
                status.liveness = 1;
                Ok(status)
            }
            Err(source) => Err(FetchError {
                address: device.address.clone(),
                source,
            }),
        }
    }
}

async fn poll(device: &DeviceConfig) -> Result<DeviceStatus, uapx_api::Error> {
    let mut client = SshClient::connect(&device.address, device.port, &device.credentials).await?;
    let output = client.execute(mca::COMMAND).await;
    client.close().await;

    let output = output?;
    debug!(address = %device.address, bytes = output.len(), "received mca-dump");
    DeviceStatus::parse(&output)
}
