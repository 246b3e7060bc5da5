// ── Collection orchestrator ──
//
// One sweep over the fleet per scrape. Devices are polled strictly in
// configuration order, one at a time. A device that cannot be polled still
// yields a record, with liveness 0, so the output always has exactly one
// record per configured device.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, trace, warn};
use uapx_api::DeviceStatus;

use crate::config::{DeviceConfig, ExporterConfig};
use crate::error::FetchError;
use crate::fetch::Fetch;

/// Polls the configured fleet.
pub struct Collector<F> {
    config: Arc<ExporterConfig>,
    fetcher: F,
}

impl<F: Fetch> Collector<F> {
    pub fn new(config: Arc<ExporterConfig>, fetcher: F) -> Self {
        Self { config, fetcher }
    }

    pub fn devices(&self) -> &[DeviceConfig] {
        &self.config.devices
    }

    /// Poll every device and return one record per device, in config order.
    ///
    /// Never fails. Per-device errors are logged at `warn` and replaced by
    /// [`DeviceStatus::placeholder`].
    pub async fn collect(&self) -> Vec<DeviceStatus> {
        let started = Instant::now();
        let mut records = Vec::with_capacity(self.config.devices.len());

        for device in &self.config.devices {
            match self.fetcher.fetch(device).await {
                Ok(status) => records.push(status),
                Err(e) => {
                    report(device, &e);
                    records.push(DeviceStatus::placeholder(&device.name, &device.address));
                }
            }
        }

        debug!(
            devices = records.len(),
            live = records.iter().filter(|r| r.liveness == 1).count(),
            elapsed = ?started.elapsed(),
            "collection finished"
        );
        records
    }
}

fn report(device: &DeviceConfig, err: &FetchError) {
    warn!(
        address = %device.address,
        device = %device.name,
        kind = err.kind(),
        error = %err.source,
        "device poll failed"
    );
    if let uapx_api::Error::Deserialization { ref body, .. } = err.source {
        trace!(address = %device.address, body, "undecodable mca-dump output");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use secrecy::SecretString;
    use uapx_api::{Credentials, Interface};

    use super::*;

    /// Returns a canned record per address; unknown addresses time out.
    struct FakeFetcher {
        responses: HashMap<String, DeviceStatus>,
    }

    impl Fetch for FakeFetcher {
        async fn fetch(&self, device: &DeviceConfig) -> Result<DeviceStatus, FetchError> {
            match self.responses.get(&device.address) {
                Some(status) => {
                    let mut status = status.clone();
                    status.name.clone_from(&device.name);
                    status.liveness = 1;
                    Ok(status)
                }
                None => Err(FetchError {
                    address: device.address.clone(),
                    source: uapx_api::Error::Timeout {
                        timeout: Duration::from_secs(1),
                    },
                }),
            }
        }
    }

    fn device(name: &str, address: &str) -> DeviceConfig {
        DeviceConfig {
            name: name.into(),
            address: address.into(),
            port: 22,
            credentials: Credentials {
                username: "admin".into(),
                password: Some(SecretString::from("secret".to_owned())),
                key_file: None,
            },
        }
    }

    fn collector(
        devices: Vec<DeviceConfig>,
        responses: HashMap<String, DeviceStatus>,
    ) -> Collector<FakeFetcher> {
        let config = ExporterConfig {
            timeout: Duration::from_secs(1),
            devices,
            ..ExporterConfig::default()
        };
        Collector::new(Arc::new(config), FakeFetcher { responses })
    }

    #[tokio::test]
    async fn one_record_per_device_in_config_order() {
        let responses = HashMap::from([
            ("10.0.0.1".to_owned(), DeviceStatus::default()),
            ("10.0.0.3".to_owned(), DeviceStatus::default()),
        ]);
        let c = collector(
            vec![
                device("a", "10.0.0.1"),
                device("b", "10.0.0.2"),
                device("c", "10.0.0.3"),
            ],
            responses,
        );

        let records = c.collect().await;
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        let liveness: Vec<_> = records.iter().map(|r| r.liveness).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(liveness, [1, 0, 1]);
    }

    #[tokio::test]
    async fn failed_poll_yields_zeroed_placeholder() {
        let up = DeviceStatus {
            uptime: 3600,
            interfaces: vec![Interface {
                tx_bytes: 100,
                rx_bytes: 200,
                up: true,
            }],
            ..DeviceStatus::default()
        };
        let c = collector(
            vec![device("A", "10.0.0.1"), device("B", "10.0.0.2")],
            HashMap::from([("10.0.0.1".to_owned(), up)]),
        );

        let records = c.collect().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].up_interface_totals(), (100, 200));

        let b = &records[1];
        assert_eq!(*b, DeviceStatus::placeholder("B", "10.0.0.2"));
        assert_eq!(b.liveness, 0);
        assert_eq!(b.uptime, 0);
        assert_eq!(b.up_interface_totals(), (0, 0));
    }

    #[tokio::test]
    async fn every_device_down_still_collects() {
        let c = collector(
            vec![device("a", "10.0.0.1"), device("a", "10.0.0.2")],
            HashMap::new(),
        );
        let records = c.collect().await;
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.liveness == 0));
    }

    #[tokio::test]
    async fn empty_fleet_collects_nothing() {
        let c = collector(Vec::new(), HashMap::new());
        assert!(c.collect().await.is_empty());
    }
}
