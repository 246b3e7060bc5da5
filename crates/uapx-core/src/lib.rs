// uapx-core: Fleet collection, metric catalogue, and Prometheus exposition for UniFi APs

pub mod collector;
pub mod config;
pub mod error;
pub mod fetch;
pub mod metrics;

// ── Primary re-exports ──────────────────────────────────────────────
pub use collector::Collector;
pub use config::{DeviceConfig, ExporterConfig};
pub use error::{CoreError, FetchError};
pub use fetch::{Fetch, SshFetcher};
pub use metrics::{Catalogue, MetricDesc, MetricKind, Sample, Scrape};

pub use uapx_api::{Credentials, DeviceStatus};
