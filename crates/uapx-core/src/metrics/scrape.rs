// ── Per-scrape exposition ──
//
// Each scrape registers a `Scrape` into a fresh `Registry`, gathers, and
// encodes. Nothing survives the scrape except the shared catalogue, so
// series from devices that have since disappeared never linger.

use std::sync::Arc;

use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{Encoder, Registry, TextEncoder};
use uapx_api::DeviceStatus;

use super::catalogue::Catalogue;
use super::flatten::{flatten, into_families};
use crate::error::CoreError;

/// `Content-Type` of [`Scrape::render`] output.
pub const CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

/// One round of collected records, exposed as a Prometheus collector.
pub struct Scrape {
    catalogue: Arc<Catalogue>,
    records: Vec<DeviceStatus>,
}

impl Scrape {
    pub fn new(catalogue: Arc<Catalogue>, records: Vec<DeviceStatus>) -> Self {
        Self { catalogue, records }
    }

    /// Register into a throwaway registry and gather. Families come back
    /// sorted by name with empty families pruned.
    pub fn gather(self) -> Result<Vec<MetricFamily>, CoreError> {
        let registry = Registry::new();
        registry
            .register(Box::new(self))
            .map_err(CoreError::Registry)?;
        Ok(registry.gather())
    }

    /// Gather and encode in the Prometheus text format.
    pub fn render(self) -> Result<String, CoreError> {
        let families = self.gather()?;
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&families, &mut buffer)
            .map_err(CoreError::Encode)?;
        Ok(String::from_utf8(buffer)?)
    }
}

impl Collector for Scrape {
    fn desc(&self) -> Vec<&Desc> {
        self.catalogue.descs()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        into_families(&flatten(&self.catalogue, &self.records))
    }
}
