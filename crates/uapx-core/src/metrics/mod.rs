// ── Metrics ──
//
// `catalogue` declares every series the exporter can emit, `flatten` turns
// device records into samples against that catalogue, and `scrape` hands
// the samples to a throwaway Prometheus registry for encoding.

mod catalogue;
mod flatten;
mod scrape;

pub use catalogue::{Catalogue, MetricDesc, MetricKind, NAMESPACE};
pub use flatten::{Sample, flatten, into_families};
pub use scrape::{CONTENT_TYPE, Scrape};
