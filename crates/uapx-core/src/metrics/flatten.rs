// ── Flattener ──
//
// Records in, samples out. Pure and deterministic: the same records always
// yield the same samples in the same order, which is record order, then
// radio order, scan order, VAP order, station order.

use indexmap::IndexMap;
use prometheus::proto::{Counter, Gauge, LabelPair, Metric, MetricFamily};
use uapx_api::DeviceStatus;

use super::catalogue::{Catalogue, MetricDesc, MetricKind};

/// One value of one series: descriptor, label values, number.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample<'a> {
    pub metric: &'a MetricDesc,
    /// Values in the descriptor's label order.
    pub labels: Vec<String>,
    pub value: f64,
}

impl Sample<'_> {
    pub fn name(&self) -> &str {
        self.metric.name()
    }

    /// Value of the label called `label`, if the series has one.
    pub fn label(&self, label: &str) -> Option<&str> {
        self.metric
            .labels()
            .iter()
            .position(|l| l == label)
            .and_then(|i| self.labels.get(i))
            .map(String::as_str)
    }
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn float(v: i64) -> f64 {
    v as f64
}

struct Emitter<'a> {
    samples: Vec<Sample<'a>>,
}

impl<'a> Emitter<'a> {
    fn emit(&mut self, metric: &'a MetricDesc, value: f64, labels: &[&str]) {
        debug_assert_eq!(labels.len(), metric.labels().len(), "{}", metric.name());
        self.samples.push(Sample {
            metric,
            labels: labels.iter().map(|l| (*l).to_owned()).collect(),
            value,
        });
    }
}

/// Convert device records into samples against `catalogue`.
///
/// A device without radios or VAPs emits only its device-level series.
pub fn flatten<'a>(catalogue: &'a Catalogue, records: &[DeviceStatus]) -> Vec<Sample<'a>> {
    let mut out = Emitter {
        samples: Vec::new(),
    };
    for record in records {
        device(&mut out, catalogue, record);
    }
    out.samples
}

fn device<'a>(out: &mut Emitter<'a>, catalogue: &'a Catalogue, ap: &DeviceStatus) {
    let m = &catalogue.device;
    let labels = [ap.name.as_str(), ap.model.as_str()];

    out.emit(
        &m.info,
        f64::from(ap.liveness),
        &[
            ap.ip.as_str(),
            ap.mac.as_str(),
            ap.model.as_str(),
            ap.model_name.as_str(),
            ap.name.as_str(),
            ap.serial.as_str(),
            ap.version.as_str(),
        ],
    );
    out.emit(&m.uptime, float(ap.uptime), &labels);

    let (tx, rx) = ap.up_interface_totals();
    out.emit(&m.tx_bytes, float(tx), &labels);
    out.emit(&m.rx_bytes, float(rx), &labels);

    let sys = &ap.sys_stats;
    out.emit(&m.load_1, sys.load_1, &labels);
    out.emit(&m.load_5, sys.load_5, &labels);
    out.emit(&m.load_15, sys.load_15, &labels);
    out.emit(&m.mem_used, float(sys.mem_used), &labels);
    out.emit(&m.mem_total, float(sys.mem_total), &labels);
    out.emit(&m.mem_buffer, float(sys.mem_buffer), &labels);
    out.emit(&m.cpu, ap.system_stats.cpu, &labels);
    out.emit(&m.mem, ap.system_stats.mem, &labels);

    radios(out, catalogue, ap);
    vaps(out, catalogue, ap);
}

fn radios<'a>(out: &mut Emitter<'a>, catalogue: &'a Catalogue, ap: &DeviceStatus) {
    let m = &catalogue.radio;
    let g = &catalogue.rogue;

    for radio in &ap.radios {
        let labels = [ap.name.as_str(), radio.radio.as_str(), radio.name.as_str()];
        out.emit(&m.antenna_gain, float(radio.antenna_gain), &labels);
        out.emit(&m.max_txpower, float(radio.max_txpower), &labels);
        out.emit(&m.min_txpower, float(radio.min_txpower), &labels);

        for rogue in &radio.scan_table {
            let labels = [
                ap.name.as_str(),
                radio.radio.as_str(),
                rogue.bssid.as_str(),
                rogue.essid.as_str(),
                rogue.security.as_str(),
            ];
            out.emit(&g.frequency, float(rogue.frequency), &labels);
            out.emit(&g.channel, float(rogue.channel), &labels);
            out.emit(&g.noise, float(rogue.noise), &labels);
            out.emit(&g.signal, float(rogue.signal), &labels);
        }
    }
}

fn vaps<'a>(out: &mut Emitter<'a>, catalogue: &'a Catalogue, ap: &DeviceStatus) {
    let m = &catalogue.vap;
    let s = &catalogue.station;

    for vap in &ap.vaps {
        let labels = [
            ap.name.as_str(),
            vap.name.as_str(),
            vap.bssid.as_str(),
            vap.radio.as_str(),
            vap.radio_name.as_str(),
            vap.essid.as_str(),
            vap.usage.as_str(),
        ];
        out.emit(&m.rx_bytes, float(vap.rx_bytes), &labels);
        out.emit(&m.rx_dropped, float(vap.rx_dropped), &labels);
        out.emit(&m.rx_errors, float(vap.rx_errors), &labels);
        out.emit(&m.tx_bytes, float(vap.tx_bytes), &labels);
        out.emit(&m.tx_dropped, float(vap.tx_dropped), &labels);
        out.emit(&m.tx_errors, float(vap.tx_errors), &labels);
        out.emit(&m.tx_power, float(vap.tx_power), &labels);
        out.emit(&m.tx_retries, float(vap.tx_retries), &labels);
        out.emit(&m.tx_success, float(vap.tx_success), &labels);
        out.emit(&m.tx_total, float(vap.tx_total), &labels);

        for sta in &vap.stations {
            let labels = [
                ap.name.as_str(),
                vap.name.as_str(),
                sta.hostname.as_str(),
                sta.mac.as_str(),
            ];
            out.emit(&s.rx_bytes, float(sta.rx_bytes), &labels);
            out.emit(&s.tx_bytes, float(sta.tx_bytes), &labels);
            out.emit(&s.noise, float(sta.noise), &labels);
            out.emit(&s.signal, float(sta.signal), &labels);
        }
    }
}

// ── Protobuf conversion ─────────────────────────────────────────────

/// Group samples into metric families, one per series name, in order of
/// first appearance.
pub fn into_families(samples: &[Sample<'_>]) -> Vec<MetricFamily> {
    let mut families: IndexMap<&str, MetricFamily> = IndexMap::new();

    for sample in samples {
        let family = families.entry(sample.name()).or_insert_with(|| {
            let mut family = MetricFamily::default();
            family.set_name(sample.metric.name().to_owned());
            family.set_help(sample.metric.help().to_owned());
            family.set_field_type(sample.metric.kind().proto());
            family
        });
        family.mut_metric().push(to_metric(sample));
    }

    families.into_values().collect()
}

fn to_metric(sample: &Sample<'_>) -> Metric {
    let mut metric = Metric::default();
    for (name, value) in sample.metric.labels().iter().zip(&sample.labels) {
        let mut pair = LabelPair::default();
        pair.set_name(name.clone());
        pair.set_value(value.clone());
        metric.mut_label().push(pair);
    }

    match sample.metric.kind() {
        MetricKind::Gauge => {
            let mut gauge = Gauge::default();
            gauge.set_value(sample.value);
            metric.set_gauge(gauge);
        }
        MetricKind::Counter => {
            let mut counter = Counter::default();
            counter.set_value(sample.value);
            metric.set_counter(counter);
        }
    }
    metric
}
