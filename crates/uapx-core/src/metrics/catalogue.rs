use std::collections::HashMap;

use prometheus::core::Desc;
use prometheus::proto::MetricType;
use strum::{Display, IntoStaticStr};
use tracing::trace;

use crate::error::CoreError;

/// Prefix of every series name.
pub const NAMESPACE: &str = "unifi_ap_";

const DEVICE_INFO_LABELS: &[&str] = &[
    "ip",
    "mac",
    "model",
    "model_name",
    "name",
    "serial",
    "version",
];
const DEVICE_LABELS: &[&str] = &["name", "model"];
const RADIO_LABELS: &[&str] = &["name", "radio", "radio_name"];
const ROGUE_LABELS: &[&str] = &["name", "radio", "bssid", "essid", "security"];
const VAP_LABELS: &[&str] = &[
    "name",
    "vap_name",
    "bssid",
    "radio",
    "radio_name",
    "essid",
    "usage",
];
const STATION_LABELS: &[&str] = &["name", "vap_name", "hostname", "mac"];

/// Declared Prometheus type of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum MetricKind {
    Gauge,
    Counter,
}

impl MetricKind {
    pub(crate) fn proto(self) -> MetricType {
        match self {
            Self::Gauge => MetricType::GAUGE,
            Self::Counter => MetricType::COUNTER,
        }
    }
}

/// One series declaration: name, help, label names, and type.
#[derive(Debug, Clone)]
pub struct MetricDesc {
    desc: Desc,
    kind: MetricKind,
}

impl MetricDesc {
    fn new(name: &str, help: &str, kind: MetricKind, labels: &[&str]) -> Result<Self, CoreError> {
        let fq_name = format!("{NAMESPACE}{name}");
        let desc = Desc::new(
            fq_name.clone(),
            help.to_owned(),
            labels.iter().map(|l| (*l).to_owned()).collect(),
            HashMap::new(),
        )
        .map_err(|source| CoreError::Descriptor {
            name: fq_name,
            source,
        })?;
        Ok(Self { desc, kind })
    }

    /// Fully qualified series name, including the namespace.
    pub fn name(&self) -> &str {
        &self.desc.fq_name
    }

    pub fn help(&self) -> &str {
        &self.desc.help
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    /// Label names, in the order label values are supplied.
    pub fn labels(&self) -> &[String] {
        &self.desc.variable_labels
    }

    pub(crate) fn desc(&self) -> &Desc {
        &self.desc
    }
}

impl PartialEq for MetricDesc {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.desc.fq_name == other.desc.fq_name
    }
}

// ── Series groups ───────────────────────────────────────────────────

#[derive(Debug)]
pub(crate) struct DeviceMetrics {
    pub info: MetricDesc,
    pub uptime: MetricDesc,
    pub tx_bytes: MetricDesc,
    pub rx_bytes: MetricDesc,
    pub load_1: MetricDesc,
    pub load_5: MetricDesc,
    pub load_15: MetricDesc,
    pub mem_used: MetricDesc,
    pub mem_total: MetricDesc,
    pub mem_buffer: MetricDesc,
    pub cpu: MetricDesc,
    pub mem: MetricDesc,
}

#[derive(Debug)]
pub(crate) struct RadioMetrics {
    pub antenna_gain: MetricDesc,
    pub max_txpower: MetricDesc,
    pub min_txpower: MetricDesc,
}

#[derive(Debug)]
pub(crate) struct RogueMetrics {
    pub channel: MetricDesc,
    pub frequency: MetricDesc,
    pub noise: MetricDesc,
    pub signal: MetricDesc,
}

#[derive(Debug)]
pub(crate) struct VapMetrics {
    pub rx_bytes: MetricDesc,
    pub rx_dropped: MetricDesc,
    pub rx_errors: MetricDesc,
    pub tx_bytes: MetricDesc,
    pub tx_dropped: MetricDesc,
    pub tx_errors: MetricDesc,
    pub tx_power: MetricDesc,
    pub tx_retries: MetricDesc,
    pub tx_success: MetricDesc,
    pub tx_total: MetricDesc,
}

#[derive(Debug)]
pub(crate) struct StationMetrics {
    pub tx_bytes: MetricDesc,
    pub rx_bytes: MetricDesc,
    pub noise: MetricDesc,
    pub signal: MetricDesc,
}

/// The complete, fixed set of series descriptors.
///
/// Built once at start-up and shared read-only by every scrape.
#[derive(Debug)]
pub struct Catalogue {
    pub(crate) device: DeviceMetrics,
    pub(crate) radio: RadioMetrics,
    pub(crate) rogue: RogueMetrics,
    pub(crate) vap: VapMetrics,
    pub(crate) station: StationMetrics,
}

impl Catalogue {
    pub fn new() -> Result<Self, CoreError> {
        use MetricKind::{Counter, Gauge};

        let d = |name: &str, help: &str, kind: MetricKind| MetricDesc::new(name, help, kind, DEVICE_LABELS);
        let device = DeviceMetrics {
            info: MetricDesc::new("info", "Device information", Gauge, DEVICE_INFO_LABELS)?,
            uptime: d("uptime_seconds", "Device uptime", Gauge)?,
            tx_bytes: d("transmit_bytes_total", "Total transmitted bytes", Counter)?,
            rx_bytes: d("receive_bytes_total", "Total received bytes", Counter)?,
            load_1: d("load_average_1", "System load average over 1 minute", Gauge)?,
            load_5: d("load_average_5", "System load average over 5 minutes", Gauge)?,
            load_15: d("load_average_15", "System load average over 15 minutes", Gauge)?,
            mem_used: d("memory_used_bytes", "System memory used", Gauge)?,
            mem_total: d("memory_installed_bytes", "System memory installed", Gauge)?,
            mem_buffer: d("memory_buffer_bytes", "System memory buffer", Gauge)?,
            cpu: d("cpu_utilization_ratio", "System CPU utilization in percent", Gauge)?,
            mem: d("memory_utilization_ratio", "System memory utilization in percent", Gauge)?,
        };

        let r = |name: &str, help: &str| MetricDesc::new(name, help, Gauge, RADIO_LABELS);
        let radio = RadioMetrics {
            antenna_gain: r("radio_current_antenna_gain", "Radio current antenna gain")?,
            max_txpower: r("radio_max_transmit_power", "Radio maximum transmit power")?,
            min_txpower: r("radio_min_transmit_power", "Radio minimum transmit power")?,
        };

        let g = |name: &str, help: &str| MetricDesc::new(name, help, Gauge, ROGUE_LABELS);
        let rogue = RogueMetrics {
            channel: g("rogueap_channel", "Neighbouring access point channel")?,
            frequency: g("rogueap_frequency", "Neighbouring access point frequency")?,
            noise: g("rogueap_noise", "Neighbouring access point noise")?,
            signal: g("rogueap_signal", "Neighbouring access point signal")?,
        };

        let v = |name: &str, help: &str, kind: MetricKind| MetricDesc::new(name, help, kind, VAP_LABELS);
        let vap = VapMetrics {
            rx_bytes: v("vap_receive_bytes_total", "VAP bytes received", Counter)?,
            rx_dropped: v("vap_receive_dropped_total", "VAP received packets dropped", Counter)?,
            rx_errors: v("vap_receive_errors_total", "VAP receive errors", Counter)?,
            tx_bytes: v("vap_transmit_bytes_total", "VAP bytes transmitted", Counter)?,
            tx_dropped: v("vap_transmit_dropped_total", "VAP transmitted packets dropped", Counter)?,
            tx_errors: v("vap_transmit_errors_total", "VAP transmit errors", Counter)?,
            tx_power: v("vap_transmit_power", "VAP transmit power", Gauge)?,
            tx_retries: v("vap_transmit_retries_total", "VAP transmit retries", Counter)?,
            tx_success: v("vap_transmit_success_total", "VAP successful transmits", Counter)?,
            tx_total: v("vap_transmit_total", "VAP transmit attempts", Counter)?,
        };

        let s = |name: &str, help: &str, kind: MetricKind| MetricDesc::new(name, help, kind, STATION_LABELS);
        let station = StationMetrics {
            tx_bytes: s("station_transmit_bytes_total", "Station bytes transmitted", Counter)?,
            rx_bytes: s("station_receive_bytes_total", "Station bytes received", Counter)?,
            noise: s("station_noise", "Station noise", Gauge)?,
            signal: s("station_signal", "Station signal", Gauge)?,
        };

        let catalogue = Self {
            device,
            radio,
            rogue,
            vap,
            station,
        };
        for m in catalogue.iter() {
            trace!(metric = m.name(), kind = %m.kind(), "declared series");
        }
        Ok(catalogue)
    }

    /// Every descriptor, grouped by scope.
    pub fn iter(&self) -> impl Iterator<Item = &MetricDesc> {
        let d = &self.device;
        let r = &self.radio;
        let g = &self.rogue;
        let v = &self.vap;
        let s = &self.station;
        [
            &d.info,
            &d.uptime,
            &d.tx_bytes,
            &d.rx_bytes,
            &d.load_1,
            &d.load_5,
            &d.load_15,
            &d.mem_used,
            &d.mem_total,
            &d.mem_buffer,
            &d.cpu,
            &d.mem,
            &r.antenna_gain,
            &r.max_txpower,
            &r.min_txpower,
            &g.channel,
            &g.frequency,
            &g.noise,
            &g.signal,
            &v.rx_bytes,
            &v.rx_dropped,
            &v.rx_errors,
            &v.tx_bytes,
            &v.tx_dropped,
            &v.tx_errors,
            &v.tx_power,
            &v.tx_retries,
            &v.tx_success,
            &v.tx_total,
            &s.tx_bytes,
            &s.rx_bytes,
            &s.noise,
            &s.signal,
        ]
        .into_iter()
    }

    pub(crate) fn descs(&self) -> Vec<&Desc> {
        self.iter().map(MetricDesc::desc).collect()
    }
}
