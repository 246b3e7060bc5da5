// `mca-dump` document model
//
// "mca" is the Management Control Agent on UniFi access points. Running
// `mca-dump` prints the full device status as one JSON object. The document
// carries hundreds of fields; only the ones exported as metrics are modelled
// here and everything else is ignored. Every container uses
// `#[serde(default)]` because field presence differs across firmware
// versions, and `null` anywhere decodes as the zero value. Numeric fields
// otherwise decode strictly except the system statistics blocks, which
// also accept numeric strings.

use serde::Deserialize;

use crate::error::Error;
use crate::lenient;

/// Diagnostic command executed on every poll.
pub const COMMAND: &str = "mca-dump";

// ── Device ───────────────────────────────────────────────────────────

/// Parsed status of one access point.
///
/// `name` and `liveness` never come from the device: the display name is
/// stamped from configuration and liveness records whether the poll
/// succeeded (1) or produced a placeholder (0).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeviceStatus {
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub ip: String,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub mac: String,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub model: String,
    #[serde(rename = "model_display", deserialize_with = "lenient::null_as_default")]
    pub model_name: String,
    #[serde(skip)]
    pub name: String,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub serial: String,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub version: String,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub uptime: i64,
    #[serde(rename = "system-stats", deserialize_with = "lenient::null_as_default")]
    pub system_stats: SystemStats,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub sys_stats: SysStats,
    #[serde(rename = "if_table", deserialize_with = "lenient::null_as_default")]
    pub interfaces: Vec<Interface>,
    #[serde(rename = "radio_table", deserialize_with = "lenient::null_as_default")]
    pub radios: Vec<Radio>,
    #[serde(rename = "vap_table", deserialize_with = "lenient::null_as_default")]
    pub vaps: Vec<Vap>,
    #[serde(skip)]
    pub liveness: u8,
}

impl DeviceStatus {
    /// Decode raw `mca-dump` output.
    pub fn parse(output: &[u8]) -> Result<Self, Error> {
        serde_json::from_slice(output).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: String::from_utf8_lossy(output).into_owned(),
        })
    }

    /// Zero-valued record for a device whose poll failed.
    pub fn placeholder(name: &str, address: &str) -> Self {
        Self {
            name: name.to_owned(),
            ip: address.to_owned(),
            liveness: 0,
            ..Self::default()
        }
    }

    /// Transmitted and received bytes summed over interfaces that are up.
    /// Down interfaces contribute nothing, whatever their counters say.
    pub fn up_interface_totals(&self) -> (i64, i64) {
        self.interfaces
            .iter()
            .filter(|i| i.up)
            .fold((0_i64, 0_i64), |(tx, rx), i| {
                (tx.saturating_add(i.tx_bytes), rx.saturating_add(i.rx_bytes))
            })
    }
}

/// `system-stats`: utilisation percentages, string-encoded on most firmware.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SystemStats {
    #[serde(deserialize_with = "lenient::float")]
    pub cpu: f64,
    #[serde(deserialize_with = "lenient::float")]
    pub mem: f64,
}

/// `sys_stats`: load averages and memory figures in bytes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SysStats {
    #[serde(rename = "loadavg_1", deserialize_with = "lenient::float")]
    pub load_1: f64,
    #[serde(rename = "loadavg_5", deserialize_with = "lenient::float")]
    pub load_5: f64,
    #[serde(rename = "loadavg_15", deserialize_with = "lenient::float")]
    pub load_15: f64,
    #[serde(deserialize_with = "lenient::integer")]
    pub mem_used: i64,
    #[serde(deserialize_with = "lenient::integer")]
    pub mem_total: i64,
    #[serde(deserialize_with = "lenient::integer")]
    pub mem_buffer: i64,
}

/// One row of `if_table`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Interface {
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub tx_bytes: i64,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub rx_bytes: i64,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub up: bool,
}

// ── Radio ────────────────────────────────────────────────────────────

/// One row of `radio_table`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Radio {
    /// Radio identifier, e.g. `ng` or `na`.
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub radio: String,
    /// Kernel interface name, e.g. `wifi0`.
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub name: String,
    #[serde(rename = "builtin_ant_gain", deserialize_with = "lenient::null_as_default")]
    pub antenna_gain: i64,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub max_txpower: i64,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub min_txpower: i64,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub scan_table: Vec<ScanEntry>,
}

/// A neighbouring (rogue) network seen during the radio's background scan.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScanEntry {
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub bssid: String,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub channel: i64,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub essid: String,
    #[serde(rename = "freq", deserialize_with = "lenient::null_as_default")]
    pub frequency: i64,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub noise: i64,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub security: String,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub signal: i64,
}

// ── Virtual access point ─────────────────────────────────────────────

/// One row of `vap_table`: a logical wireless network hosted on a radio.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Vap {
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub radio: String,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub radio_name: String,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub bssid: String,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub essid: String,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub channel: i64,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub usage: String,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub rx_bytes: i64,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub rx_dropped: i64,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub rx_errors: i64,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub tx_bytes: i64,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub tx_dropped: i64,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub tx_errors: i64,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub tx_power: i64,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub tx_retries: i64,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub tx_success: i64,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub tx_total: i64,
    #[serde(rename = "sta_table", deserialize_with = "lenient::null_as_default")]
    pub stations: Vec<Station>,
}

/// A client associated to a VAP.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Station {
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub hostname: String,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub mac: String,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub tx_bytes: i64,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub rx_bytes: i64,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub noise: i64,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub signal: i64,
}
